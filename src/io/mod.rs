//! Input helpers.
//!
//! - CSV ingest for the four dashboard tables (`ingest`)
//! - narrative content JSON (`content`)

pub mod content;
pub mod ingest;

pub use content::*;
pub use ingest::*;
