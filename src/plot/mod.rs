//! Terminal plotting (non-interactive).

pub mod ascii;

pub use ascii::*;
