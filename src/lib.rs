//! `mmm-dashboard` library crate.
//!
//! The binary (`mmm`) is a thin wrapper around this library so that:
//!
//! - curve probing is testable without a terminal
//! - the CLI printers and the TUI share one loading pipeline
//! - modules are reusable by other front-ends

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod probe;
pub mod report;
pub mod tui;
