//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - loaded records (`CurvePoint`, `CurrentPoint`, `SaturationPoint`, `ModelResultRow`)
//! - slider and runtime configuration (`SliderSpec`, `DashboardConfig`)
//! - narrative content (`Content`, `Coefficient`, `Scenario`)

pub mod types;

pub use types::*;
