//! Shared domain types.
//!
//! Every record is loaded once at startup and never mutated afterwards. Channel
//! identifiers are kept as plain strings: the set of channels is whatever the
//! input tables contain.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One sample of a channel's simulated marginal-response curve.
///
/// Loaded from `mROI_plotting.csv` (`channel, spend, sat_curve_pts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub channel: String,
    pub spend: f64,
    pub response: f64,
}

impl CurvePoint {
    pub fn new(channel: impl Into<String>, spend: f64, response: f64) -> Self {
        Self {
            channel: channel.into(),
            spend,
            response,
        }
    }
}

/// Present-day spend and its response for one channel.
///
/// Loaded from `current_points.csv`, which shares the curve table's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPoint {
    pub channel: String,
    pub spend: f64,
    pub response: f64,
}

/// One point of a channel's saturation (diminishing returns) curve.
///
/// Loaded from `plot_sat_df.csv` (`channel, adstock, saturation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationPoint {
    pub channel: String,
    pub adstock: f64,
    pub saturation: f64,
}

/// One row of the hold-out predictions in `model_results.csv`.
///
/// A row belongs to the test split, the validation split, or neither; the
/// columns of the other split are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResultRow {
    pub date: NaiveDate,
    pub y_test: Option<f64>,
    pub y_pred_test: Option<f64>,
    pub y_val: Option<f64>,
    pub y_pred_val: Option<f64>,
}

/// Which hold-out split a metric refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Test,
    Validation,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Test, Split::Validation];

    pub fn display_name(self) -> &'static str {
        match self {
            Split::Test => "Test",
            Split::Validation => "Validation",
        }
    }

    /// `(observed, predicted)` for this split, if both cells are present.
    pub fn pair(self, row: &ModelResultRow) -> Option<(f64, f64)> {
        match self {
            Split::Test => Some((row.y_test?, row.y_pred_test?)),
            Split::Validation => Some((row.y_val?, row.y_pred_val?)),
        }
    }
}

/// Range slider used to pick a hypothetical budget for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderSpec {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
            step: 100.0,
        }
    }
}

impl SliderSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn step_up(&self, value: f64) -> f64 {
        self.clamp(value + self.step)
    }

    pub fn step_down(&self, value: f64) -> f64 {
        self.clamp(value - self.step)
    }

    /// Position of `value` in `[0, 1]` along the slider track.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.clamp(value) - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Resolved runtime configuration shared by every front-end.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Directory holding the four input CSV files.
    pub data_dir: PathBuf,
    /// Optional narrative content override (JSON); the embedded default is used otherwise.
    pub content_path: Option<PathBuf>,
    pub slider: SliderSpec,
}

/// Narrative text and static tables shown around the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub coefficients: Vec<Coefficient>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// A heading plus free-form (markdown) body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Regression coefficient with its 95% confidence interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub lower_ci: f64,
    pub upper_ci: f64,
    #[serde(default)]
    pub interpretation: String,
}

/// One row of the recommended reallocation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub channel: String,
    pub current_spend: f64,
    pub optimal_spend: f64,
    pub current_mroi: String,
    pub expected_mroi: String,
    pub weekly_impact: String,
    pub annual_impact: String,
}
