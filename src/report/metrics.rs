//! Hold-out accuracy metrics computed from `model_results.csv`.

use crate::domain::{ModelResultRow, Split};

/// Accuracy of the model on one hold-out split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationMetrics {
    pub split: Split,
    /// Rows with both an observation and a prediction.
    pub n: usize,
    pub rmse: f64,
    /// Mean absolute percentage error as a fraction (`0.095` = 9.5%).
    ///
    /// `None` when every observation is zero.
    pub mape: Option<f64>,
}

/// RMSE and MAPE for each split that has at least one complete row.
///
/// Rows missing either side of a split are skipped for that split.
pub fn validation_metrics(rows: &[ModelResultRow]) -> Vec<ValidationMetrics> {
    Split::ALL
        .iter()
        .filter_map(|&split| split_metrics(rows, split))
        .collect()
}

fn split_metrics(rows: &[ModelResultRow], split: Split) -> Option<ValidationMetrics> {
    let pairs: Vec<(f64, f64)> = rows.iter().filter_map(|r| split.pair(r)).collect();
    if pairs.is_empty() {
        return None;
    }

    let n = pairs.len();
    let sse: f64 = pairs.iter().map(|(y, p)| (y - p) * (y - p)).sum();
    let rmse = (sse / n as f64).sqrt();

    let pct: Vec<f64> = pairs
        .iter()
        .filter(|(y, _)| *y != 0.0)
        .map(|(y, p)| ((y - p) / y).abs())
        .collect();
    let mape = if pct.is_empty() {
        None
    } else {
        Some(pct.iter().sum::<f64>() / pct.len() as f64)
    };

    Some(ValidationMetrics { split, n, rmse, mape })
}
