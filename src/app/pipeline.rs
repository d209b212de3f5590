//! Shared "load + probe" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> content load -> channel discovery -> probing on slider changes
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use log::{debug, info};

use crate::domain::{
    Content, CurrentPoint, CurvePoint, DashboardConfig, ModelResultRow, SaturationPoint, SliderSpec,
};
use crate::error::{AppError, ProbeError};
use crate::io::{
    InputFiles, load_content, load_current_points, load_curve_points, load_model_results, load_saturation_points,
};
use crate::probe;
use crate::report::{ValidationMetrics, validation_metrics};

/// Everything the dashboard shows, loaded once per session.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub curve: Vec<CurvePoint>,
    pub current: Vec<CurrentPoint>,
    pub saturation: Vec<SaturationPoint>,
    pub model_results: Vec<ModelResultRow>,
    pub content: Content,
    /// Slider channels: curve channels first, then any channel only the current table knows.
    pub channels: Vec<String>,
    /// Rows skipped across all input tables.
    pub skipped_rows: usize,
}

/// Load all input tables and narrative content.
pub fn load_dashboard(config: &DashboardConfig) -> Result<Dashboard, AppError> {
    let files = InputFiles::in_dir(&config.data_dir);

    let curve = load_curve_points(&files.curve)?;
    let current = load_current_points(&files.current_points)?;
    let saturation = load_saturation_points(&files.saturation)?;
    let model_results = load_model_results(&files.model_results)?;
    let content = load_content(config.content_path.as_deref())?;

    let skipped_rows = curve.row_errors.len()
        + current.row_errors.len()
        + saturation.row_errors.len()
        + model_results.row_errors.len();

    let dashboard = Dashboard::new(
        curve.rows,
        current.rows,
        saturation.rows,
        model_results.rows,
        content,
        skipped_rows,
    );

    info!(
        "event=dashboard_loaded data_dir={} channels={} curve_points={} skipped_rows={}",
        config.data_dir.display(),
        dashboard.channels.join("|"),
        dashboard.curve.len(),
        dashboard.skipped_rows
    );

    Ok(dashboard)
}

impl Dashboard {
    pub fn new(
        curve: Vec<CurvePoint>,
        current: Vec<CurrentPoint>,
        saturation: Vec<SaturationPoint>,
        model_results: Vec<ModelResultRow>,
        content: Content,
        skipped_rows: usize,
    ) -> Self {
        let mut channels = probe::channels(&curve);
        for c in &current {
            if !channels.contains(&c.channel) {
                channels.push(c.channel.clone());
            }
        }
        Self {
            curve,
            current,
            saturation,
            model_results,
            content,
            channels,
            skipped_rows,
        }
    }

    pub fn optimum(&self, channel: &str) -> Result<&CurvePoint, ProbeError> {
        probe::optimum_point(&self.curve, channel)
    }

    pub fn nearest(&self, channel: &str, spend: f64) -> Result<&CurvePoint, ProbeError> {
        probe::nearest_point(&self.curve, channel, spend)
    }

    pub fn current_for(&self, channel: &str) -> Option<&CurrentPoint> {
        self.current.iter().find(|c| c.channel == channel)
    }

    /// Probe every slider against the curve table.
    pub fn probe(&self, sliders: &Sliders) -> Vec<SliderProbe> {
        sliders
            .entries()
            .iter()
            .map(|(channel, budget)| {
                let result = self.nearest(channel, *budget).cloned();
                if let Err(err) = &result {
                    debug!("event=probe_failed channel={channel} budget={budget} error={err}");
                }
                SliderProbe {
                    channel: channel.clone(),
                    budget: *budget,
                    result,
                }
            })
            .collect()
    }

    /// RMSE/MAPE per hold-out split (splits without complete rows are omitted).
    pub fn metrics(&self) -> Vec<ValidationMetrics> {
        validation_metrics(&self.model_results)
    }
}

/// Result of probing one slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderProbe {
    pub channel: String,
    pub budget: f64,
    pub result: Result<CurvePoint, ProbeError>,
}

/// One budget slider per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Sliders {
    spec: SliderSpec,
    entries: Vec<(String, f64)>,
}

impl Sliders {
    /// Sliders for `channels`, all starting at the slider minimum.
    pub fn new(spec: SliderSpec, channels: &[String]) -> Self {
        let entries = channels.iter().map(|c| (c.clone(), spec.min)).collect();
        Self { spec, entries }
    }

    pub fn spec(&self) -> SliderSpec {
        self.spec
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, channel: &str) -> Option<f64> {
        self.entries.iter().find(|(c, _)| c == channel).map(|(_, v)| *v)
    }

    /// Set a channel's budget (clamped). Unknown channels get a new slider.
    pub fn set(&mut self, channel: &str, value: f64) {
        let value = self.spec.clamp(value);
        match self.entries.iter_mut().find(|(c, _)| c == channel) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((channel.to_string(), value)),
        }
    }

    /// Move slider `idx` by `delta` steps.
    pub fn nudge(&mut self, idx: usize, delta: i32) {
        let spec = self.spec;
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.1 = spec.clamp(entry.1 + spec.step * f64::from(delta));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        let curve = vec![
            CurvePoint::new("facebook", 0.0, 0.0),
            CurvePoint::new("facebook", 1000.0, 5.0),
            CurvePoint::new("facebook", 2000.0, 3.0),
        ];
        let current = vec![
            CurrentPoint {
                channel: "facebook".to_string(),
                spend: 900.0,
                response: 4.5,
            },
            CurrentPoint {
                channel: "tiktok".to_string(),
                spend: 500.0,
                response: 0.2,
            },
        ];
        let content = Content {
            title: "t".to_string(),
            sections: Vec::new(),
            coefficients: Vec::new(),
            scenarios: Vec::new(),
        };
        Dashboard::new(curve, current, Vec::new(), Vec::new(), content, 0)
    }

    #[test]
    fn channels_include_current_only_channels() {
        let d = dashboard();
        assert_eq!(d.channels, vec!["facebook", "tiktok"]);
    }

    #[test]
    fn probe_surfaces_empty_channel() {
        let d = dashboard();
        let mut sliders = Sliders::new(SliderSpec::default(), &d.channels);
        sliders.set("facebook", 1100.0);
        sliders.set("tiktok", 500.0);

        let probes = d.probe(&sliders);
        assert_eq!(probes[0].result.as_ref().unwrap().spend, 1000.0);
        assert_eq!(
            probes[1].result,
            Err(ProbeError::EmptyChannel {
                channel: "tiktok".to_string()
            })
        );
    }

    #[test]
    fn sliders_clamp_and_nudge() {
        let mut sliders = Sliders::new(SliderSpec::default(), &["a".to_string()]);
        sliders.nudge(0, -1);
        assert_eq!(sliders.get("a"), Some(0.0));
        sliders.nudge(0, 3);
        assert_eq!(sliders.get("a"), Some(300.0));
        sliders.set("a", 50_000.0);
        assert_eq!(sliders.get("a"), Some(10_000.0));
        sliders.set("b", 200.0);
        assert_eq!(sliders.len(), 2);
    }
}
