//! Command-line parsing for the MMM budget dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading, probing, and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mmm", version, about = "Marketing-mix budget dashboard (mROI curves + budget sliders)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(CommonArgs),
    /// Find the curve sample nearest to a spend value for one channel.
    Probe(ProbeArgs),
    /// Print current vs optimum spend per channel.
    Optimum(CommonArgs),
    /// Print the narrative report, coefficients and hold-out accuracy.
    Report(CommonArgs),
    /// Render the mROI curves as an ASCII plot.
    Plot(PlotArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory containing current_points.csv, mROI_plotting.csv,
    /// model_results.csv and plot_sat_df.csv.
    #[arg(long, env = "MMM_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Narrative content JSON replacing the built-in write-up.
    #[arg(long, value_name = "JSON")]
    pub content: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off).
    #[arg(long, env = "MMM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory for log files (defaults to <tmp>/mmm-dashboard/logs).
    #[arg(long, env = "MMM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Slider minimum.
    #[arg(long, default_value_t = 0.0)]
    pub slider_min: f64,

    /// Slider maximum.
    #[arg(long, default_value_t = 10_000.0)]
    pub slider_max: f64,

    /// Slider step.
    #[arg(long, default_value_t = 100.0)]
    pub slider_step: f64,
}

/// Options for `mmm probe`.
#[derive(Debug, Args, Clone)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Channel to probe (as spelled in the curve table).
    #[arg(short = 'c', long)]
    pub channel: String,

    /// Target spend.
    #[arg(short = 's', long)]
    pub spend: f64,
}

/// Options for `mmm plot`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Slider budgets to mark, as `channel=spend` (repeatable).
    #[arg(long = "spend", value_name = "CHANNEL=SPEND", value_parser = parse_budget)]
    pub budgets: Vec<(String, f64)>,
}

/// Parse a `channel=spend` pair.
pub fn parse_budget(raw: &str) -> Result<(String, f64), String> {
    let (channel, spend) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CHANNEL=SPEND, got '{raw}'"))?;
    let channel = channel.trim();
    if channel.is_empty() {
        return Err(format!("missing channel in '{raw}'"));
    }
    let spend: f64 = spend
        .trim()
        .parse()
        .map_err(|e| format!("invalid spend in '{raw}': {e}"))?;
    if !spend.is_finite() || spend < 0.0 {
        return Err(format!("spend must be a finite number >= 0, got '{raw}'"));
    }
    Ok((channel.to_string(), spend))
}

impl CommonArgs {
    pub fn validate(&self) -> Result<(), AppError> {
        let ok = self.slider_min.is_finite()
            && self.slider_max.is_finite()
            && self.slider_step.is_finite()
            && self.slider_min >= 0.0
            && self.slider_max > self.slider_min
            && self.slider_step > 0.0;
        if !ok {
            return Err(AppError::new(
                2,
                "Invalid slider range: need 0 <= --slider-min < --slider-max and --slider-step > 0.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_budget_pairs() {
        assert_eq!(parse_budget("facebook=1500").unwrap(), ("facebook".to_string(), 1500.0));
        assert_eq!(parse_budget(" tiktok = 0 ").unwrap(), ("tiktok".to_string(), 0.0));
        assert!(parse_budget("facebook").is_err());
        assert!(parse_budget("=100").is_err());
        assert!(parse_budget("facebook=-1").is_err());
    }

    #[test]
    fn probe_args_parse() {
        let cli = Cli::parse_from(["mmm", "probe", "--channel", "facebook", "--spend", "1100", "--data-dir", "d"]);
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.channel, "facebook");
                assert_eq!(args.spend, 1100.0);
                assert_eq!(args.common.data_dir, PathBuf::from("d"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn plot_collects_repeated_budgets() {
        let cli = Cli::parse_from(["mmm", "plot", "--spend", "facebook=100", "--spend", "tiktok=200"]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.budgets.len(), 2);
        assert_eq!(args.budgets[1], ("tiktok".to_string(), 200.0));
    }
}
