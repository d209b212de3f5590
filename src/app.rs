//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - starts file logging
//! - loads the input tables once
//! - dispatches to the TUI or a one-shot printer

use clap::Parser;
use log::{error, info};

use crate::app::pipeline::{Sliders, load_dashboard};
use crate::cli::{Command, CommonArgs, PlotArgs, ProbeArgs};
use crate::domain::{DashboardConfig, SliderSpec};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mmm` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` only supplies defaults for the `env = ...` flags; it is optional.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let result = match cli.command {
        Command::Tui(args) => handle_tui(&args),
        Command::Probe(args) => handle_probe(&args),
        Command::Optimum(args) => handle_optimum(&args),
        Command::Report(args) => handle_report(&args),
        Command::Plot(args) => handle_plot(&args),
    };

    if let Err(err) = &result {
        error!("event=app_exit status=error exit_code={} message={}", err.exit_code(), err);
    }
    result
}

fn handle_tui(args: &CommonArgs) -> Result<(), AppError> {
    let config = prepare(args)?;
    crate::tui::run(&config)
}

fn handle_probe(args: &ProbeArgs) -> Result<(), AppError> {
    let config = prepare(&args.common)?;
    if !args.spend.is_finite() || args.spend < 0.0 {
        return Err(AppError::new(2, format!("--spend must be >= 0 (got {}).", args.spend)));
    }
    let dashboard = load_dashboard(&config)?;

    let nearest = dashboard.nearest(&args.channel, args.spend)?;
    let optimum = dashboard.optimum(&args.channel)?;
    info!(
        "event=probe channel={} target={} nearest_spend={} optimum_spend={}",
        args.channel, args.spend, nearest.spend, optimum.spend
    );

    print!("{}", crate::report::format_probe(args.spend, nearest, optimum));
    Ok(())
}

fn handle_optimum(args: &CommonArgs) -> Result<(), AppError> {
    let config = prepare(args)?;
    let dashboard = load_dashboard(&config)?;
    print!("{}", crate::report::format_budget_table(&dashboard, &[]));
    Ok(())
}

fn handle_report(args: &CommonArgs) -> Result<(), AppError> {
    let config = prepare(args)?;
    let dashboard = load_dashboard(&config)?;
    print!("{}", crate::report::format_report(&dashboard));
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let config = prepare(&args.common)?;
    let dashboard = load_dashboard(&config)?;

    let mut sliders = Sliders::new(config.slider, &[]);
    for (channel, spend) in &args.budgets {
        sliders.set(channel, *spend);
    }
    let probes = dashboard.probe(&sliders);
    // An unknown channel is a data/config mismatch, not something to skip silently.
    if let Some(err) = probes.iter().find_map(|p| p.result.as_ref().err()) {
        return Err(err.clone().into());
    }

    println!(
        "{}",
        crate::plot::render_ascii_plot(&dashboard, &probes, args.width, args.height)
    );
    Ok(())
}

/// Validate common flags, start logging, and build the resolved config.
fn prepare(args: &CommonArgs) -> Result<DashboardConfig, AppError> {
    args.validate()?;
    let log_dir = args.log_dir.clone().unwrap_or_else(crate::logging::default_log_dir);
    crate::logging::init_logging(&args.log_level, &log_dir)?;
    Ok(config_from_args(args))
}

pub fn config_from_args(args: &CommonArgs) -> DashboardConfig {
    DashboardConfig {
        data_dir: args.data_dir.clone(),
        content_path: args.content.clone(),
        slider: SliderSpec {
            min: args.slider_min,
            max: args.slider_max,
            step: args.slider_step,
        },
    }
}

/// Rewrite argv so `mmm` defaults to `mmm tui`.
///
/// Rules:
/// - `mmm`                        -> `mmm tui`
/// - `mmm --data-dir d ...`       -> `mmm tui --data-dir d ...`
/// - `mmm --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}
