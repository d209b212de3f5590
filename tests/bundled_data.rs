use std::path::PathBuf;

use mmm_dashboard::app::pipeline::{Sliders, load_dashboard};
use mmm_dashboard::domain::{DashboardConfig, SliderSpec};
use mmm_dashboard::error::ProbeError;

fn config() -> DashboardConfig {
    DashboardConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
        content_path: None,
        slider: SliderSpec::default(),
    }
}

#[test]
fn bundled_data_loads_three_channels() {
    let dashboard = load_dashboard(&config()).unwrap();
    assert_eq!(dashboard.channels, vec!["facebook", "google_ads", "tiktok"]);
    assert_eq!(dashboard.skipped_rows, 0);
    assert_eq!(dashboard.model_results.len(), 20);
    assert_eq!(dashboard.metrics().len(), 2);
}

#[test]
fn optimum_spend_per_channel() {
    let dashboard = load_dashboard(&config()).unwrap();
    let optimum: Vec<(String, f64)> = dashboard
        .channels
        .iter()
        .map(|c| (c.clone(), dashboard.optimum(c).unwrap().spend))
        .collect();
    assert_eq!(
        optimum,
        vec![
            ("facebook".to_string(), 3700.0),
            ("google_ads".to_string(), 1700.0),
            ("tiktok".to_string(), 1200.0),
        ]
    );
}

#[test]
fn sliders_snap_to_the_sample_grid() {
    let dashboard = load_dashboard(&config()).unwrap();
    let mut sliders = Sliders::new(SliderSpec::default(), &dashboard.channels);
    sliders.set("facebook", 2216.0);
    sliders.set("google_ads", 99_999.0);

    let probes = dashboard.probe(&sliders);
    assert_eq!(probes[0].result.as_ref().unwrap().spend, 2200.0);
    assert_eq!(probes[1].budget, 10_000.0);
    assert_eq!(probes[1].result.as_ref().unwrap().spend, 10_000.0);
    assert_eq!(probes[2].result.as_ref().unwrap().spend, 0.0);
}

#[test]
fn unknown_channel_is_reported() {
    let dashboard = load_dashboard(&config()).unwrap();
    assert_eq!(
        dashboard.nearest("radio", 500.0),
        Err(ProbeError::EmptyChannel {
            channel: "radio".to_string()
        })
    );
}

#[test]
fn report_mentions_every_coefficient() {
    let dashboard = load_dashboard(&config()).unwrap();
    let report = mmm_dashboard::report::format_report(&dashboard);
    for c in &dashboard.content.coefficients {
        assert!(report.contains(&c.name), "missing {}", c.name);
    }
}
