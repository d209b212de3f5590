//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the probing code stays clean and testable
//! - output changes are localized (tests below pin the exact layout)

use crate::app::pipeline::{Dashboard, SliderProbe};
use crate::domain::{Coefficient, CurvePoint, Scenario};
use crate::report::ValidationMetrics;

/// Current vs optimum per channel, plus the slider probe when one is given.
pub fn format_budget_table(dashboard: &Dashboard, probes: &[SliderProbe]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<14} {:>12} {:>10} {:>12} {:>10} {:>12} {:>12} {:>10}",
            "channel", "current", "cur_mroi", "optimum", "opt_mroi", "change", "slider", "mroi@"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<14} {:-<12} {:-<10} {:-<12} {:-<10} {:-<12} {:-<12} {:-<10}",
            "", "", "", "", "", "", "", ""
        ),
    );

    for channel in &dashboard.channels {
        let current = dashboard.current_for(channel);
        let optimum = dashboard.optimum(channel).ok();
        let probe = probes.iter().find(|p| &p.channel == channel);

        let change = match (current, optimum) {
            (Some(c), Some(o)) => fmt_signed_money(o.spend - c.spend),
            _ => "-".to_string(),
        };
        let (slider, at_slider) = match probe {
            Some(p) => match &p.result {
                Ok(point) => (fmt_money(point.spend), format!("{:.3}", point.response)),
                Err(_) => (fmt_money(p.budget), "n/a".to_string()),
            },
            None => ("-".to_string(), "-".to_string()),
        };

        push_row(
            &mut out,
            format!(
                "{:<14} {:>12} {:>10} {:>12} {:>10} {:>12} {:>12} {:>10}",
                truncate(channel, 14),
                current.map(|c| fmt_money(c.spend)).unwrap_or_else(|| "-".to_string()),
                current.map(|c| format!("{:.3}", c.response)).unwrap_or_else(|| "-".to_string()),
                optimum.map(|o| fmt_money(o.spend)).unwrap_or_else(|| "-".to_string()),
                optimum.map(|o| format!("{:.3}", o.response)).unwrap_or_else(|| "-".to_string()),
                change,
                slider,
                at_slider,
            ),
        );
    }

    out
}

/// Result of a single `mmm probe` query.
pub fn format_probe(target: f64, nearest: &CurvePoint, optimum: &CurvePoint) -> String {
    let mut out = String::new();
    out.push_str(&format!("Channel: {}\n", nearest.channel));
    out.push_str(&format!("Target spend: {}\n", fmt_money(target)));
    out.push_str(&format!(
        "Nearest sample: spend={} mROI={:.4} (distance {})\n",
        fmt_money(nearest.spend),
        nearest.response,
        fmt_money((nearest.spend - target).abs()),
    ));
    out.push_str(&format!(
        "Optimum: spend={} mROI={:.4}\n",
        fmt_money(optimum.spend),
        optimum.response
    ));
    out
}

/// Narrative sections, coefficient table, hold-out metrics and scenarios.
pub fn format_report(dashboard: &Dashboard) -> String {
    let content = &dashboard.content;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", content.title));
    for section in &content.sections {
        out.push_str(&format!("\n## {}\n{}\n", section.heading, section.body.trim_end()));
    }

    if !content.coefficients.is_empty() {
        out.push_str("\nCoefficients (95% CI):\n");
        out.push_str(&format_coefficients(&content.coefficients));
    }

    let metrics = dashboard.metrics();
    if !metrics.is_empty() {
        out.push_str("\nHold-out accuracy:\n");
        out.push_str(&format_metrics(&metrics));
    }

    if !content.scenarios.is_empty() {
        out.push_str("\nRecommended reallocation:\n");
        out.push_str(&format_scenarios(&content.scenarios));
    }

    if dashboard.skipped_rows > 0 {
        out.push_str(&format!("\n({} input rows skipped; see log)\n", dashboard.skipped_rows));
    }

    out
}

pub fn format_coefficients(rows: &[Coefficient]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:<12} {:>10} {:>10} {:>10} {}", "name", "estimate", "lower", "upper", "interpretation"),
    );
    push_row(&mut out, format!("{:-<12} {:-<10} {:-<10} {:-<10} {:-<14}", "", "", "", "", ""));
    for c in rows {
        push_row(
            &mut out,
            format!(
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {}",
                truncate(&c.name, 12),
                c.estimate,
                c.lower_ci,
                c.upper_ci,
                c.interpretation
            ),
        );
    }
    out
}

pub fn format_metrics(metrics: &[ValidationMetrics]) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:<12} {:>6} {:>12} {:>8}", "split", "n", "rmse", "mape"));
    push_row(&mut out, format!("{:-<12} {:-<6} {:-<12} {:-<8}", "", "", "", ""));
    for m in metrics {
        push_row(
            &mut out,
            format!(
                "{:<12} {:>6} {:>12.2} {:>8}",
                m.split.display_name(),
                m.n,
                m.rmse,
                m.mape.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string()),
            ),
        );
    }
    out
}

fn format_scenarios(rows: &[Scenario]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<14} {:>10} {:>10} {:>10} {:>8} {:>8} {:>12} {:>10}",
            "channel", "current", "optimal", "change", "mroi", "exp_mroi", "weekly", "annual"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<14} {:-<10} {:-<10} {:-<10} {:-<8} {:-<8} {:-<12} {:-<10}",
            "", "", "", "", "", "", "", ""
        ),
    );
    for s in rows {
        push_row(
            &mut out,
            format!(
                "{:<14} {:>10} {:>10} {:>10} {:>8} {:>8} {:>12} {:>10}",
                truncate(&s.channel, 14),
                fmt_money(s.current_spend),
                fmt_money(s.optimal_spend),
                fmt_signed_money(s.optimal_spend - s.current_spend),
                s.current_mroi,
                s.expected_mroi,
                s.weekly_impact,
                s.annual_impact,
            ),
        );
    }
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

/// `$1,234.50` style formatting.
pub fn fmt_money(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn fmt_signed_money(v: f64) -> String {
    if v > 0.0 {
        format!("+{}", fmt_money(v))
    } else {
        fmt_money(v)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::Sliders;
    use crate::domain::{Content, CurrentPoint, SliderSpec};

    fn dashboard() -> Dashboard {
        let curve = vec![
            CurvePoint::new("facebook", 0.0, 0.0),
            CurvePoint::new("facebook", 1000.0, 5.0),
            CurvePoint::new("facebook", 2000.0, 3.0),
        ];
        let current = vec![CurrentPoint {
            channel: "facebook".to_string(),
            spend: 400.0,
            response: 2.0,
        }];
        let content = Content {
            title: "Test".to_string(),
            sections: Vec::new(),
            coefficients: Vec::new(),
            scenarios: Vec::new(),
        };
        Dashboard::new(curve, current, Vec::new(), Vec::new(), content, 0)
    }

    #[test]
    fn money_formatting() {
        assert_eq!(fmt_money(0.0), "$0.00");
        assert_eq!(fmt_money(1743.0), "$1,743.00");
        assert_eq!(fmt_money(1234567.891), "$1,234,567.89");
        assert_eq!(fmt_money(-3946.0), "-$3,946.00");
        assert_eq!(fmt_signed_money(222.0), "+$222.00");
    }

    #[test]
    fn budget_table_shows_current_optimum_and_slider() {
        let d = dashboard();
        let mut sliders = Sliders::new(SliderSpec::default(), &d.channels);
        sliders.set("facebook", 1900.0);
        let txt = format_budget_table(&d, &d.probe(&sliders));

        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        let row = lines[2];
        assert!(row.starts_with("facebook"));
        assert!(row.contains("$400.00"));
        assert!(row.contains("$1,000.00"));
        assert!(row.contains("+$600.00"));
        assert!(row.contains("$2,000.00"));
        assert!(row.ends_with("3.000"));
    }

    #[test]
    fn probe_output() {
        let d = dashboard();
        let near = d.nearest("facebook", 1100.0).unwrap();
        let opt = d.optimum("facebook").unwrap();
        let txt = format_probe(1100.0, near, opt);
        assert!(txt.contains("Nearest sample: spend=$1,000.00 mROI=5.0000 (distance $100.00)"));
        assert!(txt.contains("Optimum: spend=$1,000.00"));
    }

    #[test]
    fn report_includes_title() {
        let txt = format_report(&dashboard());
        assert!(txt.starts_with("=== Test ===\n"));
        assert!(!txt.contains("Hold-out accuracy"));
    }
}
