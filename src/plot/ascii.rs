//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - mROI curves: one line glyph per channel (`-`, `~`, `=`, `:` ...)
//! - optimum per channel: `*`
//! - current spend per channel: `C`
//! - slider probe (nearest sample): `@`

use crate::app::pipeline::{Dashboard, SliderProbe};
use crate::probe;

const CURVE_GLYPHS: [char; 6] = ['-', '~', '=', ':', '+', '.'];

/// Render every channel's curve plus its markers.
pub fn render_ascii_plot(dashboard: &Dashboard, probes: &[SliderProbe], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = spend_range(dashboard).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = response_range(dashboard).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    let mut grid = vec![vec![' '; width]; height];
    let mut legend = Vec::new();

    // Curves first so markers overlay them.
    for (idx, channel) in dashboard.channels.iter().enumerate() {
        let curve = probe::channel_curve(&dashboard.curve, channel);
        if curve.is_empty() {
            continue;
        }
        let glyph = CURVE_GLYPHS[idx % CURVE_GLYPHS.len()];
        let pts: Vec<(f64, f64)> = curve.iter().map(|p| (p.spend, p.response)).collect();
        draw_curve(&mut grid, &pts, &frame, glyph);
        legend.push(format!("{glyph} {channel}"));
    }

    for c in &dashboard.current {
        frame.put(&mut grid, c.spend, c.response, 'C');
    }
    for p in probe::optimum_points(&dashboard.curve) {
        frame.put(&mut grid, p.spend, p.response, '*');
    }
    for probe in probes {
        if let Ok(p) = &probe.result {
            frame.put(&mut grid, p.spend, p.response, '@');
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: spend=[{x_min:.0}, {x_max:.0}] | mROI=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    if !legend.is_empty() {
        out.push_str(&format!("{} | * optimum  C current  @ slider\n", legend.join("  ")));
    }
    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Frame {
    fn map_x(&self, x: f64) -> usize {
        let u = ((x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        (u * (self.width as f64 - 1.0)).round() as usize
    }

    fn map_y(&self, y: f64) -> usize {
        let u = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        // y=top is max -> row 0
        (self.height as f64 - 1.0 - (u * (self.height as f64 - 1.0))).round() as usize
    }

    fn put(&self, grid: &mut [Vec<char>], x: f64, y: f64, ch: char) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        grid[self.map_y(y)][self.map_x(x)] = ch;
    }
}

fn spend_range(dashboard: &Dashboard) -> Option<(f64, f64)> {
    let spends = dashboard
        .curve
        .iter()
        .map(|p| p.spend)
        .chain(dashboard.current.iter().map(|c| c.spend));
    min_max(spends)
}

fn response_range(dashboard: &Dashboard) -> Option<(f64, f64)> {
    let responses = dashboard
        .curve
        .iter()
        .map(|p| p.response)
        .chain(dashboard.current.iter().map(|c| c.response));
    min_max(responses)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], frame: &Frame, ch: char) {
    let mut prev = None;
    for &(x, y) in curve {
        let gx = frame.map_x(x);
        let gy = frame.map_y(y);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, gx, gy, ch),
            None => grid[gy][gx] = ch,
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
