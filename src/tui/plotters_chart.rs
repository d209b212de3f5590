//! Plotters-powered line chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! Every dashboard page (mROI curves, hold-out fit, saturation) is a set of line
//! series plus optional point markers, so one widget serves all of them.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One line series.
pub struct LineSpec<'a> {
    pub points: &'a [(f64, f64)],
    pub color: RGBColor,
}

/// A group of point markers sharing one color.
pub struct MarkerSpec<'a> {
    pub points: &'a [(f64, f64)],
    pub color: RGBColor,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, which keeps
/// `render()` focused on drawing.
pub struct LinesChart<'a> {
    pub lines: &'a [LineSpec<'a>],
    /// Drawn after the lines, in order, so later groups win on overlap.
    pub markers: &'a [MarkerSpec<'a>],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for LinesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a tiny chart; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for line in self.lines {
                chart.draw_series(LineSeries::new(line.points.iter().copied(), &line.color))?;
            }

            // `Circle` radii are mis-scaled by the ratatui backend, so markers are
            // drawn as a small plus of pixels around the point instead.
            let dx = (x1 - x0) / 200.0;
            let dy = (y1 - y0) / 100.0;
            for group in self.markers {
                let color = group.color;
                chart.draw_series(group.points.iter().flat_map(|&(x, y)| {
                    [(x, y), (x - dx, y), (x + dx, y), (x, y - dy), (x, y + dy)]
                        .into_iter()
                        .map(move |p| Pixel::new(p, color))
                }))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Channel palette, high-contrast for terminal readability.
pub const CHANNEL_COLORS: [RGBColor; 5] = [
    RGBColor(0, 255, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 160, 0),
    RGBColor(255, 0, 255),
    RGBColor(80, 140, 255),
];

pub const OPTIMUM_COLOR: RGBColor = WHITE;
pub const CURRENT_COLOR: RGBColor = RGBColor(255, 255, 0);
pub const SLIDER_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Ratatui equivalent of a Plotters palette color (for legends drawn outside the chart).
pub fn to_tui_color(c: RGBColor) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}
