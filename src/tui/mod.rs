//! Ratatui-based terminal dashboard.
//!
//! Three pages:
//! - **Budget**: mROI curves with optimum, current and slider markers, plus one
//!   budget slider per channel
//! - **Model fit**: hold-out observed vs predicted series and accuracy metrics
//! - **Saturation**: diminishing-returns curves and the coefficient table
//!
//! Every slider change re-probes the curve table; nothing is cached.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::pipeline::{Dashboard, SliderProbe, Sliders, load_dashboard};
use crate::domain::{DashboardConfig, Split};
use crate::error::AppError;
use crate::probe;
use crate::report::fmt_money;

mod plotters_chart;

use plotters_chart::{
    CHANNEL_COLORS, CURRENT_COLOR, LineSpec, LinesChart, MarkerSpec, OPTIMUM_COLOR, SLIDER_COLOR, to_tui_color,
};

/// Start the TUI.
pub fn run(config: &DashboardConfig) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let dashboard = load_dashboard(config)?;
    let mut app = App::new(dashboard, Sliders::new(config.slider, &[]));

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    info!("event=tui_start channels={}", app.sliders.len());
    let result = app.event_loop(&mut terminal);
    info!("event=tui_stop");
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Budget,
    ModelFit,
    Saturation,
}

impl Page {
    const ALL: [Page; 3] = [Page::Budget, Page::ModelFit, Page::Saturation];

    fn title(self) -> &'static str {
        match self {
            Page::Budget => "Budget optimizer",
            Page::ModelFit => "Model fit",
            Page::Saturation => "Saturation",
        }
    }

    fn next(self) -> Page {
        match self {
            Page::Budget => Page::ModelFit,
            Page::ModelFit => Page::Saturation,
            Page::Saturation => Page::Budget,
        }
    }
}

struct App {
    dashboard: Dashboard,
    sliders: Sliders,
    probes: Vec<SliderProbe>,
    selected: usize,
    page: Page,
    status: String,
}

impl App {
    fn new(dashboard: Dashboard, mut sliders: Sliders) -> Self {
        for channel in &dashboard.channels {
            if sliders.get(channel).is_none() {
                sliders.set(channel, sliders.spec().min);
            }
        }
        let mut app = Self {
            dashboard,
            sliders,
            probes: Vec::new(),
            selected: 0,
            page: Page::Budget,
            status: "Ready.".to_string(),
        };
        app.reprobe();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.page = self.page.next();
                self.status = format!("page: {}", self.page.title());
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.sliders.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.nudge(-1),
            KeyCode::Right => self.nudge(1),
            KeyCode::PageDown => self.nudge(-10),
            KeyCode::PageUp => self.nudge(10),
            KeyCode::Home => self.set_selected(self.sliders.spec().min),
            KeyCode::End => self.set_selected(self.sliders.spec().max),
            KeyCode::Char('o') => {
                if let Some(spend) = self.selected_channel().and_then(|c| self.dashboard.optimum(c).ok()).map(|p| p.spend) {
                    self.set_selected(spend);
                }
            }
            KeyCode::Char('c') => {
                if let Some(spend) = self
                    .selected_channel()
                    .and_then(|c| self.dashboard.current_for(c))
                    .map(|p| p.spend)
                {
                    self.set_selected(spend);
                }
            }
            KeyCode::Char('0') => {
                self.sliders = Sliders::new(self.sliders.spec(), &self.dashboard.channels);
                self.reprobe();
                self.status = "Sliders reset.".to_string();
            }
            _ => {}
        }
        false
    }

    fn selected_channel(&self) -> Option<&str> {
        self.sliders.entries().get(self.selected).map(|(c, _)| c.as_str())
    }

    fn nudge(&mut self, steps: i32) {
        self.sliders.nudge(self.selected, steps);
        self.reprobe();
    }

    fn set_selected(&mut self, value: f64) {
        let Some(channel) = self.selected_channel().map(str::to_string) else {
            return;
        };
        self.sliders.set(&channel, value);
        self.reprobe();
    }

    fn reprobe(&mut self) {
        self.probes = self.dashboard.probe(&self.sliders);
        if let Some(p) = self.probes.get(self.selected) {
            self.status = match &p.result {
                Ok(point) => format!(
                    "{}: budget {} -> nearest {} (mROI {:.3})",
                    p.channel,
                    fmt_money(p.budget),
                    fmt_money(point.spend),
                    point.response
                ),
                Err(err) => format!("{}: {err}", p.channel),
            };
            debug!("event=slider_change channel={} budget={}", p.channel, p.budget);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.page {
            Page::Budget => self.draw_budget(frame, chunks[1]),
            Page::ModelFit => self.draw_model_fit(frame, chunks[1]),
            Page::Saturation => self.draw_saturation(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut tabs = vec![
            Span::styled("mmm", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {} | ", self.dashboard.content.title)),
        ];
        for page in Page::ALL {
            let style = if page == self.page {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            tabs.push(Span::styled(format!(" {} ", page.title()), style));
            tabs.push(Span::raw(" "));
        }

        let info = Line::from(Span::styled(
            format!(
                "channels: {} | curve samples: {} | skipped rows: {}",
                self.dashboard.channels.join(", "),
                self.dashboard.curve.len(),
                self.dashboard.skipped_rows
            ),
            Style::default().fg(Color::Gray),
        ));

        let p = Paragraph::new(Text::from(vec![Line::from(tabs), info])).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_budget(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = (self.sliders.len() as u16).saturating_add(2).max(4);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(rows)])
            .split(area);

        self.draw_mroi_chart(frame, chunks[0]);
        self.draw_sliders(frame, chunks[1]);
    }

    fn draw_mroi_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Marginal ROI vs spend").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = mroi_series(&self.dashboard, &self.probes);
        let lines: Vec<LineSpec> = series
            .curves
            .iter()
            .map(|(pts, color)| LineSpec { points: pts, color: *color })
            .collect();
        let markers = [
            MarkerSpec {
                points: &series.current,
                color: CURRENT_COLOR,
            },
            MarkerSpec {
                points: &series.optimum,
                color: OPTIMUM_COLOR,
            },
            MarkerSpec {
                points: &series.slider,
                color: SLIDER_COLOR,
            },
        ];

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(
            LinesChart {
                lines: &lines,
                markers: &markers,
                x_bounds: series.x_bounds,
                y_bounds: series.y_bounds,
                x_label: "spend",
                y_label: "mROI",
                fmt_x: fmt_axis_money,
                fmt_y: fmt_axis_ratio,
            },
            chart_rect,
        );
        if let Some(insets) = insets {
            let labels = AxisLabels {
                x: "spend ($)",
                y: "mROI",
                fmt_x: fmt_axis_money,
                fmt_y: fmt_axis_ratio,
            };
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds, &labels);
        }
    }

    fn draw_sliders(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let spec = self.sliders.spec();
        let track = 20usize;
        let mut lines = Vec::new();

        for (idx, probe) in self.probes.iter().enumerate() {
            let selected = idx == self.selected;
            let filled = (spec.fraction(probe.budget) * track as f64).round() as usize;
            let bar = format!("[{}{}]", "#".repeat(filled), "-".repeat(track - filled.min(track)));
            let color = self
                .dashboard
                .channels
                .iter()
                .position(|c| c == &probe.channel)
                .map(|i| to_tui_color(CHANNEL_COLORS[i % CHANNEL_COLORS.len()]))
                .unwrap_or(Color::Gray);

            let mut spans = vec![
                Span::raw(if selected { "» " } else { "  " }),
                Span::styled(format!("{:<12}", probe.channel), Style::default().fg(color)),
                Span::raw(format!(" {bar} {:>11} ", fmt_money(probe.budget))),
            ];
            match &probe.result {
                Ok(point) => spans.push(Span::raw(format!(
                    "nearest {} mROI {:.3}",
                    fmt_money(point.spend),
                    point.response
                ))),
                Err(err) => spans.push(Span::styled(err.to_string(), Style::default().fg(Color::Red))),
            }
            if let Ok(opt) = self.dashboard.optimum(&probe.channel) {
                spans.push(Span::styled(
                    format!(" | optimum {} ({:.3})", fmt_money(opt.spend), opt.response),
                    Style::default().fg(Color::White),
                ));
            }
            if let Some(cur) = self.dashboard.current_for(&probe.channel) {
                spans.push(Span::styled(
                    format!(" | current {} ({:.3})", fmt_money(cur.spend), cur.response),
                    Style::default().fg(Color::Yellow),
                ));
            }

            let mut line = Line::from(spans);
            if selected {
                line = line.style(Style::default().add_modifier(Modifier::BOLD));
            }
            lines.push(line);
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Budget sliders").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_model_fit(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        let first_date = self.dashboard.model_results.first().map(|r| r.date);
        let title = match first_date {
            Some(d) => format!("Hold-out fit (days since {d})"),
            None => "Hold-out fit".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        let series = model_fit_series(&self.dashboard);
        let lines: Vec<LineSpec> = series
            .iter()
            .map(|(pts, color)| LineSpec { points: pts, color: *color })
            .collect();
        let all = series.iter().flat_map(|(pts, _)| pts.iter().copied());
        if let Some((x_bounds, y_bounds)) = bounds(all) {
            let (chart_rect, insets) = chart_layout(inner);
            frame.render_widget(
                LinesChart {
                    lines: &lines,
                    markers: &[],
                    x_bounds,
                    y_bounds,
                    x_label: "days",
                    y_label: "sales",
                    fmt_x: fmt_axis_days,
                    fmt_y: fmt_axis_units,
                },
                chart_rect,
            );
            if let Some(insets) = insets {
                let labels = AxisLabels {
                    x: "days",
                    y: "sales",
                    fmt_x: fmt_axis_days,
                    fmt_y: fmt_axis_units,
                };
                draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, &labels);
            }
        } else {
            frame.render_widget(
                Paragraph::new("No complete hold-out rows.").style(Style::default().fg(Color::Yellow)),
                inner,
            );
        }

        let mut text = vec![Line::from(vec![
            Span::styled("observed test ", Style::default().fg(to_tui_color(FIT_COLORS[0]))),
            Span::styled("predicted test ", Style::default().fg(to_tui_color(FIT_COLORS[1]))),
            Span::styled("observed val ", Style::default().fg(to_tui_color(FIT_COLORS[2]))),
            Span::styled("predicted val", Style::default().fg(to_tui_color(FIT_COLORS[3]))),
        ])];
        for m in self.dashboard.metrics() {
            text.push(Line::from(format!(
                "{:<10} n={:<4} RMSE={:.2} MAPE={}",
                m.split.display_name(),
                m.n,
                m.rmse,
                m.mape.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string())
            )));
        }
        let p = Paragraph::new(Text::from(text)).block(Block::default().title("Accuracy").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_saturation(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let block = Block::default().title("Saturation curves").borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        let series = saturation_series(&self.dashboard);
        let lines: Vec<LineSpec> = series
            .iter()
            .map(|(_, pts, color)| LineSpec { points: pts, color: *color })
            .collect();
        let all = series.iter().flat_map(|(_, pts, _)| pts.iter().copied());
        if let Some((x_bounds, y_bounds)) = bounds(all) {
            let (chart_rect, insets) = chart_layout(inner);
            frame.render_widget(
                LinesChart {
                    lines: &lines,
                    markers: &[],
                    x_bounds,
                    y_bounds,
                    x_label: "spend",
                    y_label: "saturation",
                    fmt_x: fmt_axis_money,
                    fmt_y: fmt_axis_ratio,
                },
                chart_rect,
            );
            if let Some(insets) = insets {
                let labels = AxisLabels {
                    x: "adstocked spend",
                    y: "sat",
                    fmt_x: fmt_axis_money,
                    fmt_y: fmt_axis_ratio,
                };
                draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, &labels);
            }
        }

        let mut text: Vec<Line> = series
            .iter()
            .map(|(channel, _, color)| Line::from(Span::styled(channel.clone(), Style::default().fg(to_tui_color(*color)))))
            .collect();
        text.push(Line::raw(""));
        for c in &self.dashboard.content.coefficients {
            text.push(Line::from(format!(
                "{:<11} {:>9.2}  [{:.2}, {:.2}]",
                c.name, c.estimate, c.lower_ci, c.upper_ci
            )));
        }
        for section in &self.dashboard.content.sections {
            text.push(Line::raw(""));
            text.push(Line::from(Span::styled(
                section.heading.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            text.extend(section.body.lines().map(|l| Line::raw(l.to_string())));
        }
        let p = Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Coefficients (95% CI)").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab page  ↑/↓ channel  ←/→ ±step  PgUp/PgDn ±10  o optimum  c current  0 reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Colors for observed/predicted test and observed/predicted validation.
const FIT_COLORS: [RGBColor; 4] = [
    RGBColor(255, 255, 255),
    RGBColor(0, 255, 255),
    RGBColor(200, 200, 200),
    RGBColor(255, 0, 255),
];

/// Precomputed series for the mROI chart.
struct MroiSeries {
    curves: Vec<(Vec<(f64, f64)>, RGBColor)>,
    current: Vec<(f64, f64)>,
    optimum: Vec<(f64, f64)>,
    slider: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn mroi_series(dashboard: &Dashboard, probes: &[SliderProbe]) -> MroiSeries {
    let curves: Vec<(Vec<(f64, f64)>, RGBColor)> = dashboard
        .channels
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let pts = probe::channel_curve(&dashboard.curve, c)
                .iter()
                .map(|p| (p.spend, p.response))
                .collect();
            (pts, CHANNEL_COLORS[i % CHANNEL_COLORS.len()])
        })
        .collect();

    let current: Vec<(f64, f64)> = dashboard.current.iter().map(|c| (c.spend, c.response)).collect();
    let optimum = probe::optimum_points(&dashboard.curve)
        .iter()
        .map(|p| (p.spend, p.response))
        .collect();
    let slider = probes
        .iter()
        .filter_map(|p| p.result.as_ref().ok())
        .map(|p| (p.spend, p.response))
        .collect();

    let all = curves
        .iter()
        .flat_map(|(pts, _)| pts.iter().copied())
        .chain(current.iter().copied());
    let (x_bounds, y_bounds) = bounds(all).unwrap_or(([0.0, 1.0], [0.0, 1.0]));

    MroiSeries {
        curves,
        current,
        optimum,
        slider,
        x_bounds,
        y_bounds,
    }
}

fn model_fit_series(dashboard: &Dashboard) -> Vec<(Vec<(f64, f64)>, RGBColor)> {
    let Some(first) = dashboard.model_results.first().map(|r| r.date) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (i, split) in Split::ALL.iter().enumerate() {
        let pairs: Vec<(f64, f64, f64)> = dashboard
            .model_results
            .iter()
            .filter_map(|r| {
                let (obs, pred) = split.pair(r)?;
                Some(((r.date - first).num_days() as f64, obs, pred))
            })
            .collect();
        if pairs.is_empty() {
            continue;
        }
        out.push((pairs.iter().map(|&(x, y, _)| (x, y)).collect(), FIT_COLORS[2 * i]));
        out.push((pairs.iter().map(|&(x, _, p)| (x, p)).collect(), FIT_COLORS[2 * i + 1]));
    }
    out
}

fn saturation_series(dashboard: &Dashboard) -> Vec<(String, Vec<(f64, f64)>, RGBColor)> {
    let mut channels: Vec<String> = Vec::new();
    for p in &dashboard.saturation {
        if !channels.contains(&p.channel) {
            channels.push(p.channel.clone());
        }
    }

    channels
        .into_iter()
        .enumerate()
        .map(|(i, channel)| {
            let mut pts: Vec<(f64, f64)> = dashboard
                .saturation
                .iter()
                .filter(|p| p.channel == channel)
                .map(|p| (p.adstock, p.saturation))
                .collect();
            pts.sort_by(|a, b| a.0.total_cmp(&b.0));
            let color = dashboard
                .channels
                .iter()
                .position(|c| c == &channel)
                .map(|j| CHANNEL_COLORS[j % CHANNEL_COLORS.len()])
                .unwrap_or(CHANNEL_COLORS[i % CHANNEL_COLORS.len()]);
            (channel, pts, color)
        })
        .collect()
}

/// X/Y bounds of the points with 5% vertical padding.
fn bounds(points: impl Iterator<Item = (f64, f64)>) -> Option<([f64; 2], [f64; 2])> {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) || x_max <= x_min {
        return None;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

fn fmt_axis_money(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else {
        format!("{v:.0}")
    }
}

fn fmt_axis_ratio(v: f64) -> String {
    format!("{v:.2}")
}

fn fmt_axis_days(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_units(v: f64) -> String {
    format!("{:.1}k", v / 1000.0)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

struct AxisLabels<'a> {
    x: &'a str,
    y: &'a str,
    fmt_x: fn(f64) -> String,
    fmt_y: fn(f64) -> String,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    labels: &AxisLabels<'_>,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = (labels.fmt_x)(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = (labels.fmt_y)(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(
            Paragraph::new(labels.x).alignment(Alignment::Center).style(style),
            x_rect,
        );
    }

    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1).max(1),
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(labels.y).style(style.add_modifier(Modifier::BOLD)),
        y_rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Content, CurrentPoint, CurvePoint, SliderSpec};

    fn app() -> App {
        let curve = vec![
            CurvePoint::new("facebook", 0.0, 0.0),
            CurvePoint::new("facebook", 1000.0, 5.0),
            CurvePoint::new("facebook", 2000.0, 3.0),
            CurvePoint::new("tiktok", 0.0, 0.0),
            CurvePoint::new("tiktok", 500.0, 0.7),
        ];
        let current = vec![CurrentPoint {
            channel: "facebook".to_string(),
            spend: 400.0,
            response: 2.0,
        }];
        let content = Content {
            title: "t".to_string(),
            sections: Vec::new(),
            coefficients: Vec::new(),
            scenarios: Vec::new(),
        };
        let dashboard = Dashboard::new(curve, current, Vec::new(), Vec::new(), content, 0);
        App::new(dashboard, Sliders::new(SliderSpec::default(), &[]))
    }

    #[test]
    fn sliders_start_at_minimum_for_every_channel() {
        let app = app();
        assert_eq!(app.sliders.entries().len(), 2);
        assert_eq!(app.probes[0].result.as_ref().unwrap().spend, 0.0);
    }

    #[test]
    fn keys_move_selected_slider_and_reprobe() {
        let mut app = app();
        for _ in 0..11 {
            assert!(!app.handle_key(KeyCode::Right));
        }
        assert_eq!(app.sliders.get("facebook"), Some(1100.0));
        assert_eq!(app.probes[0].result.as_ref().unwrap().spend, 1000.0);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('o'));
        assert_eq!(app.sliders.get("tiktok"), Some(500.0));

        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.sliders.get("facebook"), Some(400.0));

        app.handle_key(KeyCode::Char('0'));
        assert_eq!(app.sliders.get("facebook"), Some(0.0));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn tab_cycles_pages() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.page, Page::ModelFit);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.page, Page::Budget);
    }

    #[test]
    fn mroi_series_marks_optimum_and_slider() {
        let app = app();
        let series = mroi_series(&app.dashboard, &app.probes);
        assert_eq!(series.curves.len(), 2);
        assert_eq!(series.optimum, vec![(1000.0, 5.0), (500.0, 0.7)]);
        assert_eq!(series.slider, vec![(0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(series.x_bounds, [0.0, 2000.0]);
    }
}
