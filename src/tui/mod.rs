//! The interactive carbon clock.
//!
//! The main screen shows the input date next to its warped counterpart, a
//! warp-rate chart over the trailing window, and a settings panel (model,
//! preset, window, date). Settings changes recompute against the in-memory
//! series; only an explicit refetch touches the network.

use std::io;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, SeriesSource};
use crate::cli::WarpArgs;
use crate::domain::{Granularity, ModelChoice, Preset, WarpPoint, WarpResult};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::WarpPlottersChart;

/// Start the TUI.
pub fn run(args: WarpArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data_source(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Leaves raw mode and the alternate screen on drop, error paths included.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::data_source(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data_source(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

struct App {
    args: WarpArgs,
    input_date: NaiveDate,
    date_input: String,
    selected_field: usize,
    editing_date: bool,
    status: String,
    source: Option<SeriesSource>,
    result: Option<WarpResult>,
    points: Vec<WarpPoint>,
}

impl App {
    fn new(args: WarpArgs) -> Result<Self, AppError> {
        let input_date = args.date.unwrap_or_else(|| Local::now().date_naive());
        let mut app = Self {
            args,
            input_date,
            date_input: String::new(),
            selected_field: 0,
            editing_date: false,
            status: "Fetching anomaly series...".to_string(),
            source: None,
            result: None,
            points: Vec::new(),
        };
        app.refresh_source()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data_source(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data_source(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| AppError::data_source(format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
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

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        if self.editing_date {
            return self.handle_date_edit(code);
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 3 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == 3 {
                    self.editing_date = true;
                    self.date_input = self.input_date.to_string();
                    self.status =
                        "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('g') => {
                self.args.granularity = other_granularity(self.args.granularity);
                self.status = format!("granularity: {}", self.args.granularity.display_name());
                self.recompute();
            }
            KeyCode::Char('r') => self.refresh_source()?,
            KeyCode::Char('d') => self.write_debug(),
            _ => {}
        }

        Ok(false)
    }

    fn handle_date_edit(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.args.model = other_model(self.args.model);
                self.status = format!("model: {}", self.args.model.display_name());
                self.recompute();
            }
            1 => {
                self.args.preset = if delta >= 0 {
                    next_preset(self.args.preset)
                } else {
                    prev_preset(self.args.preset)
                };
                // Explicit year/anomaly overrides would mask the cycle.
                self.args.baseline_year = None;
                self.args.target_year = None;
                self.args.target_anomaly = None;
                self.status = format!("preset: {}", self.args.preset.display_name());
                self.recompute();
            }
            2 => {
                let next = if delta >= 0 {
                    self.args.window.saturating_add(1)
                } else {
                    self.args.window.saturating_sub(1)
                };
                self.args.window = next.clamp(1, 60);
                self.status = format!("window: {} years", self.args.window);
                self.recompute();
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim();
        if trimmed.is_empty() {
            self.input_date = Local::now().date_naive();
        } else {
            match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(date) => self.input_date = date,
                Err(e) => {
                    self.status = format!("Invalid date '{trimmed}': {e}");
                    return;
                }
            }
        }
        self.status = format!("Date: {}", self.input_date);
        self.recompute();
    }

    fn refresh_source(&mut self) -> Result<(), AppError> {
        self.status = "Fetching anomaly series...".to_string();
        let config = self.args.to_run_config();
        let source = pipeline::fetch_series(&config, Local::now().date_naive())?;
        self.status = format!("Source: {}", source.label);
        self.source = Some(source);
        self.recompute();
        Ok(())
    }

    /// Re-run warp + rolling series against the in-memory source.
    ///
    /// Lookup failures degrade (clock shows N/A, chart shows a placeholder)
    /// with the reason in the status line; they never exit the TUI.
    fn recompute(&mut self) {
        self.result = None;
        self.points.clear();
        let Some(source) = &self.source else {
            self.status = "No anomaly series available.".to_string();
            return;
        };
        let config = self.args.to_run_config();

        match pipeline::run_warp(&config, source, self.input_date) {
            Ok(result) => self.result = Some(result),
            Err(err) => self.status = err.to_string(),
        }
        match pipeline::run_series(&config, source, self.input_date) {
            Ok(points) => self.points = points,
            Err(AppError::InsufficientData { .. }) => {}
            Err(err) => self.status = err.to_string(),
        }
    }

    fn write_debug(&mut self) {
        let Some(source) = &self.source else {
            self.status = "No anomaly series available.".to_string();
            return;
        };
        let config = self.args.to_run_config();
        match crate::debug::write_debug_bundle(source, &config, self.input_date) {
            Ok(path) => {
                self.status = format!("Wrote debug bundle: {}", path.display());
            }
            Err(err) => {
                self.status = format!("Debug write failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, rows[0]);
        self.draw_body(frame, rows[1]);
        self.draw_footer(frame, rows[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let config = self.args.to_run_config();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("cclock", Style::default().fg(Color::Cyan)),
            Span::raw(" - the carbon clock"),
        ]));

        let warped = match &self.result {
            Some(result) => result.warped_date.to_string(),
            None => format!("N/A (no data for {})", self.input_date.year()),
        };
        lines.push(Line::from(Span::styled(
            format!("{} → {warped}", self.input_date),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        lines.push(Line::from(Span::styled(
            format!(
                "model: {} | target: {} | granularity: {}",
                config.model.display_name(),
                crate::report::describe_target(&config.warp),
                config.granularity.display_name(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let detail = match (&self.result, &self.source) {
            (Some(result), _) => format!(
                "anomaly: {:+.2}°C | shift: {:+.1} days",
                result.anomaly_used, result.days_shift
            ),
            (None, Some(source)) => match source.series.latest_annual() {
                Some((year, anomaly)) => format!("latest annual: {year} at {anomaly:+.2}°C"),
                None => "no annual data yet".to_string(),
            },
            (None, None) => "-".to_string(),
        };
        lines.push(Line::from(Span::styled(
            detail,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(7)])
            .split(area);

        self.draw_chart(frame, rows[0]);
        self.draw_settings(frame, rows[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Warp rate (days)").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.source.is_none() {
            let msg = Paragraph::new("Waiting for the anomaly series...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }
        if self.points.is_empty() {
            let msg = Paragraph::new(format!(
                "No warp-rate data in the trailing {} years.",
                self.args.window
            ))
            .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (series, x_bounds, y_bounds) = chart_series(&self.points);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = WarpPlottersChart {
            series: &series,
            zero_line: true,
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "days",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_days,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let date_label = if self.editing_date {
            format!("{}_", self.date_input)
        } else {
            self.input_date.to_string()
        };
        let source_label = self
            .source
            .as_ref()
            .map(|s| s.label.clone())
            .unwrap_or_else(|| "-".to_string());

        let mut items = Vec::new();
        items.push(ListItem::new(format!(
            "Model: {}",
            self.args.model.display_name()
        )));
        items.push(ListItem::new(format!(
            "Preset: {}",
            self.args.preset.display_name()
        )));
        items.push(ListItem::new(format!("Window: {} years", self.args.window)));
        items.push(ListItem::new(format!("Date: {date_label}")));
        items.push(ListItem::new(format!("Source: {source_label}")));

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "↑/↓ select  ←/→ adjust  Enter edit date  g granularity  r refetch  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn other_model(cur: ModelChoice) -> ModelChoice {
    match cur {
        ModelChoice::LocalLinear => ModelChoice::Proportional,
        ModelChoice::Proportional => ModelChoice::LocalLinear,
    }
}

fn other_granularity(cur: Granularity) -> Granularity {
    match cur {
        Granularity::Annual => Granularity::Monthly,
        Granularity::Monthly => Granularity::Annual,
    }
}

fn next_preset(cur: Preset) -> Preset {
    match cur {
        Preset::Midcentury => Preset::Paris,
        Preset::Paris => Preset::Century,
        Preset::Century => Preset::Midcentury,
    }
}

fn prev_preset(cur: Preset) -> Preset {
    match cur {
        Preset::Midcentury => Preset::Century,
        Preset::Paris => Preset::Midcentury,
        Preset::Century => Preset::Paris,
    }
}

/// Build the chart series and bounds for Plotters.
fn chart_series(points: &[WarpPoint]) -> (Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (p.label.parse::<f64>().unwrap_or(i as f64), p.warp_rate))
        .collect();

    let (x_min, x_max) = series.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)),
    );
    let (y_min, y_max) = series.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)),
    );

    // Half-year margins keep a single-year series drawable.
    let x_bounds = if x_min.is_finite() && x_max.is_finite() {
        [x_min - 0.5, x_max + 0.5]
    } else {
        [-0.5, 1.5]
    };

    // The zero baseline stays in frame regardless of the rates' signs.
    let (mut y_lo, mut y_hi) = (y_min.min(0.0), y_max.max(0.0));
    if !y_lo.is_finite() || !y_hi.is_finite() || y_hi <= y_lo {
        y_lo = -1.0;
        y_hi = 1.0;
    }
    let pad = ((y_hi - y_lo).abs() * 0.05).max(1e-12);
    let y_bounds = [y_lo - pad, y_hi + pad];

    (series, x_bounds, y_bounds)
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_days(v: f64) -> String {
    format!("{v:+.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

/// Reserved gutters around the chart for tick labels and captions.
const CHART_INSETS: AxisInsets = AxisInsets {
    left: 8,
    right: 2,
    top: 1,
    bottom: 2,
};

/// Number of tick labels per axis.
const AXIS_TICKS: usize = 5;

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = CHART_INSETS;
    let min_width = insets.left + insets.right + 10;
    let min_height = insets.top + insets.bottom + 5;
    if inner.width <= min_width || inner.height <= min_height {
        // Not enough room for gutters; let the chart use the whole area.
        return (inner, None);
    }

    let chart = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };
    (chart, Some(insets))
}

/// Evenly spaced `(fraction, value)` pairs across `bounds`.
fn axis_ticks(bounds: [f64; 2]) -> Vec<(f64, f64)> {
    (0..AXIS_TICKS)
        .map(|i| {
            let frac = i as f64 / (AXIS_TICKS as f64 - 1.0);
            (frac, bounds[0] + frac * (bounds[1] - bounds[0]))
        })
        .collect()
}

fn put_label(frame: &mut ratatui::Frame<'_>, text: String, x: u16, y: u16, style: Style) {
    let width = text.len() as u16;
    let rect = Rect {
        x,
        y,
        width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(text).style(style), rect);
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let tick_style = Style::default().fg(Color::Gray);
    let tick_row = chart.y + chart.height;

    // Year ticks across the bottom gutter, centered under their position.
    if tick_row < inner.y + inner.height - 1 {
        for (frac, value) in axis_ticks(x_bounds) {
            let text = fmt_axis_year(value);
            let center = chart.x + ((chart.width - 1) as f64 * frac).round() as u16;
            let x = center.saturating_sub(text.len() as u16 / 2);
            put_label(frame, text, x, tick_row, tick_style);
        }
    }

    // Day ticks down the left gutter, right-aligned against the chart.
    let gutter_right = inner.x + insets.left.saturating_sub(1);
    for (frac, value) in axis_ticks(y_bounds) {
        let text = fmt_axis_days(value);
        let row = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * frac).round() as u16;
        let x = gutter_right.saturating_sub(text.len() as u16);
        if x >= inner.x {
            put_label(frame, text, x, row, tick_style);
        }
    }

    let caption_row = tick_row + 1;
    if caption_row < inner.y + inner.height {
        let caption = Paragraph::new("year")
            .alignment(Alignment::Center)
            .style(tick_style);
        frame.render_widget(
            caption,
            Rect {
                x: chart.x,
                y: caption_row,
                width: chart.width,
                height: 1,
            },
        );
    }

    let unit = Paragraph::new("days").style(tick_style.add_modifier(Modifier::BOLD));
    frame.render_widget(
        unit,
        Rect {
            x: inner.x,
            y: inner.y,
            width: insets.left.saturating_sub(1),
            height: 1,
        },
    );
}
