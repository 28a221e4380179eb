//! Ratatui-based terminal UI.
//!
//! The TUI renders the aggregated day series as a line chart with a
//! mouse-following tooltip: moving the pointer over the plot highlights the
//! nearest day and shows its average delay. A key toggle switches the
//! aggregated metric (arrival vs. departure) and triggers a full
//! recomputation from the cached flight records.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::agg::{self, AggregateError};
use crate::app::pipeline;
use crate::chart::{self, LinearScale};
use crate::domain::{DaySeriesPoint, DelayMetric, RunConfig};
use crate::error::AppError;
use crate::io::ingest::IngestedFlights;

mod plotters_chart;

use plotters_chart::DelayChart;

/// Start the TUI.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse capture)
/// on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// Screen-space mapping of the last drawn plot region, used to translate
/// mouse positions back into data space.
#[derive(Debug, Clone, Copy)]
struct ChartView {
    area: Rect,
    x: LinearScale,
    y: LinearScale,
}

struct App {
    config: RunConfig,
    metric: DelayMetric,
    ingest: IngestedFlights,
    /// Current series, ascending by day; fully replaced on every recomputation.
    series: Vec<DaySeriesPoint>,
    /// Index into `series` of the point under the pointer.
    hover: Option<usize>,
    chart_view: Option<ChartView>,
    status: String,
}

impl App {
    fn new(config: RunConfig) -> Result<Self, AppError> {
        let ingest = pipeline::load_flights(&config)?;
        let series = pipeline::aggregate_series(&ingest.records, &config, config.metric)?;

        let status = format!(
            "Loaded {}: {} rows ({} skipped).",
            config.source,
            ingest.rows_used,
            ingest.row_errors.len()
        );

        Ok(Self {
            metric: config.metric,
            config,
            ingest,
            series,
            hover: None,
            chart_view: None,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    if self.handle_mouse(mouse) {
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('m') => self.toggle_metric(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    /// Switch arrival <-> departure and recompute from the cached records.
    ///
    /// On `NoMatchingRecords` the previous metric and series are kept; the
    /// condition only surfaces in the status line.
    fn toggle_metric(&mut self) {
        let next = self.metric.toggled();
        match agg::aggregate(
            &self.ingest.records,
            next,
            &self.config.airport,
            self.config.empty_days,
        ) {
            Ok(series) => {
                self.metric = next;
                self.series = series;
                self.hover = None;
                self.status = format!("metric: {}", next.display_name());
            }
            Err(err @ AggregateError::NoMatchingRecords { .. }) => {
                self.status = format!("{err} Keeping previous series.");
            }
        }
    }

    /// Re-read the data source and recompute the current metric's series.
    fn reload(&mut self) {
        match pipeline::load_flights(&self.config) {
            Ok(ingest) => {
                self.ingest = ingest;
                match pipeline::aggregate_series(&self.ingest.records, &self.config, self.metric) {
                    Ok(series) => {
                        self.series = series;
                        self.hover = None;
                        self.status = format!(
                            "Reloaded {}: {} rows ({} skipped).",
                            self.config.source,
                            self.ingest.rows_used,
                            self.ingest.row_errors.len()
                        );
                    }
                    Err(err) => self.status = format!("Reload aggregation failed: {err}"),
                }
            }
            Err(err) => self.status = format!("Reload failed: {err}"),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::Moved => {
                let hover = self.hover_at(mouse.column, mouse.row);
                if hover != self.hover {
                    self.hover = hover;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Resolve a terminal cell to the nearest series point.
    ///
    /// The tooltip is hidden (`None`) whenever the pointer is outside the
    /// plot region drawn by the last frame.
    fn hover_at(&self, column: u16, row: u16) -> Option<usize> {
        let view = self.chart_view?;
        if !view.area.contains(Position::new(column, row)) {
            return None;
        }
        let day = view.x.invert(f64::from(column));
        chart::nearest_point(&self.series, day)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("delays", Style::default().fg(Color::Cyan)),
            Span::raw(" — per-day average flight delay"),
        ]));

        lines.push(Line::from(vec![
            Span::raw("Selected Delay Type: "),
            Span::styled(
                self.metric.display_name(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));

        let with_data = self.series.iter().filter(|p| p.late_flights > 0).count();
        lines.push(Line::from(Span::styled(
            format!(
                "airport: {} | rows: {} used, {} skipped | days with late flights: {}",
                self.config.airport,
                self.ingest.rows_used,
                self.ingest.row_errors.len(),
                with_data,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(chart::chart_title(&self.config.airport))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((line, x_bounds, y_bounds)) = chart_series(&self.series) else {
            self.chart_view = None;
            let msg = Paragraph::new("Not enough data to draw a chart (need at least two distinct days).")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        self.chart_view = plot_region(inner).map(|plot| ChartView {
            area: plot,
            x: LinearScale::new(
                x_bounds,
                [f64::from(plot.x), f64::from(plot.x + plot.width - 1)],
            ),
            y: LinearScale::new(
                y_bounds,
                [f64::from(plot.y + plot.height - 1), f64::from(plot.y)],
            ),
        });

        let hover_point = self
            .hover
            .and_then(|i| self.series.get(i))
            .map(|p| (f64::from(p.day), f64::from(p.average_delay)));

        let widget = DelayChart {
            line: &line,
            hover: hover_point,
            x_bounds,
            y_bounds,
            x_label: chart::X_LABEL,
            y_label: chart::Y_LABEL,
            fmt_x: fmt_axis_day,
            fmt_y: fmt_axis_minutes,
        };
        frame.render_widget(widget, inner);

        if let Some(i) = self.hover {
            self.draw_tooltip(frame, inner, i);
        }
    }

    /// Draw the tooltip text next to the hovered point.
    fn draw_tooltip(&self, frame: &mut ratatui::Frame<'_>, inner: Rect, index: usize) {
        let (Some(view), Some(point)) = (self.chart_view, self.series.get(index)) else {
            return;
        };

        let px = view.x.apply(f64::from(point.day)).round() as i32;
        let py = view.y.apply(f64::from(point.average_delay)).round() as i32;

        let text = format!(
            " day {}: {} min ({} late) ",
            point.day, point.average_delay, point.late_flights
        );
        let width = text.len() as u16;

        // Prefer above-right of the point; clamp into the chart area.
        let mut x = (px + 2).max(i32::from(inner.x)) as u16;
        let mut y = (py - 1).max(i32::from(inner.y)) as u16;
        if x + width > inner.x + inner.width {
            x = (inner.x + inner.width).saturating_sub(width);
        }
        if y >= inner.y + inner.height {
            y = (inner.y + inner.height).saturating_sub(1);
        }

        let tooltip = Paragraph::new(text).style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(tooltip, Rect { x, y, width, height: 1 });
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "m toggle metric  r reload  q quit  (hover the chart for values)";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build the chart line series and padded bounds.
///
/// Returns `None` when the series cannot define a meaningful scale domain
/// (fewer than two distinct days).
fn chart_series(series: &[DaySeriesPoint]) -> Option<(Vec<(f64, f64)>, [f64; 2], [f64; 2])> {
    let layout = chart::compute_layout(series, 1.0, 1.0)?;

    let line: Vec<(f64, f64)> = layout
        .points
        .iter()
        .map(|p| (f64::from(p.day), f64::from(p.average_delay)))
        .collect();

    let x_bounds = layout.x.domain;
    let [y_min, y_max] = layout.y.domain;
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    Some((line, x_bounds, y_bounds))
}

/// The cells Plotters actually plots into, inside the widget area.
///
/// The widget reserves 1 cell of margin all around, 6 columns for y labels
/// and 3 rows for x labels; mouse-to-data mapping has to use the same region
/// or the tooltip drifts.
fn plot_region(inner: Rect) -> Option<Rect> {
    const MARGIN: u16 = 1;
    const Y_LABELS: u16 = 6;
    const X_LABELS: u16 = 3;

    let left = MARGIN + Y_LABELS;
    let bottom = MARGIN + X_LABELS;
    if inner.width <= left + MARGIN + 2 || inner.height <= bottom + MARGIN + 2 {
        return None;
    }

    Some(Rect {
        x: inner.x + left,
        y: inner.y + MARGIN,
        width: inner.width - left - MARGIN,
        height: inner.height - MARGIN - bottom,
    })
}

fn fmt_axis_day(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_minutes(v: f64) -> String {
    format!("{v:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, delay: i32) -> DaySeriesPoint {
        DaySeriesPoint {
            day,
            average_delay: delay,
            late_flights: 1,
        }
    }

    #[test]
    fn chart_series_pads_vertical_bounds() {
        let (line, x_bounds, y_bounds) =
            chart_series(&[point(1, 0), point(31, 40)]).unwrap();

        assert_eq!(line.len(), 2);
        assert_eq!(x_bounds, [1.0, 31.0]);
        assert!(y_bounds[0] < 0.0 && y_bounds[1] > 40.0);
    }

    #[test]
    fn chart_series_rejects_degenerate_input() {
        assert!(chart_series(&[]).is_none());
        assert!(chart_series(&[point(5, 10)]).is_none());
    }

    #[test]
    fn plot_region_is_inside_the_widget_area() {
        let inner = Rect::new(2, 1, 80, 24);
        let plot = plot_region(inner).unwrap();

        assert!(plot.x > inner.x);
        assert!(plot.y >= inner.y);
        assert!(plot.x + plot.width <= inner.x + inner.width);
        assert!(plot.y + plot.height <= inner.y + inner.height);

        // Too small to plot into.
        assert!(plot_region(Rect::new(0, 0, 8, 4)).is_none());
    }
}
