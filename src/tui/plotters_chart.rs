//! Plotters-powered delay chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering (the y mesh gives us the horizontal gridlines)
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: the series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct DelayChart<'a> {
    /// The day series as `(day, average_delay)` pairs, in day order.
    pub line: &'a [(f64, f64)],
    /// The point currently under the pointer, if any.
    pub hover: Option<(f64, f64)>,
    /// X bounds (days).
    pub x_bounds: [f64; 2],
    /// Y bounds (minutes).
    pub y_bounds: [f64; 2],
    /// Axis labels (kept simple for terminal rendering).
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for DelayChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. The x mesh is disabled to reduce clutter;
            // the y mesh stays on, giving the horizontal gridlines at each
            // major y-tick.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(8)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&RGBColor(80, 80, 80))
                .draw()?;

            // Series styling: keep the palette high-contrast for terminal readability.
            let line_color = RGBColor(70, 130, 180); // steel blue, as in the classic chart
            let point_color = WHITE;
            let hover_color = RGBColor(255, 255, 0); // yellow

            // 1) The day-series polyline.
            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            // 2) One marker per series point.
            chart.draw_series(
                self.line
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), point_color)),
            )?;

            // 3) The hovered point.
            //
            // We intentionally avoid `Circle` markers here. The underlying
            // `plotters-ratatui-backend` currently maps circle radii incorrectly
            // (pixel radius -> normalized canvas units), producing huge circles.
            //
            // A colored `Pixel` gives a clean "dot" highlight that looks good in
            // terminals and reliably overrides the base (white) series point.
            if let Some(hover) = self.hover {
                chart.draw_series(std::iter::once(Pixel::new(hover, hover_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
