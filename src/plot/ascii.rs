//! ASCII plotting for terminal output.
//!
//! This is a thin adapter over `chart::compute_layout`: all scale and tick
//! math lives in the pure layer, this module only maps it onto a fixed
//! character grid. Intentionally "dumb", optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - series points: `*`
//! - connecting polyline: `-`
//! - horizontal gridlines at y-ticks: `.`

use crate::chart::{self, compute_layout, tick_values};
use crate::domain::DaySeriesPoint;

/// Width of the left margin holding y tick labels.
const Y_LABEL_MARGIN: usize = 6;

/// Render the series as an ASCII chart of `width` x `height` plot cells.
pub fn render_ascii_chart(
    series: &[DaySeriesPoint],
    width: usize,
    height: usize,
    airport: &str,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(layout) = compute_layout(series, (width - 1) as f64, (height - 1) as f64) else {
        return "Not enough data to draw a chart (need at least two distinct days).\n".to_string();
    };

    let mut grid = vec![vec![' '; width]; height];

    // Horizontal gridlines first, so the polyline overlays them. Coarser
    // tick targets than the layout default keep a small grid readable.
    let y_ticks = tick_values(layout.y.domain, (height / 3).max(2));
    for &tick in &y_ticks {
        let row = layout.y.apply(tick).round() as usize;
        if let Some(cells) = grid.get_mut(row) {
            for cell in cells.iter_mut() {
                *cell = '.';
            }
        }
    }

    // Polyline in day order.
    let cells: Vec<(usize, usize)> = layout
        .path
        .iter()
        .map(|&(x, y)| (x.round() as usize, y.round() as usize))
        .collect();
    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0], pair[1], '-');
    }

    // Point markers overlay the line.
    for &(x, y) in &cells {
        if y < height && x < width {
            grid[y][x] = '*';
        }
    }

    let mut out = String::new();
    out.push_str(&chart::chart_title(airport));
    out.push('\n');
    out.push_str(chart::Y_LABEL);
    out.push('\n');

    let tick_rows: Vec<(usize, f64)> = y_ticks
        .iter()
        .map(|&t| (layout.y.apply(t).round() as usize, t))
        .collect();

    for (row, cells) in grid.into_iter().enumerate() {
        let label = tick_rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, t)| format!("{t:.0}"))
            .unwrap_or_default();
        out.push_str(&format!("{:>width$} |", label, width = Y_LABEL_MARGIN));
        out.push_str(&cells.into_iter().collect::<String>());
        out.push('\n');
    }

    // Bottom border + x tick labels (integer days only) + axis label.
    out.push_str(&format!(
        "{:>width$} +{}\n",
        "",
        "-".repeat(width),
        width = Y_LABEL_MARGIN
    ));

    let mut tick_line = vec![' '; Y_LABEL_MARGIN + 2 + width];
    for &tick in tick_values(layout.x.domain, (width / 8).max(2))
        .iter()
        .filter(|t| t.fract() == 0.0)
    {
        let col = Y_LABEL_MARGIN + 2 + layout.x.apply(tick).round() as usize;
        let label = format!("{tick:.0}");
        for (i, ch) in label.chars().enumerate() {
            if let Some(cell) = tick_line.get_mut(col + i) {
                *cell = ch;
            }
        }
    }
    out.push_str(tick_line.into_iter().collect::<String>().trim_end());
    out.push('\n');

    let pad = Y_LABEL_MARGIN + 2 + (width.saturating_sub(chart::X_LABEL.len())) / 2;
    out.push_str(&format!("{:width$}{}\n", "", chart::X_LABEL, width = pad));

    out
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

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
    fn degenerate_series_renders_a_hint() {
        let txt = render_ascii_chart(&[point(5, 10)], 40, 10, "LAX");
        assert!(txt.contains("Not enough data"));
    }

    #[test]
    fn chart_carries_title_and_axis_labels() {
        let series: Vec<_> = (1..=31).map(|d| point(d, (d as i32) % 7)).collect();
        let txt = render_ascii_chart(&series, 62, 15, "LAX");

        assert!(txt.contains("Average delay (in minutes) at LAX (per day)"));
        assert!(txt.contains("Average Delay (minutes)"));
        assert!(txt.contains("Days"));
        // Two header lines + grid + border + tick labels + axis label.
        assert_eq!(txt.lines().count(), 2 + 15 + 3);
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_ascii_chart(&[point(1, 0), point(2, 10)], 11, 5, "LAX");
        let expected = concat!(
            "Average delay (in minutes) at LAX (per day)\n",
            "Average Delay (minutes)\n",
            "    10 |.........-*\n",
            "       |       --  \n",
            "     5 |....---....\n",
            "       |  --       \n",
            "     0 |*-.........\n",
            "       +-----------\n",
            "        1         2\n",
            "           Days\n",
        );
        assert_eq!(txt, expected);
    }
}
