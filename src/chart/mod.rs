//! Pure chart layout: scales, ticks, polyline, nearest-point lookup.
//!
//! Nothing in this module touches a drawing surface. The ASCII renderer and
//! the TUI widget are thin adapters over `ChartLayout`, which keeps the
//! scale/axis/tooltip math testable without a terminal.

use crate::domain::DaySeriesPoint;

pub const X_LABEL: &str = "Days";
pub const Y_LABEL: &str = "Average Delay (minutes)";

/// Chart title for the given airport.
pub fn chart_title(airport: &str) -> String {
    format!("Average delay (in minutes) at {airport} (per day)")
}

/// A linear mapping from a data domain to a surface range.
///
/// The vertical scale is built with an inverted range (`[height, 0]`) so
/// larger delays draw higher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Map a data value to surface coordinates.
    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a surface coordinate back to data space.
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// A render-ready chart description in surface coordinates.
///
/// `points` is a defensively re-sorted copy of the input series, so the
/// tooltip lookup can rely on ascending days even if a caller supplied
/// out-of-order data.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    pub points: Vec<DaySeriesPoint>,
    pub x: LinearScale,
    pub y: LinearScale,
    /// Tick positions in data space (days).
    pub x_ticks: Vec<f64>,
    /// Tick positions in data space (minutes); gridlines are drawn at each.
    pub y_ticks: Vec<f64>,
    /// The polyline through all points, in surface coordinates, day order.
    pub path: Vec<(f64, f64)>,
}

/// Compute the layout for a series on a `width` x `height` surface.
///
/// Returns `None` when no meaningful scale domain exists: fewer than two
/// distinct days, or a degenerate surface. Callers render a hint instead of
/// leaving the behavior to the drawing library.
pub fn compute_layout(series: &[DaySeriesPoint], width: f64, height: f64) -> Option<ChartLayout> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let mut points = series.to_vec();
    points.sort_by_key(|p| p.day);

    let first_day = points.first()?.day;
    let last_day = points.last()?.day;
    if first_day == last_day {
        return None;
    }

    let x_bounds = [f64::from(first_day), f64::from(last_day)];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &points {
        let v = f64::from(p.average_delay);
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    // A flat series still needs a non-degenerate vertical domain.
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let y_bounds = [y_min, y_max];

    let x = LinearScale::new(x_bounds, [0.0, width]);
    let y = LinearScale::new(y_bounds, [height, 0.0]);

    let x_ticks = tick_values(x_bounds, 10);
    let y_ticks = tick_values(y_bounds, 10);

    let path = points
        .iter()
        .map(|p| (x.apply(f64::from(p.day)), y.apply(f64::from(p.average_delay))))
        .collect();

    Some(ChartLayout {
        points,
        x,
        y,
        x_ticks,
        y_ticks,
        path,
    })
}

/// Index of the series point whose day is closest to `query_day`.
///
/// Binary search over ascending days; an exact midpoint tie resolves to the
/// point with the smaller day (left bias). Returns `None` for an empty
/// series.
pub fn nearest_point(series: &[DaySeriesPoint], query_day: f64) -> Option<usize> {
    if series.is_empty() {
        return None;
    }

    let i = series.partition_point(|p| f64::from(p.day) < query_day);
    if i == 0 {
        return Some(0);
    }
    if i == series.len() {
        return Some(series.len() - 1);
    }

    let left = f64::from(series[i - 1].day);
    let right = f64::from(series[i].day);
    if query_day - left <= right - query_day {
        Some(i - 1)
    } else {
        Some(i)
    }
}

/// Evenly spaced "nice" tick values covering `bounds`.
///
/// Steps are 1/2/5 times a power of ten, chosen so roughly `target` ticks
/// fall inside the bounds (same spirit as d3's linear axis).
pub fn tick_values(bounds: [f64; 2], target: usize) -> Vec<f64> {
    let [lo, hi] = bounds;
    let span = hi - lo;
    if !(span.is_finite()) || span <= 0.0 || target == 0 {
        return Vec::new();
    }

    let raw_step = span / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let step = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    } * magnitude;

    let mut ticks = Vec::new();
    let mut v = (lo / step).ceil() * step;
    // Tolerance absorbs float drift at the upper bound.
    let eps = step * 1e-9;
    while v <= hi + eps {
        ticks.push(v);
        v += step;
    }
    ticks
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
    fn scale_apply_and_invert_round_trip() {
        let scale = LinearScale::new([1.0, 31.0], [0.0, 600.0]);
        assert!((scale.apply(1.0) - 0.0).abs() < 1e-12);
        assert!((scale.apply(31.0) - 600.0).abs() < 1e-12);

        let mid = scale.apply(16.0);
        assert!((scale.invert(mid) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_scale_is_inverted() {
        let y = LinearScale::new([0.0, 100.0], [400.0, 0.0]);
        // Larger delay draws higher (smaller surface y).
        assert!(y.apply(100.0) < y.apply(0.0));
    }

    #[test]
    fn layout_resorts_out_of_order_input() {
        let series = vec![point(20, 5), point(3, 10), point(11, 2)];
        let layout = compute_layout(&series, 100.0, 40.0).unwrap();

        let days: Vec<u32> = layout.points.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![3, 11, 20]);

        // Path x-coordinates are monotonically increasing in day order.
        assert!(layout.path.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn degenerate_series_yields_no_layout() {
        assert!(compute_layout(&[], 100.0, 40.0).is_none());
        assert!(compute_layout(&[point(5, 10)], 100.0, 40.0).is_none());
        assert!(compute_layout(&[point(5, 10), point(5, 12)], 100.0, 40.0).is_none());
        assert!(compute_layout(&[point(1, 1), point(2, 2)], 0.0, 40.0).is_none());
    }

    #[test]
    fn flat_series_still_has_a_vertical_domain() {
        let layout = compute_layout(&[point(1, 7), point(2, 7)], 100.0, 40.0).unwrap();
        assert!(layout.y.domain[0] < layout.y.domain[1]);
    }

    #[test]
    fn nearest_point_midpoint_tie_breaks_left() {
        let series = vec![point(4, 0), point(8, 0)];
        // Exactly between day 4 and day 8.
        assert_eq!(nearest_point(&series, 6.0), Some(0));
        assert_eq!(nearest_point(&series, 6.1), Some(1));
        assert_eq!(nearest_point(&series, 5.9), Some(0));
    }

    #[test]
    fn nearest_point_clamps_to_ends() {
        let series = vec![point(4, 0), point(8, 0)];
        assert_eq!(nearest_point(&series, -10.0), Some(0));
        assert_eq!(nearest_point(&series, 100.0), Some(1));
        assert_eq!(nearest_point(&[], 5.0), None);
    }

    #[test]
    fn tick_values_stay_inside_bounds() {
        let ticks = tick_values([1.0, 31.0], 10);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|&t| t >= 1.0 && t <= 31.0 + 1e-9));
        // Evenly spaced.
        let step = ticks[1] - ticks[0];
        assert!(ticks.windows(2).all(|w| (w[1] - w[0] - step).abs() < 1e-9));
    }
}
