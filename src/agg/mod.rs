//! Per-day delay aggregation.
//!
//! This module turns typed flight records into the ordered day series that
//! the chart consumes. Design goals:
//!
//! - **Pure**: no mutation of input records, no hidden state; toggling the
//!   metric back and forth reproduces the same series bit-for-bit.
//! - **Explicit edge cases**: an empty filtered set is a distinguishable
//!   error (`NoMatchingRecords`), never an internal retry loop; empty day
//!   buckets follow a caller-chosen `EmptyDayPolicy`.
//! - **Separation of concerns**: no CSV parsing or drawing logic here.

use crate::domain::{DaySeriesPoint, DelayMetric, EmptyDayPolicy, FlightRecord, DAY_RANGE};

/// Aggregation failure modes.
///
/// Kept separate from `AppError` so callers (e.g. the TUI) can react to a
/// "no matching records" condition without string matching: keep the prior
/// series, surface the message, or re-fetch upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// No non-cancelled record is routed through the airport in the
    /// direction the metric cares about.
    NoMatchingRecords {
        airport: String,
        metric: DelayMetric,
    },
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::NoMatchingRecords { airport, metric } => write!(
                f,
                "No records match airport {airport} for {}.",
                metric.display_name()
            ),
        }
    }
}

impl std::error::Error for AggregateError {}

/// Filter and aggregate flight records into a per-day average-delay series.
///
/// Steps:
///
/// 1. drop cancelled records
/// 2. keep records routed through `airport` in the metric's direction
///    (arrivals filter on destination, departures on origin)
/// 3. bucket by day-of-year over the fixed `1..=31` range
/// 4. within a bucket, keep only delays `> 0` (the metric is "average
///    lateness among late flights", so on-time and early flights are out)
/// 5. average = `sum / count`, rounded half away from zero
/// 6. emit one point per day ascending; empty buckets follow `policy`
pub fn aggregate(
    records: &[FlightRecord],
    metric: DelayMetric,
    airport: &str,
    policy: EmptyDayPolicy,
) -> Result<Vec<DaySeriesPoint>, AggregateError> {
    const DAYS: usize = 31;

    let mut sums = [0i64; DAYS];
    let mut counts = [0usize; DAYS];
    let mut n_matching = 0usize;

    for record in records {
        if record.cancelled {
            continue;
        }
        if !record.matches_airport(metric, airport) {
            continue;
        }
        n_matching += 1;

        let day = record.day_in_year();
        if !DAY_RANGE.contains(&day) {
            continue;
        }
        let Some(delay) = record.delay_for(metric) else {
            continue;
        };
        if delay <= 0 {
            continue;
        }

        let i = (day - 1) as usize;
        sums[i] += i64::from(delay);
        counts[i] += 1;
    }

    if n_matching == 0 {
        return Err(AggregateError::NoMatchingRecords {
            airport: airport.to_string(),
            metric,
        });
    }

    let mut series = Vec::with_capacity(DAYS);
    for day in DAY_RANGE {
        let i = (day - 1) as usize;
        if counts[i] == 0 {
            match policy {
                EmptyDayPolicy::Zero => series.push(DaySeriesPoint {
                    day,
                    average_delay: 0,
                    late_flights: 0,
                }),
                EmptyDayPolicy::Omit => {}
            }
            continue;
        }

        series.push(DaySeriesPoint {
            day,
            average_delay: round_half_away(sums[i], counts[i]),
            late_flights: counts[i],
        });
    }

    Ok(series)
}

/// Integer average rounded half away from zero.
///
/// Kept delays are strictly positive, so `f64::round` (which rounds halves
/// away from zero) pins the documented rule: `[10, 11]` averages to 11.
fn round_half_away(sum: i64, count: usize) -> i32 {
    (sum as f64 / count as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn flight(
        (y, m, d): (i32, u32, u32),
        origin: &str,
        dest: &str,
        arr: Option<i32>,
        dep: Option<i32>,
        cancelled: bool,
    ) -> FlightRecord {
        FlightRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            origin: origin.to_string(),
            dest: dest.to_string(),
            arr_delay: arr,
            dep_delay: dep,
            cancelled,
        }
    }

    fn arrival(day: u32, delay: i32) -> FlightRecord {
        flight((1989, 1, day), "SFO", "LAX", Some(delay), None, false)
    }

    #[test]
    fn zero_policy_emits_one_point_per_day() {
        let records = vec![arrival(5, 10)];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        assert_eq!(series.len(), 31);
        for (i, p) in series.iter().enumerate() {
            assert_eq!(p.day, i as u32 + 1);
        }
        assert_eq!(series[4].average_delay, 10);
        assert_eq!(series[0].average_delay, 0);
        assert_eq!(series[0].late_flights, 0);
    }

    #[test]
    fn omit_policy_drops_empty_days() {
        let records = vec![arrival(5, 10), arrival(20, 30)];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Omit).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].day, 5);
        assert_eq!(series[1].day, 20);
    }

    #[test]
    fn non_positive_delays_never_contribute() {
        let records = vec![arrival(5, 0), arrival(5, -12), arrival(5, 8)];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        assert_eq!(series[4].average_delay, 8);
        assert_eq!(series[4].late_flights, 1);
    }

    #[test]
    fn cancelled_flights_never_contribute() {
        let records = vec![
            flight((1989, 1, 5), "SFO", "LAX", Some(90), None, true),
            arrival(5, 10),
        ];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        assert_eq!(series[4].average_delay, 10);
        assert_eq!(series[4].late_flights, 1);
    }

    #[test]
    fn departure_metric_filters_on_origin() {
        let records = vec![
            // Leaves LAX late: counts for departures only.
            flight((1989, 1, 3), "LAX", "ORD", Some(50), Some(20), false),
            // Arrives at LAX late: counts for arrivals only.
            flight((1989, 1, 3), "ORD", "LAX", Some(40), Some(5), false),
        ];

        let dep = aggregate(&records, DelayMetric::Departure, "LAX", EmptyDayPolicy::Zero).unwrap();
        assert_eq!(dep[2].average_delay, 20);
        assert_eq!(dep[2].late_flights, 1);

        let arr = aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();
        assert_eq!(arr[2].average_delay, 40);
        assert_eq!(arr[2].late_flights, 1);
    }

    #[test]
    fn toggling_metric_reproduces_original_series() {
        let records = vec![
            flight((1989, 1, 3), "LAX", "ORD", Some(50), Some(20), false),
            flight((1989, 1, 7), "ORD", "LAX", Some(40), Some(5), false),
            flight((1989, 1, 9), "SJC", "LAX", Some(-3), None, false),
        ];

        let first = aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();
        let _ = aggregate(&records, DelayMetric::Departure, "LAX", EmptyDayPolicy::Zero).unwrap();
        let again = aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        assert_eq!(first, again);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let records = vec![arrival(5, 10), arrival(5, 11)];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        // (10 + 11) / 2 = 10.5 -> 11
        assert_eq!(series[4].average_delay, 11);
    }

    #[test]
    fn day_five_scenario_excludes_early_arrival() {
        let records = vec![arrival(5, 10), arrival(5, 20), arrival(5, -5)];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero).unwrap();

        let p = series[4];
        assert_eq!(p.day, 5);
        assert_eq!(p.average_delay, 15);
        assert_eq!(p.late_flights, 2);
    }

    #[test]
    fn empty_filtered_set_is_a_distinct_error() {
        let records = vec![flight((1989, 1, 5), "SFO", "ORD", Some(10), Some(10), false)];
        let err = aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Zero)
            .unwrap_err();

        assert_eq!(
            err,
            AggregateError::NoMatchingRecords {
                airport: "LAX".to_string(),
                metric: DelayMetric::Arrival,
            }
        );
    }

    #[test]
    fn days_outside_fixed_range_are_ignored() {
        // February date: ordinal 35, outside the 1..=31 window.
        let records = vec![
            flight((1989, 2, 4), "SFO", "LAX", Some(25), None, false),
            arrival(5, 10),
        ];
        let series =
            aggregate(&records, DelayMetric::Arrival, "LAX", EmptyDayPolicy::Omit).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].day, 5);
    }
}
