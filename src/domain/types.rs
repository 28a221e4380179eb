//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default airport code the series is anchored on.
///
/// The reference dataset (`1989.csv` from the ASA data expo) is filtered
/// around Los Angeles; `--airport` overrides this at runtime.
pub const DEFAULT_AIRPORT: &str = "LAX";

/// Fixed day range covered by one aggregation pass.
///
/// The dataset covers a single month, so buckets run over day-of-year
/// `1..=31` regardless of the actual month length. Records falling outside
/// this range contribute nothing.
pub const DAY_RANGE: std::ops::RangeInclusive<u32> = 1..=31;

/// Which delay metric to aggregate.
///
/// The metric selects both the delay field read and the directional filter:
/// arrival delay is only meaningful for flights landing at the airport of
/// interest, departure delay only for flights leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DelayMetric {
    Arrival,
    Departure,
}

impl DelayMetric {
    /// Human-readable label for captions and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            DelayMetric::Arrival => "Arrival Delay",
            DelayMetric::Departure => "Departure Delay",
        }
    }

    /// The other metric (used by the TUI toggle).
    pub fn toggled(self) -> Self {
        match self {
            DelayMetric::Arrival => DelayMetric::Departure,
            DelayMetric::Departure => DelayMetric::Arrival,
        }
    }
}

/// Policy for days whose bucket holds no positive delays.
///
/// Averaging over zero elements is undefined, so the choice is explicit:
/// `Zero` keeps one point per day in `1..=31` with an average of 0 minutes;
/// `Omit` drops the day from the series entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDayPolicy {
    Zero,
    Omit,
}

/// One typed row of the flight table.
///
/// The calendar date is resolved at ingest from the `Year`/`Month`/`DayofMonth`
/// columns; rows with impossible dates never reach aggregation. Delay fields
/// are `None` when the source holds an empty value or `NA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightRecord {
    pub date: NaiveDate,
    pub origin: String,
    pub dest: String,
    pub arr_delay: Option<i32>,
    pub dep_delay: Option<i32>,
    pub cancelled: bool,
}

impl FlightRecord {
    /// Day-of-year of this flight (1-based, pure calendar arithmetic).
    pub fn day_in_year(&self) -> u32 {
        self.date.ordinal()
    }

    /// The delay value the given metric reads from this record.
    pub fn delay_for(&self, metric: DelayMetric) -> Option<i32> {
        match metric {
            DelayMetric::Arrival => self.arr_delay,
            DelayMetric::Departure => self.dep_delay,
        }
    }

    /// Whether this record is routed through `airport` in the direction the
    /// metric cares about.
    pub fn matches_airport(&self, metric: DelayMetric, airport: &str) -> bool {
        match metric {
            DelayMetric::Arrival => self.dest == airport,
            DelayMetric::Departure => self.origin == airport,
        }
    }
}

/// One aggregated point of the per-day series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySeriesPoint {
    /// Day-of-year in `1..=31`.
    pub day: u32,
    /// Average lateness among late flights, rounded to whole minutes.
    pub average_delay: i32,
    /// How many late flights the average is taken over (0 for zero-filled days).
    pub late_flights: usize,
}

/// Where the raw CSV text comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    CsvPath(PathBuf),
    Url(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::CsvPath(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{u}"),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: DataSource,
    pub airport: String,
    pub metric: DelayMetric,
    pub empty_days: EmptyDayPolicy,
    /// Bounded retry count for HTTP fetches (ignored for local files).
    pub retries: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_series: Option<PathBuf>,
}

/// A saved series file (JSON).
///
/// This is the portable form of an aggregated series, consumed by
/// `delays plot` without re-reading the raw flight table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub airport: String,
    pub metric: DelayMetric,
    pub empty_days: EmptyDayPolicy,
    pub points: Vec<DaySeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_toggle_round_trips() {
        assert_eq!(DelayMetric::Arrival.toggled(), DelayMetric::Departure);
        assert_eq!(DelayMetric::Arrival.toggled().toggled(), DelayMetric::Arrival);
    }

    #[test]
    fn day_in_year_is_timezone_independent() {
        let jan5 = FlightRecord {
            date: NaiveDate::from_ymd_opt(1989, 1, 5).unwrap(),
            origin: "SFO".to_string(),
            dest: "LAX".to_string(),
            arr_delay: None,
            dep_delay: None,
            cancelled: false,
        };
        assert_eq!(jan5.day_in_year(), 5);

        let mar1 = FlightRecord {
            date: NaiveDate::from_ymd_opt(1989, 3, 1).unwrap(),
            ..jan5.clone()
        };
        // 1989 is not a leap year.
        assert_eq!(mar1.day_in_year(), 60);
    }
}
