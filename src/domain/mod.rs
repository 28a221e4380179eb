//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`DelayMetric`, `EmptyDayPolicy`, `DataSource`)
//! - typed flight records (`FlightRecord`)
//! - the aggregated day series (`DaySeriesPoint`, `SeriesFile`)

pub mod types;

pub use types::*;
