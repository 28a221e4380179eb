//! Shared "load and aggregate" pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch/read CSV -> typed records -> filter + aggregate -> day series
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::agg::{self, AggregateError};
use crate::domain::{DaySeriesPoint, DataSource, DelayMetric, FlightRecord, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{load_flight_records, parse_flight_records, IngestedFlights};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedFlights,
    pub series: Vec<DaySeriesPoint>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    let ingest = load_flights(config)?;
    let series = aggregate_series(&ingest.records, config, config.metric)?;
    Ok(RunOutput { ingest, series })
}

/// Load typed flight records from the configured source.
///
/// This is the only step that touches I/O; the TUI calls it once and then
/// re-aggregates the cached records on every metric toggle.
pub fn load_flights(config: &RunConfig) -> Result<IngestedFlights, AppError> {
    match &config.source {
        DataSource::CsvPath(path) => load_flight_records(path),
        DataSource::Url(url) => {
            let text = crate::data::fetch_csv_text(url, config.retries)?;
            parse_flight_records(text.as_bytes())
        }
    }
}

/// Aggregate cached records for the given metric, mapping the "no matching
/// records" condition to the no-data exit code.
pub fn aggregate_series(
    records: &[FlightRecord],
    config: &RunConfig,
    metric: DelayMetric,
) -> Result<Vec<DaySeriesPoint>, AppError> {
    agg::aggregate(records, metric, &config.airport, config.empty_days).map_err(|e| match e {
        AggregateError::NoMatchingRecords { .. } => AppError::no_data(e.to_string()),
    })
}
