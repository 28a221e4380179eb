//! Series exports: CSV for spreadsheets, JSON as the portable series form.
//!
//! The JSON schema is defined by `domain::SeriesFile` and is what
//! `delays plot` consumes to re-plot without the raw flight table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{DaySeriesPoint, RunConfig, SeriesFile};
use crate::error::AppError;

/// Write the aggregated series to a CSV file.
pub fn write_series_csv(path: &Path, series: &[DaySeriesPoint]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "day,average_delay,late_flights")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for p in series {
        writeln!(file, "{},{},{}", p.day, p.average_delay, p.late_flights)
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a series JSON file.
pub fn write_series_json(
    path: &Path,
    series: &[DaySeriesPoint],
    config: &RunConfig,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create series JSON '{}': {e}", path.display())))?;

    let out = SeriesFile {
        tool: "delays".to_string(),
        airport: config.airport.clone(),
        metric: config.metric,
        empty_days: config.empty_days,
        points: series.to_vec(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::input(format!("Failed to write series JSON: {e}")))?;

    Ok(())
}

/// Read a series JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid series JSON: {e}")))?;
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DelayMetric, EmptyDayPolicy};

    #[test]
    fn series_file_json_round_trips() {
        let original = SeriesFile {
            tool: "delays".to_string(),
            airport: "LAX".to_string(),
            metric: DelayMetric::Departure,
            empty_days: EmptyDayPolicy::Zero,
            points: vec![
                DaySeriesPoint { day: 1, average_delay: 0, late_flights: 0 },
                DaySeriesPoint { day: 2, average_delay: 17, late_flights: 12 },
            ],
        };

        let json = serde_json::to_string(&original).unwrap();
        let back: SeriesFile = serde_json::from_str(&json).unwrap();

        assert_eq!(back.airport, "LAX");
        assert_eq!(back.metric, DelayMetric::Departure);
        assert_eq!(back.points, original.points);
    }
}
