//! Formatted terminal output for one-shot runs.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{DaySeriesPoint, RunConfig};
use crate::io::ingest::IngestedFlights;

/// How many row-level errors to echo in the summary before truncating.
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Format the full run summary (source + ingest counters + series stats).
pub fn format_run_summary(
    ingest: &IngestedFlights,
    series: &[DaySeriesPoint],
    config: &RunConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== delays - per-day average flight delay ===\n");
    out.push_str(&format!("Airport: {}\n", config.airport));
    out.push_str(&format!("Metric: {}\n", config.metric.display_name()));
    out.push_str(&format!("Source: {}\n", config.source));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));

    let with_data = series.iter().filter(|p| p.late_flights > 0).count();
    out.push_str(&format!(
        "Days: {} in series, {} with late flights\n",
        series.len(),
        with_data
    ));

    if let Some((lo, hi)) = delay_range(series) {
        out.push_str(&format!("Average delay: min={lo}min max={hi}min\n"));
    }

    for err in ingest.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
        out.push_str(&format!("  (skipped line {}) {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > MAX_ROW_ERRORS_SHOWN {
        out.push_str(&format!(
            "  (... {} more skipped rows)\n",
            ingest.row_errors.len() - MAX_ROW_ERRORS_SHOWN
        ));
    }

    out
}

/// Format the per-day table.
pub fn format_series_table(series: &[DaySeriesPoint]) -> String {
    let mut out = String::new();
    out.push_str("day  avg (min)  late flights\n");
    for p in series {
        out.push_str(&format!(
            "{:>3}  {:>9}  {:>12}\n",
            p.day, p.average_delay, p.late_flights
        ));
    }
    out
}

fn delay_range(series: &[DaySeriesPoint]) -> Option<(i32, i32)> {
    let lo = series.iter().map(|p| p.average_delay).min()?;
    let hi = series.iter().map(|p| p.average_delay).max()?;
    Some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataSource, DelayMetric, EmptyDayPolicy};
    use std::path::PathBuf;

    fn config() -> RunConfig {
        RunConfig {
            source: DataSource::CsvPath(PathBuf::from("1989.csv")),
            airport: "LAX".to_string(),
            metric: DelayMetric::Arrival,
            empty_days: EmptyDayPolicy::Zero,
            retries: 0,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_series: None,
        }
    }

    #[test]
    fn summary_names_the_selected_metric() {
        let ingest = IngestedFlights {
            records: Vec::new(),
            row_errors: Vec::new(),
            rows_read: 10,
            rows_used: 10,
        };
        let series = vec![DaySeriesPoint { day: 1, average_delay: 12, late_flights: 3 }];

        let text = format_run_summary(&ingest, &series, &config());
        assert!(text.contains("Arrival Delay"));
        assert!(text.contains("read=10 used=10 skipped=0"));
        assert!(text.contains("min=12min max=12min"));
    }

    #[test]
    fn table_has_one_row_per_point() {
        let series = vec![
            DaySeriesPoint { day: 1, average_delay: 0, late_flights: 0 },
            DaySeriesPoint { day: 2, average_delay: 7, late_flights: 4 },
        ];
        let table = format_series_table(&series);
        assert_eq!(table.lines().count(), 3);
    }
}
