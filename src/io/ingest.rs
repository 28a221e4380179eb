//! CSV ingest and normalization.
//!
//! This module is responsible for turning the raw flight table into typed
//! `FlightRecord`s that are safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (a malformed row is always skipped the same way)
//! - **Separation of concerns**: no aggregation logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::FlightRecord;
use crate::error::AppError;

/// Columns the aggregation consumes. All are required in the header row.
const REQUIRED_COLUMNS: [&str; 8] = [
    "year",
    "month",
    "dayofmonth",
    "origin",
    "dest",
    "cancelled",
    "arrdelay",
    "depdelay",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: typed records + row errors + counters.
#[derive(Debug, Clone)]
pub struct IngestedFlights {
    pub records: Vec<FlightRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and type-check a flight CSV from disk.
pub fn load_flight_records(path: &Path) -> Result<IngestedFlights, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_flight_records(file)
}

/// Parse a flight CSV from any reader (file, fetched body, test fixture).
pub fn parse_flight_records<R: std::io::Read>(reader: R) -> Result<IngestedFlights, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(flight) => records.push(flight),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::no_data("No valid rows remain after parsing."));
    }

    Ok(IngestedFlights {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Some tools emit UTF-8 CSVs with a BOM prefix on the first header
    // (e.g. "﻿Year"). If we don't strip it, schema validation will
    // incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::input(format!(
                "Missing required column: `{column}` (expected Year, Month, DayofMonth, Origin, Dest, Cancelled, ArrDelay, DepDelay)"
            )));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<FlightRecord, String> {
    let year = parse_int(get_required(record, header_map, "year")?)
        .ok_or_else(|| "Invalid `Year` value.".to_string())? as i32;
    let month = parse_uint(get_required(record, header_map, "month")?)
        .ok_or_else(|| "Invalid `Month` value.".to_string())?;
    let day = parse_uint(get_required(record, header_map, "dayofmonth")?)
        .ok_or_else(|| "Invalid `DayofMonth` value.".to_string())?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("Impossible calendar date {year}-{month}-{day}."))?;

    let origin = get_required(record, header_map, "origin")?.to_string();
    let dest = get_required(record, header_map, "dest")?.to_string();

    let cancelled = match get_required(record, header_map, "cancelled")? {
        "0" => false,
        "1" => true,
        other => return Err(format!("Invalid `Cancelled` flag '{other}' (expected 0 or 1).")),
    };

    let arr_delay = parse_delay(get_optional(record, header_map, "arrdelay"), "ArrDelay")?;
    let dep_delay = parse_delay(get_optional(record, header_map, "depdelay"), "DepDelay")?;

    Ok(FlightRecord {
        date,
        origin,
        dest,
        arr_delay,
        dep_delay,
        cancelled,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Delay columns hold `NA` for flights without a recorded delay (often the
/// cancelled ones). Empty/`NA` is "no value"; anything else must parse.
fn parse_delay(raw: Option<&str>, column: &str) -> Result<Option<i32>, String> {
    let Some(raw) = raw else { return Ok(None) };
    if raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    match parse_int(raw) {
        Some(v) => Ok(Some(v as i32)),
        None => Err(format!("Invalid `{column}` value '{raw}'.")),
    }
}

/// Integer parse with truncation toward zero.
///
/// The source table is textual and occasionally stores integers as decimals
/// (`"10.0"`); those truncate rather than round.
fn parse_int(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

fn parse_uint(s: &str) -> Option<u32> {
    let v = parse_int(s)?;
    u32::try_from(v).ok()
}
