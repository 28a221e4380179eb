//! Command-line parsing for the flight-delay day-series explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/chart code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DelayMetric, EmptyDayPolicy, DEFAULT_AIRPORT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "delays", version, about = "Per-day average flight-delay explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate the flight CSV, print a summary/table, and optionally plot/export.
    Report(RunArgs),
    /// Plot a previously exported series JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `delays report`, but renders
    /// the chart in a terminal UI with a mouse-following tooltip.
    Tui(RunArgs),
}

/// Common options for aggregating and rendering.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Path to the flight CSV (header row required).
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Fetch the flight CSV from a URL instead of a local file.
    ///
    /// When neither --csv nor --url is given, `FLIGHTS_CSV_URL` from the
    /// environment (or `.env`) is used.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Airport code the series is anchored on (destination for arrivals,
    /// origin for departures).
    #[arg(short = 'a', long, default_value = DEFAULT_AIRPORT)]
    pub airport: String,

    /// Which delay metric to aggregate.
    #[arg(short = 'm', long, value_enum, default_value_t = DelayMetric::Arrival)]
    pub metric: DelayMetric,

    /// Policy for days with no positive delays.
    #[arg(long, value_enum, default_value_t = EmptyDayPolicy::Zero)]
    pub empty_days: EmptyDayPolicy,

    /// Extra fetch attempts before giving up (URL sources only).
    #[arg(long, default_value_t = 2)]
    pub retries: usize,

    /// Render an ASCII chart in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the aggregated series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the aggregated series to JSON (consumed by `delays plot`).
    #[arg(long = "export-series")]
    pub export_series: Option<PathBuf>,
}

/// Options for plotting a saved series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Series JSON file produced by `delays report --export-series`.
    #[arg(long, value_name = "JSON")]
    pub series: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
