//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source (file, URL, or `.env` default)
//! - runs the load-and-aggregate pipeline
//! - prints reports/plots or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, RunArgs};
use crate::domain::{DataSource, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable holding the default CSV URL.
const CSV_URL_ENV: &str = "FLIGHTS_CSV_URL";

/// Entry point for the `delays` binary.
pub fn run() -> Result<(), AppError> {
    // We want `delays` and `delays --csv 1989.csv` to behave like
    // `delays tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(run_config_from_args(&args)?),
    }
}

fn handle_report(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.series, &config)
    );
    println!("{}", crate::report::format_series_table(&run.series));

    if config.plot {
        let plot = crate::plot::render_ascii_chart(
            &run.series,
            config.plot_width,
            config.plot_height,
            &config.airport,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_series_csv(path, &run.series)?;
    }
    if let Some(path) = &config.export_series {
        crate::io::export::write_series_json(path, &run.series, &config)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let series_file = crate::io::export::read_series_json(&args.series)?;

    let plot = crate::plot::render_ascii_chart(
        &series_file.points,
        args.width,
        args.height,
        &series_file.airport,
    );
    println!("{plot}");
    Ok(())
}

/// Resolve CLI flags (plus `.env` defaults) into a `RunConfig`.
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    let source = match (&args.csv, &args.url) {
        (Some(path), _) => DataSource::CsvPath(path.clone()),
        (None, Some(url)) => DataSource::Url(url.clone()),
        (None, None) => {
            dotenvy::dotenv().ok();
            let url = std::env::var(CSV_URL_ENV).map_err(|_| {
                AppError::input(format!(
                    "No data source: pass --csv or --url, or set {CSV_URL_ENV} in the environment (.env)."
                ))
            })?;
            DataSource::Url(url)
        }
    };

    Ok(RunConfig {
        source,
        airport: args.airport.clone(),
        metric: args.metric,
        empty_days: args.empty_days,
        retries: args.retries,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_series: args.export_series.clone(),
    })
}

/// Rewrite argv so `delays` defaults to `delays tui`.
///
/// Rules:
/// - `delays`                      -> `delays tui`
/// - `delays --csv 1989.csv ...`   -> `delays tui --csv 1989.csv ...`
/// - `delays --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["delays"])), args(&["delays", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flags() {
        assert_eq!(
            rewrite_args(args(&["delays", "--csv", "1989.csv"])),
            args(&["delays", "tui", "--csv", "1989.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["delays", "report"])),
            args(&["delays", "report"])
        );
        assert_eq!(
            rewrite_args(args(&["delays", "--help"])),
            args(&["delays", "--help"])
        );
    }
}
