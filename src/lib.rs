//! `delay-days` library crate.
//!
//! The binary (`delays`) is a thin wrapper around this library so that:
//!
//! - core logic (aggregation, chart layout) is testable without spawning processes
//! - modules are reusable (e.g., future GUI front-end, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod agg;
pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
