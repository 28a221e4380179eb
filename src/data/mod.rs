//! External data acquisition.
//!
//! - HTTP download of the flight CSV (`fetch`)

pub mod fetch;

pub use fetch::*;
