//! Terminal plotting.
//!
//! - ASCII adapter over the pure chart layout (`ascii`)

pub mod ascii;

pub use ascii::*;
