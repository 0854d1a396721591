//! Analysis modules.
//!
//! Aggregation of GitHub profile data into card-ready results.

pub mod aggregator;

pub use aggregator::*;
