//! Analysis modules.
//!
//! Turns the classifier's line-delimited label stream into
//! chart-ready distributions.

pub mod aggregator;

pub use aggregator::*;
