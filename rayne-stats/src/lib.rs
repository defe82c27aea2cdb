#![warn(missing_docs)]
//! Rayne Statistical Summary
//!
//! Aggregates the per-run timings of a benchmark into the figures the
//! reporters print:
//! - Integer mean (floor of the arithmetic mean)
//! - Integer sample standard deviation (n-1 denominator)
//! - Extremes of the sample

mod summary;

pub use summary::{RunTimeSummary, compute_summary, mean_ns, sample_std_dev_ns};

/// Unit suffix used wherever a run time is printed.
pub const NANOS_UNIT: &str = "ns";
