//! Benchmark Result

use serde::{Deserialize, Serialize};

/// The results of running a microbenchmark.
///
/// Produced once by the runner and handed to its reporter. Each run time is
/// an integer number of nanoseconds, in the order the runs happened, and the
/// sequence holds one entry per configured run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    name: String,
    run_times: Vec<u64>,
}

impl BenchmarkResult {
    /// Create a result for the benchmark called `name`
    pub fn new(name: impl Into<String>, run_times: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            run_times,
        }
    }

    /// Name of the benchmark these results belong to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-run execution times in nanoseconds
    pub fn run_times(&self) -> &[u64] {
        &self.run_times
    }

    /// Whether no run times were collected
    pub fn is_empty(&self) -> bool {
        self.run_times.is_empty()
    }

    /// Summary statistics, `None` when no run times were collected
    pub fn summary(&self) -> Option<rayne_stats::RunTimeSummary> {
        rayne_stats::compute_summary(&self.run_times)
    }
}
