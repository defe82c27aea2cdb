#![warn(missing_docs)]
//! # Rayne
//!
//! Micro-benchmarking for Rust functions.
//!
//! Rayne times repeated calls of a function and reports the mean and
//! standard deviation of its execution time in nanoseconds:
//! - **Clock latency compensation**: the cost of reading the timer is measured
//!   and subtracted from every run
//! - **Warm-up**: one untimed call absorbs first-call costs
//! - **Pluggable reporters**: anything implementing [`Reporter`] receives the
//!   result; human-readable and JSON reporters are built in
//!
//! ## Quick Start
//!
//! ```no_run
//! use rayne::prelude::*;
//!
//! fn fibonacci(n: u64) -> u64 {
//!     if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
//! }
//!
//! let mut benchmark = Benchmark::new();
//! benchmark.set_user_code(fibonacci, 10).unwrap();
//! benchmark.execute().unwrap();
//! ```
//!
//! ## Custom Reporters
//!
//! ```no_run
//! use rayne::{Benchmark, BenchmarkResult, from_fn};
//!
//! let reporter = from_fn(|result: &BenchmarkResult| {
//!     println!("{}: {} runs", result.name(), result.run_times().len());
//! });
//! let mut benchmark = Benchmark::with_reporter(reporter).runs(500);
//! benchmark.set_user_code(|v: Vec<u32>| v.len(), vec![0; 16]).unwrap();
//! benchmark.execute().unwrap();
//! ```

// Re-export core types
pub use rayne_core::{
    Benchmark, BenchmarkConfig, BenchmarkError, BenchmarkState, BoxError, ConfigurationError, CpuPin,
    DEFAULT_RUNS, ExecutionError, OutputConfig, RayneConfig, Timer, callable_name,
    measure_clock_latency, pin_to_cpu,
};

// Re-export reporting
pub use rayne_report::{
    BenchmarkResult, FnReporter, JsonReporter, MeanAndStdDev, OutputFormat, Reporter,
    format_mean_and_std_dev, from_fn, generate_json_result,
};

// Re-export stats
pub use rayne_stats::{RunTimeSummary, compute_summary};

use tracing_subscriber::EnvFilter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Benchmark, BenchmarkError, BenchmarkResult, MeanAndStdDev, Reporter};
}

/// Install a formatting `tracing` subscriber for Rayne's log events.
///
/// Logs at `info` level, or `debug` when `verbose` is set. A `RUST_LOG`
/// environment variable takes precedence. Does nothing if a global
/// subscriber is already installed.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "rayne=debug,rayne_core=debug,rayne_report=debug"
    } else {
        "rayne=info,rayne_core=info,rayne_report=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Create a benchmark configured from a discovered `rayne.toml`.
///
/// Falls back to the defaults when no file is found. The reporter follows
/// the file's `[output] format`.
pub fn benchmark_from_config<'a>() -> Benchmark<'a, Box<dyn Reporter>> {
    let config = RayneConfig::discover().unwrap_or_default();
    benchmark_with_config(&config)
}

/// Create a benchmark from an already loaded configuration.
pub fn benchmark_with_config<'a>(config: &RayneConfig) -> Benchmark<'a, Box<dyn Reporter>> {
    Benchmark::with_reporter(config.output.output_format().reporter()).config(&config.runner)
}
