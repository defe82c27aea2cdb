#![warn(missing_docs)]
//! Rayne Core - Measurement Runtime
//!
//! This crate provides the execution side of a benchmark:
//! - `Benchmark` runner (warm-up, timed runs, single report)
//! - Monotonic nanosecond timer and clock latency estimation
//! - CPU affinity pinning for stable readings
//! - `rayne.toml` configuration

mod config;
mod error;
mod measure;
mod runner;

pub use config::{BenchmarkConfig, OutputConfig, RayneConfig};
pub use error::{BenchmarkError, BoxError, ConfigurationError, ExecutionError};
pub use measure::{CpuPin, Timer, measure_clock_latency, pin_to_cpu, subtract_latency};
pub use runner::{Benchmark, BenchmarkState, DEFAULT_RUNS, UNKNOWN_NAME, callable_name};
