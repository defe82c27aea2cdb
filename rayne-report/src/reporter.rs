//! Reporter Capability
//!
//! Anything that can consume a [`BenchmarkResult`] can act as a reporter.
//! The runner never looks at what a reporter does with the result.

use crate::result::BenchmarkResult;

/// Sink for benchmark results
pub trait Reporter {
    /// Consume the results of one benchmark execution.
    fn report(&mut self, result: &BenchmarkResult);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, result: &BenchmarkResult) {
        (**self).report(result)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, result: &BenchmarkResult) {
        (**self).report(result)
    }
}

/// Reporter backed by a closure, see [`from_fn`]
#[derive(Clone)]
pub struct FnReporter<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnReporter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnReporter").finish_non_exhaustive()
    }
}

impl<F> Reporter for FnReporter<F>
where
    F: FnMut(&BenchmarkResult),
{
    fn report(&mut self, result: &BenchmarkResult) {
        (self.f)(result)
    }
}

/// Create a reporter that calls `f` with each result.
///
/// ```
/// use rayne_report::{BenchmarkResult, Reporter, from_fn};
///
/// let mut seen = Vec::new();
/// let mut reporter = from_fn(|r: &BenchmarkResult| seen.push(r.name().to_string()));
/// reporter.report(&BenchmarkResult::new("noop", vec![0]));
/// drop(reporter);
/// assert_eq!(seen, ["noop"]);
/// ```
pub fn from_fn<F>(f: F) -> FnReporter<F>
where
    F: FnMut(&BenchmarkResult),
{
    FnReporter { f }
}
