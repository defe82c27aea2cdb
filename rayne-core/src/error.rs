//! Benchmark Errors

use thiserror::Error;

/// Boxed error returned by fallible user code
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The benchmark was set up incorrectly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// `execute` was called before any user code was bound
    #[error("No user code was specified to measure")]
    NoUserCode,

    /// User code was bound after the benchmark had started executing
    #[error("Cannot change the user code after the benchmark has executed")]
    AlreadyExecuted,
}

/// The benchmark could not produce a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No run times were recorded, e.g. a zero-run configuration
    #[error("No user code was measured")]
    NoRunTimes,

    /// `execute` was called a second time on the same benchmark
    #[error("Benchmark has already executed")]
    AlreadyExecuted,
}

/// Errors that abort a benchmark before it reports
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// Setup problem detected before measuring
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Execution could not produce results
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Fallible user code returned an error
    #[error("User code failed: {0}")]
    UserCode(#[source] BoxError),
}

impl BenchmarkError {
    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, BenchmarkError::Configuration(_))
    }

    /// Whether this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, BenchmarkError::Execution(_))
    }
}
