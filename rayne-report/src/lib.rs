#![warn(missing_docs)]
//! Rayne Report - Results and Reporters
//!
//! A benchmark hands its [`BenchmarkResult`] to exactly one [`Reporter`].
//! Built-in reporters:
//! - [`MeanAndStdDev`] (human-readable, the default)
//! - [`JsonReporter`] (machine-readable, one JSON object per result)

mod human;
mod json;
mod reporter;
mod result;

pub use human::{MeanAndStdDev, format_mean_and_std_dev};
pub use json::{JsonReporter, generate_json_result};
pub use reporter::{FnReporter, Reporter, from_fn};
pub use result::BenchmarkResult;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Mean and standard deviation table
    #[default]
    Human,
    /// JSON object per result
    Json,
}

impl OutputFormat {
    /// Build the reporter that writes this format to standard output.
    pub fn reporter(self) -> Box<dyn Reporter> {
        match self {
            OutputFormat::Human => Box::new(MeanAndStdDev),
            OutputFormat::Json => Box::new(JsonReporter::default()),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
