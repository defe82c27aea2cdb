//! Configuration loading from rayne.toml
//!
//! Benchmark defaults can be kept in a `rayne.toml` file in the project root.
//! The file is discovered by walking up from the current directory.

use crate::runner::DEFAULT_RUNS;
use rayne_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rayne configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RayneConfig {
    /// Benchmark runner configuration
    #[serde(default)]
    pub runner: BenchmarkConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for a single benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Display name; the bound callable's identifier when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Number of timed runs
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Pin the measuring thread to this CPU
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: None,
            runs: default_runs(),
            pin_cpu: None,
        }
    }
}

fn default_runs() -> usize {
    DEFAULT_RUNS
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Reporter format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl OutputConfig {
    /// Parsed output format, falling back to human-readable output
    pub fn output_format(&self) -> OutputFormat {
        self.format.parse().unwrap_or_else(|e| {
            tracing::warn!("{}, using human output", e);
            OutputFormat::Human
        })
    }
}

impl RayneConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("rayne.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "ignoring invalid config: {}", e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Rayne Configuration

[runner]
# Number of timed runs per benchmark
runs = 1000
# Display name (uncomment to override the function name)
# name = "fibonacci"
# Pin the measuring thread to a CPU (uncomment to enable)
# pin_cpu = 0

[output]
# Reporter: human or json
format = "human"
"#
        .to_string()
    }
}
