//! Human-Readable Output
//!
//! Prints a small aligned table:
//!
//! ```text
//!
//! Rayne Benchmark Results
//!   name     fibonacci
//!   mean       1843 ns
//!   std dev     211 ns
//! ```

use crate::reporter::Reporter;
use crate::result::BenchmarkResult;
use rayne_stats::NANOS_UNIT;

const TITLE: &str = "Rayne Benchmark Results";
const NOT_AVAILABLE: &str = "n/a";
const NO_RUN_TIMES: &str = "No run times reported.";

/// Reports the mean and standard deviation of the run times on standard output.
///
/// This is the reporter a benchmark uses unless told otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAndStdDev;

impl Reporter for MeanAndStdDev {
    fn report(&mut self, result: &BenchmarkResult) {
        print!("{}", format_mean_and_std_dev(result));
    }
}

/// Format a result the way [`MeanAndStdDev`] prints it.
///
/// Values are right-aligned against the unit column; the column is as wide as
/// the widest of the name, the mean and the standard deviation. With no run
/// times both values read `n/a` and a notice is appended.
pub fn format_mean_and_std_dev(result: &BenchmarkResult) -> String {
    let mut output = String::new();
    let name = result.name();
    let name_len = name.chars().count();

    output.push('\n');
    output.push_str(TITLE);
    output.push('\n');

    match result.summary() {
        Some(summary) => {
            let mean = summary.mean_ns.to_string();
            let std_dev = summary.std_dev_ns.to_string();
            // Numbers are followed by " ns", which counts towards the width
            let suffix = NANOS_UNIT.len() + 1;
            let width = (mean.len() + suffix)
                .max(std_dev.len() + suffix)
                .max(name_len);
            let value_width = width - suffix;

            output.push_str(&format!("  name     {:<width$}\n", name, width = width));
            output.push_str(&format!(
                "  mean     {:>w$} {}\n",
                mean,
                NANOS_UNIT,
                w = value_width
            ));
            output.push_str(&format!(
                "  std dev  {:>w$} {}\n",
                std_dev,
                NANOS_UNIT,
                w = value_width
            ));
        }
        None => {
            let width = NOT_AVAILABLE.len().max(name_len);

            output.push_str(&format!("  name     {:<width$}\n", name, width = width));
            output.push_str(&format!("  mean     {:<width$}\n", NOT_AVAILABLE, width = width));
            output.push_str(&format!("  std dev  {:<width$}\n", NOT_AVAILABLE, width = width));
            output.push_str(&format!("  {}\n", NO_RUN_TIMES));
        }
    }

    output
}
