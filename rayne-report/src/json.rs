//! JSON Output

use crate::reporter::Reporter;
use crate::result::BenchmarkResult;
use rayne_stats::RunTimeSummary;
use serde::Serialize;

#[derive(Serialize)]
struct JsonResult<'a> {
    name: &'a str,
    run_times: &'a [u64],
    summary: Option<RunTimeSummary>,
}

/// Serialize one result, with its summary, as a JSON object.
pub fn generate_json_result(
    result: &BenchmarkResult,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    let json = JsonResult {
        name: result.name(),
        run_times: result.run_times(),
        summary: result.summary(),
    };
    if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
}

/// Writes each result to standard output as a JSON object.
///
/// Compact output puts one result per line, which suits piping several
/// benchmarks into a line-oriented tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter {
    /// Pretty-print instead of one object per line
    pub pretty: bool,
}

impl Reporter for JsonReporter {
    fn report(&mut self, result: &BenchmarkResult) {
        match generate_json_result(result, self.pretty) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(benchmark = result.name(), "failed to serialize result: {}", e)
            }
        }
    }
}
