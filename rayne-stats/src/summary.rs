//! Summary Statistics
//!
//! Run times are whole nanoseconds, so the summary is reported in whole
//! nanoseconds too. Fractional parts are truncated, never rounded.

use serde::{Deserialize, Serialize};

/// Summary of one benchmark's run times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTimeSummary {
    /// Floor of the arithmetic mean
    pub mean_ns: u64,
    /// Truncated sample standard deviation (0 for a single sample)
    pub std_dev_ns: u64,
    /// Fastest run
    pub min_ns: u64,
    /// Slowest run
    pub max_ns: u64,
    /// Number of runs summarised
    pub sample_count: usize,
}

/// Compute the summary of a run-time sample.
///
/// Returns `None` for an empty sample: mean and standard deviation are
/// undefined there, and callers decide how to present that.
pub fn compute_summary(run_times: &[u64]) -> Option<RunTimeSummary> {
    let mean = mean_ns(run_times)?;
    let std_dev = sample_std_dev_ns(run_times)?;

    let min = run_times.iter().copied().min()?;
    let max = run_times.iter().copied().max()?;

    Some(RunTimeSummary {
        mean_ns: mean,
        std_dev_ns: std_dev,
        min_ns: min,
        max_ns: max,
        sample_count: run_times.len(),
    })
}

/// Floor of the arithmetic mean, or `None` for an empty sample.
pub fn mean_ns(run_times: &[u64]) -> Option<u64> {
    if run_times.is_empty() {
        return None;
    }
    // u128 keeps the sum exact for any realistic run count
    let total: u128 = run_times.iter().map(|&t| t as u128).sum();
    Some((total / run_times.len() as u128) as u64)
}

/// Truncated sample standard deviation, or `None` for an empty sample.
///
/// A single observation has no spread to estimate and yields 0.
pub fn sample_std_dev_ns(run_times: &[u64]) -> Option<u64> {
    if run_times.is_empty() {
        return None;
    }
    if run_times.len() < 2 {
        return Some(0);
    }

    let n = run_times.len() as f64;
    let mean = run_times.iter().map(|&t| t as f64).sum::<f64>() / n;
    let variance = run_times
        .iter()
        .map(|&t| (t as f64 - mean).powi(2))
        .sum::<f64>()
        / (n - 1.0);

    Some(variance.sqrt() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sample() {
        let summary = compute_summary(&[5, 5, 5]).unwrap();

        assert_eq!(summary.mean_ns, 5);
        assert_eq!(summary.std_dev_ns, 0);
        assert_eq!(summary.min_ns, 5);
        assert_eq!(summary.max_ns, 5);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn test_empty_sample() {
        assert!(compute_summary(&[]).is_none());
        assert!(mean_ns(&[]).is_none());
        assert!(sample_std_dev_ns(&[]).is_none());
    }

    #[test]
    fn test_mean_is_floored() {
        // 10 / 3 = 3.33...
        assert_eq!(mean_ns(&[3, 3, 4]), Some(3));
        // 11 / 2 = 5.5
        assert_eq!(mean_ns(&[5, 6]), Some(5));
    }

    #[test]
    fn test_sample_std_dev() {
        // Sample variance of [2, 4, 4, 4, 5, 5, 7, 9] is 32 / 7, stddev ~2.138
        let run_times = [2, 4, 4, 4, 5, 5, 7, 9];
        assert_eq!(sample_std_dev_ns(&run_times), Some(2));

        // Sample variance of [0, 10] is 50, stddev ~7.07
        assert_eq!(sample_std_dev_ns(&[0, 10]), Some(7));
    }

    #[test]
    fn test_single_sample_has_no_spread() {
        let summary = compute_summary(&[42]).unwrap();
        assert_eq!(summary.mean_ns, 42);
        assert_eq!(summary.std_dev_ns, 0);
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        let run_times = [u64::MAX, u64::MAX];
        assert_eq!(mean_ns(&run_times), Some(u64::MAX));
    }
}
