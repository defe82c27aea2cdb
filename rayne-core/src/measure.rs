//! High-Precision Timing
//!
//! Wall-clock nanoseconds from the monotonic `std::time::Instant`, plus the
//! clock latency estimate the runner subtracts from every measurement.

use std::time::Instant;

/// Timer for measuring benchmark runs
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        let end = Instant::now();
        end.duration_since(self.start).as_nanos() as u64
    }
}

/// Estimate the cost of reading the clock twice in a row.
///
/// Takes `runs` back-to-back start/stop readings, the same number of samples
/// the benchmark itself collects, and returns the floor of their mean in
/// nanoseconds. Zero runs estimate zero latency.
pub fn measure_clock_latency(runs: usize) -> u64 {
    estimate_clock_latency(runs, || Timer::start().stop())
}

/// Floor of the mean of `runs` readings taken from `read_pair`.
fn estimate_clock_latency<F>(runs: usize, mut read_pair: F) -> u64
where
    F: FnMut() -> u64,
{
    if runs == 0 {
        return 0;
    }

    let mut total_latency: u128 = 0;
    for _ in 0..runs {
        total_latency += read_pair() as u128;
    }

    (total_latency / runs as u128) as u64
}

/// Remove the clock latency from a raw reading.
///
/// Timer jitter can make a reading shorter than the average latency; the
/// result is clamped at zero instead of going negative.
#[inline(always)]
pub fn subtract_latency(raw_ns: u64, clock_latency_ns: u64) -> u64 {
    raw_ns.saturating_sub(clock_latency_ns)
}

/// Thread affinity held while a benchmark measures.
///
/// Dropping it restores the mask the thread had before [`pin_to_cpu`].
pub struct CpuPin {
    #[cfg(target_os = "linux")]
    previous: Option<libc::cpu_set_t>,
}

impl std::fmt::Debug for CpuPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPin").finish_non_exhaustive()
    }
}

/// Set CPU affinity to pin the current thread to a specific core
///
/// Keeps the whole measurement on one core's clock and caches. The previous
/// affinity comes back when the returned guard is dropped. CPUs that do not
/// fit in a `cpu_set_t` are rejected with `InvalidInput`.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<CpuPin, std::io::Error> {
    use std::mem::{MaybeUninit, size_of};

    if cpu >= cpu_set_capacity() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("CPU {} is outside the affinity set (max {})", cpu, cpu_set_capacity() - 1),
        ));
    }

    unsafe {
        let mut previous = MaybeUninit::<libc::cpu_set_t>::zeroed();
        if libc::sched_getaffinity(0, size_of::<libc::cpu_set_t>(), previous.as_mut_ptr()) != 0 {
            return Err(std::io::Error::last_os_error());
        }
        let previous = previous.assume_init();

        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(CpuPin {
                previous: Some(previous),
            })
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Number of CPUs a `cpu_set_t` can address
#[cfg(target_os = "linux")]
fn cpu_set_capacity() -> usize {
    8 * std::mem::size_of::<libc::cpu_set_t>()
}

/// No-op on platforms without thread affinity support
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<CpuPin, std::io::Error> {
    Ok(CpuPin {})
}

impl Drop for CpuPin {
    fn drop(&mut self) {
        #[cfg(target_os = "linux")]
        {
            if let Some(previous) = self.previous.take() {
                let result = unsafe {
                    libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &previous)
                };
                if result != 0 {
                    tracing::warn!(
                        "failed to restore CPU affinity: {}",
                        std::io::Error::last_os_error()
                    );
                }
            }
        }
    }
}
