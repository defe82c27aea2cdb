//! Benchmark Runner
//!
//! Drives one benchmark from configuration to report:
//! 1. Estimate clock latency with as many samples as there are runs
//! 2. Invoke the user code once, untimed, to absorb first-call costs
//! 3. Time every run and subtract the clock latency (clamped at zero)
//! 4. Hand the result to the reporter, exactly once
//!
//! A `Benchmark` executes at most once. It is driven through `&mut self`
//! and holds `FnMut` user code, so it is neither `Send` nor `Sync`.

use crate::config::BenchmarkConfig;
use crate::error::{BenchmarkError, BoxError, ConfigurationError, ExecutionError};
use crate::measure::{Timer, measure_clock_latency, pin_to_cpu, subtract_latency};
use rayne_report::{BenchmarkResult, MeanAndStdDev, Reporter};
use std::hint::black_box;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Default number of timed runs
pub const DEFAULT_RUNS: usize = 1000;

/// Name used when the bound callable has no usable identifier
pub const UNKNOWN_NAME: &str = "Unknown Benchmark";

/// Lifecycle of a benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkState {
    /// No user code bound yet
    Unconfigured,
    /// User code bound, ready to execute
    Configured,
    /// `execute` has been called; the benchmark cannot run again
    Executed,
}

/// Type-erased user code with its bound arguments
trait UserCode {
    /// Run once without timing
    fn invoke(&mut self) -> Result<(), BoxError>;

    /// Run once and return the raw elapsed nanoseconds
    fn measure(&mut self) -> Result<u64, BoxError>;
}

struct Infallible<F, A, T> {
    f: F,
    args: A,
    _output: PhantomData<fn() -> T>,
}

impl<F, A, T> UserCode for Infallible<F, A, T>
where
    F: FnMut(A) -> T,
    A: Clone,
{
    fn invoke(&mut self) -> Result<(), BoxError> {
        let _ = black_box((self.f)(self.args.clone()));
        Ok(())
    }

    #[inline]
    fn measure(&mut self) -> Result<u64, BoxError> {
        // Cloning the arguments is not part of the measured call
        let args = black_box(self.args.clone());

        let timer = Timer::start();
        let output = (self.f)(args);
        let elapsed = timer.stop();

        let _ = black_box(output);
        Ok(elapsed)
    }
}

struct Fallible<F, A, T, E> {
    f: F,
    args: A,
    _output: PhantomData<fn() -> Result<T, E>>,
}

impl<F, A, T, E> UserCode for Fallible<F, A, T, E>
where
    F: FnMut(A) -> Result<T, E>,
    A: Clone,
    E: Into<BoxError>,
{
    fn invoke(&mut self) -> Result<(), BoxError> {
        black_box((self.f)(self.args.clone())).map_err(Into::<BoxError>::into)?;
        Ok(())
    }

    #[inline]
    fn measure(&mut self) -> Result<u64, BoxError> {
        let args = black_box(self.args.clone());

        let timer = Timer::start();
        let output = (self.f)(args);
        let elapsed = timer.stop();

        black_box(output).map_err(Into::<BoxError>::into)?;
        Ok(elapsed)
    }
}

/// Create and run a microbenchmark.
///
/// Bind the code to measure with [`set_user_code`](Self::set_user_code), then
/// call [`execute`](Self::execute). The result goes to the benchmark's
/// reporter, [`MeanAndStdDev`] unless another one is supplied.
///
/// ```no_run
/// use rayne_core::Benchmark;
///
/// fn fibonacci(n: u64) -> u64 {
///     if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
/// }
///
/// let mut benchmark = Benchmark::new().runs(2000);
/// benchmark.set_user_code(fibonacci, 10).unwrap();
/// benchmark.execute().unwrap();
/// ```
pub struct Benchmark<'a, R = MeanAndStdDev> {
    name: Option<String>,
    default_name: Option<String>,
    runs: usize,
    pin_cpu: Option<usize>,
    reporter: R,
    user_code: Option<Box<dyn UserCode + 'a>>,
    state: BenchmarkState,
}

impl<'a> Benchmark<'a, MeanAndStdDev> {
    /// Create a benchmark that prints its mean and standard deviation
    pub fn new() -> Self {
        Self::with_reporter(MeanAndStdDev)
    }

    /// Create a benchmark from a loaded configuration
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        Self::new().config(config)
    }
}

impl Default for Benchmark<'_, MeanAndStdDev> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R: Reporter> Benchmark<'a, R> {
    /// Create a benchmark that hands its result to `reporter`
    pub fn with_reporter(reporter: R) -> Self {
        Self {
            name: None,
            default_name: None,
            runs: DEFAULT_RUNS,
            pin_cpu: None,
            reporter,
            user_code: None,
            state: BenchmarkState::Unconfigured,
        }
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Set the number of timed runs
    pub fn runs(mut self, runs: usize) -> Self {
        self.set_runs(runs);
        self
    }

    /// Pin the measuring thread to `cpu` while executing
    pub fn pin_to_cpu(mut self, cpu: usize) -> Self {
        self.pin_cpu = Some(cpu);
        self
    }

    /// Apply every setting from `config`
    pub fn config(mut self, config: &BenchmarkConfig) -> Self {
        if let Some(name) = &config.name {
            self.set_name(name.clone());
        }
        self.runs = config.runs;
        self.pin_cpu = config.pin_cpu;
        self
    }

    /// Change the display name after construction
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Change the number of timed runs after construction
    pub fn set_runs(&mut self, runs: usize) {
        self.runs = runs;
    }

    /// Display name: the configured one, else the bound callable's identifier
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.default_name.as_deref())
    }

    /// Number of timed runs
    pub fn run_count(&self) -> usize {
        self.runs
    }

    /// Current lifecycle state
    pub fn state(&self) -> BenchmarkState {
        self.state
    }

    /// The reporter results are handed to
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consume the benchmark and return its reporter
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Bind the user code to measure.
    ///
    /// `args` is cloned before every call, outside the timed region, and
    /// passed to `f`. Binding again before execution replaces the previous
    /// user code.
    pub fn set_user_code<F, A, T>(&mut self, f: F, args: A) -> Result<(), ConfigurationError>
    where
        F: FnMut(A) -> T + 'a,
        A: Clone + 'a,
        T: 'a,
    {
        self.bind::<F>(Box::new(Infallible {
            f,
            args,
            _output: PhantomData,
        }))
    }

    /// Bind user code that can fail.
    ///
    /// An error from any call, warm-up included, aborts the benchmark with
    /// [`BenchmarkError::UserCode`] and nothing is reported.
    pub fn set_fallible_user_code<F, A, T, E>(
        &mut self,
        f: F,
        args: A,
    ) -> Result<(), ConfigurationError>
    where
        F: FnMut(A) -> Result<T, E> + 'a,
        A: Clone + 'a,
        T: 'a,
        E: Into<BoxError> + 'a,
    {
        self.bind::<F>(Box::new(Fallible {
            f,
            args,
            _output: PhantomData,
        }))
    }

    fn bind<F>(&mut self, user_code: Box<dyn UserCode + 'a>) -> Result<(), ConfigurationError> {
        if self.state == BenchmarkState::Executed {
            return Err(ConfigurationError::AlreadyExecuted);
        }
        self.user_code = Some(user_code);
        self.default_name = Some(callable_name::<F>());
        self.state = BenchmarkState::Configured;
        Ok(())
    }

    /// Measure the bound user code and report the result.
    ///
    /// Invokes the user code `runs + 1` times (one untimed warm-up). A panic
    /// in the user code propagates to the caller; either way a failed run
    /// discards its partial measurements and reports nothing. The benchmark
    /// is marked executed before measuring starts, so it never measures twice.
    pub fn execute(&mut self) -> Result<(), BenchmarkError> {
        match self.state {
            BenchmarkState::Unconfigured => return Err(ConfigurationError::NoUserCode.into()),
            BenchmarkState::Executed => return Err(ExecutionError::AlreadyExecuted.into()),
            BenchmarkState::Configured => {}
        }
        self.state = BenchmarkState::Executed;

        let Some(mut user_code) = self.user_code.take() else {
            return Err(ConfigurationError::NoUserCode.into());
        };
        let name = self.display_name().unwrap_or(UNKNOWN_NAME).to_string();

        if self.runs == 0 {
            return Err(ExecutionError::NoRunTimes.into());
        }

        // Restores the caller's affinity on every exit path, panics included
        let cpu_pin = self.pin_cpu.and_then(|cpu| match pin_to_cpu(cpu) {
            Ok(pin) => Some(pin),
            Err(e) => {
                warn!(benchmark = %name, cpu, "failed to pin to CPU: {}", e);
                None
            }
        });

        let clock_latency = measure_clock_latency(self.runs);
        debug!(
            benchmark = %name,
            runs = self.runs,
            clock_latency_ns = clock_latency,
            "measured clock latency"
        );

        user_code.invoke().map_err(BenchmarkError::UserCode)?;
        debug!(benchmark = %name, "warm-up complete");

        let mut run_times = Vec::with_capacity(self.runs);
        for _ in 0..self.runs {
            let raw = user_code.measure().map_err(BenchmarkError::UserCode)?;
            run_times.push(subtract_latency(raw, clock_latency));
        }
        drop(cpu_pin);
        debug_assert_eq!(run_times.len(), self.runs);

        let result = BenchmarkResult::new(name, run_times);

        info!(benchmark = result.name(), runs = result.run_times().len(), "benchmark complete");
        self.reporter.report(&result);
        Ok(())
    }

    /// Run `setup` against the benchmark, then execute it.
    ///
    /// The scoped form of configure-then-execute: whatever `setup` binds is
    /// measured and reported once `setup` returns. Gives back the reporter.
    ///
    /// ```no_run
    /// use rayne_core::Benchmark;
    ///
    /// Benchmark::new()
    ///     .scope(|b| {
    ///         b.set_name("sum");
    ///         b.set_user_code(|v: Vec<u64>| v.iter().sum::<u64>(), vec![1; 64]).unwrap();
    ///     })
    ///     .unwrap();
    /// ```
    pub fn scope<F>(mut self, setup: F) -> Result<R, BenchmarkError>
    where
        F: FnOnce(&mut Self),
    {
        setup(&mut self);
        self.execute()?;
        Ok(self.reporter)
    }
}

impl<R> std::fmt::Debug for Benchmark<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("default_name", &self.default_name)
            .field("runs", &self.runs)
            .field("pin_cpu", &self.pin_cpu)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Identifier of a callable type, for naming benchmarks.
///
/// Functions are named by their last path segment (`fibonacci`); closures
/// by their enclosing function (`main::{{closure}}`). Types without a path,
/// such as function pointers, get [`UNKNOWN_NAME`].
pub fn callable_name<F>() -> String {
    let path = strip_generics(std::any::type_name::<F>());
    let mut segments = path.rsplit("::");

    let last = match segments.next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => return UNKNOWN_NAME.to_string(),
    };

    if last == "{{closure}}" {
        return match segments.next() {
            Some(parent) if is_identifier(parent) => format!("{}::{}", parent, last),
            _ => last.to_string(),
        };
    }

    if is_identifier(last) {
        last.to_string()
    } else {
        UNKNOWN_NAME.to_string()
    }
}

fn strip_generics(type_name: &str) -> String {
    let mut depth = 0usize;
    let mut stripped = String::with_capacity(type_name.len());
    for c in type_name.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }
    stripped
}

fn is_identifier(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayne_report::from_fn;
    use std::cell::Cell;

    fn fibonacci(n: u64) -> u64 {
        if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
    }

    fn identity<T>(value: T) -> T {
        value
    }

    #[derive(Default)]
    struct Recording {
        results: Vec<BenchmarkResult>,
    }

    impl Reporter for Recording {
        fn report(&mut self, result: &BenchmarkResult) {
            self.results.push(result.clone());
        }
    }

    #[test]
    fn test_callable_name_of_function() {
        fn name_of<F>(_: &F) -> String {
            callable_name::<F>()
        }
        assert_eq!(name_of(&fibonacci), "fibonacci");
        assert_eq!(name_of(&identity::<Vec<u8>>), "identity");
    }

    #[test]
    fn test_callable_name_of_closure() {
        fn name_of<F>(_: &F) -> String {
            callable_name::<F>()
        }
        let closure = |x: u64| x + 1;
        assert_eq!(name_of(&closure), "test_callable_name_of_closure::{{closure}}");
    }

    #[test]
    fn test_callable_name_of_fn_pointer() {
        assert_eq!(callable_name::<fn(u64) -> u64>(), UNKNOWN_NAME);
    }

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("a::b<c::D<u8>>::{{closure}}"), "a::b::{{closure}}");
        assert_eq!(strip_generics("plain::path"), "plain::path");
    }

    #[test]
    fn test_run_count_and_order() {
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(25);
        benchmark.set_user_code(fibonacci, 5).unwrap();
        benchmark.execute().unwrap();

        let recording = benchmark.into_reporter();
        assert_eq!(recording.results.len(), 1);
        assert_eq!(recording.results[0].run_times().len(), 25);
        assert_eq!(recording.results[0].name(), "fibonacci");
    }

    #[test]
    fn test_invokes_runs_plus_warm_up() {
        let calls = Cell::new(0u32);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(10);
        benchmark
            .set_user_code(|()| calls.set(calls.get() + 1), ())
            .unwrap();
        benchmark.execute().unwrap();

        assert_eq!(calls.get(), 11);
    }

    #[test]
    fn test_arguments_passed_on_every_call() {
        let seen = Cell::new(0u64);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(4);
        benchmark
            .set_user_code(|n: u64| seen.set(seen.get() + n), 3)
            .unwrap();
        benchmark.execute().unwrap();

        // warm-up + 4 runs, each passed 3
        assert_eq!(seen.get(), 15);
    }

    #[test]
    fn test_explicit_name_wins() {
        let mut benchmark = Benchmark::with_reporter(Recording::default())
            .name("Recursive")
            .runs(3);
        benchmark.set_user_code(fibonacci, 10).unwrap();
        assert_eq!(benchmark.display_name(), Some("Recursive"));

        benchmark.execute().unwrap();
        assert_eq!(benchmark.reporter().results[0].name(), "Recursive");
    }

    #[test]
    fn test_name_set_after_binding() {
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(3);
        benchmark.set_user_code(fibonacci, 10).unwrap();
        assert_eq!(benchmark.display_name(), Some("fibonacci"));

        benchmark.set_name("Recursive");
        assert_eq!(benchmark.display_name(), Some("Recursive"));
    }

    #[test]
    fn test_rebinding_replaces_user_code() {
        let first = Cell::new(0u32);
        let second = Cell::new(0u32);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(2);
        benchmark
            .set_user_code(|()| first.set(first.get() + 1), ())
            .unwrap();
        benchmark
            .set_user_code(|()| second.set(second.get() + 1), ())
            .unwrap();
        benchmark.execute().unwrap();

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 3);
    }

    #[test]
    fn test_execute_without_user_code() {
        let reports = Cell::new(0u32);
        let mut benchmark =
            Benchmark::with_reporter(from_fn(|_: &BenchmarkResult| reports.set(reports.get() + 1)));

        let err = benchmark.execute().unwrap_err();
        assert!(matches!(
            err,
            BenchmarkError::Configuration(ConfigurationError::NoUserCode)
        ));
        drop(benchmark);
        assert_eq!(reports.get(), 0);
    }

    #[test]
    fn test_execute_twice() {
        let calls = Cell::new(0u32);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(5);
        benchmark
            .set_user_code(|()| calls.set(calls.get() + 1), ())
            .unwrap();
        benchmark.execute().unwrap();

        let err = benchmark.execute().unwrap_err();
        assert!(matches!(
            err,
            BenchmarkError::Execution(ExecutionError::AlreadyExecuted)
        ));
        assert_eq!(calls.get(), 6);
        assert_eq!(benchmark.reporter().results.len(), 1);
    }

    #[test]
    fn test_configure_after_execute() {
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(1);
        benchmark.set_user_code(fibonacci, 1).unwrap();
        benchmark.execute().unwrap();

        assert_eq!(
            benchmark.set_user_code(fibonacci, 2),
            Err(ConfigurationError::AlreadyExecuted)
        );
        assert_eq!(benchmark.state(), BenchmarkState::Executed);
    }

    #[test]
    fn test_zero_runs_is_an_execution_error() {
        let calls = Cell::new(0u32);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(0);
        benchmark
            .set_user_code(|()| calls.set(calls.get() + 1), ())
            .unwrap();

        let err = benchmark.execute().unwrap_err();
        assert!(matches!(err, BenchmarkError::Execution(ExecutionError::NoRunTimes)));
        assert_eq!(calls.get(), 0);
        assert!(benchmark.reporter().results.is_empty());
    }

    #[test]
    fn test_fallible_user_code_aborts() {
        let calls = Cell::new(0u32);
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(1000);
        benchmark
            .set_fallible_user_code(
                |()| {
                    calls.set(calls.get() + 1);
                    // warm-up is call 1, so the 5th timed run is call 6
                    if calls.get() == 6 {
                        Err("boom")
                    } else {
                        Ok(())
                    }
                },
                (),
            )
            .unwrap();

        let err = benchmark.execute().unwrap_err();
        assert!(matches!(err, BenchmarkError::UserCode(_)));
        assert_eq!(err.to_string(), "User code failed: boom");
        assert_eq!(calls.get(), 6);
        assert!(benchmark.reporter().results.is_empty());
    }

    #[test]
    fn test_fallible_warm_up_failure() {
        let mut benchmark = Benchmark::with_reporter(Recording::default()).runs(10);
        benchmark
            .set_fallible_user_code(|()| Err::<(), _>(std::fmt::Error), ())
            .unwrap();

        assert!(matches!(
            benchmark.execute(),
            Err(BenchmarkError::UserCode(_))
        ));
        assert!(benchmark.reporter().results.is_empty());
    }

    #[test]
    fn test_scope_executes_once() {
        let recording = Benchmark::with_reporter(Recording::default())
            .scope(|b| {
                b.set_runs(7);
                b.set_user_code(fibonacci, 8).unwrap();
            })
            .unwrap();

        assert_eq!(recording.results.len(), 1);
        assert_eq!(recording.results[0].run_times().len(), 7);
    }

    #[test]
    fn test_scope_without_user_code() {
        let result = Benchmark::with_reporter(Recording::default()).scope(|b| b.set_runs(3));
        assert!(matches!(result, Err(e) if e.is_configuration()));
    }

    #[test]
    fn test_pinned_benchmark_reports() {
        let mut benchmark = Benchmark::with_reporter(Recording::default())
            .runs(3)
            .pin_to_cpu(0);
        benchmark.set_user_code(fibonacci, 5).unwrap();
        benchmark.execute().unwrap();

        assert_eq!(benchmark.reporter().results.len(), 1);
        assert_eq!(benchmark.reporter().results[0].run_times().len(), 3);
    }

    #[test]
    fn test_unpinnable_cpu_still_reports() {
        let mut benchmark = Benchmark::with_reporter(Recording::default())
            .runs(3)
            .pin_to_cpu(5000);
        benchmark.set_user_code(fibonacci, 5).unwrap();
        benchmark.execute().unwrap();

        assert_eq!(benchmark.reporter().results.len(), 1);
        assert_eq!(benchmark.reporter().results[0].run_times().len(), 3);
    }

    #[test]
    fn test_from_config() {
        let config = BenchmarkConfig {
            name: Some("configured".to_string()),
            runs: 42,
            pin_cpu: None,
        };
        let benchmark = Benchmark::from_config(&config);

        assert_eq!(benchmark.run_count(), 42);
        assert_eq!(benchmark.display_name(), Some("configured"));
        assert_eq!(benchmark.state(), BenchmarkState::Unconfigured);
    }

    #[test]
    fn test_defaults() {
        let benchmark = Benchmark::new();
        assert_eq!(benchmark.run_count(), DEFAULT_RUNS);
        assert_eq!(benchmark.display_name(), None);
    }
}
