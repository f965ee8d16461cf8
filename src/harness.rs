//! Main [`Harness`] entry point and builder.

use std::env;
use std::time::Instant;

use tracing::debug;

use crate::config::Config;
use crate::error::{BoxError, Result};
use crate::measurement::{Collector, Timer};
use crate::result::{Metadata, TimingReport};

/// Configurable two-phase timing harness.
///
/// # Example
///
/// ```
/// use warmtime::Harness;
///
/// let report = Harness::new()
///     .repetitions(50)
///     .warmup(1)
///     .measure_infallible(|| (0..1000u64).map(|x| x * x).sum::<u64>())
///     .unwrap();
///
/// assert_eq!(report.count(), 50);
/// println!("mean {:.0} ns, best {:.0} ns", report.mean_ns(), report.min_ns());
/// ```
#[derive(Debug, Clone)]
pub struct Harness {
    config: Config,
    timer: Option<Timer>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create with few repetitions, for smoke tests.
    pub fn quick() -> Self {
        Self::with_config(Config::quick())
    }

    /// Create with many repetitions and a longer warm-up.
    pub fn thorough() -> Self {
        Self::with_config(Config::thorough())
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            timer: None,
        }
    }

    /// Set the number of timed calls.
    pub fn repetitions(mut self, n: usize) -> Self {
        self.config.repetitions = n;
        self
    }

    /// Set the number of untimed warm-up calls.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup = n;
        self
    }

    /// Set the Tukey fence multiplier for outlier diagnostics.
    pub fn outlier_fence(mut self, k: f64) -> Self {
        self.config.outlier_fence = k;
        self
    }

    /// Use this timer instead of the process-wide [`Timer::shared`].
    pub fn timer(mut self, timer: Timer) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Merge configuration from environment variables.
    ///
    /// Reads `WARMTIME_REPETITIONS`, `WARMTIME_WARMUP` and
    /// `WARMTIME_OUTLIER_FENCE`. Unset or unparseable values leave the
    /// current setting alone.
    pub fn from_env(mut self) -> Self {
        if let Some(n) = parse_usize_env("WARMTIME_REPETITIONS") {
            self = self.repetitions(n);
        }
        if let Some(n) = parse_usize_env("WARMTIME_WARMUP") {
            self = self.warmup(n);
        }
        if let Some(k) = parse_f64_env("WARMTIME_OUTLIER_FENCE") {
            self = self.outlier_fence(k);
        }
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Measure a fallible unit.
    ///
    /// Runs `config().warmup` untimed calls, then `config().repetitions`
    /// individually timed calls.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`](crate::Error::InvalidConfig) if
    ///   repetitions is zero.
    /// - [`Error::Execution`](crate::Error::Execution) on the first call
    ///   that returns `Err` or panics, naming its phase and index.
    pub fn measure<F, T, E>(&self, unit: F) -> Result<TimingReport>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: Into<BoxError>,
    {
        let start = Instant::now();
        let collector = match &self.timer {
            Some(timer) => Collector::with_timer(timer.clone(), self.config.warmup),
            None => Collector::new(self.config.warmup),
        };

        let sample = collector.collect(self.config.repetitions, unit)?;

        let metadata = Metadata {
            warmup_runs: collector.warmup_runs(),
            timer: collector.timer().name().to_string(),
            timer_resolution_ns: collector.timer().resolution_ns(),
            runtime_secs: start.elapsed().as_secs_f64(),
        };
        let report = TimingReport::from_sample(sample, self.config.outlier_fence, metadata);

        debug!(
            count = report.count(),
            mean_ns = report.mean_ns(),
            min_ns = report.min_ns(),
            "measurement complete"
        );
        Ok(report)
    }

    /// Measure a unit that cannot fail except by panicking.
    ///
    /// # Errors
    ///
    /// Same as [`Harness::measure`]; a panic is reported as an execution
    /// error.
    pub fn measure_infallible<F, T>(&self, mut unit: F) -> Result<TimingReport>
    where
        F: FnMut() -> T,
    {
        self.measure(|| Ok::<T, BoxError>(unit()))
    }
}

fn parse_usize_env(key: &str) -> Option<usize> {
    env::var(key).ok()?.trim().parse().ok()
}

fn parse_f64_env(key: &str) -> Option<f64> {
    env::var(key).ok()?.trim().parse().ok()
}
