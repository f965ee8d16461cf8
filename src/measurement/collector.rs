//! Two-phase sample collection.
//!
//! A run executes the unit `warmup_runs` times untimed, then
//! `repetitions` times with each call timed on its own. Any failure,
//! either an `Err` return or a panic, aborts the run at once.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{BoxError, Error, Panicked, Phase, Result};

use super::timer::{black_box, Timer};

/// Per-call elapsed times of one measured phase, in nanoseconds.
///
/// Always holds at least one value and every value is `>= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct TimingSample(Vec<f64>);

impl TryFrom<Vec<f64>> for TimingSample {
    type Error = Error;

    fn try_from(durations_ns: Vec<f64>) -> Result<Self> {
        Self::new(durations_ns)
    }
}

impl From<TimingSample> for Vec<f64> {
    fn from(sample: TimingSample) -> Self {
        sample.0
    }
}

impl TimingSample {
    /// Build a sample from raw durations.
    ///
    /// Rejects empty input and negative or non-finite durations.
    pub fn new(durations_ns: Vec<f64>) -> Result<Self> {
        if durations_ns.is_empty() {
            return Err(Error::InvalidConfig(
                "a timing sample needs at least one duration".to_string(),
            ));
        }
        if let Some(bad) = durations_ns.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "duration {} is not a finite non-negative value",
                bad
            )));
        }
        Ok(Self(durations_ns))
    }

    /// Durations in call order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of timed calls.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over durations in call order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }
}

/// Runs a unit through warm-up and measured phases.
#[derive(Debug, Clone)]
pub struct Collector {
    timer: Timer,
    warmup_runs: usize,
}

impl Collector {
    /// Create a collector on the shared timer that discards `warmup_runs`
    /// calls before timing.
    pub fn new(warmup_runs: usize) -> Self {
        Self {
            timer: Timer::shared(),
            warmup_runs,
        }
    }

    /// Create a collector with a specific timer.
    pub fn with_timer(timer: Timer, warmup_runs: usize) -> Self {
        Self { timer, warmup_runs }
    }

    /// Get a reference to the internal timer.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Number of untimed calls run before measurement.
    pub fn warmup_runs(&self) -> usize {
        self.warmup_runs
    }

    /// Warm up, then time `repetitions` calls of `unit`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if `repetitions` is zero.
    /// - [`Error::Execution`] on the first failing call, in either phase.
    pub fn collect<F, T, E>(&self, repetitions: usize, mut unit: F) -> Result<TimingSample>
    where
        F: FnMut() -> std::result::Result<T, E>,
        E: Into<BoxError>,
    {
        if repetitions == 0 {
            return Err(Error::InvalidConfig(
                "repetitions must be at least 1".to_string(),
            ));
        }

        for iteration in 0..self.warmup_runs {
            invoke(&mut unit).map_err(|source| failed(Phase::Warmup, iteration, source))?;
        }
        debug!(warmup_runs = self.warmup_runs, "warm-up complete");

        let mut durations = Vec::with_capacity(repetitions);
        for iteration in 0..repetitions {
            let (outcome, elapsed) = self.timer.time(|| invoke(&mut unit));
            outcome.map_err(|source| failed(Phase::Measured, iteration, source))?;
            let ns = elapsed.as_nanos() as f64;
            trace!(iteration, ns, "measured call");
            durations.push(ns);
        }

        TimingSample::new(durations)
    }
}

/// Call the unit once, turning both `Err` and panics into a boxed cause.
#[inline]
fn invoke<F, T, E>(unit: &mut F) -> std::result::Result<(), BoxError>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Into<BoxError>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| unit())) {
        Ok(Ok(value)) => {
            black_box(value);
            Ok(())
        }
        Ok(Err(err)) => Err(err.into()),
        Err(payload) => Err(Box::new(Panicked(panic_message(payload.as_ref())))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn failed(phase: Phase, iteration: usize, source: BoxError) -> Error {
    warn!(%phase, iteration, cause = %source, "unit failed");
    Error::Execution {
        phase,
        iteration,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn collector(warmup: usize) -> Collector {
        Collector::with_timer(Timer::with_resolution_ns(1.0), warmup)
    }

    #[test]
    fn test_sample_rejects_empty_and_negative() {
        assert!(TimingSample::new(vec![]).is_err());
        assert!(TimingSample::new(vec![1.0, -0.5]).is_err());
        assert!(TimingSample::new(vec![1.0, f64::NAN]).is_err());
        assert_eq!(TimingSample::new(vec![0.0, 3.0]).unwrap().len(), 2);
    }

    #[test]
    fn test_collect_counts_only_measured_calls() {
        let calls = Cell::new(0usize);
        let sample = collector(7)
            .collect(25, || {
                calls.set(calls.get() + 1);
                Ok::<_, BoxError>(calls.get())
            })
            .unwrap();

        assert_eq!(sample.len(), 25);
        assert_eq!(calls.get(), 32);
        assert!(sample.iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let err = collector(0).collect(0, || Ok::<_, BoxError>(())).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_warmup_failure_reports_phase_and_index() {
        let calls = Cell::new(0usize);
        let err = collector(5)
            .collect(10, || {
                let n = calls.get();
                calls.set(n + 1);
                if n == 2 {
                    Err("cold path")
                } else {
                    Ok(n)
                }
            })
            .unwrap_err();

        assert_eq!(err.execution_site(), Some((Phase::Warmup, 2)));
        // Stops at the failure.
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_measured_failure_index_is_phase_relative() {
        let calls = Cell::new(0usize);
        let err = collector(3)
            .collect(10, || {
                let n = calls.get();
                calls.set(n + 1);
                if n == 5 {
                    Err("late failure")
                } else {
                    Ok(())
                }
            })
            .unwrap_err();

        assert_eq!(err.execution_site(), Some((Phase::Measured, 2)));
    }

    #[test]
    fn test_panic_becomes_execution_error() {
        let err = collector(0)
            .collect(3, || -> std::result::Result<(), BoxError> { panic!("kaboom") })
            .unwrap_err();

        assert_eq!(err.execution_site(), Some((Phase::Measured, 0)));
        assert!(err.to_string().contains("kaboom"), "{}", err);
    }
}
