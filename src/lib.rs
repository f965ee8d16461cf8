//! # warmtime
//!
//! Warm-up aware micro-benchmarking and approximate numeric equality.
//!
//! Two tools for checking that a fast numeric routine is both fast and
//! correct:
//! - [`measure`] runs a unit of work through an untimed warm-up phase and
//!   then times each call individually, returning a [`TimingReport`] with
//!   mean, best, standard deviation and outlier diagnostics.
//! - [`approx_equal`] compares two numeric sequences elementwise within a
//!   [`Tolerance`], with an explicit policy for NaNs.
//!
//! ## Why warm up
//!
//! Functions compiled on first use pay their compilation cost on the very
//! first call. Timing that call mixes compile time into the per-call
//! estimate. Warm-up calls absorb it and are never counted:
//!
//! ```
//! use std::time::Duration;
//! use warmtime::{measure_infallible, CostProfile, Profiled};
//!
//! // A unit whose first call costs an extra 2 ms, like a JIT compile.
//! let mut unit = Profiled::new(CostProfile::compile_once(Duration::from_millis(2)), || 3.0f64 * 3.0);
//!
//! let report = measure_infallible(unit.as_unit(), 20, 1).unwrap();
//! assert_eq!(report.count(), 20);
//! // The slow call happened during warm-up.
//! assert_eq!(unit.calls(), 21);
//! ```
//!
//! ## Failures are not averaged
//!
//! If the unit returns `Err` or panics, measurement stops and
//! [`Error::Execution`] reports which phase and which call failed.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod harness;
mod result;

// Functional modules
pub mod approx;
pub mod measurement;
pub mod output;
pub mod profile;
pub mod statistics;
pub mod workloads;

// Re-exports for public API
pub use approx::{approx_equal, first_mismatch, is_close, Mismatch, Tolerance};
pub use config::Config;
pub use error::{BoxError, Error, Panicked, Phase, Result};
pub use harness::Harness;
pub use measurement::{black_box, OutlierStats, Timer, TimingSample};
pub use profile::{CostProfile, Profiled};
pub use result::{Metadata, TimingReport};

/// Time a fallible unit: `warmup_runs` untimed calls, then `repetitions`
/// individually timed calls.
///
/// Uses the default outlier fence; see [`Harness`] for more control.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] if `repetitions` is zero.
/// - [`Error::Execution`] on the first call that fails, in either phase.
pub fn measure<F, T, E>(unit: F, repetitions: usize, warmup_runs: usize) -> Result<TimingReport>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Into<BoxError>,
{
    Harness::new()
        .repetitions(repetitions)
        .warmup(warmup_runs)
        .measure(unit)
}

/// Time a unit that signals failure only by panicking.
///
/// # Errors
///
/// Same as [`measure`].
pub fn measure_infallible<F, T>(unit: F, repetitions: usize, warmup_runs: usize) -> Result<TimingReport>
where
    F: FnMut() -> T,
{
    Harness::new()
        .repetitions(repetitions)
        .warmup(warmup_runs)
        .measure_infallible(unit)
}
