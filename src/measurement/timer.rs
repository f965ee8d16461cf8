//! Wall-clock timing of single calls.
//!
//! All measurements go through `std::time::Instant`, which is monotonic
//! and captures whatever work a call does, including work it fans out to
//! other threads before returning.

use std::hint::black_box as std_black_box;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Process-wide timer, resolution estimated on first use.
static SHARED: OnceLock<Timer> = OnceLock::new();

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Use this on values produced by measured calls so the optimizer cannot
/// discard the computation or hoist it out of the timed region.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// Estimate the clock resolution in nanoseconds.
///
/// Takes the smallest non-zero difference between consecutive clock reads.
fn estimate_resolution_ns() -> f64 {
    let mut min_diff = Duration::MAX;

    for _ in 0..1000 {
        let t1 = Instant::now();
        let mut t2 = Instant::now();
        // Spin until the clock ticks; bounded so a frozen clock can't hang us.
        for _ in 0..10_000 {
            if t2 > t1 {
                break;
            }
            t2 = Instant::now();
        }
        let diff = t2.saturating_duration_since(t1);
        if !diff.is_zero() && diff < min_diff {
            min_diff = diff;
        }
    }

    if min_diff == Duration::MAX {
        1.0
    } else {
        min_diff.as_nanos() as f64
    }
}

/// Times individual calls against the monotonic wall clock.
#[derive(Debug, Clone)]
pub struct Timer {
    resolution_ns: f64,
}

impl Timer {
    /// Create a timer, estimating the clock resolution afresh.
    pub fn new() -> Self {
        Self {
            resolution_ns: estimate_resolution_ns(),
        }
    }

    /// The process-wide timer.
    ///
    /// The resolution is estimated once, on the first call, and reused by
    /// every later call from any thread.
    pub fn shared() -> Self {
        SHARED.get_or_init(Self::new).clone()
    }

    /// Create a timer with a known resolution, skipping estimation.
    pub fn with_resolution_ns(resolution_ns: f64) -> Self {
        Self { resolution_ns }
    }

    /// Estimated clock resolution in nanoseconds.
    ///
    /// Calls shorter than this are reported as zero or one tick.
    pub fn resolution_ns(&self) -> f64 {
        self.resolution_ns
    }

    /// Human-readable name of the clock source.
    pub fn name(&self) -> &'static str {
        "Instant"
    }

    /// Run `f` once and return its output with the elapsed time.
    #[inline]
    pub fn time<F, T>(&self, f: F) -> (T, Duration)
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let out = black_box(f());
        let elapsed = start.elapsed();
        (out, elapsed)
    }
}

impl Default for Timer {
    /// Same as [`Timer::shared`].
    fn default() -> Self {
        Self::shared()
    }
}
