//! Configuration for timing runs.

/// Configuration options for [`Harness`](crate::Harness).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Timed calls per run (default: 100). Must be at least 1.
    pub repetitions: usize,

    /// Untimed calls before measurement (default: 1).
    ///
    /// One call is enough to absorb compile-on-first-use; raise it for
    /// units whose caches or allocators need longer to settle.
    pub warmup: usize,

    /// Tukey fence multiplier for outlier diagnostics (default: 1.5).
    ///
    /// Set to 0.0 to skip outlier inspection. Outliers are only counted;
    /// they are never dropped from the mean.
    pub outlier_fence: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repetitions: 100,
            warmup: 1,
            outlier_fence: 1.5,
        }
    }
}

impl Config {
    /// Few repetitions, for smoke tests.
    pub fn quick() -> Self {
        Self {
            repetitions: 20,
            ..Self::default()
        }
    }

    /// Many repetitions and a longer warm-up, for publishable numbers.
    pub fn thorough() -> Self {
        Self {
            repetitions: 1_000,
            warmup: 10,
            ..Self::default()
        }
    }
}
