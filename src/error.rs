//! Error types for measurement and comparison.

use std::error::Error as StdError;
use std::fmt;

/// Boxed cause carried by [`Error::Execution`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Phase of a measurement run in which a unit was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Untimed calls executed before measurement begins.
    Warmup,
    /// Individually timed calls.
    Measured,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Warmup => write!(f, "warm-up"),
            Phase::Measured => write!(f, "measured"),
        }
    }
}

/// Errors produced by the harness.
#[derive(Debug)]
pub enum Error {
    /// The benchmarked unit failed.
    ///
    /// `iteration` is zero-based within `phase`.
    Execution {
        /// Phase in which the failure occurred.
        phase: Phase,
        /// Zero-based call index within the phase.
        iteration: usize,
        /// What the unit reported.
        source: BoxError,
    },

    /// Two sequences passed to a comparison have different lengths.
    SizeMismatch {
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence.
        right: usize,
    },

    /// A parameter was outside its valid range.
    InvalidConfig(String),

    /// A stored report's statistics disagree with its own sample.
    InconsistentReport(String),
}

impl Error {
    /// Phase and iteration for execution failures.
    pub fn execution_site(&self) -> Option<(Phase, usize)> {
        match self {
            Error::Execution {
                phase, iteration, ..
            } => Some((*phase, *iteration)),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Execution {
                phase,
                iteration,
                source,
            } => write!(
                f,
                "unit failed during {} call {}: {}",
                phase, iteration, source
            ),
            Error::SizeMismatch { left, right } => write!(
                f,
                "sequence lengths differ: {} vs {}",
                left, right
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::InconsistentReport(msg) => write!(f, "inconsistent report: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Execution { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Cause recorded when a unit panics instead of returning an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked(pub String);

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panicked: {}", self.0)
    }
}

impl StdError for Panicked {}
