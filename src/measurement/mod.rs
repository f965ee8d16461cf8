//! Measurement infrastructure.
//!
//! This module provides:
//! - Wall-clock timing of single calls ([`Timer`])
//! - Two-phase collection: untimed warm-up, then individually timed calls
//!   ([`Collector`])
//! - Outlier diagnostics over the collected sample
//!
//! # Why per-call timing
//!
//! Timing each call separately, rather than one loop around all of them,
//! keeps a single slow call (a page fault, a descheduled thread) from
//! hiding inside the average. The minimum and the outlier counts in the
//! report are only meaningful because of it.

mod collector;
mod outlier;
mod timer;

pub use collector::{Collector, TimingSample};
pub use outlier::OutlierStats;
pub use timer::{black_box, Timer};
