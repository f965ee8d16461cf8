//! Cost profiles for benchmark units.
//!
//! A JIT-compiled function pays its compilation cost on the first call
//! and runs at full speed afterwards. [`Profiled`] reproduces that shape
//! around any closure so warm-up behavior can be exercised without a
//! real compiler. The timing harness itself knows nothing about profiles.

use std::cell::Cell;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How a unit's cost evolves over successive calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostProfile {
    /// Every call costs the same.
    #[default]
    Steady,
    /// The first `calls` invocations each pay an extra `penalty`.
    ColdStart {
        /// Number of slow calls at the start.
        calls: usize,
        /// Extra wall-clock time per slow call.
        penalty: Duration,
    },
}

impl CostProfile {
    /// One slow first call, like compile-on-first-use.
    pub fn compile_once(penalty: Duration) -> Self {
        CostProfile::ColdStart { calls: 1, penalty }
    }

    /// Extra cost of the `call`-th invocation (zero-based).
    pub fn penalty_for(&self, call: usize) -> Duration {
        match *self {
            CostProfile::Steady => Duration::ZERO,
            CostProfile::ColdStart { calls, penalty } if call < calls => penalty,
            CostProfile::ColdStart { .. } => Duration::ZERO,
        }
    }
}

/// A unit wrapped with a [`CostProfile`].
///
/// Call [`Profiled::call`] (or pass [`Profiled::as_unit`] to the harness).
/// The penalty is burned by spinning on the wall clock rather than
/// sleeping, so it shows up as real busy time.
#[derive(Debug)]
pub struct Profiled<F> {
    inner: F,
    profile: CostProfile,
    calls: Cell<usize>,
}

impl<F> Profiled<F> {
    /// Wrap `inner` with `profile`.
    pub fn new(profile: CostProfile, inner: F) -> Self {
        Self {
            inner,
            profile,
            calls: Cell::new(0),
        }
    }

    /// Calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Forget previous calls so the next one is cold again.
    pub fn reset(&self) {
        self.calls.set(0);
    }

    /// The wrapped profile.
    pub fn profile(&self) -> CostProfile {
        self.profile
    }
}

impl<F, T> Profiled<F>
where
    F: FnMut() -> T,
{
    /// Invoke the unit, paying any penalty due for this call first.
    pub fn call(&mut self) -> T {
        let n = self.calls.get();
        self.calls.set(n + 1);
        spin_for(self.profile.penalty_for(n));
        (self.inner)()
    }

    /// Borrow as a closure suitable for the harness.
    pub fn as_unit(&mut self) -> impl FnMut() -> T + '_ {
        move || self.call()
    }
}

fn spin_for(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}
