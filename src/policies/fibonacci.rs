//! # Lock-free Fibonacci backoff.
//!
//! [`FibonacciBackoff`] yields `base, base, 2·base, 3·base, 5·base, 8·base, …`,
//! saturating at the policy ceiling.
//!
//! ## State
//! The last two terms `(previous, current)` start at `(0, base)` and every
//! advance replaces them with `(current, previous + current)`. The pair is a
//! pure function of the number of advances, so the generator publishes that
//! step count in a single [`AtomicU32`]:
//! ```text
//! step 0 → (0, b)   step 1 → (b, b)   step 2 → (b, 2b)   step 3 → (2b, 3b) ...
//! ```
//! Every [`Backoff::next`] call reads the step, derives the pair, computes the
//! candidate step and publishes it with a compare-and-swap. A failed swap
//! means another caller advanced first; the cycle restarts from the value it
//! observed. No update is lost and no caller blocks another.
//!
//! ## Saturation
//! - Terms are computed in nanoseconds (`u128`), so the sequence follows the
//!   true Fibonacci numbers for any base up to the ceiling.
//! - A term `>= ceiling` is returned as exactly `ceiling`. From then on the
//!   step stops advancing, so the arithmetic never overflows.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::policies::backoff::{Backoff, BackoffPolicy};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Fibonacci backoff generator, safe for concurrent use.
#[derive(Debug)]
pub struct FibonacciBackoff {
    step: AtomicU32,
    base: Duration,
    ceiling: Duration,
}

impl FibonacciBackoff {
    /// Creates a generator; sentinel policy values are normalized here.
    pub fn new(policy: BackoffPolicy) -> Self {
        let policy = policy.normalized();
        Self {
            step: AtomicU32::new(0),
            base: policy.base,
            ceiling: policy.ceiling,
        }
    }

    /// Effective (normalized) policy of this generator.
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.base, self.ceiling)
    }

    /// Current term after `step` advances, in nanoseconds, clamped to the ceiling.
    fn term(&self, step: u32) -> u128 {
        let ceiling = self.ceiling.as_nanos();
        let (mut previous, mut current) = (0u128, self.base.as_nanos().min(ceiling));
        for _ in 0..step {
            if current >= ceiling {
                break;
            }
            (previous, current) = (current, previous.saturating_add(current).min(ceiling));
        }
        current
    }

    fn is_saturated(&self, term: u128) -> bool {
        term >= self.ceiling.as_nanos()
    }
}

#[inline]
fn from_nanos(nanos: u128) -> Duration {
    // Terms never exceed the ceiling, so the seconds fit in `u64`.
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}

impl From<BackoffPolicy> for FibonacciBackoff {
    fn from(policy: BackoffPolicy) -> Self {
        Self::new(policy)
    }
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}

impl Backoff for FibonacciBackoff {
    fn next(&self) -> Duration {
        let mut observed = self.step.load(Ordering::Acquire);
        loop {
            let term = self.term(observed);
            if self.is_saturated(term) {
                return self.ceiling;
            }

            match self.step.compare_exchange_weak(
                observed,
                observed + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return from_nanos(term),
                Err(actual) => observed = actual,
            }
        }
    }

    fn peek(&self) -> Duration {
        let term = self.term(self.step.load(Ordering::Acquire));
        if self.is_saturated(term) {
            self.ceiling
        } else {
            from_nanos(term)
        }
    }
}
