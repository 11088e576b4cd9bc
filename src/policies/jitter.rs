//! # Jitter for retry delays.
//!
//! [`JitterPolicy`] adds randomness to delays so that many connectors failing
//! at the same moment do not retry in lockstep.
//!
//! - [`JitterPolicy::None`] no randomization, exact delays
//! - [`JitterPolicy::Full`] random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`
//!
//! [`Jittered`] applies a policy on top of any [`Backoff`]. The inner sequence
//! keeps advancing on its own schedule; jitter output never feeds back into it.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::policies::backoff::Backoff;

/// Policy controlling randomization of retry delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterPolicy {
    /// No jitter: use the exact backoff delay.
    #[default]
    None,
    /// Full jitter: random delay in `[0, delay]`.
    Full,
    /// Equal jitter: `delay/2 + random[0, delay/2]`.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }
}

/// Full jitter: random[0, delay]
fn full_jitter(delay: Duration) -> Duration {
    let ms = millis(delay);
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// Equal jitter: delay/2 + random[0, delay/2]
fn equal_jitter(delay: Duration) -> Duration {
    let ms = millis(delay);
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}

#[inline]
fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Backoff decorator that jitters every delay drawn from `inner`.
///
/// [`Backoff::peek`] reports the inner, un-jittered value, which is the upper
/// bound of what the next [`Backoff::next`] call can return.
#[derive(Debug)]
pub struct Jittered<B> {
    inner: B,
    jitter: JitterPolicy,
}

impl<B: Backoff> Jittered<B> {
    /// Wraps `inner` with the given jitter policy.
    pub fn new(inner: B, jitter: JitterPolicy) -> Self {
        Self { inner, jitter }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: Backoff> Backoff for Jittered<B> {
    fn next(&self) -> Duration {
        self.jitter.apply(self.inner.next())
    }

    fn peek(&self) -> Duration {
        self.inner.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{BackoffPolicy, FibonacciBackoff};

    #[test]
    fn test_none_is_exact() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn test_full_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..200 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn test_equal_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..200 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(500), "{j:?} below half");
            assert!(j <= d, "{j:?} above delay");
        }
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_jittered_backoff_keeps_inner_schedule() {
        let policy = BackoffPolicy::unbounded(Duration::from_millis(100));
        let b = Jittered::new(FibonacciBackoff::new(policy), JitterPolicy::Full);

        let upper = [100, 100, 200, 300, 500, 800];
        for ms in upper {
            assert_eq!(b.peek(), Duration::from_millis(ms));
            assert!(b.next() <= Duration::from_millis(ms));
        }
        assert_eq!(b.into_inner().peek(), Duration::from_millis(1300));
    }
}
