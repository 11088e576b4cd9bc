//! # Backoff policy and the [`Backoff`] generator contract.
//!
//! [`BackoffPolicy`] is the immutable configuration of a delay sequence:
//! - [`BackoffPolicy::base`] seeds the sequence (the unit every term is a multiple of);
//! - [`BackoffPolicy::ceiling`] caps every returned delay.
//!
//! Zero values are sentinels and are normalized once, at construction of a
//! generator, never per call:
//! - `base = 0` → [`DEFAULT_BASE`] (10s);
//! - `ceiling = 0` → unbounded ([`Duration::MAX`]).
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Backoff, BackoffPolicy, FibonacciBackoff};
//!
//! let policy = BackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(5));
//! let backoff = FibonacciBackoff::new(policy);
//!
//! assert_eq!(backoff.next(), Duration::from_millis(100));
//! assert_eq!(backoff.next(), Duration::from_millis(100));
//! assert_eq!(backoff.next(), Duration::from_millis(200));
//! ```

use std::sync::Arc;
use std::time::Duration;

/// Base delay substituted when a policy is built with `base = 0`.
pub const DEFAULT_BASE: Duration = Duration::from_secs(10);

/// Source of successive wait intervals between retry attempts.
///
/// Implementations must be safe to share between concurrent callers: a
/// generator may be wrapped in an [`Arc`] and used by several retry
/// campaigns at once.
pub trait Backoff: Send + Sync {
    /// Returns the next wait interval and advances the sequence.
    fn next(&self) -> Duration;

    /// Returns the interval the next [`Backoff::next`] call will produce,
    /// without advancing the sequence.
    fn peek(&self) -> Duration;

    /// Whole seconds until the next attempt, for logs.
    fn peek_seconds(&self) -> u64 {
        self.peek().as_secs()
    }
}

impl<B: Backoff + ?Sized> Backoff for Arc<B> {
    fn next(&self) -> Duration {
        (**self).next()
    }

    fn peek(&self) -> Duration {
        (**self).peek()
    }
}

/// Immutable backoff configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// First delay; every later delay is a Fibonacci multiple of it.
    pub base: Duration,
    /// Upper bound on every returned delay (`0` = unbounded).
    pub ceiling: Duration,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `base = 1s`;
    /// - `ceiling = 5s`.
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            ceiling: Duration::from_secs(5),
        }
    }
}

impl BackoffPolicy {
    /// Creates a policy. Sentinels are kept as given until [`normalized`](Self::normalized).
    pub const fn new(base: Duration, ceiling: Duration) -> Self {
        Self { base, ceiling }
    }

    /// Creates a policy without an upper bound.
    pub const fn unbounded(base: Duration) -> Self {
        Self {
            base,
            ceiling: Duration::ZERO,
        }
    }

    /// Replaces sentinel values with their effective counterparts.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            base: if self.base.is_zero() {
                DEFAULT_BASE
            } else {
                self.base
            },
            ceiling: if self.ceiling.is_zero() {
                Duration::MAX
            } else {
                self.ceiling
            },
        }
    }

    /// Returns `true` when the policy places no cap on delays.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.ceiling.is_zero() || self.ceiling == Duration::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_base_uses_default() {
        let p = BackoffPolicy::new(Duration::ZERO, Duration::from_secs(1)).normalized();
        assert_eq!(p.base, DEFAULT_BASE);
        assert_eq!(p.ceiling, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_ceiling_is_unbounded() {
        let p = BackoffPolicy::unbounded(Duration::from_millis(5));
        assert!(p.is_unbounded());
        assert_eq!(p.normalized().ceiling, Duration::MAX);
        assert_eq!(p.normalized().base, Duration::from_millis(5));
    }

    #[test]
    fn test_default_policy() {
        let p = BackoffPolicy::default();
        assert_eq!(p.base, Duration::from_secs(1));
        assert_eq!(p.ceiling, Duration::from_secs(5));
        assert!(!p.is_unbounded());
        assert_eq!(p, p.normalized());
    }
}
