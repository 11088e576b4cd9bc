//! Error types used by retry campaigns.
//!
//! This module defines:
//!
//! - [`AttemptError`]: the outcome of a single failed attempt, classified as
//!   transient ([`AttemptError::Retryable`]) or fatal ([`AttemptError::Fatal`]).
//! - [`RetryError`]: the terminal outcome of a whole campaign.
//! - [`MultiError`]: an aggregate of failures from independent sub-operations.
//!
//! [`RetryError`] and [`AttemptError`] provide `as_label` helpers for logs/metrics.

use std::time::Duration;
use thiserror::Error;

mod multi;

pub use multi::{BoxError, ErrorReport, MultiError, Wrapped};

/// # Classified failure of one attempt.
///
/// Returned by the operation passed to [`execute`](crate::execute). The
/// executor retries after a backoff on [`AttemptError::Retryable`] and stops
/// immediately on [`AttemptError::Fatal`].
#[derive(Error, Debug)]
pub enum AttemptError<E> {
    /// Transient failure; the campaign continues after a backoff.
    #[error(transparent)]
    Retryable(E),
    /// Non-recoverable failure; the campaign ends with this error.
    #[error(transparent)]
    Fatal(E),
}

impl<E> AttemptError<E> {
    /// Marks `err` as transient.
    pub fn retryable(err: E) -> Self {
        AttemptError::Retryable(err)
    }

    /// Marks `err` as fatal.
    pub fn fatal(err: E) -> Self {
        AttemptError::Fatal(err)
    }

    /// Classifies `err` with a predicate: `true` → retryable, `false` → fatal.
    pub fn classify(err: E, retryable: impl FnOnce(&E) -> bool) -> Self {
        if retryable(&err) {
            AttemptError::Retryable(err)
        } else {
            AttemptError::Fatal(err)
        }
    }

    /// Indicates whether the campaign should retry.
    ///
    /// # Example
    /// ```
    /// use retryvisor::AttemptError;
    ///
    /// assert!(AttemptError::retryable("connection refused").is_retryable());
    /// assert!(!AttemptError::fatal("auth failed").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttemptError::Retryable(_))
    }

    /// Returns the underlying error, dropping the classification.
    pub fn into_inner(self) -> E {
        match self {
            AttemptError::Retryable(e) | AttemptError::Fatal(e) => e,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AttemptError::Retryable(_) => "attempt_retryable",
            AttemptError::Fatal(_) => "attempt_fatal",
        }
    }
}

/// # Terminal outcome of a retry campaign.
///
/// Transient failures never surface here; they are only visible through
/// events. A campaign ends with the exact fatal error of the operation, or
/// with a cancellation outcome that takes priority over any transient failure
/// observed at the same time.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error classified as fatal.
    #[error(transparent)]
    Fatal(E),

    /// The cancellation token fired before or between attempts.
    #[error("retry canceled")]
    Canceled,

    /// The campaign ran past its configured deadline.
    #[error("retry deadline {deadline:?} exceeded")]
    DeadlineExceeded {
        /// The configured campaign deadline.
        deadline: Duration,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RetryError;
    ///
    /// let err: RetryError<std::io::Error> = RetryError::Canceled;
    /// assert_eq!(err.as_label(), "retry_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Fatal(_) => "retry_fatal",
            RetryError::Canceled => "retry_canceled",
            RetryError::DeadlineExceeded { .. } => "retry_deadline_exceeded",
        }
    }

    /// `true` when the campaign was stopped by cancellation or deadline
    /// rather than by the operation itself.
    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            RetryError::Canceled | RetryError::DeadlineExceeded { .. }
        )
    }

    /// Returns the fatal error, if that is how the campaign ended.
    pub fn into_fatal(self) -> Option<E> {
        match self {
            RetryError::Fatal(e) => Some(e),
            _ => None,
        }
    }
}
