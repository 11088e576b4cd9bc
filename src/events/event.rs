//! # Events emitted by retry campaigns.
//!
//! The [`EventKind`] enum classifies events across two categories:
//! - **Attempt events**: one connection attempt (starting, connected, failed, backoff)
//! - **Terminal events**: how a campaign ended without success (fatal, canceled, deadline)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! connector name, attempt number, backoff delay and the failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_connector("postgres")
//!     .with_reason("connection refused")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_secs(2));
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.connector.as_deref(), Some("postgres"));
//! assert_eq!(ev.retry_in_secs, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of campaign events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Attempt events ===
    /// A connection attempt is starting.
    ///
    /// Sets:
    /// - `connector`: connector name
    /// - `attempt`: attempt number (1-based, per campaign)
    AttemptStarting,

    /// The attempt succeeded; the campaign ends.
    ///
    /// Sets:
    /// - `connector`, `attempt`
    Connected,

    /// The attempt failed with a transient error; next attempt scheduled.
    ///
    /// Sets:
    /// - `connector`, `attempt`
    /// - `delay`: un-jittered wait before the next attempt; with jitter the
    ///   actual sleep is at most this long
    /// - `retry_in_secs`: the same bound in whole seconds
    /// - `reason`: failure message
    BackoffScheduled,

    // === Terminal events ===
    /// The attempt failed with a fatal error; the campaign ends.
    ///
    /// Sets:
    /// - `connector`, `attempt`
    /// - `reason`: failure message
    ConnectFailed,

    /// The campaign was canceled through its token.
    ///
    /// Sets:
    /// - `connector`
    /// - `attempt`: attempts made so far
    Canceled,

    /// The campaign deadline elapsed.
    ///
    /// Sets:
    /// - `connector`
    /// - `delay`: the configured deadline
    DeadlineExceeded,

    // === Subscriber events ===
    /// A subscriber panicked while handling an event.
    ///
    /// Sets:
    /// - `connector`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::AttemptStarting => "attempt_starting",
            EventKind::Connected => "connected",
            EventKind::BackoffScheduled => "backoff_scheduled",
            EventKind::ConnectFailed => "connect_failed",
            EventKind::Canceled => "canceled",
            EventKind::DeadlineExceeded => "deadline_exceeded",
            EventKind::SubscriberPanicked => "subscriber_panicked",
        }
    }
}

/// Campaign event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the connector driving the campaign.
    pub connector: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Backoff delay before jitter, an upper bound on the actual sleep
    /// (or the deadline for [`EventKind::DeadlineExceeded`]).
    pub delay: Option<Duration>,
    /// Whole seconds of [`delay`](Event::delay), for logs.
    pub retry_in_secs: Option<u64>,
    /// Human-readable reason (error message, panic info).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            connector: None,
            attempt: None,
            delay: None,
            retry_in_secs: None,
            reason: None,
        }
    }

    /// Attaches a connector name.
    #[inline]
    pub fn with_connector(mut self, name: impl Into<Arc<str>>) -> Self {
        self.connector = Some(name.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay; `retry_in_secs` is derived from it.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self.retry_in_secs = Some(d.as_secs());
        self
    }

    /// Overrides the whole seconds until the next attempt.
    #[inline]
    pub fn with_retry_in_secs(mut self, secs: u64) -> Self {
        self.retry_in_secs = Some(secs);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_connector(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::AttemptStarting);
        let b = Event::new(EventKind::Connected);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_sets_retry_in_secs() {
        let ev = Event::new(EventKind::BackoffScheduled).with_delay(Duration::from_millis(2500));
        assert_eq!(ev.delay, Some(Duration::from_millis(2500)));
        assert_eq!(ev.retry_in_secs, Some(2));

        let ev = ev.with_retry_in_secs(3);
        assert_eq!(ev.retry_in_secs, Some(3));
    }

    #[test]
    fn test_subscriber_panic_event() {
        let ev = Event::subscriber_panicked("audit", "boom".to_string());
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.connector.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert_eq!(ev.kind.as_label(), "subscriber_panicked");
    }
}
