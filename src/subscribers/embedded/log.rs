//! # LogWriter: events to `tracing`
//!
//! A subscriber that forwards incoming [`Event`]s to [`tracing`] as structured
//! records. Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`)
//! to see them.
//!
//! ## Levels
//! | Event                | Level  | Message                |
//! |----------------------|--------|------------------------|
//! | `AttemptStarting`    | info   | trying to connect      |
//! | `Connected`          | info   | connected successfully |
//! | `BackoffScheduled`   | warn   | failed to connect      |
//! | `ConnectFailed`      | error  | failed to connect      |
//! | `Canceled`           | info   | retry canceled         |
//! | `DeadlineExceeded`   | error  | retry deadline exceeded|
//! | `SubscriberPanicked` | error  | subscriber panicked    |
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO retryvisor: trying to connect connector="postgres" attempt=1
//! WARN retryvisor: failed to connect connector="postgres" attempt=1 retry_in_seconds=1 error="connection refused"
//! INFO retryvisor: connected successfully connector="postgres" attempt=2
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Structured logging subscriber backed by `tracing`.
#[derive(Default, Clone, Copy, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let connector = e.connector.as_deref().unwrap_or("unknown");
        let attempt = e.attempt.unwrap_or_default();
        let error = e.reason.as_deref().unwrap_or_default();

        match e.kind {
            EventKind::AttemptStarting => {
                tracing::info!(target: "retryvisor", seq = e.seq, connector, attempt, "trying to connect");
            }
            EventKind::Connected => {
                tracing::info!(target: "retryvisor", seq = e.seq, connector, attempt, "connected successfully");
            }
            EventKind::BackoffScheduled => {
                tracing::warn!(
                    target: "retryvisor",
                    seq = e.seq,
                    connector,
                    attempt,
                    retry_in_seconds = e.retry_in_secs.unwrap_or_default(),
                    max_delay = ?e.delay.unwrap_or_default(),
                    error,
                    "failed to connect"
                );
            }
            EventKind::ConnectFailed => {
                tracing::error!(target: "retryvisor", seq = e.seq, connector, attempt, error, "failed to connect");
            }
            EventKind::Canceled => {
                tracing::info!(target: "retryvisor", seq = e.seq, connector, attempt, "retry canceled");
            }
            EventKind::DeadlineExceeded => {
                tracing::error!(
                    target: "retryvisor",
                    seq = e.seq,
                    connector,
                    deadline = ?e.delay.unwrap_or_default(),
                    "retry deadline exceeded"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "retryvisor", subscriber = connector, info = error, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
