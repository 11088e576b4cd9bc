//! # Core subscriber trait
//!
//! `Subscribe` is the logger capability of a retry campaign: every progress
//! step of [`Retrier`](crate::Retrier) is delivered to it as an [`Event`].
//!
//! ## Contract
//! - `on_event` is called inline on the campaign's task, in publication order.
//!   Implementations should be quick (format, forward, count) and must not block.
//! - A campaign built without a subscriber uses a process-wide no-op
//!   singleton ([`noop`](crate::subscribers::noop)).
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct RetryCounter(AtomicUsize);
//!
//! impl Subscribe for RetryCounter {
//!     fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::BackoffScheduled {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!     fn name(&self) -> &'static str { "retry-counter" }
//! }
//! ```

use crate::events::Event;

/// Contract for event subscribers.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
