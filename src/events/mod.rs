//! Campaign events.
//!
//! This module holds the event **data model** published by
//! [`Retrier`](crate::Retrier) while it drives a connector.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publisher**: `Retrier::retry` (one event per attempt step, one per terminal outcome).
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) implementation, e.g.
//!   [`LogWriter`](crate::LogWriter) or a [`SubscriberSet`](crate::SubscriberSet).

mod event;

pub use event::{Event, EventKind};
