//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait (the logger capability of a
//! retry campaign) and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Retrier::retry ── on_event(&Event) ──► Arc<dyn Subscribe>
//!                                              │
//!                               ┌──────────────┼──────────────┐
//!                               ▼              ▼              ▼
//!                           LogWriter     SubscriberSet      Noop
//!                          (tracing)      (fan-out)        (default)
//! ```

mod embedded;
mod set;
mod subscribe;

pub use embedded::{LogWriter, Noop, noop};
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
