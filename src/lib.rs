//! # retryvisor
//!
//! **Retryvisor** retries fallible, typically network-bound operations
//! ("connect to a dependency") with a Fibonacci backoff, aborts on fatal
//! failures and stops promptly on cancellation.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Connector   │   │  Connector   │   │  Connector   │
//!     │  (postgres)  │   │   (redis)    │   │   (broker)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Retrier    │   │   Retrier    │   │   Retrier    │──► Subscribe (events)
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  execute(token, backoff, op)                                      │
//! │  - op → Ok / Retryable / Fatal                                    │
//! │  - Retryable → sleep(backoff.next()) racing token.cancelled()     │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 ▼
//!                   FibonacciBackoff (lock-free, CAS on (prev, curr))
//! ```
//!
//! Failures of independent shutdown steps are gathered with [`MultiError`].
//!
//! ### Campaign
//! ```text
//! loop {
//!   ├─► token cancelled?  → Canceled
//!   ├─► publish AttemptStarting{ connector, attempt }
//!   ├─► connect(ctx)
//!   │       ├─ Ok              ──► publish Connected, return Ok
//!   │       ├─ Err, retryable  ──► publish BackoffScheduled{ retry_in_secs = peek }
//!   │       │                      sleep(backoff.next()) (cancellable), continue
//!   │       └─ Err, fatal      ──► publish ConnectFailed, return Fatal(err)
//!   └─ deadline elapsed (optional) ─► DeadlineExceeded
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                          |
//! |-----------------|----------------------------------------------------------|---------------------------------------------|
//! | **Backoff**     | Lock-free Fibonacci sequence with ceiling, jitter        | [`Backoff`], [`FibonacciBackoff`], [`JitterPolicy`] |
//! | **Executor**    | Cancellable retry loop, transient vs fatal               | [`execute`], [`AttemptError`], [`RetryError`] |
//! | **Connectors**  | Operation + retryability predicate, event publishing     | [`Connector`], [`Retrier`]                  |
//! | **Events**      | Structured progress events, `tracing` writer             | [`Event`], [`Subscribe`], [`LogWriter`]     |
//! | **Errors**      | Aggregate of independent failures with a critical cause  | [`MultiError`]                              |
//! | **Configuration** | Serde-friendly campaign settings                       | [`RetryConfig`]                             |
//!
//! ## Example
//! ```rust
//! use std::{io, sync::Arc, time::Duration};
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{Connector, LogWriter, Retrier, RetryConfig, RetryError};
//!
//! struct Broker;
//!
//! #[async_trait]
//! impl Connector for Broker {
//!     type Error = io::Error;
//!
//!     fn name(&self) -> &str { "broker" }
//!
//!     async fn connect(&self, _ctx: CancellationToken) -> io::Result<()> {
//!         Err(io::Error::from(io::ErrorKind::PermissionDenied))
//!     }
//!
//!     fn retryable(&self, err: &io::Error) -> bool {
//!         err.kind() == io::ErrorKind::ConnectionRefused
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let retrier = Retrier::new(Broker)
//!         .with_subscriber(Arc::new(LogWriter))
//!         .with_config(RetryConfig::default().with_deadline(Duration::from_secs(10)));
//!
//!     match retrier.retry(&CancellationToken::new()).await {
//!         Err(RetryError::Fatal(e)) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
//!         other => panic!("unexpected: {other:?}"),
//!     }
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Connector, Retrier, RetryConfig, execute};
pub use error::{AttemptError, BoxError, ErrorReport, MultiError, RetryError, Wrapped};
pub use events::{Event, EventKind};
pub use policies::{
    Backoff, BackoffPolicy, DEFAULT_BASE, FibonacciBackoff, JitterPolicy, Jittered,
};
pub use subscribers::{LogWriter, Noop, Subscribe, SubscriberSet, noop};
