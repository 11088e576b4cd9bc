//! # Connector abstraction.
//!
//! A [`Connector`] pairs an operation ("establish a resource") with the
//! domain knowledge of which of its failures are worth retrying. The retry
//! mechanism ([`Retrier`](crate::Retrier)) stays generic; the connector is the
//! only place where a raw error becomes a retry/fatal decision.
//!
//! ## Example
//! ```rust
//! use std::io;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::Connector;
//!
//! struct Database {
//!     addr: String,
//! }
//!
//! #[async_trait]
//! impl Connector for Database {
//!     type Error = io::Error;
//!
//!     fn name(&self) -> &str { "database" }
//!
//!     async fn connect(&self, ctx: CancellationToken) -> Result<(), io::Error> {
//!         if ctx.is_cancelled() {
//!             return Err(io::Error::from(io::ErrorKind::Interrupted));
//!         }
//!         // dial self.addr ...
//!         Ok(())
//!     }
//!
//!     fn retryable(&self, err: &io::Error) -> bool {
//!         // host unreachable / refused → transient; anything else (auth) → fatal
//!         matches!(
//!             err.kind(),
//!             io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut
//!         )
//!     }
//! }
//! ```

use std::error::Error as StdError;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// # Domain adapter driven by a retry campaign.
///
/// Implementors hold no retry bookkeeping; attempt counting and backoff state
/// belong to the campaign. `connect` may be invoked many times and must be
/// safe to repeat.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Error produced by a failed attempt.
    type Error: StdError + Send + Sync + 'static;

    /// Returns a stable, human-readable name used to label events.
    fn name(&self) -> &str;

    /// Makes one attempt to establish the resource.
    ///
    /// `ctx` is cancelled when the campaign is canceled or its deadline
    /// elapses; long attempts should observe it.
    async fn connect(&self, ctx: CancellationToken) -> Result<(), Self::Error>;

    /// Classifies a failure: `true` → transient (retry), `false` → fatal (abort).
    fn retryable(&self, err: &Self::Error) -> bool;
}
