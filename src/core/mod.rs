//! Retry core: executor and connector driving.
//!
//! Internal modules:
//! - [`execute`]: the retry loop (attempt, classify, cancellable backoff sleep);
//! - [`connector`]: the [`Connector`] trait (operation + retryability predicate);
//! - [`retrier`]: drives a connector through [`execute`], publishing events;
//! - [`config`]: [`RetryConfig`] (backoff, jitter, deadline).
//!
//! ## Wiring
//! ```text
//! Retrier::retry(token)
//!   ├─► backoff = shared or Jittered(FibonacciBackoff(config.backoff()))
//!   ├─► timeout(config.deadline, ...)            (optional)
//!   └─► execute(child_token, backoff, |ctx| {
//!           publish AttemptStarting
//!           connector.connect(ctx)
//!             ├─ Ok              → publish Connected
//!             ├─ retryable(err)  → publish BackoffScheduled → Retryable(err)
//!             └─ otherwise       → publish ConnectFailed    → Fatal(err)
//!       })
//! ```

mod config;
mod connector;
mod execute;
mod retrier;

pub use config::RetryConfig;
pub use connector::Connector;
pub use execute::execute;
pub use retrier::Retrier;
