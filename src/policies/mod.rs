//! Backoff policies.
//!
//! This module groups the knobs that control **how long** to wait between
//! attempts of a retry campaign.
//!
//! ## Contents
//! - [`Backoff`]          generator contract (`next` / `peek`)
//! - [`BackoffPolicy`]    immutable `{ base, ceiling }` configuration
//! - [`FibonacciBackoff`] lock-free Fibonacci generator saturating at the ceiling
//! - [`JitterPolicy`], [`Jittered`] optional randomization on top of any generator
//!
//! ## Quick wiring
//! ```text
//! RetryConfig { backoff: BackoffPolicy, jitter: JitterPolicy, .. }
//!      └─► Retrier builds FibonacciBackoff (wrapped in Jittered)
//!           └─► execute() calls backoff.next() before each cancellable sleep
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → base=1s, ceiling=5s.
//! - `base = 0` → [`DEFAULT_BASE`]; `ceiling = 0` → unbounded.
//! - `JitterPolicy::None`.

mod backoff;
mod fibonacci;
mod jitter;

pub use backoff::{Backoff, BackoffPolicy, DEFAULT_BASE};
pub use fibonacci::FibonacciBackoff;
pub use jitter::{JitterPolicy, Jittered};
