//! # Retry executor.
//!
//! [`execute`] runs one retry campaign: it invokes an async operation until it
//! succeeds, fails fatally, or the campaign is canceled.
//!
//! ## Flow
//! ```text
//! loop {
//!   ├─► token cancelled?            → Err(Canceled)     (no attempt made)
//!   ├─► op(child_token).await
//!   │     ├─ Ok(v)                  → Ok(v)
//!   │     ├─ Err(Fatal(e))          → Err(Fatal(e))     (no sleep, no backoff.next())
//!   │     └─ Err(Retryable(_))
//!   │           ├─ token cancelled? → Err(Canceled)
//!   │           ├─ delay = backoff.next()
//!   │           └─ select! { token.cancelled() → Err(Canceled), sleep(delay) → continue }
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; each one gets a child token of `token`.
//! - No attempt limit; bound a campaign by canceling its token.
//! - Cancellation wins over a transient failure observed at the same time.
//! - The executor never decides what is transient; the operation does, by
//!   returning [`AttemptError::Retryable`] or [`AttemptError::Fatal`].

use std::future::Future;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AttemptError, RetryError},
    policies::Backoff,
};

/// Runs `op` until it succeeds, returns a fatal error, or `token` is cancelled.
///
/// Between transient failures the executor sleeps for `backoff.next()`; the
/// sleep is interrupted as soon as `token` is cancelled.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use retryvisor::{AttemptError, BackoffPolicy, FibonacciBackoff, execute};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backoff = FibonacciBackoff::new(BackoffPolicy::new(
///     Duration::from_millis(1),
///     Duration::from_millis(5),
/// ));
/// let mut calls = 0;
///
/// let res = execute(&CancellationToken::new(), &backoff, |_ctx| {
///     calls += 1;
///     let n = calls;
///     async move {
///         if n < 3 {
///             Err(AttemptError::retryable("not yet"))
///         } else {
///             Ok(n)
///         }
///     }
/// })
/// .await;
///
/// assert_eq!(res.unwrap(), 3);
/// # }
/// ```
pub async fn execute<T, E, B, F, Fut>(
    token: &CancellationToken,
    backoff: &B,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    B: Backoff + ?Sized,
    F: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, AttemptError<E>>>,
{
    loop {
        if token.is_cancelled() {
            return Err(RetryError::Canceled);
        }

        match op(token.child_token()).await {
            Ok(v) => return Ok(v),
            Err(AttemptError::Fatal(e)) => return Err(RetryError::Fatal(e)),
            Err(AttemptError::Retryable(_)) => {
                if token.is_cancelled() {
                    return Err(RetryError::Canceled);
                }

                let delay = backoff.next();
                tracing::debug!(delay = ?delay, "attempt failed, backing off");

                let sleep = time::sleep(delay);
                tokio::pin!(sleep);
                select! {
                    biased;
                    _ = token.cancelled() => return Err(RetryError::Canceled),
                    _ = &mut sleep => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{BackoffPolicy, FibonacciBackoff};
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    /// Counts how many delays the executor drew.
    struct Counting {
        inner: FibonacciBackoff,
        draws: AtomicU32,
    }

    impl Counting {
        fn new(base: Duration, ceiling: Duration) -> Self {
            Self {
                inner: FibonacciBackoff::new(BackoffPolicy::new(base, ceiling)),
                draws: AtomicU32::new(0),
            }
        }

        fn draws(&self) -> u32 {
            self.draws.load(Ordering::SeqCst)
        }
    }

    impl Backoff for Counting {
        fn next(&self) -> Duration {
            self.draws.fetch_add(1, Ordering::SeqCst);
            self.inner.next()
        }

        fn peek(&self) -> Duration {
            self.inner.peek()
        }
    }

    fn refused() -> io::Error {
        io::Error::from(io::ErrorKind::ConnectionRefused)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(5));
        let res: Result<u8, RetryError<io::Error>> =
            execute(&CancellationToken::new(), &backoff, |_| async { Ok(7) }).await;

        assert_eq!(res.unwrap(), 7);
        assert_eq!(backoff.draws(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_returns_exact_error_without_sleeping() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(5));
        let start = Instant::now();
        let mut calls = 0u32;

        let res: Result<(), _> = execute(&CancellationToken::new(), &backoff, |_| {
            calls += 1;
            async { Err(AttemptError::fatal(io::Error::other("auth failed"))) }
        })
        .await;

        let err = res.unwrap_err().into_fatal().expect("fatal error");
        assert_eq!(err.to_string(), "auth failed");
        assert_eq!(calls, 1);
        assert_eq!(backoff.draws(), 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_transient_failures_then_success() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(5));
        let start = Instant::now();
        let mut calls = 0u32;

        let res: Result<(), RetryError<io::Error>> =
            execute(&CancellationToken::new(), &backoff, |_| {
                calls += 1;
                let n = calls;
                async move {
                    if n <= 2 {
                        Err(AttemptError::retryable(refused()))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(res.is_ok());
        assert_eq!(calls, 3);
        assert_eq!(backoff.draws(), 2);
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_runs_until_cancelled() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(1));
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_secs(10)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let res: Result<(), RetryError<io::Error>> = execute(&token, &backoff, |_| async {
            Err(AttemptError::retryable(refused()))
        })
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert!(backoff.draws() > 2);
        assert!(start.elapsed() >= Duration::from_secs(10));
        assert!(start.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_attempt() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(1));
        let token = CancellationToken::new();
        token.cancel();
        let mut calls = 0u32;

        let res: Result<(), RetryError<io::Error>> = execute(&token, &backoff, |_| {
            calls += 1;
            async { Ok(()) }
        })
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert_eq!(calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins_over_transient_failure() {
        let backoff = Counting::new(Duration::from_millis(100), Duration::from_secs(1));
        let token = CancellationToken::new();

        let res: Result<(), RetryError<io::Error>> = execute(&token, &backoff, |ctx| {
            let outer = token.clone();
            async move {
                assert!(!ctx.is_cancelled());
                outer.cancel();
                assert!(ctx.is_cancelled(), "attempt token follows the campaign token");
                Err(AttemptError::retryable(refused()))
            }
        })
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert_eq!(backoff.draws(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_long_sleep() {
        let backoff = Counting::new(Duration::from_secs(3600), Duration::ZERO);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let res: Result<(), RetryError<io::Error>> = execute(&token, &backoff, |_| async {
            Err(AttemptError::retryable(refused()))
        })
        .await;

        assert!(matches!(res, Err(RetryError::Canceled)));
        assert_eq!(backoff.draws(), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
