//! # Retrier: drives a [`Connector`] through a retry campaign.
//!
//! [`Retrier`] couples a connector with a backoff, a subscriber and a
//! [`RetryConfig`], and runs the connector on top of [`execute`].
//!
//! ## Event flow
//! For each attempt the retrier publishes:
//! ```text
//! AttemptStarting → connect() → Connected          (success, campaign ends)
//!                             → BackoffScheduled   (retryable, sleep, next attempt)
//!                             → ConnectFailed      (fatal, campaign ends)
//!
//! Campaign canceled:        → Canceled
//! Campaign deadline hit:    → DeadlineExceeded
//! ```
//!
//! `BackoffScheduled` carries the delay read with [`Backoff::peek`], so the
//! sequence is advanced exactly once per retry (by the executor).
//!
//! ## Example
//! ```rust
//! use std::{io, sync::Arc, time::Duration};
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use retryvisor::{Connector, LogWriter, Retrier, RetryConfig};
//!
//! struct Cache;
//!
//! #[async_trait]
//! impl Connector for Cache {
//!     type Error = io::Error;
//!     fn name(&self) -> &str { "cache" }
//!     async fn connect(&self, _ctx: CancellationToken) -> io::Result<()> { Ok(()) }
//!     fn retryable(&self, _err: &io::Error) -> bool { true }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retrier = Retrier::new(Cache)
//!     .with_subscriber(Arc::new(LogWriter))
//!     .with_config(RetryConfig::default().with_deadline(Duration::from_secs(30)));
//!
//! retrier.retry(&CancellationToken::new()).await.unwrap();
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{config::RetryConfig, connector::Connector, execute::execute},
    error::{AttemptError, RetryError},
    events::{Event, EventKind},
    policies::{Backoff, FibonacciBackoff, Jittered},
    subscribers::{Subscribe, noop},
};

/// Retry campaign driver for one connector.
///
/// ### Rules
/// - Each [`retry`](Retrier::retry) call is one campaign with a fresh
///   backoff, unless a shared backoff was supplied.
/// - Attempt numbers start at 1 per campaign.
/// - Without a subscriber, events go to the shared no-op subscriber.
pub struct Retrier<C> {
    conn: C,
    subscriber: Arc<dyn Subscribe>,
    config: RetryConfig,
    shared_backoff: Option<Arc<dyn Backoff>>,
}

impl<C: Connector> Retrier<C> {
    /// Creates a retrier with [`RetryConfig::default`] and no subscriber.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            subscriber: noop(),
            config: RetryConfig::default(),
            shared_backoff: None,
        }
    }

    /// Delivers campaign events to `subscriber`.
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscriber = subscriber;
        self
    }

    /// Replaces the campaign configuration.
    #[must_use]
    pub fn with_config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Draws delays from `backoff` instead of a per-campaign generator.
    ///
    /// Several retriers may share one generator; the backoff fields of the
    /// configuration are then ignored.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.shared_backoff = Some(backoff);
        self
    }

    /// The driven connector.
    pub fn connector(&self) -> &C {
        &self.conn
    }

    /// The campaign configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs one campaign until the connector succeeds, fails fatally, the
    /// token is cancelled, or the configured deadline elapses.
    ///
    /// ### Outcomes
    /// - `Ok(())` after a successful `connect`
    /// - `Err(RetryError::Fatal(e))` with the connector's exact error
    /// - `Err(RetryError::Canceled)` when `token` is cancelled
    /// - `Err(RetryError::DeadlineExceeded { .. })` when the deadline elapses
    ///
    /// ### Deadline
    /// When the deadline elapses the campaign token is cancelled first and the
    /// in-flight attempt is polled once more, so a connector observing its
    /// `ctx` sees the cancellation. An attempt still pending after that poll
    /// is dropped. An attempt that connects in that last poll wins.
    pub async fn retry(&self, token: &CancellationToken) -> Result<(), RetryError<C::Error>> {
        let backoff = self.backoff();
        let campaign = token.child_token();
        let attempts = AtomicU32::new(0);

        let run = self.run(&campaign, backoff.as_ref(), &attempts);
        tokio::pin!(run);
        let res = match self.config.campaign_deadline() {
            Some(deadline) => select! {
                biased;
                res = &mut run => res,
                _ = time::sleep(deadline) => {
                    campaign.cancel();
                    match time::timeout(Duration::ZERO, &mut run).await {
                        Ok(Ok(())) => Ok(()),
                        _ => Err(RetryError::DeadlineExceeded { deadline }),
                    }
                }
            },
            None => run.await,
        };

        match &res {
            Err(RetryError::Canceled) => self.publish(
                Event::new(EventKind::Canceled)
                    .with_connector(self.conn.name())
                    .with_attempt(attempts.load(Ordering::Relaxed)),
            ),
            Err(RetryError::DeadlineExceeded { deadline }) => {
                let mut ev = Event::new(EventKind::DeadlineExceeded)
                    .with_connector(self.conn.name())
                    .with_attempt(attempts.load(Ordering::Relaxed));
                ev.delay = Some(*deadline);
                self.publish(ev);
            }
            _ => {}
        }
        res
    }

    fn backoff(&self) -> Arc<dyn Backoff> {
        match &self.shared_backoff {
            Some(shared) => Arc::clone(shared),
            None => Arc::new(Jittered::new(
                FibonacciBackoff::new(self.config.backoff()),
                self.config.jitter,
            )),
        }
    }

    async fn run(
        &self,
        token: &CancellationToken,
        backoff: &dyn Backoff,
        attempts: &AtomicU32,
    ) -> Result<(), RetryError<C::Error>> {
        let name = self.conn.name();

        execute(token, backoff, |ctx| {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                self.publish(
                    Event::new(EventKind::AttemptStarting)
                        .with_connector(name)
                        .with_attempt(attempt),
                );

                let err = match self.conn.connect(ctx.clone()).await {
                    Ok(()) => {
                        self.publish(
                            Event::new(EventKind::Connected)
                                .with_connector(name)
                                .with_attempt(attempt),
                        );
                        return Ok(());
                    }
                    Err(err) => err,
                };

                if self.conn.retryable(&err) {
                    // Interrupted by the campaign; the executor reports the cancellation.
                    if ctx.is_cancelled() {
                        return Err(AttemptError::Retryable(err));
                    }
                    self.publish(
                        Event::new(EventKind::BackoffScheduled)
                            .with_connector(name)
                            .with_attempt(attempt)
                            .with_delay(backoff.peek())
                            .with_retry_in_secs(backoff.peek_seconds())
                            .with_reason(err.to_string()),
                    );
                    Err(AttemptError::Retryable(err))
                } else {
                    self.publish(
                        Event::new(EventKind::ConnectFailed)
                            .with_connector(name)
                            .with_attempt(attempt)
                            .with_reason(err.to_string()),
                    );
                    Err(AttemptError::Fatal(err))
                }
            }
        })
        .await
    }

    #[inline]
    fn publish(&self, ev: Event) {
        self.subscriber.on_event(&ev);
    }
}
