//! Reconnect demo.
//!
//! Two connectors are brought up concurrently:
//! - `cache` refuses three times, then connects;
//! - `broker` rejects credentials on the second attempt (fatal).
//!
//! Afterwards both "shutdown" steps run and their failures are gathered into
//! one `MultiError`.
//!
//! ```sh
//! RUST_LOG=retryvisor=info cargo run --example reconnect
//! ```

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use retryvisor::{
    BackoffPolicy, Connector, JitterPolicy, LogWriter, MultiError, Retrier, RetryConfig,
    RetryError,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

struct Flaky {
    name: &'static str,
    calls: AtomicU32,
    refusals: u32,
    fatal_at: Option<u32>,
}

impl Flaky {
    fn new(name: &'static str, refusals: u32, fatal_at: Option<u32>) -> Self {
        Self {
            name,
            calls: AtomicU32::new(0),
            refusals,
            fatal_at,
        }
    }
}

#[async_trait]
impl Connector for Flaky {
    type Error = io::Error;

    fn name(&self) -> &str {
        self.name
    }

    async fn connect(&self, ctx: CancellationToken) -> io::Result<()> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;

        // Simulated dial latency, aborted on cancellation.
        tokio::select! {
            _ = ctx.cancelled() => return Err(io::Error::from(io::ErrorKind::Interrupted)),
            _ = tokio::time::sleep(Duration::from_millis(20)) => {}
        }

        if self.fatal_at == Some(n) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "invalid credentials",
            ));
        }
        if n <= self.refusals {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        Ok(())
    }

    fn retryable(&self, err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::ConnectionRefused
    }
}

fn shutdown(name: &str, ok: bool) -> io::Result<()> {
    if ok {
        Ok(())
    } else {
        Err(io::Error::other(format!("{name}: flush failed")))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RetryConfig::from_policy(BackoffPolicy::new(
        Duration::from_millis(100),
        Duration::from_secs(1),
    ))
    .with_jitter(JitterPolicy::Equal)
    .with_deadline(Duration::from_secs(10));

    let token = CancellationToken::new();
    let log = Arc::new(LogWriter::new());

    let cache = Retrier::new(Flaky::new("cache", 3, None))
        .with_subscriber(log.clone())
        .with_config(config);
    let broker = Retrier::new(Flaky::new("broker", 1, Some(2)))
        .with_subscriber(log)
        .with_config(config);

    let (cache_res, broker_res) = tokio::join!(cache.retry(&token), broker.retry(&token));

    match cache_res {
        Ok(()) => tracing::info!("cache ready"),
        Err(e) => tracing::error!(error = %e, kind = e.as_label(), "cache unavailable"),
    }
    match &broker_res {
        Ok(()) => tracing::info!("broker ready"),
        Err(RetryError::Fatal(e)) => tracing::error!(error = %e, "broker rejected us"),
        Err(e) => tracing::warn!(error = %e, "broker gave up"),
    }

    let mut errs = MultiError::new();
    errs.collect(shutdown("cache", true));
    if let Err(e) = shutdown("broker", false) {
        errs.append_context(e, "shutdown");
    }
    if let Err(e) = broker_res {
        errs.append_critical_context(e, "broker connect");
    }

    match errs.into_result() {
        Ok(()) => Ok(()),
        Err(errs) => {
            tracing::error!(critical = %errs.critical_string(), "shutdown incomplete");
            eprintln!("{errs}");
            eprintln!("{}", serde_json::to_string_pretty(&errs)?);
            Ok(())
        }
    }
}
