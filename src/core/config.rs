//! # Retry campaign configuration.
//!
//! Provides [`RetryConfig`], the settings a [`Retrier`](crate::Retrier) uses
//! to build its backoff and bound its campaign.
//!
//! ## Sentinel values
//! - `base = 0` → default base (10s)
//! - `ceiling = 0` → unbounded delays
//! - `deadline = 0` → no campaign deadline
//!
//! ## Serialized form
//! Durations are written in milliseconds. Whole values are integers; a
//! sub-millisecond value is written as a fraction so it survives a round trip.
//! ```toml
//! base_ms = 100
//! ceiling_ms = 5000
//! deadline_ms = 60000
//! jitter = "equal"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policies::{BackoffPolicy, JitterPolicy};

/// Configuration of a retry campaign.
///
/// ## Field semantics
/// - `base`: first backoff delay (`0` = default base)
/// - `ceiling`: maximum backoff delay (`0` = unbounded)
/// - `deadline`: upper bound on a whole campaign (`0` = none)
/// - `jitter`: randomization applied to each delay
///
/// Prefer the accessors over reading the raw fields to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// First backoff delay.
    #[serde(rename = "base_ms", with = "millis")]
    pub base: Duration,
    /// Maximum backoff delay.
    #[serde(rename = "ceiling_ms", with = "millis")]
    pub ceiling: Duration,
    /// Upper bound on a whole campaign.
    #[serde(rename = "deadline_ms", with = "millis")]
    pub deadline: Duration,
    /// Randomization applied to each delay.
    pub jitter: JitterPolicy,
}

impl Default for RetryConfig {
    /// Default configuration:
    ///
    /// - `base = 1s`, `ceiling = 5s`
    /// - no deadline
    /// - no jitter
    fn default() -> Self {
        Self::from_policy(BackoffPolicy::default())
    }
}

impl RetryConfig {
    /// Builds a configuration from a policy, keeping the other defaults.
    pub fn from_policy(policy: BackoffPolicy) -> Self {
        Self {
            base: policy.base,
            ceiling: policy.ceiling,
            deadline: Duration::ZERO,
            jitter: JitterPolicy::None,
        }
    }

    /// Sets the campaign deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the jitter policy.
    #[must_use]
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Backoff policy (sentinels preserved; generators normalize them).
    #[inline]
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy::new(self.base, self.ceiling)
    }

    /// Campaign deadline as an `Option`.
    ///
    /// - `None` → runs until success, fatal error or cancellation
    /// - `Some(d)` → canceled with `DeadlineExceeded` after `d`
    #[inline]
    pub fn campaign_deadline(&self) -> Option<Duration> {
        if self.deadline.is_zero() {
            None
        } else {
            Some(self.deadline)
        }
    }
}

/// Millisecond (de)serialization of a [`Duration`].
mod millis {
    use std::fmt;
    use std::time::Duration;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NANOS_PER_MILLI: u128 = 1_000_000;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let nanos = d.as_nanos();
        match u64::try_from(nanos / NANOS_PER_MILLI) {
            Ok(ms) if nanos % NANOS_PER_MILLI == 0 => s.serialize_u64(ms),
            _ => s.serialize_f64(nanos as f64 / NANOS_PER_MILLI as f64),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        d.deserialize_any(MillisVisitor)
    }

    struct MillisVisitor;

    impl<'de> Visitor<'de> for MillisVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative number of milliseconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
            Ok(Duration::from_millis(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
            u64::try_from(v)
                .map(Duration::from_millis)
                .map_err(|_| E::custom(format!("negative duration: {v}ms")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Duration, E> {
            if !v.is_finite() || v < 0.0 {
                return Err(E::custom(format!("invalid duration: {v}ms")));
            }
            let nanos = (v * NANOS_PER_MILLI as f64).round();
            if nanos >= u64::MAX as f64 {
                return Err(E::custom(format!("duration out of range: {v}ms")));
            }
            Ok(Duration::from_nanos(nanos as u64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.backoff(), BackoffPolicy::default());
        assert_eq!(cfg.campaign_deadline(), None);
        assert_eq!(cfg.jitter, JitterPolicy::None);
    }

    #[test]
    fn test_deserialize_toml_with_missing_fields() {
        let cfg: RetryConfig = toml::from_str(
            r#"
            base_ms = 100
            deadline_ms = 2500
            jitter = "equal"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.backoff().base, Duration::from_millis(100));
        assert_eq!(cfg.backoff().ceiling, Duration::from_secs(5));
        assert_eq!(cfg.campaign_deadline(), Some(Duration::from_millis(2500)));
        assert_eq!(cfg.jitter, JitterPolicy::Equal);
    }

    #[test]
    fn test_builders() {
        let cfg = RetryConfig::from_policy(BackoffPolicy::unbounded(Duration::from_millis(250)))
            .with_deadline(Duration::from_secs(30))
            .with_jitter(JitterPolicy::Full);

        assert_eq!(cfg.base, Duration::from_millis(250));
        assert_eq!(cfg.ceiling, Duration::ZERO);
        assert!(cfg.backoff().is_unbounded());
        assert_eq!(cfg.campaign_deadline(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.jitter, JitterPolicy::Full);
    }

    #[test]
    fn test_serialize_roundtrip_json() {
        let cfg = RetryConfig::default().with_jitter(JitterPolicy::Equal);
        let json = serde_json::to_value(cfg).unwrap();
        assert_eq!(json["jitter"], "equal");
        assert_eq!(json["ceiling_ms"], 5000);
    }

    #[test]
    fn test_sub_millisecond_policy_is_preserved() {
        let policy = BackoffPolicy::new(Duration::from_micros(500), Duration::from_micros(900));
        let cfg = RetryConfig::from_policy(policy);
        assert_eq!(cfg.backoff(), policy);

        let json = serde_json::to_string(&cfg).unwrap();
        let back: RetryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.backoff(), policy);

        let toml = toml::to_string(&cfg).unwrap();
        let back: RetryConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_fractional_and_negative_millis() {
        let cfg: RetryConfig = serde_json::from_str(r#"{"base_ms": 0.25}"#).unwrap();
        assert_eq!(cfg.base, Duration::from_micros(250));

        assert!(serde_json::from_str::<RetryConfig>(r#"{"base_ms": -5}"#).is_err());
    }
}
