//! # MultiError: aggregate of independent failures.
//!
//! [`MultiError`] collects the failures of logically independent
//! sub-operations (e.g. every subsystem stopped during a shutdown sweep) so
//! that all of them are reported, not just the first.
//!
//! ## Rules
//! - Members keep **append order**.
//! - At most one member is marked **critical**; a later critical append
//!   replaces the marker (last critical wins).
//! - The critical error is a member of the list and is rendered once.
//! - Appending another [`MultiError`] **flattens** its members instead of nesting.
//! - Writers take `&mut self`; concurrent producers serialize their appends.
//!
//! ## Example
//! ```rust
//! use retryvisor::MultiError;
//!
//! let mut errs = MultiError::new();
//! errs.collect(Ok::<(), std::io::Error>(()));
//! assert!(errs.is_empty());
//!
//! errs.append_context(std::io::Error::other("socket busy"), "stop http");
//! errs.append_critical(std::io::Error::other("wal not flushed"));
//!
//! let err = errs.into_result().unwrap_err();
//! assert_eq!(err.list(), vec!["stop http: socket busy", "wal not flushed"]);
//! assert_eq!(err.critical_string(), "wal not flushed");
//! ```

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Owned, type-erased error stored by [`MultiError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Error annotated with a context message, rendered as `"context: source"`.
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct Wrapped {
    context: String,
    source: BoxError,
}

impl Wrapped {
    /// Wraps `source` with `context`.
    pub fn new(source: impl Into<BoxError>, context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Context message.
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Ordered set of errors with an optional critical member.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<BoxError>,
    /// Index into `errors`.
    critical: Option<usize>,
}

impl MultiError {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `err`. A [`MultiError`] is flattened.
    pub fn append(&mut self, err: impl Into<BoxError>) {
        self.push(err.into(), false, None);
    }

    /// Appends the error of `result`, if any. `Ok` is a no-op.
    pub fn collect<T, E: Into<BoxError>>(&mut self, result: Result<T, E>) {
        if let Err(e) = result {
            self.append(e);
        }
    }

    /// Appends `err` wrapped with `context` (each flattened member is wrapped).
    pub fn append_context(&mut self, err: impl Into<BoxError>, context: impl Into<String>) {
        self.push(err.into(), false, Some(context.into()));
    }

    /// Appends `err` and marks it as the critical error.
    ///
    /// When `err` is a [`MultiError`], its own critical member becomes the
    /// critical one; without one, its first member is marked.
    pub fn append_critical(&mut self, err: impl Into<BoxError>) {
        self.push(err.into(), true, None);
    }

    /// Critical variant of [`append_context`](Self::append_context).
    pub fn append_critical_context(
        &mut self,
        err: impl Into<BoxError>,
        context: impl Into<String>,
    ) {
        self.push(err.into(), true, Some(context.into()));
    }

    fn push(&mut self, err: BoxError, critical: bool, context: Option<String>) {
        let wrap = |e: BoxError| -> BoxError {
            match &context {
                Some(ctx) => Box::new(Wrapped::new(e, ctx.clone())),
                None => e,
            }
        };

        match err.downcast::<MultiError>() {
            Ok(nested) => {
                let MultiError { errors, critical: nested_critical } = *nested;
                if errors.is_empty() {
                    return;
                }
                let offset = self.errors.len();
                match (nested_critical, critical) {
                    (Some(idx), _) => self.critical = Some(offset + idx),
                    (None, true) => self.critical = Some(offset),
                    (None, false) => {}
                }
                self.errors.extend(errors.into_iter().map(wrap));
            }
            Err(err) => {
                if critical {
                    self.critical = Some(self.errors.len());
                }
                self.errors.push(wrap(err));
            }
        }
    }

    /// Finalizes the aggregate: `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Rendered members, in append order.
    pub fn list(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// The critical member, if one was marked.
    pub fn critical(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.critical.map(|idx| &*self.errors[idx])
    }

    /// Rendered critical member, or an empty string.
    pub fn critical_string(&self) -> String {
        self.critical()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Iterates over members in append order.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn StdError + Send + Sync + 'static)> {
        self.errors.iter().map(|e| &**e)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Owned report of the aggregate, suitable for serialization.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            critical: self.critical().map(ToString::to_string),
            errors: self.list(),
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.len() {
            1 => writeln!(f, "1 error occurred:")?,
            n => writeln!(f, "{n} errors occurred:")?,
        }
        for err in &self.errors {
            writeln!(f, "\t* {err}")?;
        }
        writeln!(f)
    }
}

impl StdError for MultiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.errors
            .first()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

impl Extend<BoxError> for MultiError {
    fn extend<I: IntoIterator<Item = BoxError>>(&mut self, iter: I) {
        for err in iter {
            self.push(err, false, None);
        }
    }
}

impl Serialize for MultiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.report().serialize(serializer)
    }
}

/// Serializable view of a [`MultiError`]; empty fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn err(msg: &str) -> io::Error {
        io::Error::other(msg.to_string())
    }

    #[test]
    fn test_empty_is_ok() {
        let errs = MultiError::new();
        assert!(errs.is_empty());
        assert!(errs.critical().is_none());
        assert_eq!(errs.critical_string(), "");
        assert!(errs.into_result().is_ok());
    }

    #[test]
    fn test_collect_ok_is_noop() {
        let mut errs = MultiError::new();
        errs.collect(Ok::<u8, io::Error>(1));
        errs.collect(Err::<(), _>(err("disk full")));
        assert_eq!(errs.list(), vec!["disk full"]);
    }

    #[test]
    fn test_single_append() {
        let mut errs = MultiError::new();
        errs.append(err("connection refused"));

        let agg = errs.into_result().unwrap_err();
        assert_eq!(agg.list().len(), 1);
        assert!(agg.to_string().contains("connection refused"));
        assert_eq!(agg.to_string(), "1 error occurred:\n\t* connection refused\n\n");
        assert_eq!(agg.source().map(ToString::to_string).as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_critical_is_member_and_kept_separately() {
        let mut errs = MultiError::new();
        errs.append_critical(err("db shutdown"));
        errs.append(err("cache shutdown"));

        assert_eq!(errs.critical_string(), "db shutdown");
        let critical = errs.critical().and_then(|e| e.downcast_ref::<io::Error>());
        assert_eq!(critical.map(ToString::to_string).as_deref(), Some("db shutdown"));
        assert_eq!(errs.list(), vec!["db shutdown", "cache shutdown"]);
        assert_eq!(
            errs.to_string(),
            "2 errors occurred:\n\t* db shutdown\n\t* cache shutdown\n\n"
        );
    }

    #[test]
    fn test_last_critical_wins() {
        let mut errs = MultiError::new();
        errs.append_critical(err("first"));
        errs.append_critical(err("second"));
        assert_eq!(errs.critical_string(), "second");
        assert_eq!(errs.len(), 2);
    }

    #[test]
    fn test_nested_aggregate_is_flattened() {
        let mut inner = MultiError::new();
        inner.append(err("a"));
        inner.append_critical(err("b"));

        let mut outer = MultiError::new();
        outer.append(err("x"));
        outer.append(inner);

        assert_eq!(outer.list(), vec!["x", "a", "b"]);
        assert_eq!(outer.critical_string(), "b");
        assert!(outer.iter().all(|e| !e.is::<MultiError>()));
    }

    #[test]
    fn test_critical_aggregate_without_marker_marks_first_member() {
        let mut inner = MultiError::new();
        inner.append(err("a"));
        inner.append(err("b"));

        let mut outer = MultiError::new();
        outer.append(err("x"));
        outer.append_critical(inner);
        outer.append_critical(MultiError::new());

        assert_eq!(outer.list(), vec!["x", "a", "b"]);
        assert_eq!(outer.critical_string(), "a");
    }

    #[test]
    fn test_context_wraps_each_flattened_member() {
        let mut inner = MultiError::new();
        inner.append(err("a"));
        inner.append(err("b"));

        let mut outer = MultiError::new();
        outer.append_context(inner, "stop workers");
        outer.append_critical_context(err("locked"), "stop store");

        assert_eq!(
            outer.list(),
            vec!["stop workers: a", "stop workers: b", "stop store: locked"]
        );
        assert_eq!(outer.critical_string(), "stop store: locked");

        let wrapped = outer.critical().and_then(|e| e.downcast_ref::<Wrapped>());
        assert_eq!(wrapped.map(Wrapped::context), Some("stop store"));
        assert_eq!(
            wrapped.and_then(|w| w.source()).map(ToString::to_string).as_deref(),
            Some("locked")
        );
    }

    #[test]
    fn test_extend_flattens() {
        let mut inner = MultiError::new();
        inner.append(err("a"));

        let mut errs = MultiError::new();
        errs.extend(vec![Box::new(inner) as BoxError, Box::new(err("b")) as BoxError]);
        assert_eq!(errs.list(), vec!["a", "b"]);
    }

    #[test]
    fn test_serialize_report() {
        let mut errs = MultiError::new();
        errs.append(err("a"));
        errs.append_critical(err("b"));

        let json = serde_json::to_value(&errs).unwrap();
        assert_eq!(json, serde_json::json!({ "critical": "b", "errors": ["a", "b"] }));

        let report: ErrorReport = serde_json::from_value(json).unwrap();
        assert_eq!(report, errs.report());

        let empty = serde_json::to_string(&MultiError::new()).unwrap();
        assert_eq!(empty, "{}");
    }
}
