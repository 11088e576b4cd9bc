//! # Built-in subscribers
//!
//! - [`LogWriter`]: forwards events to `tracing` as structured records.
//! - [`Noop`]: discards events; [`noop`] returns the shared default instance.

mod log;
mod noop;

pub use log::LogWriter;
pub use noop::{Noop, noop};
