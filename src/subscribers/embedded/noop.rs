//! # Noop: the default subscriber
//!
//! Used by campaigns built without a subscriber. [`noop`] hands out clones of
//! one process-wide instance.

use std::sync::{Arc, LazyLock};

use crate::events::Event;
use crate::subscribers::Subscribe;

static NOOP: LazyLock<Arc<dyn Subscribe>> = LazyLock::new(|| Arc::new(Noop));

/// Subscriber that discards every event.
#[derive(Default, Clone, Copy, Debug)]
pub struct Noop;

impl Subscribe for Noop {
    fn on_event(&self, _event: &Event) {}

    fn name(&self) -> &'static str {
        "Noop"
    }
}

/// Returns the shared no-op subscriber.
pub fn noop() -> Arc<dyn Subscribe> {
    Arc::clone(&NOOP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_noop_is_a_singleton() {
        let a = noop();
        let b = noop();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "Noop");
        a.on_event(&Event::new(EventKind::ConnectFailed));
    }
}
