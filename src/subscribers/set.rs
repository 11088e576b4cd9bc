//! # SubscriberSet: fan-out over multiple subscribers
//!
//! [`SubscriberSet`] is itself a [`Subscribe`] and forwards every event to
//! each member in registration order.
//!
//! ## What it guarantees
//! - Per-subscriber delivery in publication order.
//! - Panics inside a subscriber are caught (isolation): the remaining members
//!   still receive the event and additionally get a
//!   [`SubscriberPanicked`](crate::EventKind::SubscriberPanicked) event.
//!
//! ## Diagram
//! ```text
//!    on_event(&Event)
//!        │
//!        ├────────────────► S1.on_event()
//!        ├────────────────► S2.on_event()   (panic caught → SubscriberPanicked to others)
//!        └────────────────► SN.on_event()
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::events::Event;

use super::Subscribe;

/// Composite fan-out over a fixed list of subscribers.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a new set.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Adds a subscriber to the end of the set.
    #[must_use]
    pub fn with(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subs.push(sub);
        self
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    fn deliver(&self, event: &Event, skip: Option<usize>) {
        for (idx, sub) in self.subs.iter().enumerate() {
            if Some(idx) == skip {
                continue;
            }
            let res = catch_unwind(AssertUnwindSafe(|| sub.on_event(event)));
            if let Err(panic) = res {
                let info = panic_message(panic.as_ref());
                tracing::warn!(subscriber = sub.name(), info = %info, "subscriber panicked");
                // Panic reports are delivered once, never nested.
                if !event.is_subscriber_panic() {
                    self.deliver(&Event::subscriber_panicked(sub.name(), info), Some(idx));
                }
            }
        }
    }
}

impl Subscribe for SubscriberSet {
    fn on_event(&self, event: &Event) {
        self.deliver(event, None);
    }

    fn name(&self) -> &'static str {
        "SubscriberSet"
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    impl Subscribe for Recorder {
        fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.kind);
        }
    }

    struct Panicker;

    impl Subscribe for Panicker {
        fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    #[test]
    fn test_fans_out_in_order() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        let set = SubscriberSet::new(vec![a.clone() as Arc<dyn Subscribe>, b.clone()]);
        assert_eq!(set.len(), 2);

        set.on_event(&Event::new(EventKind::AttemptStarting));
        set.on_event(&Event::new(EventKind::Connected));

        let want = vec![EventKind::AttemptStarting, EventKind::Connected];
        assert_eq!(*a.0.lock().unwrap(), want);
        assert_eq!(*b.0.lock().unwrap(), want);
    }

    #[test]
    fn test_panic_is_isolated_and_reported() {
        let rec = Arc::new(Recorder::default());
        let set = SubscriberSet::default()
            .with(Arc::new(Panicker))
            .with(rec.clone());

        set.on_event(&Event::new(EventKind::ConnectFailed));

        let got = rec.0.lock().unwrap().clone();
        assert_eq!(got, vec![EventKind::SubscriberPanicked, EventKind::ConnectFailed]);
    }

    #[test]
    fn test_empty_set_is_noop() {
        let set = SubscriberSet::default();
        assert!(set.is_empty());
        set.on_event(&Event::new(EventKind::Canceled));
    }
}
