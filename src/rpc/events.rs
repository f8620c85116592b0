// DevPanel - rpc/events.rs
//
// Push-notification channel between the transport and the session.
//
// Architecture:
//   - The transport owns an `EventPublisher` and forwards each push
//     notification it receives from the hub bus.
//   - The session (or its host) holds the matching `EventSubscription` and
//     drains it on its own cadence; a named per-drain budget keeps a burst
//     of events from stalling the host's render loop.
//   - A shared `Arc<AtomicBool>` cancel flag makes the subscription a
//     cancellable handle: once cancelled, publishing stops and queued
//     events are discarded.
//
// Delivery order is the channel order; the session never reorders or
// deduplicates events.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use crate::util::constants::{EVENT_DOCS_OUTPUT, EVENT_FRONTEND_RESTART, EVENT_TESTS_OUTPUT};

// =============================================================================
// Events
// =============================================================================

/// Push notifications consumed by the developer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeveloperEvent {
    /// The backend asks the dashboard to reload itself.
    FrontendRestart,

    /// Incremental unit-test / coverage output lines.
    TestsOutput { messages: Vec<String> },

    /// Incremental documentation-generation output lines.
    DocsOutput { messages: Vec<String> },
}

/// Map a wire event (name + params) to a `DeveloperEvent`.
///
/// Unknown event names return `None` and are logged at debug level; the
/// hub bus carries many event families this session does not consume.
pub fn parse_event(name: &str, params: &Value) -> Option<DeveloperEvent> {
    match name {
        EVENT_FRONTEND_RESTART => Some(DeveloperEvent::FrontendRestart),
        EVENT_TESTS_OUTPUT => Some(DeveloperEvent::TestsOutput {
            messages: messages_param(params),
        }),
        EVENT_DOCS_OUTPUT => Some(DeveloperEvent::DocsOutput {
            messages: messages_param(params),
        }),
        other => {
            tracing::debug!(event = other, "Ignoring unknown push event");
            None
        }
    }
}

/// Extract the `messages` array from event params, tolerating absent or
/// non-string entries (non-strings are dropped, order preserved).
fn messages_param(params: &Value) -> Vec<String> {
    params
        .get("messages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Channel
// =============================================================================

/// Transport-side handle: forwards push notifications into the channel.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<DeveloperEvent>,
    cancelled: Arc<AtomicBool>,
}

impl EventPublisher {
    /// Publish an event. Returns false when the subscription was cancelled
    /// or dropped, so the transport can unsubscribe from the bus.
    pub fn publish(&self, event: DeveloperEvent) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        self.tx.send(event).is_ok()
    }
}

/// Session-side handle: a cancellable subscription over incoming events.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::Receiver<DeveloperEvent>,
    cancelled: Arc<AtomicBool>,
    drain_budget: usize,
}

impl EventSubscription {
    /// Drain queued events without blocking, up to the per-drain budget.
    /// Remaining events stay queued for the next drain.
    pub fn try_drain(&self) -> Vec<DeveloperEvent> {
        if self.cancelled.load(Ordering::SeqCst) {
            // Cancelled subscriptions discard anything still queued.
            while self.rx.try_recv().is_ok() {}
            return Vec::new();
        }

        let mut events = Vec::new();
        while events.len() < self.drain_budget {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        events
    }

    /// Cancel the subscription: publishers stop delivering and queued
    /// events are discarded on the next drain.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Create a publisher/subscription pair with the given per-drain budget.
pub fn event_channel(drain_budget: usize) -> (EventPublisher, EventSubscription) {
    let (tx, rx) = mpsc::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    (
        EventPublisher {
            tx,
            cancelled: Arc::clone(&cancelled),
        },
        EventSubscription {
            rx,
            cancelled,
            drain_budget,
        },
    )
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Known wire events map to their variants; params carry the messages.
    #[test]
    fn test_parse_known_events() {
        assert_eq!(
            parse_event("developer.frontend.restart", &json!({})),
            Some(DeveloperEvent::FrontendRestart)
        );
        assert_eq!(
            parse_event("developer.tests.output", &json!({"messages": ["a", "b"]})),
            Some(DeveloperEvent::TestsOutput {
                messages: vec!["a".to_string(), "b".to_string()]
            })
        );
        assert_eq!(
            parse_event("developer.docs.output", &json!({"messages": []})),
            Some(DeveloperEvent::DocsOutput { messages: vec![] })
        );
    }

    /// Unknown event names are ignored.
    #[test]
    fn test_parse_unknown_event_returns_none() {
        assert_eq!(parse_event("network.wifi.updated", &json!({})), None);
    }

    /// Absent or malformed messages params degrade to an empty list.
    #[test]
    fn test_parse_tolerates_malformed_params() {
        assert_eq!(
            parse_event("developer.tests.output", &json!({})),
            Some(DeveloperEvent::TestsOutput { messages: vec![] })
        );
        assert_eq!(
            parse_event("developer.tests.output", &json!({"messages": ["ok", 42]})),
            Some(DeveloperEvent::TestsOutput {
                messages: vec!["ok".to_string()]
            })
        );
    }

    /// Events drain in delivery order.
    #[test]
    fn test_drain_preserves_delivery_order() {
        let (publisher, subscription) = event_channel(10);
        publisher.publish(DeveloperEvent::TestsOutput {
            messages: vec!["1".to_string()],
        });
        publisher.publish(DeveloperEvent::TestsOutput {
            messages: vec!["2".to_string()],
        });
        publisher.publish(DeveloperEvent::FrontendRestart);

        let events = subscription.try_drain();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], DeveloperEvent::FrontendRestart);
    }

    /// The per-drain budget leaves the excess queued for the next drain.
    #[test]
    fn test_drain_budget_is_respected() {
        let (publisher, subscription) = event_channel(2);
        for _ in 0..5 {
            publisher.publish(DeveloperEvent::FrontendRestart);
        }
        assert_eq!(subscription.try_drain().len(), 2);
        assert_eq!(subscription.try_drain().len(), 2);
        assert_eq!(subscription.try_drain().len(), 1);
        assert!(subscription.try_drain().is_empty());
    }

    /// Cancelling stops delivery and discards queued events.
    #[test]
    fn test_cancel_stops_delivery() {
        let (publisher, subscription) = event_channel(10);
        publisher.publish(DeveloperEvent::FrontendRestart);
        subscription.cancel();

        assert!(subscription.is_cancelled());
        assert!(subscription.try_drain().is_empty());
        assert!(!publisher.publish(DeveloperEvent::FrontendRestart));
    }
}
