//! Realtime notifications for connected CRM clients.
//!
//! Events go out on an in-process broadcast bus. Publishing never blocks and
//! never fails: an event nobody is subscribed to is dropped.

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

/// Event name sent after a call outcome is logged from the reminder list.
pub const SCHEDULED_CALL_UPDATED: &str = "scheduled_call_updated";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeEvent {
    pub name: String,
    pub payload: Value,
}

impl RealtimeEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn scheduled_call_updated(contact: &str, status: &str) -> Self {
        Self::new(
            SCHEDULED_CALL_UPDATED,
            json!({ "contact": contact, "status": status }),
        )
    }
}

/// Sink for realtime events.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: RealtimeEvent);
}

pub type EventSender = broadcast::Sender<RealtimeEvent>;
pub type EventReceiver = broadcast::Receiver<RealtimeEvent>;

/// Create a new event bus (broadcast channel).
pub fn event_bus(capacity: usize) -> (EventSender, EventReceiver) {
    broadcast::channel(capacity)
}

/// Publisher writing to a broadcast channel.
#[derive(Clone)]
pub struct BroadcastPublisher {
    sender: EventSender,
}

impl BroadcastPublisher {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: RealtimeEvent) {
        let name = event.name.clone();
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(event = %name, receivers, "Published event"),
            Err(_) => tracing::debug!(event = %name, "No subscribers, event dropped"),
        }
    }
}
