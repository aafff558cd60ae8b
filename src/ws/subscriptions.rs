//! Connection-global subscription registry.
//!
//! Every live subscription is keyed by the UUID that doubles as its
//! envelope id (see [`crate::model`]). The registry only knows how to
//! validate, transform, and forward inbound payloads to a subscription's
//! channel — the per-control-object "already subscribed for this command
//! name" bookkeeping lives in [`crate::controls`], closer to the caller.

use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use serde_json::Value as JsonValue;

/// One event delivered to a subscription's callback task.
#[derive(Debug, Clone)]
pub enum SubscriptionEvent {
    /// Validator accepted the payload; already run through `return_transform`.
    Update(JsonValue),
    /// Validator rejected the payload.
    Failed(String),
    /// The connection tore down; delivered exactly once, then the
    /// subscription is removed.
    Closed(String),
}

pub struct SubscriptionEntry {
    pub command_name: String,
    pub uri: String,
    pub response_validator: fn(&JsonValue) -> crate::error::Result<()>,
    pub return_transform: Option<fn(JsonValue) -> JsonValue>,
    pub sender: mpsc::Sender<SubscriptionEvent>,
}

#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<Uuid, SubscriptionEntry>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Uuid, entry: SubscriptionEntry) {
        self.subscriptions.insert(id, entry);
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<SubscriptionEntry> {
        self.subscriptions.remove(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.subscriptions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Runs an inbound payload through the subscription's validator and
    /// transform, then forwards the result. A full channel (a wedged
    /// callback task) drops the event rather than blocking the reader.
    pub fn dispatch(&self, id: &Uuid, payload: JsonValue) {
        let Some(entry) = self.subscriptions.get(id) else {
            return;
        };
        let event = match (entry.response_validator)(&payload) {
            Ok(()) => {
                let value = match entry.return_transform {
                    Some(transform) => transform(payload),
                    None => payload,
                };
                SubscriptionEvent::Update(value)
            }
            Err(e) => SubscriptionEvent::Failed(e.to_string()),
        };
        if entry.sender.try_send(event).is_err() {
            debug!(
                "dropped event for subscription {id} ({}): callback task lagging or gone",
                entry.command_name
            );
        }
    }

    /// Invalidates every live subscription with a single disconnect signal
    /// and empties the registry. The order subscriptions observe this in
    /// is unspecified.
    pub fn close_all(&mut self, reason: &str) {
        for (_, entry) in self.subscriptions.drain() {
            let _ = entry
                .sender
                .try_send(SubscriptionEvent::Closed(reason.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_ok(_: &JsonValue) -> crate::error::Result<()> {
        Ok(())
    }

    #[tokio::test]
    async fn dispatch_routes_to_matching_subscription() {
        let mut registry = SubscriptionRegistry::new();
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::channel(8);
        registry.insert(
            id,
            SubscriptionEntry {
                command_name: "getVolume".to_string(),
                uri: "ssap://audio/getVolume".to_string(),
                response_validator: always_ok,
                return_transform: None,
                sender: tx,
            },
        );

        registry.dispatch(&id, serde_json::json!({"volume": 10}));

        match rx.recv().await.unwrap() {
            SubscriptionEvent::Update(v) => assert_eq!(v["volume"], 10),
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_on_unknown_id_is_noop() {
        let registry = SubscriptionRegistry::new();
        registry.dispatch(&Uuid::new_v4(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn close_all_signals_every_subscription_once() {
        let mut registry = SubscriptionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        registry.insert(
            Uuid::new_v4(),
            SubscriptionEntry {
                command_name: "getVolume".to_string(),
                uri: "ssap://audio/getVolume".to_string(),
                response_validator: always_ok,
                return_transform: None,
                sender: tx1,
            },
        );
        registry.insert(
            Uuid::new_v4(),
            SubscriptionEntry {
                command_name: "getForegroundAppInfo".to_string(),
                uri: "ssap://com.webos.applicationManager/getForegroundAppInfo".to_string(),
                response_validator: always_ok,
                return_transform: None,
                sender: tx2,
            },
        );

        registry.close_all("connection closed");

        assert!(registry.is_empty());
        assert!(matches!(
            rx1.recv().await.unwrap(),
            SubscriptionEvent::Closed(_)
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            SubscriptionEvent::Closed(_)
        ));
    }
}
