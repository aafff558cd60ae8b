//! Pending-request registry: maps outbound envelope ids to a single-shot
//! response channel.
//!
//! A request is registered when its envelope is written to the socket and
//! removed the moment a matching inbound envelope arrives (or the
//! connection tears down). Exactly one consumer ever receives the response.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// What a pending request is ultimately resolved with: the response
/// payload, or the message from a `type: "error"` envelope.
pub type PendingOutcome = std::result::Result<JsonValue, String>;

#[derive(Debug, Default)]
pub struct RequestHandler {
    pending: HashMap<String, oneshot::Sender<PendingOutcome>>,
}

impl RequestHandler {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Registers a pending request under `id`. Re-parking a waiter on an id
    /// already present overwrites the old sender — the registration pairing
    /// flow relies on this to park a second waiter on the same id between
    /// `PROMPTED` and `REGISTERED`.
    pub fn register(&mut self, id: String, sender: oneshot::Sender<PendingOutcome>) {
        debug!("registering pending request {id}");
        self.pending.insert(id, sender);
    }

    /// Routes an inbound payload to its pending request, if any. Returns
    /// `true` if a waiter was found.
    pub fn handle_response(&mut self, id: &str, response: JsonValue) -> bool {
        if let Some(sender) = self.pending.remove(id) {
            let _ = sender.send(Ok(response));
            true
        } else {
            warn!("no pending request for id {id}");
            false
        }
    }

    /// Routes a `type: "error"` envelope to its pending request, if any.
    pub fn handle_error(&mut self, id: &str, message: String) -> bool {
        if let Some(sender) = self.pending.remove(id) {
            let _ = sender.send(Err(message));
            true
        } else {
            warn!("no pending request for error id {id}");
            false
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<oneshot::Sender<PendingOutcome>> {
        self.pending.remove(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops every pending sender, causing its receiver to observe a
    /// cancellation. Called on connection teardown.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            debug!("cancelling {} pending request(s)", self.pending.len());
            self.pending.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_and_handle_response() {
        let mut handler = RequestHandler::new();
        let (tx, rx) = oneshot::channel();

        handler.register("1".to_string(), tx);
        assert_eq!(handler.pending_count(), 1);

        let response = serde_json::json!({"returnValue": true});
        assert!(handler.handle_response("1", response.clone()));
        assert_eq!(handler.pending_count(), 0);
        assert_eq!(rx.await.unwrap().unwrap(), response);
    }

    #[tokio::test]
    async fn handle_response_unknown_id() {
        let mut handler = RequestHandler::new();
        assert!(!handler.handle_response("999", serde_json::json!({})));
    }

    #[tokio::test]
    async fn handle_error_routes_message_to_waiter() {
        let mut handler = RequestHandler::new();
        let (tx, rx) = oneshot::channel();
        handler.register("1".to_string(), tx);

        assert!(handler.handle_error("1", "Invalid parameters".to_string()));
        assert_eq!(rx.await.unwrap().unwrap_err(), "Invalid parameters");
    }

    #[tokio::test]
    async fn re_registering_same_id_overwrites_waiter() {
        let mut handler = RequestHandler::new();
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();

        handler.register("1".to_string(), tx1);
        handler.register("1".to_string(), tx2);
        assert_eq!(handler.pending_count(), 1);

        let response = serde_json::json!({"pairingType": "PROMPT"});
        assert!(handler.handle_response("1", response.clone()));
        assert!(rx1.await.is_err());
        assert_eq!(rx2.await.unwrap().unwrap(), response);
    }

    #[tokio::test]
    async fn cancel_all_fails_every_waiter() {
        let mut handler = RequestHandler::new();
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        handler.register("1".to_string(), tx1);
        handler.register("2".to_string(), tx2);

        handler.cancel_all();

        assert_eq!(handler.pending_count(), 0);
        assert!(rx1.await.is_err());
        assert!(rx2.await.is_err());
    }
}
