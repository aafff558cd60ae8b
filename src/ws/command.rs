//! Commands accepted by the connection actor's `run()` loop.
//!
//! Every public operation on [`ConnectionHandle`](crate::ws::ConnectionHandle)
//! is a thin wrapper that builds one of these and sends it down the actor's
//! command channel, then awaits the paired oneshot for the result.

use serde_json::Value as JsonValue;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::Result;
use crate::ws::subscriptions::SubscriptionEvent;

pub enum ActorCommand {
    SendRequest {
        uri: String,
        payload: JsonValue,
        /// Reports the `RequestId` the actor assigned, before the response
        /// arrives — lets the caller cancel this exact pending entry if its
        /// deadline elapses first.
        id_tx: oneshot::Sender<String>,
        respond_to: oneshot::Sender<Result<JsonValue>>,
    },
    /// Drops a pending request's entry without waiting for a reply.
    /// Idempotent: a no-op if the request already resolved.
    CancelRequest {
        id: String,
    },
    Subscribe {
        command_name: String,
        uri: String,
        payload: JsonValue,
        subscription_id: Uuid,
        response_validator: fn(&JsonValue) -> Result<()>,
        return_transform: Option<fn(JsonValue) -> JsonValue>,
        events: tokio::sync::mpsc::Sender<SubscriptionEvent>,
        respond_to: oneshot::Sender<Result<()>>,
    },
    Unsubscribe {
        command_name: String,
        subscription_id: Uuid,
        respond_to: oneshot::Sender<Result<()>>,
    },
    Register {
        manifest: JsonValue,
        client_key: Option<String>,
        status: tokio::sync::mpsc::Sender<Result<crate::ws::pairing::PairingStatus>>,
    },
    Close {
        respond_to: oneshot::Sender<()>,
    },
}

impl std::fmt::Debug for ActorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorCommand::SendRequest { uri, .. } => {
                f.debug_struct("SendRequest").field("uri", uri).finish()
            }
            ActorCommand::CancelRequest { id } => {
                f.debug_struct("CancelRequest").field("id", id).finish()
            }
            ActorCommand::Subscribe {
                command_name,
                uri,
                subscription_id,
                ..
            } => f
                .debug_struct("Subscribe")
                .field("command_name", command_name)
                .field("uri", uri)
                .field("subscription_id", subscription_id)
                .finish(),
            ActorCommand::Unsubscribe {
                command_name,
                subscription_id,
                ..
            } => f
                .debug_struct("Unsubscribe")
                .field("command_name", command_name)
                .field("subscription_id", subscription_id)
                .finish(),
            ActorCommand::Register { .. } => f.debug_struct("Register").finish(),
            ActorCommand::Close { .. } => f.debug_struct("Close").finish(),
        }
    }
}
