//! Owner and cloneable handle for a connection actor.

use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use uuid::Uuid;

use super::{
    command::ActorCommand,
    pairing::PairingStream,
    session::Connection,
    subscriptions::SubscriptionEvent,
};
use crate::{
    error::{Error, Result},
    model::Endpoint,
};

const COMMAND_BUFFER: usize = 32;
const SUBSCRIPTION_EVENT_BUFFER: usize = 32;

fn actor_gone() -> Error {
    Error::ActorUnavailable("connection actor is no longer running".to_string())
}

/// Owns the actor task's lifetime. Dropping this without calling
/// [`close`](Self::close) leaves the actor running until its command
/// channel is dropped, at which point it tears itself down.
pub struct ConnectedSession {
    actor_handle: JoinHandle<()>,
    handle: ConnectionHandle,
}

impl ConnectedSession {
    /// Opens a connection and spawns its actor task. `request_timeout` is
    /// the default deadline [`ConnectionHandle::send_request`] applies to
    /// every call issued through handles cloned from this session.
    pub async fn connect(
        endpoint: &Endpoint,
        tls_config: Option<std::sync::Arc<rustls::ClientConfig>>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let (cmd_sender, cmd_receiver) = mpsc::channel(COMMAND_BUFFER);
        let actor = Connection::connect(endpoint, tls_config, cmd_receiver).await?;
        let actor_handle = tokio::spawn(actor.run());

        Ok(Self {
            actor_handle,
            handle: ConnectionHandle {
                cmd_sender,
                default_timeout: request_timeout,
            },
        })
    }

    /// A cloneable handle for issuing commands against this connection.
    pub fn handle(&self) -> ConnectionHandle {
        self.handle.clone()
    }

    /// Requests a clean shutdown and waits for the actor task to exit.
    pub async fn close(self) -> Result<()> {
        let (respond_to, rx) = oneshot::channel();
        let _ = self
            .handle
            .cmd_sender
            .send(ActorCommand::Close { respond_to })
            .await;
        let _ = rx.await;
        self.actor_handle
            .await
            .map_err(|e| Error::ActorUnavailable(format!("actor task panicked: {e}")))
    }
}

/// Cloneable handle for sending commands to a connection's actor task.
#[derive(Clone)]
pub struct ConnectionHandle {
    cmd_sender: mpsc::Sender<ActorCommand>,
    default_timeout: Duration,
}

impl ConnectionHandle {
    /// Sends a request and awaits its reply, bounded by this handle's
    /// default timeout. See [`Self::send_request_with_timeout`] to override
    /// the deadline for a single call.
    pub async fn send_request(&self, uri: &str, payload: JsonValue) -> Result<JsonValue> {
        self.send_request_with_timeout(uri, payload, self.default_timeout)
            .await
    }

    /// Sends a request and awaits its reply, bounded by `timeout`. On
    /// expiry the actor's pending entry for this request is dropped so a
    /// late reply (if it ever arrives) is silently discarded rather than
    /// routed anywhere.
    pub async fn send_request_with_timeout(
        &self,
        uri: &str,
        payload: JsonValue,
        timeout: Duration,
    ) -> Result<JsonValue> {
        let (id_tx, id_rx) = oneshot::channel();
        let (respond_to, rx) = oneshot::channel();
        self.cmd_sender
            .send(ActorCommand::SendRequest {
                uri: uri.to_string(),
                payload,
                id_tx,
                respond_to,
            })
            .await
            .map_err(|_| actor_gone())?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(result) => result.map_err(|_| actor_gone())?,
            Err(_elapsed) => {
                if let Ok(id) = id_rx.await {
                    let _ = self
                        .cmd_sender
                        .send(ActorCommand::CancelRequest { id })
                        .await;
                }
                Err(Error::Timeout)
            }
        }
    }

    /// Opens a subscription for `command_name` against `uri`. The returned
    /// receiver yields one [`SubscriptionEvent`] per inbound update; the
    /// caller is responsible for draining it (typically from a spawned
    /// task, so delivery stays serial per subscription).
    #[allow(clippy::too_many_arguments)]
    pub async fn subscribe(
        &self,
        command_name: &str,
        uri: &str,
        payload: JsonValue,
        subscription_id: Uuid,
        response_validator: fn(&JsonValue) -> Result<()>,
        return_transform: Option<fn(JsonValue) -> JsonValue>,
    ) -> Result<mpsc::Receiver<SubscriptionEvent>> {
        let (events, events_rx) = mpsc::channel(SUBSCRIPTION_EVENT_BUFFER);
        let (respond_to, rx) = oneshot::channel();
        self.cmd_sender
            .send(ActorCommand::Subscribe {
                command_name: command_name.to_string(),
                uri: uri.to_string(),
                payload,
                subscription_id,
                response_validator,
                return_transform,
                events,
                respond_to,
            })
            .await
            .map_err(|_| actor_gone())?;
        rx.await.map_err(|_| actor_gone())??;
        Ok(events_rx)
    }

    pub async fn unsubscribe(&self, command_name: &str, subscription_id: Uuid) -> Result<()> {
        let (respond_to, rx) = oneshot::channel();
        self.cmd_sender
            .send(ActorCommand::Unsubscribe {
                command_name: command_name.to_string(),
                subscription_id,
                respond_to,
            })
            .await
            .map_err(|_| actor_gone())?;
        rx.await.map_err(|_| actor_gone())?
    }

    /// Starts a pairing exchange and returns a stream of its status. Fire
    /// and forget — if the handle is dropped before the stream is polled,
    /// pairing still runs to completion on the actor side, it just has no
    /// observer.
    pub fn register(&self, manifest: JsonValue, client_key: Option<String>) -> PairingStream {
        let (status, status_rx) = mpsc::channel(4);
        let cmd_sender = self.cmd_sender.clone();
        tokio::spawn(async move {
            let _ = cmd_sender
                .send(ActorCommand::Register {
                    manifest,
                    client_key,
                    status,
                })
                .await;
        });
        PairingStream::new(status_rx)
    }
}
