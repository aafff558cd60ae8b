//! The connection actor: owns the split WebSocket stream and drives the
//! SSAP request/subscription/pairing protocol from a single task.
//!
//! Unlike a long-lived streaming client that reconnects and retries with
//! backoff, a TV connection is a single attempt: if `connect()` fails, or
//! the socket drops mid-session, the caller decides whether to retry.

use std::sync::Arc;

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
};
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream,
    tungstenite::{self, Message, client::IntoClientRequest},
};
use tracing::{debug, error, warn};

use super::{
    command::ActorCommand,
    pairing::PairingStatus,
    protocol::{self, IncomingEnvelope},
    request_handler::RequestHandler,
    subscriptions::{SubscriptionEntry, SubscriptionRegistry},
};
use crate::{
    error::{Error, Result},
    model::{ClientKey, ConnectionState, Endpoint},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A pairing request parked between its `PROMPTED` and `REGISTERED` stages.
struct PendingRegister {
    id: String,
    status: mpsc::Sender<Result<PairingStatus>>,
}

/// The actor. Lives on its own task for the life of a connection; talks to
/// the outside world only through [`ActorCommand`]s and the channels it
/// hands back for subscription events and pairing status.
pub struct Connection {
    cmd_receiver: mpsc::Receiver<ActorCommand>,
    ws_writer: SplitSink<WsStream, Message>,
    ws_reader: SplitStream<WsStream>,
    request_handler: RequestHandler,
    subscriptions: SubscriptionRegistry,
    next_request_id: u64,
    state: ConnectionState,
    client_key: Option<ClientKey>,
    pending_register: Option<PendingRegister>,
}

impl Connection {
    /// Opens a single WebSocket connection to `endpoint`. `tls_config`, when
    /// given, replaces the default root-of-trust verification — used for
    /// TOFU against the TV's self-signed certificate (see [`crate::tls`]).
    pub async fn connect(
        endpoint: &Endpoint,
        tls_config: Option<Arc<rustls::ClientConfig>>,
        cmd_receiver: mpsc::Receiver<ActorCommand>,
    ) -> Result<Self> {
        let url = endpoint
            .url()
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let request = url
            .as_str()
            .into_client_request()
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let connector = tls_config.map(Connector::Rustls);
        debug!("connecting to {url}");
        let (ws_stream, _response) =
            tokio_tungstenite::connect_async_tls_with_config(request, None, false, connector)
                .await?;

        let (ws_writer, ws_reader) = ws_stream.split();

        Ok(Self {
            cmd_receiver,
            ws_writer,
            ws_reader,
            request_handler: RequestHandler::new(),
            subscriptions: SubscriptionRegistry::new(),
            next_request_id: 1,
            state: ConnectionState::Open { registered: false },
            client_key: None,
            pending_register: None,
        })
    }

    fn next_id(&mut self) -> String {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id.to_string()
    }

    /// Runs the actor's event loop until the command channel closes, the
    /// socket closes, or an unrecoverable error occurs.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_receiver.recv() => {
                    match cmd {
                        Some(ActorCommand::Close { respond_to }) => {
                            self.teardown("client requested close").await;
                            let _ = respond_to.send(());
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                        None => {
                            self.teardown("all handles dropped").await;
                            break;
                        }
                    }
                }

                message = self.ws_reader.next() => {
                    match message {
                        Some(message) => {
                            if let Err(reason) = self.handle_ws_message(message).await {
                                self.teardown(&reason).await;
                                break;
                            }
                        }
                        None => {
                            self.teardown("server closed connection").await;
                            break;
                        }
                    }
                }
            }
        }
        debug!("connection actor exited");
    }

    /// Order of operations on the way out is unspecified beyond: every
    /// waiter gets a final answer before the socket closes.
    async fn teardown(&mut self, reason: &str) {
        self.state = ConnectionState::Closed;
        self.request_handler.cancel_all();
        self.subscriptions.close_all(reason);
        if let Some(pending) = self.pending_register.take() {
            let _ = pending
                .status
                .send(Err(Error::ConnectionClosed(reason.to_string())))
                .await;
        }
        let _ = self.ws_writer.close().await;
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        self.ws_writer
            .send(Message::Text(text))
            .await
            .map_err(Error::from)
    }

    async fn handle_command(&mut self, command: ActorCommand) {
        match command {
            ActorCommand::SendRequest {
                uri,
                payload,
                id_tx,
                respond_to,
            } => self.handle_send_request(uri, payload, id_tx, respond_to).await,

            ActorCommand::CancelRequest { id } => {
                if self.request_handler.remove(&id).is_some() {
                    debug!("cancelled pending request {id} on caller timeout");
                }
            }

            ActorCommand::Subscribe {
                command_name,
                uri,
                payload,
                subscription_id,
                response_validator,
                return_transform,
                events,
                respond_to,
            } => {
                let id = subscription_id.to_string();
                let msg = protocol::build_subscribe(&id, &uri, &payload);
                self.subscriptions.insert(
                    subscription_id,
                    SubscriptionEntry {
                        command_name,
                        uri,
                        response_validator,
                        return_transform,
                        sender: events,
                    },
                );
                let result = self.send_text(msg).await;
                if result.is_err() {
                    self.subscriptions.remove(&subscription_id);
                }
                let _ = respond_to.send(result);
            }

            ActorCommand::Unsubscribe {
                command_name,
                subscription_id,
                respond_to,
            } => {
                let uri = self
                    .subscriptions
                    .remove(&subscription_id)
                    .map(|entry| entry.uri)
                    .unwrap_or_default();
                debug!("unsubscribing {command_name} ({subscription_id})");
                let msg = protocol::build_unsubscribe(&subscription_id.to_string(), &uri);
                let _ = respond_to.send(self.send_text(msg).await);
            }

            ActorCommand::Register {
                manifest,
                client_key,
                status,
            } => self.handle_register(manifest, client_key, status).await,

            ActorCommand::Close { .. } => unreachable!("Close is handled in run()"),
        }
    }

    async fn handle_send_request(
        &mut self,
        uri: String,
        payload: serde_json::Value,
        id_tx: oneshot::Sender<String>,
        respond_to: oneshot::Sender<Result<serde_json::Value>>,
    ) {
        if !self.state.is_registered() {
            let _ = respond_to.send(Err(Error::NotConnected));
            return;
        }

        let id = self.next_id();
        let msg = protocol::build_request(&id, &uri, &payload);
        let (tx, rx) = oneshot::channel();
        self.request_handler.register(id.clone(), tx);
        let _ = id_tx.send(id);

        if let Err(e) = self.send_text(msg).await {
            error!("failed to send request to {uri}: {e}");
            let _ = respond_to.send(Err(e));
            return;
        }

        tokio::spawn(async move {
            let result = match rx.await {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(message)) => Err(Error::CommandFailed {
                    code: None,
                    message,
                }),
                Err(_) => Err(Error::ConnectionClosed("request cancelled".to_string())),
            };
            let _ = respond_to.send(result);
        });
    }

    /// `register` is a two-stage exchange: the first `register()` call
    /// parks a waiter and writes the envelope; a `prompt` reply re-parks the
    /// *same id* and reports `Prompted`, then a `registered` reply on that
    /// id reports `Registered` and ends the exchange. Passing a stored
    /// `client_key` lets the TV skip straight to `registered`.
    async fn handle_register(
        &mut self,
        manifest: serde_json::Value,
        client_key: Option<ClientKey>,
        status: mpsc::Sender<Result<PairingStatus>>,
    ) {
        let id = self.next_id();
        let msg = protocol::build_register(&id, &manifest, client_key.as_deref());
        self.pending_register = Some(PendingRegister {
            id: id.clone(),
            status: status.clone(),
        });

        if let Err(e) = self.send_text(msg).await {
            self.pending_register = None;
            let _ = status.send(Err(e)).await;
        }
    }

    async fn handle_ws_message(
        &mut self,
        message: std::result::Result<Message, tungstenite::Error>,
    ) -> std::result::Result<(), String> {
        match message {
            Ok(Message::Text(text)) => {
                self.handle_text_message(&text).await;
                Ok(())
            }

            Ok(Message::Ping(data)) => {
                if let Err(e) = self.ws_writer.send(Message::Pong(data)).await {
                    return Err(format!("failed to send pong: {e}"));
                }
                Ok(())
            }

            Ok(Message::Pong(_)) => Ok(()),

            Ok(Message::Close(frame)) => {
                debug!("received close frame: {frame:?}");
                Err("server sent close frame".to_string())
            }

            Ok(Message::Binary(data)) => {
                warn!("received unexpected binary message ({} bytes)", data.len());
                Ok(())
            }

            Ok(Message::Frame(_)) => Ok(()),

            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Err("connection closed".to_string())
            }

            Err(e) => Err(format!("WebSocket error: {e}")),
        }
    }

    async fn handle_text_message(&mut self, text: &str) {
        let envelope = match protocol::parse_incoming(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("failed to parse incoming frame: {e}");
                return;
            }
        };

        if self.route_pairing(&envelope).await {
            return;
        }

        let Some(id) = envelope.id.clone() else {
            warn!("incoming frame of type {} had no id", envelope.msg_type);
            return;
        };

        if let Ok(subscription_id) = uuid::Uuid::parse_str(&id)
            && self.subscriptions.contains(&subscription_id)
        {
            if let Some(error) = &envelope.error {
                self.subscriptions
                    .dispatch(&subscription_id, serde_json::json!({"_error": error}));
            } else {
                self.subscriptions.dispatch(&subscription_id, envelope.payload);
            }
            return;
        }

        match envelope.error {
            Some(message) => {
                if !self.request_handler.handle_error(&id, message) {
                    warn!("no handler for error response id {id}");
                }
            }
            None => {
                if !self.request_handler.handle_response(&id, envelope.payload) {
                    warn!("no handler for response id {id}");
                }
            }
        }
    }

    /// Returns `true` if this envelope belonged to the in-flight pairing
    /// exchange and has been fully handled.
    async fn route_pairing(&mut self, envelope: &IncomingEnvelope) -> bool {
        let Some(pending) = &self.pending_register else {
            return false;
        };
        if envelope.id.as_deref() != Some(pending.id.as_str()) {
            return false;
        }

        match envelope.msg_type.as_str() {
            "response" if envelope.payload.get("pairingType").is_some() => {
                let _ = pending.status.send(Ok(PairingStatus::Prompted)).await;
                self.state = ConnectionState::Prompted;
                true
            }
            "registered" => {
                let client_key = envelope
                    .payload
                    .get("client-key")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                self.client_key = Some(client_key.clone());
                self.state = ConnectionState::Open { registered: true };
                let status = self.pending_register.take().unwrap().status;
                let _ = status.send(Ok(PairingStatus::Registered(client_key))).await;
                true
            }
            "error" => {
                let pending = self.pending_register.take().unwrap();
                let message = envelope
                    .error
                    .clone()
                    .unwrap_or_else(|| "registration failed".to_string());
                let _ = pending
                    .status
                    .send(Err(Error::RegistrationFailed(message)))
                    .await;
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state)
            .field("next_request_id", &self.next_request_id)
            .field("pending_requests", &self.request_handler.pending_count())
            .field("subscriptions", &self.subscriptions.len())
            .field("registered", &self.client_key.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::protocol::parse_incoming;

    #[test]
    fn parse_registered_envelope_carries_client_key() {
        let text = r#"{"id":"1","type":"registered","payload":{"client-key":"abc123"}}"#;
        let envelope = parse_incoming(text).unwrap();
        assert_eq!(envelope.msg_type, "registered");
        assert_eq!(envelope.payload["client-key"], "abc123");
    }

    #[test]
    fn parse_prompt_envelope_carries_pairing_type() {
        let text = r#"{"id":"1","type":"response","payload":{"pairingType":"PROMPT"}}"#;
        let envelope = parse_incoming(text).unwrap();
        assert_eq!(envelope.payload["pairingType"], "PROMPT");
    }
}
