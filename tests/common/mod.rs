//! Shared harness for driving the real connection actor against a scripted
//! local WebSocket server, instead of a live TV.
//!
//! Mirrors the shape of `rommeld-leeson/tests/common/mod.rs` (one shared
//! helper module under `tests/common/`, pulled in per test file with
//! `mod common;`) — the difference is this harness stands up its own
//! server rather than pointing at a live remote endpoint, since there is no
//! always-on sandbox TV to connect to.

use std::future::Future;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value as JsonValue;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

use webos_tv_rs::model::Endpoint;

pub type MockStream = WebSocketStream<TcpStream>;

/// Binds an ephemeral local port, accepts exactly one connection, and hands
/// it to `handler`. Returns the [`Endpoint`] a client should connect to and
/// a [`tokio::task::JoinHandle`] the test should await to surface any
/// assertion failure raised inside the handler.
pub async fn spawn_mock_tv<F, Fut>(handler: F) -> (Endpoint, tokio::task::JoinHandle<()>)
where
    F: FnOnce(MockStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock TV listener");
    let addr = listener.local_addr().expect("local addr");

    let task = tokio::spawn(async move {
        let (stream, _peer) = listener.accept().await.expect("accept mock TV connection");
        let ws = accept_async(stream).await.expect("complete mock TV handshake");
        handler(ws).await;
    });

    (Endpoint::new(addr.ip().to_string(), false).with_port(addr.port()), task)
}

/// Reads the next text frame and parses it as an SSAP envelope, skipping
/// ping/pong keepalive frames transparently.
pub async fn recv_envelope(ws: &mut MockStream) -> JsonValue {
    loop {
        match ws.next().await.expect("stream ended early").expect("websocket error") {
            Message::Text(text) => return serde_json::from_str(&text).expect("valid SSAP JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected non-text frame from client: {other:?}"),
        }
    }
}

pub async fn send_envelope(ws: &mut MockStream, envelope: JsonValue) {
    ws.send(Message::Text(envelope.to_string()))
        .await
        .expect("send mock TV reply");
}

/// Drives the two-stage pairing handshake against whatever `register`
/// envelope arrives next, replying with `PROMPTED` then `REGISTERED` on the
/// same id the way a real TV does.
pub async fn handle_pairing(ws: &mut MockStream, client_key: &str) {
    let envelope = recv_envelope(ws).await;
    assert_eq!(envelope["type"], "register");
    let id = envelope["id"].as_str().expect("register id").to_string();

    send_envelope(
        ws,
        serde_json::json!({"id": id, "type": "response", "payload": {"pairingType": "PROMPT"}}),
    )
    .await;
    send_envelope(
        ws,
        serde_json::json!({"id": id, "type": "registered", "payload": {"client-key": client_key}}),
    )
    .await;
}
