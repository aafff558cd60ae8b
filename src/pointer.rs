//! The secondary pointer/input socket.
//!
//! `ssap://com.webos.service.networkinput/getPointerInputSocket` hands back
//! a second WebSocket URL for low-latency remote-button and pointer-motion
//! traffic. Unlike the main SSAP socket it does not speak JSON: every frame
//! is a handful of `key:value` lines terminated by a blank line. This
//! module is a thin, single-purpose collaborator — it does not know the
//! TV's button-name dictionary (that is external data per spec.md §1); it
//! only knows the framing.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

use crate::error::{Error, Result};

/// A connected secondary input socket. Holds the split stream's writer
/// half only — this channel is send-only from the client's perspective,
/// the TV does not reply to button/move frames.
pub struct PointerInputSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PointerInputSocket {
    /// Connects to the URL returned by `getPointerInputSocket`.
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = tokio_tungstenite::connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Sends one frame as `key:value` lines followed by a blank line, the
    /// shape the TV's pointer socket expects in place of JSON.
    pub async fn send_frame(&mut self, fields: &[(&str, &str)]) -> Result<()> {
        let mut body = String::new();
        for (key, value) in fields {
            body.push_str(key);
            body.push(':');
            body.push_str(value);
            body.push('\n');
        }
        body.push('\n');
        self.stream
            .send(Message::Text(body))
            .await
            .map_err(Error::from)
    }

    /// Presses and releases a named remote button, e.g. `"ENTER"`, `"HOME"`.
    pub async fn click_button(&mut self, name: &str) -> Result<()> {
        self.send_frame(&[("type", "click"), ("name", name)]).await
    }

    /// Moves the on-screen pointer by a relative `(dx, dy)` offset.
    pub async fn move_pointer(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.send_frame(&[
            ("type", "move"),
            ("dx", &dx.to_string()),
            ("dy", &dy.to_string()),
        ])
        .await
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await.map_err(Error::from)
    }
}
