//! Core data model: connection endpoints, client keys, and the wire envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A TV to connect to.
///
/// `secure` selects `wss://` on port 3001 (the default for self-signed TV
/// certificates) or `ws://` on port 3000 when `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        let port = if secure { 3001 } else { 3000 };
        Self {
            host: host.into(),
            port,
            secure,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builds and validates the connection URL. Rejects a malformed host
    /// (e.g. one scraped from a malformed SSDP `LOCATION` header) before a
    /// socket is ever opened.
    pub fn url(&self) -> std::result::Result<url::Url, url::ParseError> {
        let scheme = if self.secure { "wss" } else { "ws" };
        url::Url::parse(&format!("{scheme}://{}:{}/", self.host, self.port))
    }
}

/// An opaque client key issued by the TV on first pairing. Stable across
/// sessions for the same [`Manifest`]; the library never persists this —
/// the caller owns `ClientKeyStore`.
pub type ClientKey = String;

/// Out-parameter carrying the client key across a pairing exchange,
/// replacing the shared mutable `store` dict the original design used.
#[derive(Debug, Clone, Default)]
pub struct ClientKeyStore {
    pub client_key: Option<ClientKey>,
}

impl ClientKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(client_key: impl Into<ClientKey>) -> Self {
        Self {
            client_key: Some(client_key.into()),
        }
    }
}

/// Requested permission surface sent during pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ControlAudio,
    ControlDisplay,
    ControlInput,
    ControlMouseAndKeyboard,
    ControlPower,
    ReadApplicationsList,
    ReadCurrentChannel,
    ReadInstalledApps,
    ReadNetworkState,
    ReadRunningApps,
    ReadTvChannelList,
    ReadTvCurrentTime,
    WriteNotificationToast,
    LaunchWebappRunClose,
    AppToApp,
}

/// The static JSON document sent during pairing: app identity plus the
/// permission list. Sent verbatim as `payload.manifest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "manifestVersion")]
    pub manifest_version: u32,
    #[serde(rename = "appId")]
    pub app_id: String,
    pub vendor: String,
    #[serde(rename = "localizedAppNames")]
    pub localized_app_names: serde_json::Map<String, JsonValue>,
    pub permissions: Vec<Permission>,
}

impl Manifest {
    /// A manifest requesting the permission set a typical full-featured
    /// remote control client needs.
    pub fn default_with_app_id(app_id: impl Into<String>) -> Self {
        Self {
            manifest_version: 1,
            app_id: app_id.into(),
            vendor: "webos-tv-rs".to_string(),
            localized_app_names: serde_json::Map::new(),
            permissions: vec![
                Permission::ControlAudio,
                Permission::ControlDisplay,
                Permission::ControlInput,
                Permission::ControlMouseAndKeyboard,
                Permission::ControlPower,
                Permission::ReadApplicationsList,
                Permission::ReadCurrentChannel,
                Permission::ReadInstalledApps,
                Permission::ReadNetworkState,
                Permission::ReadRunningApps,
                Permission::ReadTvChannelList,
                Permission::ReadTvCurrentTime,
                Permission::WriteNotificationToast,
                Permission::LaunchWebappRunClose,
                Permission::AppToApp,
            ],
        }
    }
}

/// Monotonically increasing id assigned by the connection core at send
/// time, prefix-stringified on the wire (`"1"`, `"2"`, ...).
pub type RequestId = u64;

/// Outbound envelope type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutgoingType {
    Request,
    Subscribe,
    Unsubscribe,
    Register,
}

/// The state machine a [`Connection`](crate::ws::Connection) moves through.
/// Failure transitions to `Closed` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open { registered: bool },
    Prompted,
    Closing,
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open { .. } | ConnectionState::Prompted)
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, ConnectionState::Open { registered: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_defaults_secure_port() {
        let e = Endpoint::new("192.0.2.10", true);
        assert_eq!(e.port, 3001);
        assert_eq!(e.url().unwrap().as_str(), "wss://192.0.2.10:3001/");
    }

    #[test]
    fn endpoint_url_plaintext_port() {
        let e = Endpoint::new("192.0.2.10", false);
        assert_eq!(e.port, 3000);
        assert_eq!(e.url().unwrap().as_str(), "ws://192.0.2.10:3000/");
    }

    #[test]
    fn endpoint_with_port_overrides_default() {
        let e = Endpoint::new("tv.local", true).with_port(3005);
        assert_eq!(e.url().unwrap().as_str(), "wss://tv.local:3005/");
    }

    #[test]
    fn connection_state_open_includes_prompted() {
        assert!(ConnectionState::Prompted.is_open());
        assert!(ConnectionState::Open { registered: true }.is_open());
        assert!(!ConnectionState::Closed.is_open());
    }
}
