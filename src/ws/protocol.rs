//! SSAP envelope serialization and deserialization.
//!
//! Outbound frames are always `{"id", "type", "uri"?, "payload"}`; inbound
//! frames are `{"id"?, "type", "payload"?, "error"?}`. The TV addresses
//! subscription events and pairing's two-stage exchange by reusing the same
//! `id` across multiple inbound frames, so ids are opaque strings here, not
//! parsed integers.

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Build a `request` envelope.
pub fn build_request(id: &str, uri: &str, payload: &JsonValue) -> String {
    serde_json::json!({
        "id": id,
        "type": "request",
        "uri": uri,
        "payload": payload,
    })
    .to_string()
}

/// Build a `subscribe` envelope. `payload` should already carry
/// `"subscribe": true` alongside any command arguments.
pub fn build_subscribe(id: &str, uri: &str, payload: &JsonValue) -> String {
    serde_json::json!({
        "id": id,
        "type": "subscribe",
        "uri": uri,
        "payload": payload,
    })
    .to_string()
}

/// Build an `unsubscribe` envelope.
pub fn build_unsubscribe(id: &str, uri: &str) -> String {
    serde_json::json!({
        "id": id,
        "type": "unsubscribe",
        "uri": uri,
        "payload": {},
    })
    .to_string()
}

/// Build a `register` envelope. `client_key`, when present, is folded into
/// the payload alongside the manifest so the TV can skip the prompt.
pub fn build_register(id: &str, manifest: &JsonValue, client_key: Option<&str>) -> String {
    let mut payload = serde_json::json!({
        "pairingType": "PROMPT",
        "manifest": manifest,
    });
    if let Some(key) = client_key {
        payload["client-key"] = JsonValue::String(key.to_string());
    }
    serde_json::json!({
        "id": id,
        "type": "register",
        "payload": payload,
    })
    .to_string()
}

/// A parsed inbound envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingEnvelope {
    pub id: Option<String>,
    pub msg_type: String,
    pub payload: JsonValue,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    id: Option<JsonValue>,
    #[serde(rename = "type")]
    msg_type: Option<String>,
    payload: Option<JsonValue>,
    error: Option<JsonValue>,
}

fn id_as_string(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn error_as_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse one text frame received from the TV.
pub fn parse_incoming(text: &str) -> std::result::Result<IncomingEnvelope, serde_json::Error> {
    let raw: RawEnvelope = serde_json::from_str(text)?;
    Ok(IncomingEnvelope {
        id: raw.id.and_then(id_as_string),
        msg_type: raw.msg_type.unwrap_or_default(),
        payload: raw.payload.unwrap_or(JsonValue::Null),
        error: raw.error.map(error_as_string),
    })
}
