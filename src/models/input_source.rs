//! `InputSource` — an external input, as reported by
//! `ssap://tv/getExternalInputList`.

use serde_json::Value as JsonValue;

/// A thin accessor over a TV-reported external input payload. See
/// [`crate::models::Application`] for why this wraps raw JSON instead of
/// deriving a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSource {
    raw: JsonValue,
}

impl InputSource {
    pub fn from_raw(raw: JsonValue) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(JsonValue::as_str)
    }

    pub fn label(&self) -> Option<&str> {
        self.raw.get("label").and_then(JsonValue::as_str)
    }

    pub fn connected(&self) -> Option<bool> {
        self.raw.get("connected").and_then(JsonValue::as_bool)
    }

    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }
}
