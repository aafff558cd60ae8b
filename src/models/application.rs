//! `Application` — an installed or foreground app, as reported by
//! `ssap://com.webos.applicationManager/*`.

use serde_json::Value as JsonValue;

/// A thin accessor over a TV-reported application payload. Firmware across
/// webOS versions adds and renames fields freely; a derived struct would
/// break on the first field it didn't know about, so this wraps the raw
/// value and exposes only the handful of fields every version has shipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    raw: JsonValue,
}

impl Application {
    pub fn from_raw(raw: JsonValue) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> Option<&str> {
        self.raw.get("id").and_then(JsonValue::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.raw.get("title").and_then(JsonValue::as_str)
    }

    pub fn icon(&self) -> Option<&str> {
        self.raw.get("icon").and_then(JsonValue::as_str)
    }

    /// The raw JSON payload, for fields this accessor surface doesn't name.
    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_known_fields() {
        let app = Application::from_raw(serde_json::json!({
            "id": "com.webos.app.hdmi1",
            "title": "HDMI 1",
            "icon": "https://tv.local/icons/hdmi1.png",
        }));
        assert_eq!(app.id(), Some("com.webos.app.hdmi1"));
        assert_eq!(app.title(), Some("HDMI 1"));
        assert_eq!(app.icon(), Some("https://tv.local/icons/hdmi1.png"));
    }

    #[test]
    fn missing_fields_are_none() {
        let app = Application::from_raw(serde_json::json!({}));
        assert!(app.id().is_none());
        assert!(app.title().is_none());
    }
}
