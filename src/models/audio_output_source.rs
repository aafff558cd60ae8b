//! `AudioOutputSource` — the TV's current/available sound output routing,
//! as reported by `ssap://audio/getSoundOutput`.

use serde_json::Value as JsonValue;

/// A thin accessor over a TV-reported sound output payload. See
/// [`crate::models::Application`] for why this wraps raw JSON instead of
/// deriving a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioOutputSource {
    raw: JsonValue,
}

impl AudioOutputSource {
    pub fn from_raw(raw: JsonValue) -> Self {
        Self { raw }
    }

    pub fn output(&self) -> Option<&str> {
        self.raw.get("soundOutput").and_then(JsonValue::as_str)
    }

    pub fn raw(&self) -> &JsonValue {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_reads_sound_output_field() {
        let out = AudioOutputSource::from_raw(serde_json::json!({"soundOutput": "tv_speaker"}));
        assert_eq!(out.output(), Some("tv_speaker"));
    }
}
