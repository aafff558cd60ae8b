//! `ssap://audio/*` commands: volume and sound output routing.

use serde_json::Value as JsonValue;

use super::{CommandDescriptor, CommandName, FieldKind, FieldSpec, default_response_validator};
use crate::error::{Error, Result};

/// Stricter than [`default_response_validator`]: `getMute`'s response must
/// carry a boolean `mute` field, not merely a truthy `returnValue`.
fn mute_response_validator(payload: &JsonValue) -> Result<()> {
    default_response_validator(payload)?;
    match payload.get("mute") {
        Some(JsonValue::Bool(_)) => Ok(()),
        _ => Err(Error::ValidationFailed(
            "getMute response missing boolean mute field".to_string(),
        )),
    }
}

static SET_VOLUME: CommandDescriptor = CommandDescriptor {
    name: CommandName::SetVolume,
    uri: "ssap://audio/setVolume",
    fields: &[FieldSpec {
        name: "volume",
        required: true,
        kind: FieldKind::IntegerRange(0, 100),
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static GET_VOLUME: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetVolume,
    uri: "ssap://audio/getVolume",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

static VOLUME_UP: CommandDescriptor = CommandDescriptor {
    name: CommandName::VolumeUp,
    uri: "ssap://audio/volumeUp",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static VOLUME_DOWN: CommandDescriptor = CommandDescriptor {
    name: CommandName::VolumeDown,
    uri: "ssap://audio/volumeDown",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static SET_MUTE: CommandDescriptor = CommandDescriptor {
    name: CommandName::SetMute,
    uri: "ssap://audio/setMute",
    fields: &[FieldSpec {
        name: "mute",
        required: true,
        kind: FieldKind::Boolean,
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static GET_MUTE: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetMute,
    uri: "ssap://audio/getMute",
    fields: &[],
    subscribable: true,
    response_validator: mute_response_validator,
    return_transform: None,
};

static GET_SOUND_OUTPUT: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetSoundOutput,
    uri: "ssap://audio/getSoundOutput",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

static CHANGE_SOUND_OUTPUT: CommandDescriptor = CommandDescriptor {
    name: CommandName::ChangeSoundOutput,
    uri: "ssap://audio/changeSoundOutput",
    fields: &[FieldSpec {
        name: "output",
        required: true,
        kind: FieldKind::String,
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::SetVolume => &SET_VOLUME,
        CommandName::GetVolume => &GET_VOLUME,
        CommandName::VolumeUp => &VOLUME_UP,
        CommandName::VolumeDown => &VOLUME_DOWN,
        CommandName::SetMute => &SET_MUTE,
        CommandName::GetMute => &GET_MUTE,
        CommandName::GetSoundOutput => &GET_SOUND_OUTPUT,
        CommandName::ChangeSoundOutput => &CHANGE_SOUND_OUTPUT,
        other => unreachable!("{other:?} is not an audio command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_validator_rejects_missing_mute_field() {
        let err = mute_response_validator(&serde_json::json!({"returnValue": true})).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }

    #[test]
    fn mute_validator_accepts_boolean_mute_field() {
        assert!(
            mute_response_validator(&serde_json::json!({"returnValue": true, "mute": false}))
                .is_ok()
        );
    }

    #[test]
    fn set_volume_rejects_negative() {
        let err = SET_VOLUME.bind(&[("volume", serde_json::json!(-1))]).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }
}
