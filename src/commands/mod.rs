//! The declarative command registry: one [`CommandDescriptor`] per SSAP
//! operation, carrying its URI, argument shape, and response handling so
//! the connection core and the thin control objects in
//! [`crate::controls`] never hand-build SSAP payloads themselves.

pub mod app;
pub mod audio;
pub mod input;
pub mod media;
pub mod system;
pub mod tv;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Every operation this crate knows how to issue. Two commands legitimately
/// share the verb "launch" against different URIs (the modern app manager
/// and the legacy `system.launcher` service), so they get distinct names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    SetVolume,
    GetVolume,
    VolumeUp,
    VolumeDown,
    SetMute,
    GetMute,
    GetSoundOutput,
    ChangeSoundOutput,
    Play,
    Pause,
    Stop,
    Rewind,
    FastForward,
    ListLaunchPoints,
    LaunchApp,
    GetForegroundAppInfo,
    GetCurrentChannel,
    ChannelUp,
    ChannelDown,
    OpenChannel,
    GetExternalInputList,
    SwitchInput,
    TurnOff,
    CreateToast,
    LauncherLaunch,
    GetPowerState,
    TurnOn,
    GetPointerInputSocket,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetVolume => "setVolume",
            Self::GetVolume => "getVolume",
            Self::VolumeUp => "volumeUp",
            Self::VolumeDown => "volumeDown",
            Self::SetMute => "setMute",
            Self::GetMute => "getMute",
            Self::GetSoundOutput => "getSoundOutput",
            Self::ChangeSoundOutput => "changeSoundOutput",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Rewind => "rewind",
            Self::FastForward => "fastForward",
            Self::ListLaunchPoints => "listLaunchPoints",
            Self::LaunchApp => "launch",
            Self::GetForegroundAppInfo => "getForegroundAppInfo",
            Self::GetCurrentChannel => "getCurrentChannel",
            Self::ChannelUp => "channelUp",
            Self::ChannelDown => "channelDown",
            Self::OpenChannel => "openChannel",
            Self::GetExternalInputList => "getExternalInputList",
            Self::SwitchInput => "switchInput",
            Self::TurnOff => "turnOff",
            Self::CreateToast => "createToast",
            Self::LauncherLaunch => "launch",
            Self::GetPowerState => "getPowerState",
            Self::TurnOn => "turnOn",
            Self::GetPointerInputSocket => "getPointerInputSocket",
        }
    }
}

/// What shape a command argument's value must take.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Boolean,
    Integer,
    IntegerRange(i64, i64),
    /// Structured or TV-version-dependent payload — passed through as-is.
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

/// A single SSAP operation: its wire URI, the arguments it accepts, and how
/// to judge and reshape a response.
pub struct CommandDescriptor {
    pub name: CommandName,
    pub uri: &'static str,
    pub fields: &'static [FieldSpec],
    pub subscribable: bool,
    pub response_validator: fn(&JsonValue) -> Result<()>,
    pub return_transform: Option<fn(JsonValue) -> JsonValue>,
}

impl CommandDescriptor {
    /// Validates `args` against this command's field table and builds the
    /// SSAP request payload. Rejects unknown fields, missing required
    /// fields, and out-of-range values — never clamps.
    pub fn bind(&self, args: &[(&str, JsonValue)]) -> Result<JsonValue> {
        for (name, _) in args {
            if !self.fields.iter().any(|f| f.name == *name) {
                return Err(Error::InvalidArgument(format!(
                    "{} does not accept a field named {name}",
                    self.name.as_str()
                )));
            }
        }

        let mut payload = serde_json::Map::new();
        for field in self.fields {
            match args.iter().find(|(name, _)| *name == field.name) {
                Some((_, value)) => {
                    validate_field(field, value)?;
                    payload.insert(field.name.to_string(), value.clone());
                }
                None if field.required => {
                    return Err(Error::InvalidArgument(format!(
                        "{} requires field {}",
                        self.name.as_str(),
                        field.name
                    )));
                }
                None => {}
            }
        }
        Ok(JsonValue::Object(payload))
    }
}

fn validate_field(field: &FieldSpec, value: &JsonValue) -> Result<()> {
    match field.kind {
        FieldKind::String if !value.is_string() => Err(Error::ValidationFailed(format!(
            "{} must be a string",
            field.name
        ))),
        FieldKind::Boolean if !value.is_boolean() => Err(Error::ValidationFailed(format!(
            "{} must be a boolean",
            field.name
        ))),
        FieldKind::Integer if value.as_i64().is_none() => Err(Error::ValidationFailed(format!(
            "{} must be an integer",
            field.name
        ))),
        FieldKind::IntegerRange(min, max) => {
            let n = value.as_i64().ok_or_else(|| {
                Error::ValidationFailed(format!("{} must be an integer", field.name))
            })?;
            if n < min || n > max {
                Err(Error::ValidationFailed(format!(
                    "{} must be between {min} and {max}, got {n}",
                    field.name
                )))
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

/// The shared response shape for SSAP `request`/`response` pairs:
/// `returnValue: false` (with optional `errorText`/`errorCode`) means
/// failure; its absence is treated as success, since some commands omit it
/// on otherwise-successful responses.
pub fn default_response_validator(payload: &JsonValue) -> Result<()> {
    match payload.get("returnValue").and_then(JsonValue::as_bool) {
        Some(false) => {
            let message = payload
                .get("errorText")
                .and_then(JsonValue::as_str)
                .unwrap_or("command failed")
                .to_string();
            let code = payload
                .get("errorCode")
                .and_then(JsonValue::as_str)
                .map(str::to_string);
            Err(Error::CommandFailed { code, message })
        }
        _ => Ok(()),
    }
}

/// Looks up the static descriptor for a command. Every [`CommandName`]
/// variant has exactly one descriptor; this never returns `None` for a
/// matched name, hence the direct (not `Option`) return.
pub fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::SetVolume
        | CommandName::GetVolume
        | CommandName::VolumeUp
        | CommandName::VolumeDown
        | CommandName::SetMute
        | CommandName::GetMute
        | CommandName::GetSoundOutput
        | CommandName::ChangeSoundOutput => audio::descriptor(name),

        CommandName::Play
        | CommandName::Pause
        | CommandName::Stop
        | CommandName::Rewind
        | CommandName::FastForward => media::descriptor(name),

        CommandName::ListLaunchPoints | CommandName::LaunchApp | CommandName::GetForegroundAppInfo => {
            app::descriptor(name)
        }

        CommandName::GetCurrentChannel
        | CommandName::ChannelUp
        | CommandName::ChannelDown
        | CommandName::OpenChannel
        | CommandName::GetExternalInputList
        | CommandName::SwitchInput => tv::descriptor(name),

        CommandName::TurnOff
        | CommandName::CreateToast
        | CommandName::LauncherLaunch
        | CommandName::GetPowerState
        | CommandName::TurnOn => system::descriptor(name),

        CommandName::GetPointerInputSocket => input::descriptor(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_rejects_unknown_field() {
        let d = descriptor(CommandName::SetVolume);
        let err = d.bind(&[("loudness", serde_json::json!(10))]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn bind_rejects_missing_required_field() {
        let d = descriptor(CommandName::SetVolume);
        let err = d.bind(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn bind_rejects_out_of_range_volume() {
        let d = descriptor(CommandName::SetVolume);
        let err = d.bind(&[("volume", serde_json::json!(150))]).unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }

    #[test]
    fn bind_accepts_valid_volume() {
        let d = descriptor(CommandName::SetVolume);
        let payload = d.bind(&[("volume", serde_json::json!(42))]).unwrap();
        assert_eq!(payload["volume"], 42);
    }

    #[test]
    fn default_response_validator_accepts_missing_return_value() {
        assert!(default_response_validator(&serde_json::json!({"volume": 10})).is_ok());
    }

    #[test]
    fn default_response_validator_rejects_explicit_failure() {
        let err = default_response_validator(
            &serde_json::json!({"returnValue": false, "errorText": "no such input"}),
        )
        .unwrap_err();
        match err {
            Error::CommandFailed { message, .. } => assert_eq!(message, "no such input"),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn every_command_name_resolves_to_its_own_descriptor() {
        let names = [
            CommandName::SetVolume,
            CommandName::GetVolume,
            CommandName::VolumeUp,
            CommandName::VolumeDown,
            CommandName::SetMute,
            CommandName::GetMute,
            CommandName::GetSoundOutput,
            CommandName::ChangeSoundOutput,
            CommandName::Play,
            CommandName::Pause,
            CommandName::Stop,
            CommandName::Rewind,
            CommandName::FastForward,
            CommandName::ListLaunchPoints,
            CommandName::LaunchApp,
            CommandName::GetForegroundAppInfo,
            CommandName::GetCurrentChannel,
            CommandName::ChannelUp,
            CommandName::ChannelDown,
            CommandName::OpenChannel,
            CommandName::GetExternalInputList,
            CommandName::SwitchInput,
            CommandName::TurnOff,
            CommandName::CreateToast,
            CommandName::LauncherLaunch,
            CommandName::GetPowerState,
            CommandName::TurnOn,
            CommandName::GetPointerInputSocket,
        ];
        for name in names {
            assert_eq!(descriptor(name).name.as_str(), name.as_str());
        }
    }
}
