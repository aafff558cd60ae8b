//! `ssap://media.controls/*` commands: transport control for whatever is
//! currently playing (live TV, an app, or external input).

use super::{CommandDescriptor, CommandName, default_response_validator};

macro_rules! transport_command {
    ($static_name:ident, $command_name:ident, $method:literal) => {
        static $static_name: CommandDescriptor = CommandDescriptor {
            name: CommandName::$command_name,
            uri: concat!("ssap://media.controls/", $method),
            fields: &[],
            subscribable: false,
            response_validator: default_response_validator,
            return_transform: None,
        };
    };
}

transport_command!(PLAY, Play, "play");
transport_command!(PAUSE, Pause, "pause");
transport_command!(STOP, Stop, "stop");
transport_command!(REWIND, Rewind, "rewind");
transport_command!(FAST_FORWARD, FastForward, "fastForward");

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::Play => &PLAY,
        CommandName::Pause => &PAUSE,
        CommandName::Stop => &STOP,
        CommandName::Rewind => &REWIND,
        CommandName::FastForward => &FAST_FORWARD,
        other => unreachable!("{other:?} is not a media.controls command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_uri_is_correct() {
        assert_eq!(descriptor(CommandName::Play).uri, "ssap://media.controls/play");
    }

    #[test]
    fn transport_commands_take_no_fields() {
        for name in [
            CommandName::Play,
            CommandName::Pause,
            CommandName::Stop,
            CommandName::Rewind,
            CommandName::FastForward,
        ] {
            assert!(descriptor(name).fields.is_empty());
            assert!(descriptor(name).bind(&[]).is_ok());
        }
    }
}
