//! `ssap://tv/*` commands: channel and external input control.

use super::{CommandDescriptor, CommandName, FieldKind, FieldSpec, default_response_validator};

static GET_CURRENT_CHANNEL: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetCurrentChannel,
    uri: "ssap://tv/getCurrentChannel",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

static CHANNEL_UP: CommandDescriptor = CommandDescriptor {
    name: CommandName::ChannelUp,
    uri: "ssap://tv/channelUp",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static CHANNEL_DOWN: CommandDescriptor = CommandDescriptor {
    name: CommandName::ChannelDown,
    uri: "ssap://tv/channelDown",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static OPEN_CHANNEL: CommandDescriptor = CommandDescriptor {
    name: CommandName::OpenChannel,
    uri: "ssap://tv/openChannel",
    fields: &[FieldSpec {
        name: "channelId",
        required: true,
        kind: FieldKind::String,
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static GET_EXTERNAL_INPUT_LIST: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetExternalInputList,
    uri: "ssap://tv/getExternalInputList",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

static SWITCH_INPUT: CommandDescriptor = CommandDescriptor {
    name: CommandName::SwitchInput,
    uri: "ssap://tv/switchInput",
    fields: &[FieldSpec {
        name: "inputId",
        required: true,
        kind: FieldKind::String,
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::GetCurrentChannel => &GET_CURRENT_CHANNEL,
        CommandName::ChannelUp => &CHANNEL_UP,
        CommandName::ChannelDown => &CHANNEL_DOWN,
        CommandName::OpenChannel => &OPEN_CHANNEL,
        CommandName::GetExternalInputList => &GET_EXTERNAL_INPUT_LIST,
        CommandName::SwitchInput => &SWITCH_INPUT,
        other => unreachable!("{other:?} is not a tv command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn open_channel_requires_channel_id() {
        let err = OPEN_CHANNEL.bind(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn switch_input_binds_input_id() {
        let payload = SWITCH_INPUT.bind(&[("inputId", serde_json::json!("HDMI_1"))]).unwrap();
        assert_eq!(payload["inputId"], "HDMI_1");
    }
}
