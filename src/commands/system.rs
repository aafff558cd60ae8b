//! `ssap://system*` commands: power, toast notifications, and the legacy
//! launcher service.

use super::{CommandDescriptor, CommandName, FieldKind, FieldSpec, default_response_validator};

static TURN_OFF: CommandDescriptor = CommandDescriptor {
    name: CommandName::TurnOff,
    uri: "ssap://system/turnOff",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static CREATE_TOAST: CommandDescriptor = CommandDescriptor {
    name: CommandName::CreateToast,
    uri: "ssap://system.notifications/createToast",
    fields: &[FieldSpec {
        name: "message",
        required: true,
        kind: FieldKind::String,
    }],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static LAUNCHER_LAUNCH: CommandDescriptor = CommandDescriptor {
    name: CommandName::LauncherLaunch,
    uri: "ssap://system.launcher/launch",
    fields: &[
        FieldSpec {
            name: "id",
            required: true,
            kind: FieldKind::String,
        },
        FieldSpec {
            name: "params",
            required: false,
            kind: FieldKind::Any,
        },
    ],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static GET_POWER_STATE: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetPowerState,
    uri: "ssap://com.webos.service.power/power/getPowerState",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

static TURN_ON: CommandDescriptor = CommandDescriptor {
    name: CommandName::TurnOn,
    uri: "ssap://com.webos.service.power/power/turnOn",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::TurnOff => &TURN_OFF,
        CommandName::CreateToast => &CREATE_TOAST,
        CommandName::LauncherLaunch => &LAUNCHER_LAUNCH,
        CommandName::GetPowerState => &GET_POWER_STATE,
        CommandName::TurnOn => &TURN_ON,
        other => unreachable!("{other:?} is not a system command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn create_toast_requires_message() {
        let err = CREATE_TOAST.bind(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn create_toast_binds_message() {
        let payload = CREATE_TOAST
            .bind(&[("message", serde_json::json!("hello"))])
            .unwrap();
        assert_eq!(payload["message"], "hello");
    }
}
