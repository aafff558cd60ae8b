//! `ssap://com.webos.applicationManager/*` commands.

use super::{CommandDescriptor, CommandName, FieldKind, FieldSpec, default_response_validator};

static LIST_LAUNCH_POINTS: CommandDescriptor = CommandDescriptor {
    name: CommandName::ListLaunchPoints,
    uri: "ssap://com.webos.applicationManager/listLaunchPoints",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

static LAUNCH_APP: CommandDescriptor = CommandDescriptor {
    name: CommandName::LaunchApp,
    uri: "ssap://com.webos.applicationManager/launch",
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

static GET_FOREGROUND_APP_INFO: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetForegroundAppInfo,
    uri: "ssap://com.webos.applicationManager/getForegroundAppInfo",
    fields: &[],
    subscribable: true,
    response_validator: default_response_validator,
    return_transform: None,
};

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::ListLaunchPoints => &LIST_LAUNCH_POINTS,
        CommandName::LaunchApp => &LAUNCH_APP,
        CommandName::GetForegroundAppInfo => &GET_FOREGROUND_APP_INFO,
        other => unreachable!("{other:?} is not an applicationManager command"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn launch_app_requires_id() {
        let err = LAUNCH_APP.bind(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn launch_app_accepts_optional_params() {
        let payload = LAUNCH_APP
            .bind(&[
                ("id", serde_json::json!("com.webos.app.netflix")),
                ("params", serde_json::json!({"contentId": "123"})),
            ])
            .unwrap();
        assert_eq!(payload["id"], "com.webos.app.netflix");
        assert_eq!(payload["params"]["contentId"], "123");
    }
}
