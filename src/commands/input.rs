//! `ssap://com.webos.service.networkinput/*`: obtaining the secondary
//! pointer/input socket URL. The socket itself — a line-oriented
//! `key=value` WebSocket distinct from the main SSAP connection — is an
//! external collaborator; see [`crate::pointer`].

use super::{CommandDescriptor, CommandName, default_response_validator};

static GET_POINTER_INPUT_SOCKET: CommandDescriptor = CommandDescriptor {
    name: CommandName::GetPointerInputSocket,
    uri: "ssap://com.webos.service.networkinput/getPointerInputSocket",
    fields: &[],
    subscribable: false,
    response_validator: default_response_validator,
    return_transform: None,
};

pub(super) fn descriptor(name: CommandName) -> &'static CommandDescriptor {
    match name {
        CommandName::GetPointerInputSocket => &GET_POINTER_INPUT_SOCKET,
        other => unreachable!("{other:?} is not a networkinput command"),
    }
}
