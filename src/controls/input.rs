//! `InputControl` — obtaining and opening the secondary pointer/input
//! socket. Not subscribable, no subscription bookkeeping.

use crate::commands::CommandName;
use crate::error::{Error, Result};
use crate::pointer::PointerInputSocket;
use crate::ws::ConnectionHandle;

pub struct InputControl {
    handle: ConnectionHandle,
}

impl InputControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self { handle }
    }

    /// The URL of the secondary pointer/input socket, as reported by the
    /// TV. Call [`Self::open_pointer_input_socket`] to actually connect.
    pub async fn get_pointer_input_socket_url(&self) -> Result<String> {
        let payload = super::call(&self.handle, CommandName::GetPointerInputSocket, &[]).await?;
        payload
            .get("socketPath")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::ValidationFailed("getPointerInputSocket response missing socketPath".into())
            })
    }

    /// Convenience wrapper: fetches the socket URL and connects to it.
    pub async fn open_pointer_input_socket(&self) -> Result<PointerInputSocket> {
        let url = self.get_pointer_input_socket_url().await?;
        PointerInputSocket::connect(&url).await
    }
}
