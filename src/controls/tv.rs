//! `TvControl` — channel and external input control.

use serde_json::Value as JsonValue;

use super::{SubscriptionCallback, SubscriptionState};
use crate::commands::CommandName;
use crate::error::Result;
use crate::models::InputSource;
use crate::ws::ConnectionHandle;

pub struct TvControl {
    handle: ConnectionHandle,
    subs: SubscriptionState,
}

impl TvControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            subs: SubscriptionState::new(),
        }
    }

    pub async fn get_current_channel(&self) -> Result<JsonValue> {
        super::call(&self.handle, CommandName::GetCurrentChannel, &[]).await
    }

    pub async fn channel_up(&self) -> Result<()> {
        super::call(&self.handle, CommandName::ChannelUp, &[]).await?;
        Ok(())
    }

    pub async fn channel_down(&self) -> Result<()> {
        super::call(&self.handle, CommandName::ChannelDown, &[]).await?;
        Ok(())
    }

    pub async fn open_channel(&self, channel_id: &str) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::OpenChannel,
            &[("channelId", JsonValue::from(channel_id))],
        )
        .await?;
        Ok(())
    }

    /// The TV's external inputs, wrapped one [`InputSource`] per entry.
    pub async fn get_external_input_list(&self) -> Result<Vec<InputSource>> {
        let payload = super::call(&self.handle, CommandName::GetExternalInputList, &[]).await?;
        Ok(external_inputs(payload))
    }

    pub async fn switch_input(&self, input_id: &str) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::SwitchInput,
            &[("inputId", JsonValue::from(input_id))],
        )
        .await?;
        Ok(())
    }

    pub async fn subscribe_get_current_channel(&self, callback: SubscriptionCallback) -> Result<()> {
        super::subscribe(
            &self.handle,
            &self.subs,
            CommandName::GetCurrentChannel,
            &[],
            callback,
        )
        .await
    }

    pub async fn unsubscribe_get_current_channel(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetCurrentChannel).await
    }

    pub async fn subscribe_get_external_input_list(
        &self,
        callback: SubscriptionCallback,
    ) -> Result<()> {
        super::subscribe(
            &self.handle,
            &self.subs,
            CommandName::GetExternalInputList,
            &[],
            callback,
        )
        .await
    }

    pub async fn unsubscribe_get_external_input_list(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetExternalInputList).await
    }
}

fn external_inputs(payload: JsonValue) -> Vec<InputSource> {
    payload
        .get("devices")
        .and_then(JsonValue::as_array)
        .map(|devices| devices.iter().cloned().map(InputSource::from_raw).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_inputs_wraps_each_device() {
        let payload = serde_json::json!({
            "devices": [
                {"id": "HDMI_1", "label": "HDMI 1", "connected": true},
            ]
        });
        let inputs = external_inputs(payload);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].id(), Some("HDMI_1"));
    }
}
