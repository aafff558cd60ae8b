//! `AudioControl` — volume and sound output routing.

use serde_json::Value as JsonValue;

use super::{SubscriptionCallback, SubscriptionState};
use crate::commands::CommandName;
use crate::error::Result;
use crate::models::AudioOutputSource;
use crate::ws::ConnectionHandle;

pub struct AudioControl {
    handle: ConnectionHandle,
    subs: SubscriptionState,
}

impl AudioControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            subs: SubscriptionState::new(),
        }
    }

    pub async fn set_volume(&self, volume: i64) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::SetVolume,
            &[("volume", JsonValue::from(volume))],
        )
        .await?;
        Ok(())
    }

    pub async fn get_volume(&self) -> Result<JsonValue> {
        super::call(&self.handle, CommandName::GetVolume, &[]).await
    }

    pub async fn volume_up(&self) -> Result<()> {
        super::call(&self.handle, CommandName::VolumeUp, &[]).await?;
        Ok(())
    }

    pub async fn volume_down(&self) -> Result<()> {
        super::call(&self.handle, CommandName::VolumeDown, &[]).await?;
        Ok(())
    }

    pub async fn set_mute(&self, mute: bool) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::SetMute,
            &[("mute", JsonValue::from(mute))],
        )
        .await?;
        Ok(())
    }

    pub async fn get_mute(&self) -> Result<JsonValue> {
        super::call(&self.handle, CommandName::GetMute, &[]).await
    }

    pub async fn get_sound_output(&self) -> Result<AudioOutputSource> {
        let payload = super::call(&self.handle, CommandName::GetSoundOutput, &[]).await?;
        Ok(AudioOutputSource::from_raw(payload))
    }

    pub async fn change_sound_output(&self, output: &str) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::ChangeSoundOutput,
            &[("output", JsonValue::from(output))],
        )
        .await?;
        Ok(())
    }

    pub async fn subscribe_get_volume(&self, callback: SubscriptionCallback) -> Result<()> {
        super::subscribe(&self.handle, &self.subs, CommandName::GetVolume, &[], callback).await
    }

    pub async fn unsubscribe_get_volume(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetVolume).await
    }

    pub async fn subscribe_get_mute(&self, callback: SubscriptionCallback) -> Result<()> {
        super::subscribe(&self.handle, &self.subs, CommandName::GetMute, &[], callback).await
    }

    pub async fn unsubscribe_get_mute(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetMute).await
    }

    pub async fn subscribe_get_sound_output(&self, callback: SubscriptionCallback) -> Result<()> {
        super::subscribe(
            &self.handle,
            &self.subs,
            CommandName::GetSoundOutput,
            &[],
            callback,
        )
        .await
    }

    pub async fn unsubscribe_get_sound_output(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetSoundOutput).await
    }
}
