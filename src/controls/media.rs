//! `MediaControl` — transport control. None of `media.controls`'s
//! operations are subscribable, so this control has no subscription
//! bookkeeping at all.

use crate::commands::CommandName;
use crate::error::Result;
use crate::ws::ConnectionHandle;

pub struct MediaControl {
    handle: ConnectionHandle,
}

impl MediaControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self { handle }
    }

    pub async fn play(&self) -> Result<()> {
        super::call(&self.handle, CommandName::Play, &[]).await?;
        Ok(())
    }

    pub async fn pause(&self) -> Result<()> {
        super::call(&self.handle, CommandName::Pause, &[]).await?;
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        super::call(&self.handle, CommandName::Stop, &[]).await?;
        Ok(())
    }

    pub async fn rewind(&self) -> Result<()> {
        super::call(&self.handle, CommandName::Rewind, &[]).await?;
        Ok(())
    }

    pub async fn fast_forward(&self) -> Result<()> {
        super::call(&self.handle, CommandName::FastForward, &[]).await?;
        Ok(())
    }
}
