//! `SystemControl` — power, notifications, and the legacy launcher
//! service. `get_power_state` is the only subscribable operation here.

use serde_json::Value as JsonValue;

use super::{SubscriptionCallback, SubscriptionState};
use crate::commands::CommandName;
use crate::error::Result;
use crate::ws::ConnectionHandle;

pub struct SystemControl {
    handle: ConnectionHandle,
    subs: SubscriptionState,
}

impl SystemControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            subs: SubscriptionState::new(),
        }
    }

    pub async fn turn_off(&self) -> Result<()> {
        super::call(&self.handle, CommandName::TurnOff, &[]).await?;
        Ok(())
    }

    pub async fn create_toast(&self, message: &str) -> Result<()> {
        super::call(
            &self.handle,
            CommandName::CreateToast,
            &[("message", JsonValue::from(message))],
        )
        .await?;
        Ok(())
    }

    pub async fn launcher_launch(&self, id: &str, params: Option<JsonValue>) -> Result<()> {
        let mut args = vec![("id", JsonValue::from(id))];
        if let Some(params) = params {
            args.push(("params", params));
        }
        super::call(&self.handle, CommandName::LauncherLaunch, &args).await?;
        Ok(())
    }

    pub async fn get_power_state(&self) -> Result<JsonValue> {
        super::call(&self.handle, CommandName::GetPowerState, &[]).await
    }

    pub async fn turn_on(&self) -> Result<()> {
        super::call(&self.handle, CommandName::TurnOn, &[]).await?;
        Ok(())
    }

    pub async fn subscribe_get_power_state(&self, callback: SubscriptionCallback) -> Result<()> {
        super::subscribe(
            &self.handle,
            &self.subs,
            CommandName::GetPowerState,
            &[],
            callback,
        )
        .await
    }

    pub async fn unsubscribe_get_power_state(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetPowerState).await
    }
}
