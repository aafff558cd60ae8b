//! `AppControl` — application launch points and the foreground app.

use serde_json::Value as JsonValue;

use super::{SubscriptionCallback, SubscriptionState};
use crate::commands::CommandName;
use crate::error::Result;
use crate::models::Application;
use crate::ws::ConnectionHandle;

pub struct AppControl {
    handle: ConnectionHandle,
    subs: SubscriptionState,
}

impl AppControl {
    pub(crate) fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            subs: SubscriptionState::new(),
        }
    }

    /// The TV's launch points, wrapped one [`Application`] per entry.
    pub async fn list_launch_points(&self) -> Result<Vec<Application>> {
        let payload = super::call(&self.handle, CommandName::ListLaunchPoints, &[]).await?;
        Ok(launch_points(payload))
    }

    pub async fn launch(&self, id: &str, params: Option<JsonValue>) -> Result<()> {
        let mut args = vec![("id", JsonValue::from(id))];
        if let Some(params) = params {
            args.push(("params", params));
        }
        super::call(&self.handle, CommandName::LaunchApp, &args).await?;
        Ok(())
    }

    pub async fn get_foreground_app_info(&self) -> Result<Application> {
        let payload = super::call(&self.handle, CommandName::GetForegroundAppInfo, &[]).await?;
        Ok(Application::from_raw(payload))
    }

    pub async fn subscribe_get_foreground_app_info(
        &self,
        callback: SubscriptionCallback,
    ) -> Result<()> {
        super::subscribe(
            &self.handle,
            &self.subs,
            CommandName::GetForegroundAppInfo,
            &[],
            callback,
        )
        .await
    }

    pub async fn unsubscribe_get_foreground_app_info(&self) -> Result<()> {
        super::unsubscribe(&self.handle, &self.subs, CommandName::GetForegroundAppInfo).await
    }
}

fn launch_points(payload: JsonValue) -> Vec<Application> {
    payload
        .get("launchPoints")
        .and_then(JsonValue::as_array)
        .map(|points| points.iter().cloned().map(Application::from_raw).collect())
        .unwrap_or_default()
}
