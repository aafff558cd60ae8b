//! Thin, mechanically-derived control objects — one per SSAP service
//! domain — each owning a [`ConnectionHandle`] and a private
//! [`SubscriptionState`] enforcing "at most one live subscription per
//! command name" synchronously, before any actor round-trip.

pub mod app;
pub mod audio;
pub mod input;
pub mod media;
pub mod system;
pub mod tv;

pub use app::AppControl;
pub use audio::AudioControl;
pub use input::InputControl;
pub use media::MediaControl;
pub use system::SystemControl;
pub use tv::TvControl;

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::commands::{self, CommandName};
use crate::error::{Error, Result};
use crate::ws::{ConnectionHandle, SubscriptionEvent};

/// What a subscription callback receives: the transformed payload on a
/// validator pass, or a failure reason (validator rejection or connection
/// teardown) on the way out.
#[derive(Debug, Clone)]
pub enum SubscriptionUpdate {
    Ok(JsonValue),
    Err(String),
}

/// A subscription callback. `FnMut` because webOS delivers a fresh event on
/// every value change and the caller typically accumulates state across
/// calls (e.g. redrawing a volume slider).
pub type SubscriptionCallback = Box<dyn FnMut(SubscriptionUpdate) + Send + 'static>;

/// Per-control-object subscription bookkeeping: which commands are
/// currently subscribed, and under which subscription id.
#[derive(Default)]
pub(crate) struct SubscriptionState {
    ids: RwLock<HashMap<CommandName, Uuid>>,
}

impl SubscriptionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserves `name` for a new subscription. Fails `AlreadySubscribed`
    /// without touching the connection if one is already live.
    fn reserve(&self, name: CommandName) -> Result<()> {
        let mut ids = self.ids.write().unwrap();
        if ids.contains_key(&name) {
            return Err(Error::AlreadySubscribed(name.as_str().to_string()));
        }
        // Reserve with a placeholder so a concurrent caller sees the slot
        // taken immediately; `confirm` overwrites it with the real id.
        ids.insert(name, Uuid::nil());
        Ok(())
    }

    fn confirm(&self, name: CommandName, id: Uuid) {
        self.ids.write().unwrap().insert(name, id);
    }

    fn release_reservation(&self, name: CommandName) {
        self.ids.write().unwrap().remove(&name);
    }

    /// Removes `name`'s subscription, returning its id. Fails `NotSubscribed`
    /// without touching the connection if none is live.
    fn take(&self, name: CommandName) -> Result<Uuid> {
        self.ids
            .write()
            .unwrap()
            .remove(&name)
            .ok_or_else(|| Error::NotSubscribed(name.as_str().to_string()))
    }
}

/// Binds `args` against `name`'s descriptor, sends a plain `request`, runs
/// the response validator, and applies the return transform. The single
/// choke point every non-subscription control method goes through.
pub(crate) async fn call(
    handle: &ConnectionHandle,
    name: CommandName,
    args: &[(&str, JsonValue)],
) -> Result<JsonValue> {
    let descriptor = commands::descriptor(name);
    let payload = descriptor.bind(args)?;
    let response = handle.send_request(descriptor.uri, payload).await?;
    (descriptor.response_validator)(&response)?;
    Ok(match descriptor.return_transform {
        Some(transform) => transform(response),
        None => response,
    })
}

/// Opens a subscription for `name`, enforcing the per-control-object
/// duplicate guard, and spawns a task delivering events to `callback`
/// serially until the subscription is torn down.
pub(crate) async fn subscribe(
    handle: &ConnectionHandle,
    subs: &SubscriptionState,
    name: CommandName,
    args: &[(&str, JsonValue)],
    mut callback: SubscriptionCallback,
) -> Result<()> {
    let descriptor = commands::descriptor(name);
    if !descriptor.subscribable {
        return Err(Error::NotSubscribable(name.as_str().to_string()));
    }

    subs.reserve(name)?;

    let mut payload = match descriptor.bind(args) {
        Ok(JsonValue::Object(map)) => map,
        Ok(_) => serde_json::Map::new(),
        Err(e) => {
            subs.release_reservation(name);
            return Err(e);
        }
    };
    payload.insert("subscribe".to_string(), JsonValue::Bool(true));

    let subscription_id = Uuid::new_v4();
    let events = handle
        .subscribe(
            name.as_str(),
            descriptor.uri,
            JsonValue::Object(payload),
            subscription_id,
            descriptor.response_validator,
            descriptor.return_transform,
        )
        .await;

    let mut events = match events {
        Ok(events) => events,
        Err(e) => {
            subs.release_reservation(name);
            return Err(e);
        }
    };

    subs.confirm(name, subscription_id);

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let (update, is_terminal) = match event {
                SubscriptionEvent::Update(value) => (SubscriptionUpdate::Ok(value), false),
                SubscriptionEvent::Failed(reason) => (SubscriptionUpdate::Err(reason), false),
                SubscriptionEvent::Closed(reason) => (SubscriptionUpdate::Err(reason), true),
            };
            callback(update);
            if is_terminal {
                break;
            }
        }
    });

    Ok(())
}

/// Tears down `name`'s subscription: removes the local reservation, then
/// fires an unsubscribe envelope. Fire-and-forget at the protocol level —
/// the TV is not expected to reply.
pub(crate) async fn unsubscribe(
    handle: &ConnectionHandle,
    subs: &SubscriptionState,
    name: CommandName,
) -> Result<()> {
    let subscription_id = subs.take(name)?;
    handle.unsubscribe(name.as_str(), subscription_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_twice_fails_already_subscribed() {
        let subs = SubscriptionState::new();
        subs.reserve(CommandName::GetVolume).unwrap();
        let err = subs.reserve(CommandName::GetVolume).unwrap_err();
        assert!(matches!(err, Error::AlreadySubscribed(_)));
    }

    #[test]
    fn take_without_reserve_fails_not_subscribed() {
        let subs = SubscriptionState::new();
        let err = subs.take(CommandName::GetVolume).unwrap_err();
        assert!(matches!(err, Error::NotSubscribed(_)));
    }

    #[test]
    fn confirm_then_take_returns_the_confirmed_id() {
        let subs = SubscriptionState::new();
        subs.reserve(CommandName::GetVolume).unwrap();
        let id = Uuid::new_v4();
        subs.confirm(CommandName::GetVolume, id);
        assert_eq!(subs.take(CommandName::GetVolume).unwrap(), id);
    }

    #[test]
    fn release_reservation_allows_retry() {
        let subs = SubscriptionState::new();
        subs.reserve(CommandName::GetVolume).unwrap();
        subs.release_reservation(CommandName::GetVolume);
        assert!(subs.reserve(CommandName::GetVolume).is_ok());
    }
}
