//! Connection core: the actor that owns a TV's WebSocket connection, and
//! the handle used to talk to it.
//!
//! # Example
//!
//! ```no_run
//! use webos_tv_rs::model::{Endpoint, Manifest};
//! use webos_tv_rs::ws::{ConnectedSession, DEFAULT_REQUEST_TIMEOUT};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = Endpoint::new("192.168.1.50", true);
//! let session = ConnectedSession::connect(&endpoint, None, DEFAULT_REQUEST_TIMEOUT).await?;
//! let handle = session.handle();
//!
//! let mut pairing = handle.register(
//!     serde_json::to_value(Manifest::default_with_app_id("com.example.remote"))?,
//!     None,
//! );
//! while let Some(status) = pairing.next_status().await {
//!     println!("{:?}", status?);
//! }
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod command;
mod handle;
mod pairing;
mod protocol;
mod request_handler;
mod session;
mod subscriptions;

pub use command::ActorCommand;
pub use handle::{ConnectedSession, ConnectionHandle};
pub use pairing::{PairingStatus, PairingStream};
pub use request_handler::RequestHandler;
pub use session::Connection;
pub use subscriptions::{SubscriptionEntry, SubscriptionEvent, SubscriptionRegistry};

/// Default per-request deadline applied by [`ConnectionHandle::send_request`].
/// Use [`ConnectionHandle::send_request_with_timeout`] to override it for a
/// single call.
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);
