//! Async Rust client for the LG WebOS TV SSAP WebSocket protocol.
//!
//! Speaks the JSON control protocol LG smart TVs expose over a local
//! WebSocket (`ssap://`): pairing, volume and audio routing, media
//! transport, app launch, channel and input switching, power and
//! notifications, plus the SSDP discovery and self-signed-certificate
//! pinning needed to find and trust a TV on the local network.
//!
//! # Quick start
//!
//! ```no_run
//! use webos_tv_rs::facade::{ClientOptions, WebosClient};
//! use webos_tv_rs::model::Endpoint;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = Endpoint::new("192.168.1.50", true);
//!     let client = WebosClient::connect(&endpoint, ClientOptions::default()).await?;
//!
//!     let mut pairing = client.register()?;
//!     while let Some(status) = pairing.next_status().await {
//!         println!("{:?}", status?);
//!     }
//!
//!     client.audio().set_volume(20).await?;
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod controls;
pub mod discovery;
pub mod error;
pub mod facade;
pub mod model;
pub mod models;
pub mod pointer;
pub mod tls;
pub mod ws;

pub use error::{Error, Result};
pub use facade::{ClientOptions, ClientOptionsBuilder, TlsPolicy, WebosClient};
pub use model::{ClientKey, ClientKeyStore, ConnectionState, Endpoint, Manifest, Permission};
pub use models::{Application, AudioOutputSource, InputSource};
pub use pointer::PointerInputSocket;
