//! `WebosClient` — the high-level entry point most callers reach for
//! instead of driving [`crate::ws::ConnectedSession`] directly.
//!
//! Owns one connection plus one pre-built control object per SSAP service
//! domain. `connect`/`close` bracket the connection's lifetime the way
//! `KalshiStreamClient::connect`/`shutdown` do in the teacher: `close`
//! consumes `self`, so a closed client cannot be reused by accident.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value as JsonValue;

use crate::controls::{AppControl, AudioControl, InputControl, MediaControl, SystemControl, TvControl};
use crate::error::Result;
use crate::model::{ClientKey, Endpoint, Manifest};
use crate::tls::{self, BuildContextOptions};
use crate::ws::{ConnectedSession, PairingStream, DEFAULT_REQUEST_TIMEOUT};

/// How the connection's peer certificate is validated. Maps onto
/// [`crate::tls::BuildContextOptions`] when a secure endpoint is connected.
#[derive(Clone, Debug, Default)]
pub enum TlsPolicy {
    /// Validate against the platform/webpki root store.
    #[default]
    System,
    /// Trust exactly the certificate stored at this path, previously saved
    /// with [`crate::tls::extract_certificate`].
    Pinned(PathBuf),
    /// Skip certificate validation entirely. Only appropriate while
    /// bootstrapping a pin with `extract_certificate`, never for ongoing use.
    NoVerify,
}

/// Configuration for [`WebosClient::connect`]. Construct with
/// [`ClientOptions::builder`]; `Default` gives a 60s timeout, system TLS
/// trust, and a manifest requesting the full remote-control permission set.
#[derive(Clone)]
pub struct ClientOptions {
    request_timeout: Duration,
    tls_policy: TlsPolicy,
    manifest: Manifest,
    client_key: Option<ClientKey>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            tls_policy: TlsPolicy::default(),
            manifest: Manifest::default_with_app_id("webos-tv-rs"),
            client_key: None,
        }
    }
}

impl ClientOptions {
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }

    fn tls_context_options(&self) -> BuildContextOptions {
        match &self.tls_policy {
            TlsPolicy::System => BuildContextOptions::new(),
            TlsPolicy::Pinned(path) => BuildContextOptions {
                cert_file: Some(path.clone()),
                ..BuildContextOptions::new()
            },
            TlsPolicy::NoVerify => BuildContextOptions {
                verify_ssl: false,
                ..BuildContextOptions::new()
            },
        }
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("request_timeout", &self.request_timeout)
            .field("tls_policy", &self.tls_policy)
            .field("manifest", &self.manifest)
            .field("client_key", &self.client_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Builder for [`ClientOptions`].
#[derive(Default)]
pub struct ClientOptionsBuilder {
    request_timeout: Option<Duration>,
    tls_policy: Option<TlsPolicy>,
    manifest: Option<Manifest>,
    client_key: Option<ClientKey>,
}

impl ClientOptionsBuilder {
    /// Per-request deadline for every call issued through the resulting
    /// client's handles. Defaults to [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn tls_policy(mut self, policy: TlsPolicy) -> Self {
        self.tls_policy = Some(policy);
        self
    }

    /// The manifest presented during pairing. Defaults to a manifest
    /// requesting the full remote-control permission set.
    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// A client key from a prior successful pairing, to present up front so
    /// the TV can skip straight to `registered` instead of prompting again.
    pub fn client_key(mut self, client_key: impl Into<ClientKey>) -> Self {
        self.client_key = Some(client_key.into());
        self
    }

    pub fn build(self) -> ClientOptions {
        ClientOptions {
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            tls_policy: self.tls_policy.unwrap_or_default(),
            manifest: self
                .manifest
                .unwrap_or_else(|| Manifest::default_with_app_id("webos-tv-rs")),
            client_key: self.client_key,
        }
    }
}

/// A connected TV, with one pre-built control object per service domain.
pub struct WebosClient {
    session: ConnectedSession,
    manifest: Manifest,
    client_key: Option<ClientKey>,
    audio: AudioControl,
    media: MediaControl,
    app: AppControl,
    tv: TvControl,
    system: SystemControl,
    input: InputControl,
}

impl WebosClient {
    /// Opens a connection to `endpoint` and builds every control object
    /// against it. Does not pair — call [`Self::register`] afterward if the
    /// session needs `Open{registered}` traffic.
    pub async fn connect(endpoint: &Endpoint, options: ClientOptions) -> Result<Self> {
        let tls_config = if endpoint.secure {
            Some(tls::build_context(options.tls_context_options())?)
        } else {
            None
        };

        let session =
            ConnectedSession::connect(endpoint, tls_config, options.request_timeout).await?;
        let handle = session.handle();

        Ok(Self {
            audio: AudioControl::new(handle.clone()),
            media: MediaControl::new(handle.clone()),
            app: AppControl::new(handle.clone()),
            tv: TvControl::new(handle.clone()),
            system: SystemControl::new(handle.clone()),
            input: InputControl::new(handle),
            manifest: options.manifest,
            client_key: options.client_key,
            session,
        })
    }

    pub fn audio(&self) -> &AudioControl {
        &self.audio
    }

    pub fn media(&self) -> &MediaControl {
        &self.media
    }

    pub fn app(&self) -> &AppControl {
        &self.app
    }

    pub fn tv(&self) -> &TvControl {
        &self.tv
    }

    pub fn system(&self) -> &SystemControl {
        &self.system
    }

    pub fn input(&self) -> &InputControl {
        &self.input
    }

    /// Starts the pairing exchange using the manifest and client key this
    /// client was configured with. See [`PairingStream`] for how to drive
    /// it; the caller is responsible for persisting the `client-key` a
    /// `Registered` status carries for reuse on a later `connect`.
    pub fn register(&self) -> Result<PairingStream> {
        let manifest = serde_json::to_value(&self.manifest)?;
        Ok(self.session.handle().register(manifest, self.client_key.clone()))
    }

    /// Issues an arbitrary SSAP request not exposed by a control object.
    pub async fn send_request(&self, uri: &str, payload: JsonValue) -> Result<JsonValue> {
        self.session.handle().send_request(uri, payload).await
    }

    /// Requests a clean shutdown and waits for the connection actor to exit.
    pub async fn close(self) -> Result<()> {
        self.session.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_system_tls_and_default_timeout() {
        let options = ClientOptions::default();
        assert_eq!(options.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(options.tls_policy, TlsPolicy::System));
    }

    #[test]
    fn builder_overrides_defaults() {
        let options = ClientOptions::builder()
            .request_timeout(Duration::from_secs(5))
            .tls_policy(TlsPolicy::NoVerify)
            .client_key("abc123")
            .build();
        assert_eq!(options.request_timeout, Duration::from_secs(5));
        assert!(matches!(options.tls_policy, TlsPolicy::NoVerify));
        assert_eq!(options.client_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn debug_redacts_client_key_but_not_manifest() {
        let options = ClientOptions::builder().client_key("super-secret").build();
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("manifestVersion") || rendered.contains("manifest_version") || rendered.contains("Manifest"));
    }

    #[test]
    fn tls_context_options_map_pinned_policy_to_cert_file() {
        let options = ClientOptions::builder()
            .tls_policy(TlsPolicy::Pinned(PathBuf::from("/tmp/tv.pem")))
            .build();
        let resolved = options.tls_context_options();
        assert_eq!(resolved.cert_file, Some(PathBuf::from("/tmp/tv.pem")));
    }
}
