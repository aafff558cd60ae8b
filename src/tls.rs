//! TLS trust policy for connecting to a TV's self-signed certificate.
//!
//! LG TVs serve a self-signed cert on the secure SSAP port; there is no CA
//! to pin against ahead of time the way `rommeld-leeson` pins a public
//! root. Instead the caller extracts the TV's certificate once (trust on
//! first use) and pins that exact certificate for every later connection.

use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex};

use base64::Engine;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;

use crate::error::{Error, Result};
use crate::model::Endpoint;

/// How a connection's peer certificate is validated.
#[derive(Clone)]
pub enum TrustPolicy {
    /// Use the platform/webpki root store. Only useful against a TV
    /// fronted by a real CA-issued certificate, which is not the common
    /// case for local SSAP connections.
    System,
    /// Trust exactly one DER-encoded certificate, previously captured with
    /// [`extract_certificate`].
    Pinned(CertificateDer<'static>),
    /// Accept any certificate without validation. Only appropriate for a
    /// one-shot [`extract_certificate`] handshake, never for a real
    /// session.
    AcceptAny,
}

/// Builds a [`rustls::ClientConfig`] enforcing `policy`.
pub fn context_for_policy(policy: TrustPolicy) -> Result<Arc<ClientConfig>> {
    let config = match policy {
        TrustPolicy::System => {
            let mut root_store = rustls::RootCertStore::empty();
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        }
        TrustPolicy::Pinned(cert) => ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(PinnedVerifier::new(cert)))
            .with_no_client_auth(),
        TrustPolicy::AcceptAny => ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyVerifier::new()))
            .with_no_client_auth(),
    };
    Ok(Arc::new(config))
}

/// Inputs to [`build_context`]. Precedence when more than one field is set:
/// `ssl_context` wins outright, then `cert_file`, then `verify_ssl`.
#[derive(Clone, Default)]
pub struct BuildContextOptions {
    /// A caller-supplied context, used verbatim.
    pub ssl_context: Option<Arc<ClientConfig>>,
    /// Path to a PEM certificate previously saved by [`extract_certificate`];
    /// pins the connection to exactly that certificate.
    pub cert_file: Option<std::path::PathBuf>,
    /// When `false` and neither of the above is set, builds a context that
    /// verifies nothing. Only appropriate for one-shot certificate capture,
    /// never for a real session. Defaults to `true`.
    pub verify_ssl: bool,
}

impl BuildContextOptions {
    pub fn new() -> Self {
        Self {
            verify_ssl: true,
            ..Default::default()
        }
    }
}

/// Resolves a [`rustls::ClientConfig`] from whichever of `ssl_context`,
/// `cert_file`, or `verify_ssl` the caller supplied, in that precedence.
pub fn build_context(options: BuildContextOptions) -> Result<Arc<ClientConfig>> {
    if let Some(ctx) = options.ssl_context {
        return Ok(ctx);
    }
    if let Some(path) = options.cert_file {
        let pem = std::fs::read(&path).map_err(Error::Io)?;
        let der = der_from_pem(&pem)?;
        return context_for_policy(TrustPolicy::Pinned(der));
    }
    if !options.verify_ssl {
        return context_for_policy(TrustPolicy::AcceptAny);
    }
    context_for_policy(TrustPolicy::System)
}

/// Encodes a DER certificate as PEM (`-----BEGIN CERTIFICATE-----`, 64-column
/// base64 body, `-----END CERTIFICATE-----`).
fn pem_from_der(der: &CertificateDer<'_>) -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(der.as_ref());
    let mut pem = String::from("-----BEGIN CERTIFICATE-----\n");
    for line in encoded.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(line).expect("base64 output is ASCII"));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem.into_bytes()
}

/// Decodes the first certificate found in a PEM blob.
fn der_from_pem(pem: &[u8]) -> Result<CertificateDer<'static>> {
    let mut reader = std::io::BufReader::new(pem);
    rustls_pemfile::certs(&mut reader)
        .next()
        .transpose()
        .map_err(Error::Io)?
        .ok_or_else(|| Error::Tls("no certificate found in PEM data".to_string()))
}

/// Opens a non-verifying TLS connection to `host:port` purely to capture the
/// certificate it presents, converts it to PEM, and optionally writes it to
/// `out_path`. Returns the PEM bytes either way.
pub async fn extract_certificate(
    host: &str,
    port: u16,
    out_path: Option<&Path>,
) -> Result<Vec<u8>> {
    let der = capture_peer_certificate(host, port).await?;
    let pem = pem_from_der(&der);
    if let Some(path) = out_path {
        std::fs::write(path, &pem).map_err(Error::Io)?;
    }
    Ok(pem)
}

/// Reads the PEM certificate stored at `path`, captures the live peer
/// certificate at `host:port`, and reports whether they are the same
/// certificate. Both sides are reparsed to DER before comparing, so
/// whitespace differences in the stored PEM don't cause a false mismatch.
pub async fn verify_certificate(path: &Path, host: &str, port: u16) -> Result<bool> {
    let stored_pem = std::fs::read(path).map_err(Error::Io)?;
    let stored = der_from_pem(&stored_pem)?;
    let live = capture_peer_certificate(host, port).await?;
    Ok(stored.as_ref() == live.as_ref())
}

async fn capture_peer_certificate(host: &str, port: u16) -> Result<CertificateDer<'static>> {
    let captured: Arc<StdMutex<Option<CertificateDer<'static>>>> = Arc::new(StdMutex::new(None));
    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(CaptureVerifier {
            captured: captured.clone(),
        }))
        .with_no_client_auth();

    let connector = tokio_rustls::TlsConnector::from(Arc::new(config));
    let tcp = TcpStream::connect((host, port)).await.map_err(Error::Io)?;

    let name = ServerName::try_from(host.to_string())
        .map_err(|e| Error::Tls(format!("invalid server name {host}: {e}")))?;

    let _stream = connector
        .connect(name, tcp)
        .await
        .map_err(|e| Error::Tls(format!("TLS handshake failed: {e}")))?;

    captured
        .lock()
        .unwrap()
        .take()
        .ok_or_else(|| Error::Tls("no certificate presented during handshake".to_string()))
}

/// Compares a freshly-seen certificate against a pinned one, returning
/// [`Error::CertificateMismatch`] when they differ.
pub fn verify_certificate_bytes(
    seen: &CertificateDer<'_>,
    pinned: &CertificateDer<'_>,
    endpoint: &Endpoint,
) -> Result<()> {
    if seen.as_ref() == pinned.as_ref() {
        Ok(())
    } else {
        Err(Error::CertificateMismatch(
            endpoint.host.clone(),
            endpoint.port,
        ))
    }
}

#[derive(Debug)]
struct CaptureVerifier {
    captured: Arc<StdMutex<Option<CertificateDer<'static>>>>,
}

impl ServerCertVerifier for CaptureVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        *self.captured.lock().unwrap() = Some(end_entity.clone().into_owned());
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Accepts whatever certificate is presented, without capturing it.
/// Distinct from [`CaptureVerifier`] so `TrustPolicy::AcceptAny` doesn't
/// carry capture bookkeeping it never uses.
#[derive(Debug)]
struct AcceptAnyVerifier;

impl AcceptAnyVerifier {
    fn new() -> Self {
        Self
    }
}

impl ServerCertVerifier for AcceptAnyVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[derive(Debug)]
struct PinnedVerifier {
    expected: CertificateDer<'static>,
}

impl PinnedVerifier {
    fn new(expected: CertificateDer<'static>) -> Self {
        Self { expected }
    }
}

impl ServerCertVerifier for PinnedVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        if end_entity.as_ref() == self.expected.as_ref() {
            Ok(ServerCertVerified::assertion())
        } else {
            Err(rustls::Error::General(
                "peer certificate does not match the pinned certificate".to_string(),
            ))
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &rustls::crypto::ring::default_provider().signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_cert(bytes: &[u8]) -> CertificateDer<'static> {
        CertificateDer::from(bytes.to_vec())
    }

    #[test]
    fn verify_certificate_bytes_matches_identical_bytes() {
        let endpoint = Endpoint::new("192.0.2.10", true);
        let cert = fake_cert(b"fake-der-bytes");
        assert!(verify_certificate_bytes(&cert, &cert, &endpoint).is_ok());
    }

    #[test]
    fn verify_certificate_bytes_rejects_mismatch() {
        let endpoint = Endpoint::new("192.0.2.10", true);
        let seen = fake_cert(b"new-cert");
        let pinned = fake_cert(b"old-cert");
        let err = verify_certificate_bytes(&seen, &pinned, &endpoint).unwrap_err();
        assert!(matches!(err, Error::CertificateMismatch(host, port) if host == "192.0.2.10" && port == 3001));
    }

    #[test]
    fn context_for_policy_system_succeeds() {
        assert!(context_for_policy(TrustPolicy::System).is_ok());
    }

    #[test]
    fn context_for_policy_pinned_succeeds() {
        let cert = fake_cert(b"fake-der-bytes");
        assert!(context_for_policy(TrustPolicy::Pinned(cert)).is_ok());
    }

    #[test]
    fn build_context_defaults_to_system_trust() {
        assert!(build_context(BuildContextOptions::new()).is_ok());
    }

    #[test]
    fn build_context_no_verify_when_verify_ssl_false() {
        let options = BuildContextOptions {
            verify_ssl: false,
            ..BuildContextOptions::new()
        };
        assert!(build_context(options).is_ok());
    }

    #[test]
    fn build_context_prefers_explicit_context_over_cert_file() {
        let explicit = context_for_policy(TrustPolicy::System).unwrap();
        let options = BuildContextOptions {
            ssl_context: Some(explicit.clone()),
            cert_file: Some(std::path::PathBuf::from("/nonexistent/cert.pem")),
            verify_ssl: true,
        };
        let resolved = build_context(options).unwrap();
        assert!(Arc::ptr_eq(&explicit, &resolved));
    }

    #[test]
    fn pem_der_round_trip_preserves_bytes() {
        let cert = fake_cert(b"not-really-a-certificate-but-bytes-all-the-same");
        let pem = pem_from_der(&cert);
        assert!(pem.starts_with(b"-----BEGIN CERTIFICATE-----\n"));
        let decoded = der_from_pem(&pem).unwrap();
        assert_eq!(decoded.as_ref(), cert.as_ref());
    }

    #[test]
    fn der_from_pem_rejects_empty_input() {
        assert!(der_from_pem(b"").is_err());
    }

    #[test]
    fn build_context_cert_file_pins_stored_certificate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tv.pem");
        let cert = fake_cert(b"pinned-cert-bytes");
        std::fs::write(&path, pem_from_der(&cert)).unwrap();

        let options = BuildContextOptions {
            cert_file: Some(path),
            ..BuildContextOptions::new()
        };
        assert!(build_context(options).is_ok());
    }
}
