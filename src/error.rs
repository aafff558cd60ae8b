//! Error types for the WebOS SSAP client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not connected")]
    NotConnected,

    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("request timed out")]
    Timeout,

    #[error("command failed: {message}")]
    CommandFailed {
        code: Option<String>,
        message: String,
    },

    #[error("response validation failed: {0}")]
    ValidationFailed(String),

    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    #[error("already subscribed to {0}")]
    AlreadySubscribed(String),

    #[error("not subscribed to {0}")]
    NotSubscribed(String),

    #[error("command {0} is not subscribable")]
    NotSubscribable(String),

    #[error("certificate mismatch for {0}:{1}")]
    CertificateMismatch(String, u16),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("discovery error: {0}")]
    Discovery(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("actor task unavailable: {0}")]
    ActorUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}
