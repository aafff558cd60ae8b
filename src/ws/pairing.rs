//! The two-stage pairing exchange.
//!
//! Registering with a TV for the first time yields exactly two inbound
//! envelopes on the same request id: a `PROMPTED` sentinel to let the caller
//! show "accept this on your TV" UI, then a `REGISTERED` envelope carrying
//! the client key once the user accepts the remote's on-screen prompt. A
//! second `register()` call with a stored key skips straight to
//! `REGISTERED`. This two-stage exchange is tracked separately from the
//! general pending-request registry, in `Connection`'s own
//! `pending_register` field: the actor parks the one in-flight
//! registration there and re-checks it against each inbound envelope in
//! `Connection::route_pairing`, rather than going through
//! [`RequestHandler`](crate::ws::RequestHandler)'s single-shot bookkeeping.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::model::ClientKey;

/// One step of a pairing exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingStatus {
    /// The TV is showing its on-screen accept/deny prompt.
    Prompted,
    /// The user accepted; this is the key to keep for future connections.
    Registered(ClientKey),
}

/// A stream of [`PairingStatus`] values terminating after `Registered` (or
/// the first error). Polling after termination returns `None`.
pub struct PairingStream {
    rx: mpsc::Receiver<Result<PairingStatus>>,
}

impl PairingStream {
    pub(crate) fn new(rx: mpsc::Receiver<Result<PairingStatus>>) -> Self {
        Self { rx }
    }

    /// Convenience accessor for callers who don't want to pull in
    /// `StreamExt` just to drive this one stream.
    pub async fn next_status(&mut self) -> Option<Result<PairingStatus>> {
        self.rx.recv().await
    }
}

impl Stream for PairingStream {
    type Item = Result<PairingStatus>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn stream_yields_prompted_then_registered() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = PairingStream::new(rx);

        tx.send(Ok(PairingStatus::Prompted)).await.unwrap();
        tx.send(Ok(PairingStatus::Registered("abc123".to_string())))
            .await
            .unwrap();
        drop(tx);

        assert!(matches!(stream.next().await, Some(Ok(PairingStatus::Prompted))));
        match stream.next().await {
            Some(Ok(PairingStatus::Registered(key))) => assert_eq!(key, "abc123"),
            other => panic!("expected Registered, got {other:?}"),
        }
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn next_status_works_without_stream_ext() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = PairingStream::new(rx);
        tx.send(Ok(PairingStatus::Registered("key".to_string())))
            .await
            .unwrap();

        match stream.next_status().await {
            Some(Ok(PairingStatus::Registered(key))) => assert_eq!(key, "key"),
            other => panic!("expected Registered, got {other:?}"),
        }
    }
}
