//! SSDP discovery of webOS TVs on the local network.
//!
//! LG TVs answer the UPnP/SSDP `M-SEARCH` multicast with a `LOCATION`
//! header pointing at their device description XML. This module only
//! needs the host out of that header — it does not fetch or parse the XML
//! itself.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::Endpoint;

const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
const SSDP_PORT: u16 = 1900;
const SEARCH_TARGET: &str = "urn:lge-com:service:webos-second-screen:1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

fn build_search_request(mx: u8) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_MULTICAST_ADDR}:{SSDP_PORT}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {mx}\r\n\
         ST: {SEARCH_TARGET}\r\n\
         \r\n"
    )
}

/// Extracts the host from a `LOCATION:` header line, ignoring scheme,
/// port, and path. Returns `None` if no such header is present.
fn location_host(response: &str) -> Option<String> {
    for line in response.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("location") {
            continue;
        }
        // value looks like " http://192.168.1.50:3000/desc.xml" — rejoin
        // anything after the first colon in case the URL itself has one.
        let rest = line[name.len() + 1..].trim();
        let without_scheme = rest.split("//").nth(1)?;
        let host = without_scheme.split(['/', ':']).next()?;
        if host.is_empty() {
            return None;
        }
        return Some(host.to_string());
    }
    None
}

/// Sends an SSDP `M-SEARCH` and collects unique responders within
/// `search_timeout`. `secure` controls the port used to build each
/// resulting [`Endpoint`] (SSDP itself carries no TLS information).
pub async fn discover(search_timeout: Duration, secure: bool) -> Result<Vec<Endpoint>> {
    let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0)))
        .await
        .map_err(Error::Io)?;
    socket.set_broadcast(true).map_err(Error::Io)?;

    let mx = search_timeout.as_secs().clamp(1, 5) as u8;
    let request = build_search_request(mx);
    let dest = SocketAddrV4::new(SSDP_MULTICAST_ADDR, SSDP_PORT);

    socket
        .send_to(request.as_bytes(), dest)
        .await
        .map_err(|e| Error::Discovery(format!("failed to send M-SEARCH: {e}")))?;

    let mut hosts = Vec::new();
    let mut buf = [0u8; 2048];
    let deadline = timeout(search_timeout, async {
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, from)) => {
                    let text = String::from_utf8_lossy(&buf[..len]);
                    debug!("SSDP response from {from}");
                    if let Some(host) = location_host(&text)
                        && !hosts.contains(&host)
                    {
                        hosts.push(host);
                    }
                }
                Err(e) => {
                    warn!("SSDP recv error: {e}");
                    break;
                }
            }
        }
    });

    // A full timeout here is the normal outcome (we stop listening once no
    // more responses arrive), not an error.
    let _ = deadline.await;

    Ok(hosts
        .into_iter()
        .map(|host| Endpoint::new(host, secure))
        .collect())
}

/// Convenience wrapper using [`DEFAULT_TIMEOUT`].
pub async fn discover_default(secure: bool) -> Result<Vec<Endpoint>> {
    discover(DEFAULT_TIMEOUT, secure).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_host_extracts_bare_host() {
        let response = "HTTP/1.1 200 OK\r\nLOCATION: http://192.168.1.50:3000/desc.xml\r\nST: urn:lge-com:service:webos-second-screen:1\r\n\r\n";
        assert_eq!(location_host(response).as_deref(), Some("192.168.1.50"));
    }

    #[test]
    fn location_host_handles_lowercase_header() {
        let response = "HTTP/1.1 200 OK\r\nlocation: http://10.0.0.5/desc.xml\r\n\r\n";
        assert_eq!(location_host(response).as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn location_host_missing_returns_none() {
        let response = "HTTP/1.1 200 OK\r\nST: urn:lge-com:service:webos-second-screen:1\r\n\r\n";
        assert!(location_host(response).is_none());
    }

    #[test]
    fn search_request_includes_search_target() {
        let request = build_search_request(3);
        assert!(request.contains("ST: urn:lge-com:service:webos-second-screen:1"));
        assert!(request.contains("MX: 3"));
    }
}
