//! Client address resolution.
//!
//! # Responsibilities
//! - Honour the `X-Forwarded-For` header when the peer is trusted
//! - Fall back to the transport peer address with the port stripped
//! - Provide an extractor so handlers can take the address directly
//!
//! # Design Decisions
//! - The header is returned verbatim, no chain parsing
//! - Trust defaults to `Always`. That is only safe behind a reverse proxy
//!   which overwrites the header; a directly exposed service should use
//!   `Never` or `Peers`.
//! - Resolution never fails: an unsplittable peer address is returned as is

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, HeaderName, Request};
use thiserror::Error;

/// Header set by intermediary proxies to convey the original client address.
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Peer address of a transport that has no `SocketAddr`, e.g. a Unix socket.
///
/// Takes precedence over `ConnectInfo<SocketAddr>` when both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddr(pub String);

/// Decides whether the forwarding header may be believed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForwardedPolicy {
    /// Always trust the header.
    #[default]
    Always,
    /// Ignore the header.
    Never,
    /// Trust the header only when the peer is one of these proxies.
    Peers(Vec<IpAddr>),
}

impl ForwardedPolicy {
    /// Returns true if a header received from `peer_host` may be used.
    pub fn trusts(&self, peer_host: &str) -> bool {
        match self {
            ForwardedPolicy::Always => true,
            ForwardedPolicy::Never => false,
            ForwardedPolicy::Peers(proxies) => peer_host
                .parse::<IpAddr>()
                .map(|ip| proxies.contains(&ip))
                .unwrap_or(false),
        }
    }
}

/// Errors from splitting a `host:port` address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddrError {
    #[error("address {0}: missing port in address")]
    MissingPort(String),

    #[error("address {0}: too many colons in address")]
    TooManyColons(String),

    #[error("address {0}: missing ']' in address")]
    MissingBracket(String),

    #[error("address {addr}: unexpected '{bracket}' in address")]
    UnexpectedBracket { addr: String, bracket: char },
}

/// Split `host:port` or `[host]:port` into host and port.
///
/// IPv6 literals must be bracketed; the brackets are not part of the
/// returned host. The port may be empty.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), AddrError> {
    let colon = hostport
        .rfind(':')
        .ok_or_else(|| AddrError::MissingPort(hostport.to_string()))?;

    let (host, host_start, port_start) = if hostport.starts_with('[') {
        let end = hostport
            .find(']')
            .ok_or_else(|| AddrError::MissingBracket(hostport.to_string()))?;

        if end + 1 == hostport.len() {
            // "[host]" without a port
            return Err(AddrError::MissingPort(hostport.to_string()));
        }
        if end + 1 != colon {
            // either "[host]:a:b" or "[host]x"
            if hostport.as_bytes()[end + 1] == b':' {
                return Err(AddrError::TooManyColons(hostport.to_string()));
            }
            return Err(AddrError::MissingPort(hostport.to_string()));
        }

        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(AddrError::TooManyColons(hostport.to_string()));
        }
        (host, 0, 0)
    };

    if hostport[host_start..].contains('[') {
        return Err(AddrError::UnexpectedBracket {
            addr: hostport.to_string(),
            bracket: '[',
        });
    }
    if hostport[port_start..].contains(']') {
        return Err(AddrError::UnexpectedBracket {
            addr: hostport.to_string(),
            bracket: ']',
        });
    }

    Ok((host, &hostport[colon + 1..]))
}

/// Returns the remote address of an HTTP request.
///
/// If an `X-Forwarded-For` header is present its content is returned,
/// otherwise the host of the transport peer.
pub fn get_remote_addr<B>(req: &Request<B>) -> String {
    get_remote_addr_with(req, &ForwardedPolicy::Always)
}

/// Like [`get_remote_addr`], but the header is only honoured when `policy`
/// trusts the peer that delivered the request.
pub fn get_remote_addr_with<B>(req: &Request<B>, policy: &ForwardedPolicy) -> String {
    resolve(req.headers(), req.extensions(), policy)
}

fn resolve(headers: &HeaderMap, extensions: &Extensions, policy: &ForwardedPolicy) -> String {
    let remote = peer_addr(extensions);

    // strip the port from the peer address if there is one
    let peer_host = split_host_port(&remote)
        .map(|(host, _)| host.to_string())
        .unwrap_or(remote);

    if let Some(fwd) = headers.get(X_FORWARDED_FOR) {
        if !fwd.is_empty() && policy.trusts(&peer_host) {
            return String::from_utf8_lossy(fwd.as_bytes()).into_owned();
        }
        if !fwd.is_empty() {
            tracing::trace!(peer = %peer_host, "Ignoring X-Forwarded-For from untrusted peer");
        }
    }

    peer_host
}

fn peer_addr(extensions: &Extensions) -> String {
    if let Some(PeerAddr(addr)) = extensions.get::<PeerAddr>() {
        return addr.clone();
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default()
}

/// Extractor yielding the resolved client address.
///
/// Uses the [`ForwardedPolicy`] found in the request extensions (e.g. added
/// with `Extension(policy)`), or [`ForwardedPolicy::Always`] if none is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let fallback = ForwardedPolicy::Always;
        let policy = parts.extensions.get::<ForwardedPolicy>().unwrap_or(&fallback);
        Ok(ClientAddr(resolve(&parts.headers, &parts.extensions, policy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(forwarded: Option<&str>, peer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(fwd) = forwarded {
            builder = builder.header("X-Forwarded-For", fwd);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            req.extensions_mut().insert(PeerAddr(peer.to_string()));
        }
        req
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("10.0.0.5:54321"), Ok(("10.0.0.5", "54321")));
        assert_eq!(split_host_port("[::1]:80"), Ok(("::1", "80")));
        assert_eq!(split_host_port("localhost:"), Ok(("localhost", "")));
        assert_eq!(split_host_port(":8080"), Ok(("", "8080")));
    }

    #[test]
    fn test_split_host_port_errors() {
        assert!(matches!(split_host_port("10.0.0.5"), Err(AddrError::MissingPort(_))));
        assert!(matches!(split_host_port("/tmp/app.sock"), Err(AddrError::MissingPort(_))));
        assert!(matches!(split_host_port("::1"), Err(AddrError::TooManyColons(_))));
        assert!(matches!(split_host_port("[::1]"), Err(AddrError::MissingPort(_))));
        assert!(matches!(split_host_port("[::1]:80:90"), Err(AddrError::TooManyColons(_))));
        assert!(matches!(split_host_port("[::1:80"), Err(AddrError::MissingBracket(_))));
        assert!(matches!(
            split_host_port("a]b:80"),
            Err(AddrError::UnexpectedBracket { bracket: ']', .. })
        ));
    }

    #[test]
    fn test_forwarded_header_wins() {
        let req = request(Some("1.2.3.4"), Some("10.0.0.5:54321"));
        assert_eq!(get_remote_addr(&req), "1.2.3.4");

        // chains are returned verbatim
        let req = request(Some("1.2.3.4, 5.6.7.8"), None);
        assert_eq!(get_remote_addr(&req), "1.2.3.4, 5.6.7.8");
    }

    #[test]
    fn test_empty_forwarded_header_ignored() {
        let req = request(Some(""), Some("10.0.0.5:54321"));
        assert_eq!(get_remote_addr(&req), "10.0.0.5");
    }

    #[test]
    fn test_peer_port_stripped() {
        let req = request(None, Some("10.0.0.5:54321"));
        assert_eq!(get_remote_addr(&req), "10.0.0.5");

        let req = request(None, Some("[2001:db8::1]:443"));
        assert_eq!(get_remote_addr(&req), "2001:db8::1");
    }

    #[test]
    fn test_unsplittable_peer_unchanged() {
        let req = request(None, Some("/var/run/app.sock"));
        assert_eq!(get_remote_addr(&req), "/var/run/app.sock");

        let req = request(None, None);
        assert_eq!(get_remote_addr(&req), "");
    }

    #[test]
    fn test_connect_info_peer() {
        let mut req = request(None, None);
        let addr: SocketAddr = "192.168.1.7:5000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(get_remote_addr(&req), "192.168.1.7");
    }

    #[test]
    fn test_policy_never() {
        let req = request(Some("1.2.3.4"), Some("10.0.0.5:54321"));
        assert_eq!(get_remote_addr_with(&req, &ForwardedPolicy::Never), "10.0.0.5");
    }

    #[test]
    fn test_policy_peers() {
        let policy = ForwardedPolicy::Peers(vec!["10.0.0.5".parse().unwrap()]);

        let trusted = request(Some("1.2.3.4"), Some("10.0.0.5:54321"));
        assert_eq!(get_remote_addr_with(&trusted, &policy), "1.2.3.4");

        let untrusted = request(Some("1.2.3.4"), Some("10.0.0.9:54321"));
        assert_eq!(get_remote_addr_with(&untrusted, &policy), "10.0.0.9");

        let unknown = request(Some("1.2.3.4"), None);
        assert_eq!(get_remote_addr_with(&unknown, &policy), "");
    }

    #[tokio::test]
    async fn test_client_addr_extractor() {
        let req = request(Some("1.2.3.4"), Some("10.0.0.5:1"));
        let (mut parts, _) = req.into_parts();
        let ClientAddr(addr) = ClientAddr::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(addr, "1.2.3.4");

        parts.extensions.insert(ForwardedPolicy::Never);
        let ClientAddr(addr) = ClientAddr::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(addr, "10.0.0.5");
    }
}
