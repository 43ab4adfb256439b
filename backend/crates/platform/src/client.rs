//! Client identification utilities
//!
//! The client key scopes rate windows and debounce fingerprints.

use http::HeaderMap;
use std::net::IpAddr;

/// Client key used when no address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract client IP address
///
/// The socket peer is the client unless `trust_proxy` is set. Behind a
/// trusted reverse proxy the first `X-Forwarded-For` entry wins and the
/// peer is only a fallback.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_proxy: bool,
) -> Option<IpAddr> {
    if !trust_proxy {
        return direct_ip;
    }

    // First entry of X-Forwarded-For is the originating client
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first_ip) = xff.split(',').next()
        && let Ok(ip) = first_ip.trim().parse::<IpAddr>()
    {
        return Some(ip);
    }
    direct_ip
}

/// Stable string key for a client
///
/// Falls back to [`UNKNOWN_CLIENT`], so every unidentifiable client shares
/// a single rate window.
pub fn client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>, trust_proxy: bool) -> String {
    extract_client_ip(headers, direct_ip, trust_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_peer_is_used_without_trusted_proxy() {
        let headers = forwarded("192.168.1.1");
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), false), Some(direct));
        assert_eq!(extract_client_ip(&headers, None, false), None);
    }

    #[test]
    fn test_extract_client_ip_xff_behind_proxy() {
        let headers = forwarded("192.168.1.1, 10.0.0.1");
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        let ip = extract_client_ip(&headers, Some(direct), true);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_xff_falls_back_to_direct() {
        let headers = forwarded("not-an-ip");
        let direct: IpAddr = "10.1.2.3".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), true), Some(direct));
    }

    #[test]
    fn test_client_key() {
        assert_eq!(client_key(&HeaderMap::new(), None, true), UNKNOWN_CLIENT);

        let headers = forwarded("::1");
        assert_eq!(client_key(&headers, None, true), "::1");
        assert_eq!(client_key(&headers, None, false), UNKNOWN_CLIENT);
    }
}
