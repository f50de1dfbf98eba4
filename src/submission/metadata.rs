use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Best-effort client address for the notification text.
///
/// Forwarding headers (`X-Forwarded-For`, then `X-Real-IP`) are honoured
/// when no trusted proxies are configured, or when the peer is one of them.
/// Otherwise the peer address is used.
pub fn client_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> Option<String> {
    let trust_headers = trusted_proxies.is_empty()
        || peer_addr.is_some_and(|peer| trusted_proxies.iter().any(|net| net.contains(&peer)));

    if trust_headers {
        if let Some(ip) = forwarded_for(headers, trusted_proxies) {
            return Some(ip);
        }
        if let Some(real_ip) = header_text(headers, "x-real-ip") {
            return Some(real_ip);
        }
    }

    peer_addr.map(|ip| ip.to_string())
}

/// Leftmost `X-Forwarded-For` entry that is not itself a trusted proxy.
fn forwarded_for(headers: &HeaderMap, trusted_proxies: &[IpNet]) -> Option<String> {
    let xff = header_text(headers, "x-forwarded-for")?;
    for entry in xff.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match entry.parse::<IpAddr>() {
            Ok(ip) if trusted_proxies.iter().any(|net| net.contains(&ip)) => continue,
            _ => return Some(entry.to_string()),
        }
    }
    None
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
