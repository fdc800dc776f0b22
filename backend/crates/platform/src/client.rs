//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap, header};
use std::net::{IpAddr, SocketAddr};

/// Extract client IP address
///
/// `X-Forwarded-For` is client-controlled unless a reverse proxy rewrites it,
/// so it is only read when `trust_forwarded_for` is set. The last entry is
/// the one appended by that proxy. Otherwise the connection IP is used.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    if !trust_forwarded_for {
        return direct_ip;
    }
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.rsplit(',').next())
        .and_then(|last| last.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}

/// Client IP for a request, using `ConnectInfo` when the server was started
/// with `into_make_service_with_connect_info`.
pub fn request_client_ip(
    headers: &HeaderMap,
    extensions: &Extensions,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    let direct_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    extract_client_ip(headers, direct_ip, trust_forwarded_for)
}

/// Extract the credential of an `Authorization: Bearer <credential>` header
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}
