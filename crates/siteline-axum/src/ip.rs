//! Client IP resolution from proxy headers

use axum::http::HeaderMap;

/// Headers consulted for the client address, in precedence order
pub const IP_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// First usable address from the proxy headers
///
/// `x-forwarded-for` may hold a chain (`client, proxy1, proxy2`); only the
/// leftmost entry is used. Blank or non-UTF-8 values are skipped.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}
