//! Field sanitization
//!
//! Every field is clamped or truncated to a fixed bound. Nothing here ever
//! rejects a record: an oversized or malformed value is cut down, not dropped.
//!
//! String limits count Unicode scalar values (`char`s), not bytes or UTF-16
//! code units. A character outside the Basic Multilingual Plane counts once
//! here but twice for a JavaScript consumer.

use crate::config::ClientConfig;
use crate::constants::limits;
use crate::events::{PageviewData, SanitizedPageview};

/// Map a raw pageview onto its bounded wire form
pub fn sanitize(data: &PageviewData, config: &ClientConfig) -> SanitizedPageview {
    SanitizedPageview {
        url: truncate(&data.url, limits::URL_MAX_LENGTH),
        method: normalize_method(&data.method),
        status: clamp_status(data.status),
        duration: clamp_duration(data.duration),
        user_agent: truncate_opt(data.user_agent.as_deref(), limits::USER_AGENT_MAX_LENGTH),
        referer: truncate_opt(data.referer.as_deref(), limits::REF_MAX_LENGTH),
        ip: truncate_opt(data.ip.as_deref(), limits::IP_MAX_LENGTH),
        sdk: truncate(config.sdk(), limits::SDK_MAX_LENGTH),
        sdk_version: truncate(config.sdk_version(), limits::SDK_VERSION_MAX_LENGTH),
        integration_type: truncate(config.integration_type(), limits::INTEGRATION_TYPE_MAX_LENGTH),
    }
}

/// Keep at most `max` characters. Never splits a code point.
pub fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

fn truncate_opt(value: Option<&str>, max: usize) -> Option<String> {
    value.map(|v| truncate(v, max))
}

/// Uppercase first, then bound
pub fn normalize_method(method: &str) -> String {
    truncate(&method.to_uppercase(), limits::METHOD_MAX_LENGTH)
}

pub fn clamp_status(status: i64) -> u16 {
    // STATUS_MAX fits in u16
    status.clamp(limits::STATUS_MIN, limits::STATUS_MAX) as u16
}

/// NaN maps to the lower bound
pub fn clamp_duration(duration: f64) -> f64 {
    if duration.is_nan() {
        return limits::DURATION_MIN;
    }
    duration.clamp(limits::DURATION_MIN, limits::DURATION_MAX)
}
