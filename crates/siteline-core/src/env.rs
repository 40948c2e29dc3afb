//! Option resolution with environment fallbacks
//!
//! Precedence, highest first:
//! 1. Explicitly supplied options
//! 2. Environment variables (`SITELINE_WEBSITE_KEY`, `SITELINE_ENDPOINT`, `SITELINE_DEBUG`)
//! 3. Built-in defaults (applied later by [`ClientConfig::validate`](crate::config::ClientConfig::validate))

use serde::{Deserialize, Serialize};
use std::env;

use crate::config::SitelineOptions;

pub const ENV_WEBSITE_KEY: &str = "SITELINE_WEBSITE_KEY";
pub const ENV_ENDPOINT: &str = "SITELINE_ENDPOINT";
pub const ENV_DEBUG: &str = "SITELINE_DEBUG";

/// Options where every field may be missing
///
/// Used for layering sources (files, environment, flags) before a
/// complete [`SitelineOptions`] exists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOptions {
    #[serde(default, alias = "website_key")]
    pub website_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub sdk: Option<String>,
    #[serde(default, alias = "sdk_version")]
    pub sdk_version: Option<String>,
    #[serde(default, alias = "integration_type")]
    pub integration_type: Option<String>,
}

impl PartialOptions {
    /// Read the `SITELINE_*` variables. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            website_key: non_empty_var(ENV_WEBSITE_KEY),
            endpoint: non_empty_var(ENV_ENDPOINT),
            debug: non_empty_var(ENV_DEBUG).and_then(|v| parse_bool(&v)),
            ..Default::default()
        }
    }

    /// Fill fields missing from `self` with values from `fallback`
    pub fn or(self, fallback: PartialOptions) -> Self {
        Self {
            website_key: self.website_key.or(fallback.website_key),
            endpoint: self.endpoint.or(fallback.endpoint),
            debug: self.debug.or(fallback.debug),
            sdk: self.sdk.or(fallback.sdk),
            sdk_version: self.sdk_version.or(fallback.sdk_version),
            integration_type: self.integration_type.or(fallback.integration_type),
        }
    }

    /// Complete options, or `None` when no website key was found anywhere
    pub fn into_options(self) -> Option<SitelineOptions> {
        let website_key = self.website_key?;
        Some(SitelineOptions {
            website_key,
            endpoint: self.endpoint,
            debug: self.debug.unwrap_or(false),
            sdk: self.sdk,
            sdk_version: self.sdk_version,
            integration_type: self.integration_type,
        })
    }
}

/// Resolve explicit options against the environment
pub fn resolve_with_env(explicit: PartialOptions) -> Option<SitelineOptions> {
    explicit.or(PartialOptions::from_env()).into_options()
}

/// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, case-insensitive
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
