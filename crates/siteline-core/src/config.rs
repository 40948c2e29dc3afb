//! Client configuration and construction-time validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_INTEGRATION_TYPE, DEFAULT_SDK_NAME, DEFAULT_SDK_VERSION,
    WEBSITE_KEY_PATTERN,
};
use crate::error::ConfigError;

static WEBSITE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(WEBSITE_KEY_PATTERN).expect("website key pattern is valid"));

/// Options accepted when creating a client
///
/// Field names follow the wire-level camelCase convention so the same
/// struct can be read from a `[siteline]` TOML table or JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitelineOptions {
    /// Secret identifying the reporting site (required)
    #[serde(alias = "website_key")]
    pub website_key: String,

    /// Override the intake URL. Must be HTTPS.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Emit diagnostic log lines (default: false)
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub sdk: Option<String>,

    #[serde(default, alias = "sdk_version")]
    pub sdk_version: Option<String>,

    #[serde(default, alias = "integration_type")]
    pub integration_type: Option<String>,
}

impl SitelineOptions {
    pub fn new(website_key: impl Into<String>) -> Self {
        Self {
            website_key: website_key.into(),
            ..Default::default()
        }
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn sdk(mut self, sdk: impl Into<String>) -> Self {
        self.sdk = Some(sdk.into());
        self
    }

    pub fn sdk_version(mut self, sdk_version: impl Into<String>) -> Self {
        self.sdk_version = Some(sdk_version.into());
        self
    }

    pub fn integration_type(mut self, integration_type: impl Into<String>) -> Self {
        self.integration_type = Some(integration_type.into());
        self
    }
}

/// Validated, immutable configuration owned by a client
#[derive(Clone)]
pub struct ClientConfig {
    website_key: String,
    endpoint: Url,
    debug: bool,
    sdk: String,
    sdk_version: String,
    integration_type: String,
}

impl ClientConfig {
    /// Validate options and fill in defaults
    ///
    /// Either every check passes and a complete config is returned, or
    /// nothing is produced.
    pub fn validate(options: SitelineOptions) -> Result<Self, ConfigError> {
        if !is_valid_website_key(&options.website_key) {
            return Err(ConfigError::InvalidWebsiteKey);
        }

        let endpoint = parse_endpoint(options.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;

        Ok(Self {
            website_key: options.website_key,
            endpoint,
            debug: options.debug,
            sdk: options.sdk.unwrap_or_else(|| DEFAULT_SDK_NAME.to_string()),
            sdk_version: options
                .sdk_version
                .unwrap_or_else(|| DEFAULT_SDK_VERSION.to_string()),
            integration_type: options
                .integration_type
                .unwrap_or_else(|| DEFAULT_INTEGRATION_TYPE.to_string()),
        })
    }

    pub fn website_key(&self) -> &str {
        &self.website_key
    }

    /// Key with everything but the prefix and the last four characters hidden
    pub fn masked_website_key(&self) -> String {
        mask_website_key(&self.website_key)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn sdk(&self) -> &str {
        &self.sdk
    }

    pub fn sdk_version(&self) -> &str {
        &self.sdk_version
    }

    pub fn integration_type(&self) -> &str {
        &self.integration_type
    }

    /// `User-Agent` header value, `<sdk>/<sdk_version>`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.sdk, self.sdk_version)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("website_key", &self.masked_website_key())
            .field("endpoint", &self.endpoint.as_str())
            .field("debug", &self.debug)
            .field("sdk", &self.sdk)
            .field("sdk_version", &self.sdk_version)
            .field("integration_type", &self.integration_type)
            .finish()
    }
}

/// Check a key against the fixed `siteline_secret_<32 hex>` format
pub fn is_valid_website_key(key: &str) -> bool {
    WEBSITE_KEY_RE.is_match(key)
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InsecureEndpoint)?;
    if url.scheme() != "https" {
        return Err(ConfigError::InsecureEndpoint);
    }
    Ok(url)
}

fn mask_website_key(key: &str) -> String {
    const PREFIX: &str = "siteline_secret_";
    match key.strip_prefix(PREFIX) {
        Some(secret) if secret.len() > 4 => {
            format!("{}{}{}", PREFIX, "*".repeat(secret.len() - 4), &secret[secret.len() - 4..])
        }
        _ => "*".repeat(key.chars().count()),
    }
}
