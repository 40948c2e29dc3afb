//! Option defaults for the axum integration

use siteline_core::env::resolve_with_env;
use siteline_core::{PartialOptions, SitelineOptions};

pub const DEFAULT_SDK_NAME: &str = "siteline-axum";
pub const DEFAULT_SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_INTEGRATION_TYPE: &str = "axum";

/// Identity this integration reports unless the caller overrides it
pub fn integration_defaults() -> PartialOptions {
    PartialOptions {
        sdk: Some(DEFAULT_SDK_NAME.to_string()),
        sdk_version: Some(DEFAULT_SDK_VERSION.to_string()),
        integration_type: Some(DEFAULT_INTEGRATION_TYPE.to_string()),
        ..Default::default()
    }
}

/// explicit > environment > integration defaults
pub fn resolve_options(explicit: PartialOptions) -> Option<SitelineOptions> {
    resolve_with_env(explicit.or(integration_defaults()))
}
