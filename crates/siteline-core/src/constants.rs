//! Fixed defaults and field limits

use std::time::Duration;

/// Intake endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://siteline.ai/v1/intake/pageview";

/// SDK identity sent with every beacon unless overridden
pub const DEFAULT_SDK_NAME: &str = "siteline-core";
pub const DEFAULT_SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_INTEGRATION_TYPE: &str = "custom";

/// Website keys look like `siteline_secret_` followed by 32 lowercase hex chars
pub const WEBSITE_KEY_PATTERN: &str = r"^siteline_secret_[a-f0-9]{32}$";

/// Hard client-side deadline for a single beacon
pub const TIMEOUT: Duration = Duration::from_millis(5000);

/// Per-field bounds applied before a beacon leaves the process
pub mod limits {
    pub const URL_MAX_LENGTH: usize = 2048;
    pub const METHOD_MAX_LENGTH: usize = 10;
    pub const USER_AGENT_MAX_LENGTH: usize = 512;
    pub const REF_MAX_LENGTH: usize = 2048;
    pub const IP_MAX_LENGTH: usize = 45;
    pub const INTEGRATION_TYPE_MAX_LENGTH: usize = 50;
    pub const SDK_MAX_LENGTH: usize = 50;
    pub const SDK_VERSION_MAX_LENGTH: usize = 20;

    pub const STATUS_MIN: i64 = 0;
    pub const STATUS_MAX: i64 = 999;
    pub const DURATION_MIN: f64 = 0.0;
    pub const DURATION_MAX: f64 = 300_000.0;
}
