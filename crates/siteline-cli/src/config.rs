//! Layered option loading for the CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use siteline_core::PartialOptions;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SDK_NAME: &str = "siteline-cli";
pub const DEFAULT_INTEGRATION_TYPE: &str = "cli";

/// Load options with precedence:
/// 1. Command-line flags (highest priority)
/// 2. Environment variables (`SITELINE_*`)
/// 3. File passed with `--config`
/// 4. Project config (./siteline.toml)
/// 5. User config (~/.siteline/config.toml)
/// 6. CLI identity defaults
pub fn load_options(flags: PartialOptions, config_file: Option<&Path>) -> Result<PartialOptions> {
    let mut files = PartialOptions::default();

    if let Some(path) = config_file {
        files = load_config_from_file(path)?;
    }

    let project_config = PathBuf::from("siteline.toml");
    if project_config.exists() {
        files = files.or(load_config_from_file(&project_config)?);
    }

    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".siteline/config.toml");
        if user_config.exists() {
            files = files.or(load_config_from_file(&user_config)?);
        }
    }

    Ok(flags
        .or(PartialOptions::from_env())
        .or(files)
        .or(cli_defaults()))
}

fn cli_defaults() -> PartialOptions {
    PartialOptions {
        sdk: Some(DEFAULT_SDK_NAME.to_string()),
        sdk_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        integration_type: Some(DEFAULT_INTEGRATION_TYPE.to_string()),
        ..Default::default()
    }
}

/// Read the `[siteline]` table of a TOML file
fn load_config_from_file(path: &Path) -> Result<PartialOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    #[derive(Deserialize)]
    struct FullConfig {
        #[serde(default)]
        siteline: Option<PartialOptions>,
    }

    let full_config: FullConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    Ok(full_config.siteline.unwrap_or_default())
}
