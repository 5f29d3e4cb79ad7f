//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{GatewayError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. `TOTAL_CAPITAL` / `RISK` environment variables
/// 2. Environment variables (prefixed with APP__, e.g. `APP__SERVER__PORT`)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    builder = builder
        .set_override_option("capital.total_capital", env_non_empty("TOTAL_CAPITAL"))
        .and_then(|b| b.set_override_option("capital.risk", env_non_empty("RISK")))
        .map_err(|e| GatewayError::Configuration(e.to_string()))?;

    let config: AppConfig = builder
        .build()
        .map_err(|e| GatewayError::Configuration(e.to_string()))?
        .try_deserialize()
        .map_err(|e| GatewayError::Configuration(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.feed.poll_interval_seconds == 0 {
        return Err(GatewayError::Configuration(
            "feed.poll_interval_seconds must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// An environment value, treating empty strings as unset
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
