//! Configuration types

use serde::{Deserialize, Serialize};

use crate::common::types::CapitalDefaults;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream price providers
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Defaults served by `/api/total-capital`
    #[serde(default)]
    pub capital: CapitalConfig,
    /// Live price feed used by the calculator session
    #[serde(default)]
    pub feed: FeedConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// HTTP gateway listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL for the Binance spot REST API
    #[serde(default = "default_binance_url")]
    pub binance_url: String,
    /// Base URL for the CryptoCompare min-api
    #[serde(default = "default_cryptocompare_url")]
    pub cryptocompare_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            binance_url: default_binance_url(),
            cryptocompare_url: default_cryptocompare_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_binance_url() -> String {
    "https://api1.binance.com".to_string()
}

fn default_cryptocompare_url() -> String {
    "https://min-api.cryptocompare.com".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

/// Account defaults, overridable by `TOTAL_CAPITAL` and `RISK`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalConfig {
    #[serde(default = "default_total_capital")]
    pub total_capital: String,
    #[serde(default = "default_risk")]
    pub risk: String,
}

impl Default for CapitalConfig {
    fn default() -> Self {
        Self {
            total_capital: default_total_capital(),
            risk: default_risk(),
        }
    }
}

impl CapitalConfig {
    pub fn to_defaults(&self) -> CapitalDefaults {
        CapitalDefaults {
            total_capital: self.total_capital.clone(),
            risk: Some(self.risk.clone()),
        }
    }
}

fn default_total_capital() -> String {
    "1000".to_string()
}

fn default_risk() -> String {
    "1".to_string()
}

/// Live price feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Gateway to poll; when unset the session queries providers in-process
    #[serde(default)]
    pub gateway_url: Option<String>,
    /// Delay between polls in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Symbol watched on start
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Initial leverage shown in the form
    #[serde(default = "default_leverage")]
    pub leverage: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            gateway_url: None,
            poll_interval_seconds: default_poll_interval(),
            symbol: default_symbol(),
            leverage: default_leverage(),
        }
    }
}

fn default_poll_interval() -> u64 {
    10
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_leverage() -> String {
    "5".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
