//! Unified types used across providers, the gateway, and the calculator view

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upstream market-data provider identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Binance,
    CryptoCompare,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Binance => write!(f, "Binance"),
            ProviderKind::CryptoCompare => write!(f, "CryptoCompare"),
        }
    }
}

/// Latest price for a symbol, as returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Canonical symbol (e.g. BTCUSDT)
    pub symbol: String,
    /// Quoted price, always positive
    pub price: Decimal,
    /// Provider that answered, when known
    pub provider: Option<ProviderKind>,
    /// When the quote was received
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(symbol: impl Into<String>, price: Decimal, provider: ProviderKind) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            provider: Some(provider),
            fetched_at: Utc::now(),
        }
    }

    /// Quote relayed without provider attribution
    pub fn unattributed(symbol: impl Into<String>, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            provider: None,
            fetched_at: Utc::now(),
        }
    }

    /// Price as a decimal string with trailing zeros stripped
    pub fn price_string(&self) -> String {
        self.price.normalize().to_string()
    }
}

/// Wire body of a successful `/api/crypto-price` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub price: String,
}

/// Wire body of a failed gateway response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Default account capital and risk served by `/api/total-capital`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalDefaults {
    #[serde(rename = "totalCapital")]
    pub total_capital: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

/// Supported symbol as listed by `/api/symbols`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub label: String,
}
