//! Upstream response payloads

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binance `GET /api/v3/ticker/price` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerPriceResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Price as a decimal string, absent on error payloads
    #[serde(default)]
    pub price: Option<String>,
    /// Binance error code (e.g. -1121 for an invalid symbol)
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// CryptoCompare `GET /data/price` response
///
/// Success is a flat map from quote currency to a JSON number
/// (`{"USD": 67012.34}`). Failures still answer 200 with
/// `{"Response": "Error", "Message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinglePriceResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub prices: HashMap<String, serde_json::Value>,
}

impl SinglePriceResponse {
    /// Raw price for a quote currency, as JSON number text
    pub fn price_for(&self, quote: &str) -> Option<String> {
        match self.prices.get(quote)? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}
