//! HTTP client for a running price gateway

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{GatewayError, Result};
use crate::common::traits::PriceSource;
use crate::common::types::{CapitalDefaults, ErrorResponse, PriceQuote, PriceResponse, SymbolInfo};

/// Client for the gateway's `/api/*` endpoints
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(15))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the latest price string for a symbol
    #[instrument(skip(self))]
    pub async fn get_price(&self, symbol: &str) -> Result<String> {
        let url = format!("{}/api/crypto-price", self.base_url);
        debug!("Fetching price from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("HTTP error! status: {}", status.as_u16()));
            return Err(remote_error(status.as_u16(), symbol, message));
        }

        let price: PriceResponse = serde_json::from_str(&body)?;
        Ok(price.price)
    }

    /// Get default capital and risk
    #[instrument(skip(self))]
    pub async fn get_total_capital(&self) -> Result<CapitalDefaults> {
        let url = format!("{}/api/total-capital", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::Internal(format!(
                "Server returned status: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// List the symbols the gateway quotes
    #[instrument(skip(self))]
    pub async fn get_symbols(&self) -> Result<Vec<SymbolInfo>> {
        let url = format!("{}/api/symbols", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::Internal(format!(
                "Server returned status: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Rebuild a typed error from a gateway error response
fn remote_error(status: u16, symbol: &str, message: String) -> GatewayError {
    match status {
        400 if message.starts_with("Symbol is required") => GatewayError::MissingSymbol,
        400 => GatewayError::UnsupportedSymbol(symbol.to_string()),
        _ => GatewayError::Remote { status, message },
    }
}

#[async_trait]
impl PriceSource for GatewayClient {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let raw = self.get_price(symbol).await?;
        let price = Decimal::from_str(raw.trim()).map_err(|e| {
            GatewayError::Internal(format!("Gateway returned invalid price {:?}: {}", raw, e))
        })?;
        Ok(PriceQuote::unattributed(symbol, price))
    }
}
