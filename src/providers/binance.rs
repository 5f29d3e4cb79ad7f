//! Binance spot ticker adapter (primary provider)

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::messages::TickerPriceResponse;
use super::{build_url, ensure_success, parse_price};
use crate::common::errors::{GatewayError, Result};
use crate::common::traits::PriceProvider;
use crate::common::types::ProviderKind;

/// REST client for the Binance `ticker/price` endpoint
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(10))
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
}

#[async_trait]
impl PriceProvider for BinanceClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Binance
    }

    /// Binance quotes the pair directly, so `quote` is unused
    #[instrument(skip(self))]
    async fn fetch_price(&self, native_id: &str, _quote: &str) -> Result<Decimal> {
        let url = build_url(
            &self.base_url,
            "/api/v3/ticker/price",
            &[("symbol", native_id)],
        )?;
        debug!("Fetching price from: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let body = ensure_success(ProviderKind::Binance, response).await?;

        let ticker: TickerPriceResponse = serde_json::from_str(&body)?;
        let raw = ticker.price.ok_or_else(|| GatewayError::InvalidResponse {
            provider: ProviderKind::Binance,
            message: ticker.msg.unwrap_or_else(|| "missing price field".to_string()),
        })?;

        parse_price(ProviderKind::Binance, &raw)
    }
}
