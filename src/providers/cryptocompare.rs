//! CryptoCompare single-price adapter (fallback provider)

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::messages::SinglePriceResponse;
use super::{build_url, ensure_success, parse_price};
use crate::common::errors::{GatewayError, Result};
use crate::common::traits::PriceProvider;
use crate::common::types::ProviderKind;

/// REST client for the CryptoCompare `data/price` endpoint
#[derive(Debug, Clone)]
pub struct CryptoCompareClient {
    client: Client,
    base_url: String,
}

impl CryptoCompareClient {
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
impl PriceProvider for CryptoCompareClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::CryptoCompare
    }

    #[instrument(skip(self))]
    async fn fetch_price(&self, native_id: &str, quote: &str) -> Result<Decimal> {
        let url = build_url(
            &self.base_url,
            "/data/price",
            &[("fsym", native_id), ("tsyms", quote)],
        )?;
        debug!("Fetching price from: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let body = ensure_success(ProviderKind::CryptoCompare, response).await?;

        let data: SinglePriceResponse = serde_json::from_str(&body)?;
        let raw = data
            .price_for(quote)
            .ok_or_else(|| GatewayError::InvalidResponse {
                provider: ProviderKind::CryptoCompare,
                message: data
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("no {} price in response", quote)),
            })?;

        parse_price(ProviderKind::CryptoCompare, &raw)
    }
}
