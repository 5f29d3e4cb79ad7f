//! Providers module - REST adapters for the upstream market-data APIs

pub mod binance;
pub mod cryptocompare;
pub mod messages;

pub use binance::BinanceClient;
pub use cryptocompare::CryptoCompareClient;

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::common::errors::{GatewayError, Result};
use crate::common::traits::PriceProvider;
use crate::common::types::ProviderKind;
use crate::config::types::ProvidersConfig;

/// Build the default provider chain: Binance first, CryptoCompare as fallback
pub fn default_chain(config: &ProvidersConfig) -> Result<Vec<Box<dyn PriceProvider>>> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);
    Ok(vec![
        Box::new(BinanceClient::with_timeout(&config.binance_url, timeout)?),
        Box::new(CryptoCompareClient::with_timeout(&config.cryptocompare_url, timeout)?),
    ])
}

/// Join a base URL and path, percent-encoding the query parameters
pub(crate) fn build_url(base_url: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    Url::parse_with_params(&format!("{}{}", base_url, path), params)
        .map_err(|e| GatewayError::Configuration(format!("Invalid provider URL: {}", e)))
}

/// Read the body of a response, turning non-success statuses into errors
pub(crate) async fn ensure_success(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::UpstreamStatus {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.text().await?)
}

/// Parse a provider price, accepting plain and scientific notation
pub(crate) fn parse_price(provider: ProviderKind, raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    let price = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| GatewayError::InvalidResponse {
            provider,
            message: format!("Invalid price {:?}: {}", raw, e),
        })?;

    if price <= Decimal::ZERO {
        return Err(GatewayError::InvalidResponse {
            provider,
            message: format!("Non-positive price: {}", price),
        });
    }
    Ok(price)
}
