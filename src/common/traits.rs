//! Trait definitions for price providers and price sources

use async_trait::async_trait;
use rust_decimal::Decimal;

#[cfg(test)]
use mockall::automock;

use super::errors::Result;
use super::types::{PriceQuote, ProviderKind};

/// Adapter for a single upstream market-data API (Binance, CryptoCompare, etc.)
///
/// Implementations take the provider's own identifier for the asset, which the
/// gateway resolves from the symbol registry before calling.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Which provider this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Fetch the latest price for a provider-native identifier
    ///
    /// # Arguments
    /// * `native_id` - Identifier in the provider's scheme (e.g. `BTCUSDT` or `BTC`)
    /// * `quote` - Quote currency requested from providers that take one separately
    async fn fetch_price(&self, native_id: &str, quote: &str) -> Result<Decimal>;
}

/// Anything that can turn a canonical symbol into a price quote
///
/// Implemented by the in-process gateway and by the HTTP client for a remote
/// gateway, so the live price feed can run against either.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote>;
}
