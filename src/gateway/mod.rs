//! Price source gateway
//!
//! Resolves a canonical symbol to a price by walking an ordered chain of
//! provider adapters. Each provider gets exactly one attempt; the first
//! success wins and the last failure is reported when the chain runs out.
//!
//! ```text
//!   symbol ──► validate ──► registry lookup ──► Binance(BTCUSDT)
//!                │                                   │ fail
//!                ▼                                   ▼
//!          400 (no calls)                  CryptoCompare(BTC, USD)
//!                                                    │ fail
//!                                                    ▼
//!                                   upstream status, else 502
//! ```

pub mod symbols;

pub use symbols::{normalize_symbol, SymbolEntry, SymbolRegistry};

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::common::errors::{GatewayError, Result};
use crate::common::traits::{PriceProvider, PriceSource};
use crate::common::types::PriceQuote;
use crate::config::types::ProvidersConfig;
use crate::providers;

/// Symbol validation plus provider fallback
pub struct PriceGateway {
    providers: Vec<Box<dyn PriceProvider>>,
    symbols: SymbolRegistry,
}

impl PriceGateway {
    /// Create a gateway over an ordered provider chain
    pub fn new(providers: Vec<Box<dyn PriceProvider>>, symbols: SymbolRegistry) -> Self {
        Self { providers, symbols }
    }

    /// Create the default Binance → CryptoCompare gateway
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(
            providers::default_chain(config)?,
            SymbolRegistry::default(),
        ))
    }

    pub fn symbols(&self) -> &SymbolRegistry {
        &self.symbols
    }

    /// Latest price for `symbol`, trying each provider once in order
    #[instrument(skip(self))]
    pub async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        let canonical = normalize_symbol(symbol).ok_or(GatewayError::MissingSymbol)?;
        let entry = self
            .symbols
            .get(&canonical)
            .ok_or_else(|| GatewayError::UnsupportedSymbol(canonical.clone()))?;

        let mut last_error = None;
        for provider in &self.providers {
            let kind = provider.kind();
            let native_id = entry.native_id(kind);

            match provider.fetch_price(native_id, &entry.quote).await {
                Ok(price) => {
                    info!("Got {} price from {}: {}", canonical, kind, price);
                    return Ok(PriceQuote::new(canonical, price, kind));
                }
                Err(e) => {
                    warn!("{} lookup for {} failed: {}", kind, native_id, e);
                    last_error = Some(e);
                }
            }
        }

        let err = last_error.unwrap_or(GatewayError::NoProviders);
        error!("All providers failed for {}: {}", canonical, err);
        Err(err)
    }
}

#[async_trait]
impl PriceSource for PriceGateway {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote> {
        PriceGateway::fetch_price(self, symbol).await
    }
}
