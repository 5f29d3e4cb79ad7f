//! Position Calculator Library
//!
//! Position sizing for leveraged trades, a price gateway that falls back
//! across public market-data APIs, and a live-updating calculator session.

pub mod calculator;
pub mod common;
pub mod config;
pub mod feed;
pub mod gateway;
pub mod providers;
pub mod server;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use calculator::{calculate, CalculatorInput, CalculatorResult};
pub use common::errors::{CalcError, GatewayError, Result};
pub use common::traits::{PriceProvider, PriceSource};
pub use common::types::{CapitalDefaults, PriceQuote, ProviderKind, SymbolInfo};
pub use config::types::AppConfig;
pub use feed::{GatewayClient, LivePriceFeed};
pub use gateway::{PriceGateway, SymbolRegistry};
pub use providers::{BinanceClient, CryptoCompareClient};
pub use session::Session;
pub use view::{CalculatorView, FeedCommand, FeedStatus, Field, TriggerPolicy};
