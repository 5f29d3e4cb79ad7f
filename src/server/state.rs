use std::sync::Arc;

use crate::common::errors::Result;
use crate::common::types::CapitalDefaults;
use crate::config::types::AppConfig;
use crate::gateway::PriceGateway;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub gateway: PriceGateway,
    pub capital: CapitalDefaults,
}

impl AppState {
    pub fn new(gateway: PriceGateway, capital: CapitalDefaults) -> Arc<Self> {
        Arc::new(Self { gateway, capital })
    }

    pub fn from_config(config: &AppConfig) -> Result<Arc<Self>> {
        let gateway = PriceGateway::from_config(&config.providers)?;
        Ok(Self::new(gateway, config.capital.to_defaults()))
    }
}
