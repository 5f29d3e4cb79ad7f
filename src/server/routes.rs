use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::state::AppState;
use crate::common::errors::GatewayError;
use crate::common::types::{CapitalDefaults, PriceResponse, SymbolInfo};

/// Build the API sub-router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/crypto-price", get(crypto_price))
        .route("/api/total-capital", get(total_capital))
        .route("/api/symbols", get(symbols))
        .route("/health", get(health))
}

#[derive(Debug, Deserialize)]
struct PriceQuery {
    symbol: Option<String>,
}

/// GET /api/crypto-price?symbol=BTCUSDT — Latest price with provider fallback.
async fn crypto_price(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceResponse>, GatewayError> {
    let symbol = query.symbol.ok_or(GatewayError::MissingSymbol)?;
    debug!("Price request for {}", symbol);

    let quote = state.gateway.fetch_price(&symbol).await?;
    Ok(Json(PriceResponse {
        price: quote.price_string(),
    }))
}

/// GET /api/total-capital — Default capital and risk from configuration.
async fn total_capital(State(state): State<Arc<AppState>>) -> Json<CapitalDefaults> {
    Json(state.capital.clone())
}

/// GET /api/symbols — Supported symbols with display labels.
async fn symbols(State(state): State<Arc<AppState>>) -> Json<Vec<SymbolInfo>> {
    Json(state.gateway.symbols().infos())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
