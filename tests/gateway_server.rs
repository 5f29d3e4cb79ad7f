//! HTTP gateway tests
//!
//! The gateway runs on an ephemeral port with wiremock upstreams behind it
//! and is queried with plain reqwest and with `GatewayClient`.

mod common;

use common::api_responses::*;
use common::{default_capital, gateway_for, mount_binance, mount_cryptocompare, spawn_server, UNREACHABLE_URL};
use position_calculator::common::traits::PriceSource;
use position_calculator::{CapitalDefaults, GatewayClient, GatewayError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::MockServer;

async fn get_json(url: &str) -> (u16, Value) {
    let response = reqwest::get(url).await.expect("request failed");
    let status = response.status().as_u16();
    let body = response.json().await.expect("body is not JSON");
    (status, body)
}

// ============================================================================
// /api/crypto-price
// ============================================================================

#[tokio::test]
async fn test_price_endpoint_success() {
    let binance = MockServer::start().await;
    mount_binance(&binance, "BTCUSDT", 200, binance_ticker("BTCUSDT", "67012.34000000"), 1).await;
    let base = spawn_server(gateway_for(&binance.uri(), UNREACHABLE_URL), default_capital()).await;

    let (status, body) = get_json(&format!("{}/api/crypto-price?symbol=BTCUSDT", base)).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "price": "67012.34" }));
}

#[tokio::test]
async fn test_price_endpoint_missing_symbol() {
    let base = spawn_server(gateway_for(UNREACHABLE_URL, UNREACHABLE_URL), default_capital()).await;

    let (status, body) = get_json(&format!("{}/api/crypto-price", base)).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Symbol is required" }));

    let (status, _) = get_json(&format!("{}/api/crypto-price?symbol=", base)).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_price_endpoint_unsupported_symbol() {
    let binance = MockServer::start().await;
    let base = spawn_server(gateway_for(&binance.uri(), UNREACHABLE_URL), default_capital()).await;

    let (status, body) = get_json(&format!("{}/api/crypto-price?symbol=DOGEUSDT", base)).await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Unsupported symbol: DOGEUSDT" }));
    assert!(binance.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_price_endpoint_propagates_upstream_status() {
    let binance = MockServer::start().await;
    let cryptocompare = MockServer::start().await;
    mount_binance(&binance, "ETHUSDT", 503, json!({}), 1).await;
    mount_cryptocompare(&cryptocompare, "ETH", 503, json!({ "Message": "maintenance" }), 1).await;
    let base = spawn_server(gateway_for(&binance.uri(), &cryptocompare.uri()), default_capital()).await;

    let (status, body) = get_json(&format!("{}/api/crypto-price?symbol=ETHUSDT", base)).await;

    assert_eq!(status, 503);
    assert!(body["error"].as_str().unwrap().starts_with("CryptoCompare API error: 503"));
}

#[tokio::test]
async fn test_price_endpoint_unreachable_providers() {
    let base = spawn_server(gateway_for(UNREACHABLE_URL, UNREACHABLE_URL), default_capital()).await;

    let (status, body) = get_json(&format!("{}/api/crypto-price?symbol=BTCUSDT", base)).await;

    assert_eq!(status, 502);
    assert!(body["error"].is_string());
}

// ============================================================================
// Other endpoints
// ============================================================================

#[tokio::test]
async fn test_total_capital_endpoint() {
    let capital = CapitalDefaults {
        total_capital: "2500".to_string(),
        risk: Some("0.5".to_string()),
    };
    let base = spawn_server(gateway_for(UNREACHABLE_URL, UNREACHABLE_URL), capital).await;

    let (status, body) = get_json(&format!("{}/api/total-capital", base)).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "totalCapital": "2500", "risk": "0.5" }));
}

#[tokio::test]
async fn test_symbols_and_health() {
    let base = spawn_server(gateway_for(UNREACHABLE_URL, UNREACHABLE_URL), default_capital()).await;

    let (_, symbols) = get_json(&format!("{}/api/symbols", base)).await;
    assert_eq!(
        symbols,
        json!([
            { "symbol": "BTCUSDT", "label": "BTC/USDT" },
            { "symbol": "ETHUSDT", "label": "ETH/USDT" }
        ])
    );

    let (status, health) = get_json(&format!("{}/health", base)).await;
    assert_eq!(status, 200);
    assert_eq!(health, json!({ "status": "ok" }));
}

// ============================================================================
// GatewayClient
// ============================================================================

#[tokio::test]
async fn test_gateway_client_round_trip() {
    let cryptocompare = MockServer::start().await;
    mount_cryptocompare(&cryptocompare, "ETH", 200, cryptocompare_price(3456.78), 1).await;
    let base = spawn_server(gateway_for(UNREACHABLE_URL, &cryptocompare.uri()), default_capital()).await;
    let client = GatewayClient::new(&base).unwrap();

    let quote = client.fetch_price("ETHUSDT").await.unwrap();
    assert_eq!(quote.price, dec!(3456.78));
    assert_eq!(quote.provider, None);

    let defaults = client.get_total_capital().await.unwrap();
    assert_eq!(defaults, default_capital());

    let symbols = client.get_symbols().await.unwrap();
    assert_eq!(symbols.len(), 2);
}

#[tokio::test]
async fn test_gateway_client_errors() {
    let base = spawn_server(gateway_for(UNREACHABLE_URL, UNREACHABLE_URL), default_capital()).await;
    let client = GatewayClient::new(&base).unwrap();

    let err = client.fetch_price("DOGEUSDT").await.unwrap_err();
    assert!(matches!(err, GatewayError::UnsupportedSymbol(_)));

    let err = client.fetch_price("BTCUSDT").await.unwrap_err();
    assert_eq!(err.status_code(), 502);
}
