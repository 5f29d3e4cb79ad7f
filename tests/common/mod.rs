//! Common test utilities and fixtures
#![allow(dead_code)]

use position_calculator::config::types::ProvidersConfig;
use position_calculator::server::{self, AppState};
use position_calculator::{CapitalDefaults, PriceGateway};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Address nothing listens on; connections are refused immediately
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Gateway wired to the given provider base URLs
pub fn gateway_for(binance_url: &str, cryptocompare_url: &str) -> PriceGateway {
    let config = ProvidersConfig {
        binance_url: binance_url.to_string(),
        cryptocompare_url: cryptocompare_url.to_string(),
        request_timeout_seconds: 5,
    };
    PriceGateway::from_config(&config).expect("Failed to build gateway")
}

pub fn default_capital() -> CapitalDefaults {
    CapitalDefaults {
        total_capital: "1000".to_string(),
        risk: Some("1".to_string()),
    }
}

/// Start the HTTP gateway on an ephemeral port and return its base URL
pub async fn spawn_server(gateway: PriceGateway, capital: CapitalDefaults) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    let state = AppState::new(gateway, capital);

    tokio::spawn(server::serve_on(listener, state, std::future::pending()));
    format!("http://{}", addr)
}

/// Binance answers `symbol` with `body` and `status`, expecting `calls` hits
pub async fn mount_binance(
    server: &MockServer,
    symbol: &str,
    status: u16,
    body: serde_json::Value,
    calls: u64,
) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// CryptoCompare answers `fsym` in USD with `body` and `status`, expecting `calls` hits
pub async fn mount_cryptocompare(
    server: &MockServer,
    fsym: &str,
    status: u16,
    body: serde_json::Value,
    calls: u64,
) {
    Mock::given(method("GET"))
        .and(path("/data/price"))
        .and(query_param("fsym", fsym))
        .and(query_param("tsyms", "USD"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Sample upstream responses
pub mod api_responses {
    use serde_json::{json, Value};

    pub fn binance_ticker(symbol: &str, price: &str) -> Value {
        json!({ "symbol": symbol, "price": price })
    }

    pub fn binance_invalid_symbol() -> Value {
        json!({ "code": -1121, "msg": "Invalid symbol." })
    }

    pub fn cryptocompare_price(price: f64) -> Value {
        json!({ "USD": price })
    }

    pub fn cryptocompare_error() -> Value {
        json!({
            "Response": "Error",
            "Message": "fsym param is invalid",
            "HasWarning": false
        })
    }
}
