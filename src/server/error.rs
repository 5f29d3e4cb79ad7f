use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::common::errors::GatewayError;
use crate::common::types::ErrorResponse;

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        // Upstreams occasionally answer 2xx/3xx on failure paths; never echo a success code
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::BAD_GATEWAY
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::ProviderKind;

    #[test]
    fn test_upstream_status_propagated() {
        let response = GatewayError::UpstreamStatus {
            provider: ProviderKind::CryptoCompare,
            status: 429,
            body: "slow down".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_non_error_upstream_status_becomes_bad_gateway() {
        let response = GatewayError::UpstreamStatus {
            provider: ProviderKind::Binance,
            status: 302,
            body: String::new(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(
            GatewayError::MissingSymbol.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::UnsupportedSymbol("X".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
