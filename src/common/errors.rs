//! Error types for the application

use thiserror::Error;

use super::types::ProviderKind;

/// Result type alias using our GatewayError
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for price lookups
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No symbol supplied by the caller
    #[error("Symbol is required")]
    MissingSymbol,

    /// Symbol is not present in the supported-symbol registry
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    /// Provider answered with a non-success HTTP status
    #[error("{provider} API error: {status} - {body}")]
    UpstreamStatus {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    /// HTTP request errors (connect, timeout, body read)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Provider answered 2xx but the payload is missing the price or the price is unusable
    #[error("Invalid response from {provider} API: {message}")]
    InvalidResponse {
        provider: ProviderKind,
        message: String,
    },

    /// Error relayed from a remote gateway's `{"error": ...}` body
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The gateway was built without any provider
    #[error("No price providers configured")]
    NoProviders,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Whether the caller is at fault; client errors are never retried
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingSymbol | Self::UnsupportedSymbol(_))
    }

    /// HTTP status reported to callers of the gateway endpoint.
    ///
    /// Upstream statuses are propagated when a provider returned one;
    /// every other upstream failure maps to 502.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingSymbol | Self::UnsupportedSymbol(_) => 400,
            Self::UpstreamStatus { status, .. } | Self::Remote { status, .. } => *status,
            Self::HttpRequest(_) | Self::JsonParse(_) | Self::InvalidResponse { .. } => 502,
            Self::NoProviders | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }
}

/// Validation failures raised by the position calculator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// An input field was left empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An input field could not be parsed as a decimal
    #[error("{field} is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// Entry and stop-loss are equal, the stop distance would be zero
    #[error("stop loss must differ from entry price")]
    ZeroStopDistance,

    /// Leverage of zero or below
    #[error("leverage must be greater than zero")]
    NonPositiveLeverage,

    /// Intermediate value exceeded the decimal range
    #[error("calculation overflowed")]
    Overflow,
}
