use serde_json::Value;
use thiserror::Error;

/// Errors raised by the core. Not-found lookups are never errors: reads return
/// `None` and writes become no-ops.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Identifier must be a string or an integer index, got {0}")]
    InvalidIdentifierType(Value),

    #[error("Invalid type for {param}: expected {expected}, got {value}")]
    InvalidType {
        param: &'static str,
        expected: &'static str,
        value: Value,
    },

    #[error("Invalid format for {param}: '{value}'")]
    InvalidFormat { param: &'static str, value: String },

    #[error("Invalid value for {param}: '{value}'. Allowed: {allowed}")]
    InvalidValue {
        param: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Weather request failed with status {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse weather response JSON")]
    Parse(#[from] serde_json::Error),

    #[error("Weather response is not a JSON object, got {0}")]
    InvalidDocument(&'static str),

    #[error("Cannot parse '{value}' as a timestamp")]
    InvalidTimestamp { value: String },

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Short type name of a JSON value, for diagnostics.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
