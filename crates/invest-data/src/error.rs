//! Error types for data source operations

use thiserror::Error;

/// Data source specific errors
#[derive(Debug, Error)]
pub enum DataError {
    /// Warehouse query failed
    #[error("Warehouse error: {0}")]
    Warehouse(String),

    /// Market-data API request failed
    #[error("API error: {0}")]
    Api(String),

    /// Rate limit exceeded for a provider
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Credentials missing for a data source
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed document URL in a filing record
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for data source operations
pub type Result<T> = std::result::Result<T, DataError>;

impl From<DataError> for invest_core::Error {
    fn from(err: DataError) -> Self {
        invest_core::Error::DataSource(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::Warehouse("query timed out".to_string());
        assert_eq!(err.to_string(), "Warehouse error: query timed out");

        let err = DataError::RateLimitExceeded {
            provider: "finnhub".to_string(),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded for finnhub");
    }

    #[test]
    fn test_error_conversion() {
        let data_err = DataError::Api("boom".to_string());
        let core_err: invest_core::Error = data_err.into();
        assert!(core_err.to_string().contains("API error: boom"));
    }
}
