//! Configuration for a research pipeline instance
//!
//! All credentials and endpoints are resolved once, up front, and the
//! resulting config is passed explicitly to every component that needs it.
//! Nothing reads the environment after construction.

use crate::error::{Error, Result};
use crate::types::FiscalYear;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for research pipeline operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Model used by retrieval agents for per-section analysis
    pub analysis_model: String,

    /// Model used by the synthesis stage for the final report
    pub synthesis_model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Preferred primary-exchange suffix for identifier resolution
    pub exchange_suffix: String,

    /// Fiscal year substituted when none can be determined
    pub fallback_fiscal_year: FiscalYear,

    /// Warehouse query endpoint
    pub warehouse_url: Option<String>,

    /// Bearer token for the warehouse endpoint
    pub warehouse_token: Option<String>,

    /// Market-data API key
    pub market_data_api_key: Option<String>,

    /// Request timeout for external calls
    pub request_timeout: Duration,

    /// TTL for cached identifier resolutions
    pub resolver_cache_ttl: Duration,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            analysis_model: "claude-sonnet-4-5-20250929".to_string(),
            synthesis_model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            exchange_suffix: ".L".to_string(),
            fallback_fiscal_year: FiscalYear::FALLBACK,
            warehouse_url: None,
            warehouse_token: None,
            market_data_api_key: None,
            request_timeout: Duration::from_secs(30),
            resolver_cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl ResearchConfig {
    /// Create a new configuration builder
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::default()
    }

    /// Load credentials and endpoints from the environment
    ///
    /// Reads `WAREHOUSE_URL`, `WAREHOUSE_TOKEN`, and `MARKET_DATA_API_KEY`.
    /// Must run before any tool function executes.
    pub fn with_env_credentials(mut self) -> Self {
        if let Ok(url) = std::env::var("WAREHOUSE_URL") {
            self.warehouse_url = Some(url);
        }
        if let Ok(token) = std::env::var("WAREHOUSE_TOKEN") {
            self.warehouse_token = Some(token);
        }
        if let Ok(key) = std::env::var("MARKET_DATA_API_KEY") {
            self.market_data_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be greater than 0".to_string()));
        }

        if self.exchange_suffix.is_empty() {
            return Err(Error::Config(
                "exchange_suffix must not be empty".to_string(),
            ));
        }

        if self.warehouse_token.is_some() && self.warehouse_url.is_none() {
            return Err(Error::Config(
                "warehouse_token set without warehouse_url".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ResearchConfig
#[derive(Debug, Default)]
pub struct ResearchConfigBuilder {
    analysis_model: Option<String>,
    synthesis_model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    exchange_suffix: Option<String>,
    fallback_fiscal_year: Option<FiscalYear>,
    warehouse_url: Option<String>,
    warehouse_token: Option<String>,
    market_data_api_key: Option<String>,
    request_timeout: Option<Duration>,
    resolver_cache_ttl: Option<Duration>,
}

impl ResearchConfigBuilder {
    /// Set the per-section analysis model
    pub fn analysis_model(mut self, model: impl Into<String>) -> Self {
        self.analysis_model = Some(model.into());
        self
    }

    /// Set the report synthesis model
    pub fn synthesis_model(mut self, model: impl Into<String>) -> Self {
        self.synthesis_model = Some(model.into());
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the preferred primary-exchange suffix
    pub fn exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = Some(suffix.into());
        self
    }

    /// Set the fallback fiscal year
    pub fn fallback_fiscal_year(mut self, year: FiscalYear) -> Self {
        self.fallback_fiscal_year = Some(year);
        self
    }

    /// Set the warehouse query endpoint
    pub fn warehouse_url(mut self, url: impl Into<String>) -> Self {
        self.warehouse_url = Some(url.into());
        self
    }

    /// Set the warehouse bearer token
    pub fn warehouse_token(mut self, token: impl Into<String>) -> Self {
        self.warehouse_token = Some(token.into());
        self
    }

    /// Set the market-data API key
    pub fn market_data_api_key(mut self, key: impl Into<String>) -> Self {
        self.market_data_api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the resolver cache TTL
    pub fn resolver_cache_ttl(mut self, ttl: Duration) -> Self {
        self.resolver_cache_ttl = Some(ttl);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ResearchConfig> {
        let defaults = ResearchConfig::default();

        let config = ResearchConfig {
            analysis_model: self.analysis_model.unwrap_or(defaults.analysis_model),
            synthesis_model: self.synthesis_model.unwrap_or(defaults.synthesis_model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            exchange_suffix: self.exchange_suffix.unwrap_or(defaults.exchange_suffix),
            fallback_fiscal_year: self
                .fallback_fiscal_year
                .unwrap_or(defaults.fallback_fiscal_year),
            warehouse_url: self.warehouse_url,
            warehouse_token: self.warehouse_token,
            market_data_api_key: self.market_data_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            resolver_cache_ttl: self
                .resolver_cache_ttl
                .unwrap_or(defaults.resolver_cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResearchConfig::default();
        assert_eq!(config.exchange_suffix, ".L");
        assert_eq!(config.fallback_fiscal_year, FiscalYear::FALLBACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ResearchConfig::builder()
            .analysis_model("test-model")
            .exchange_suffix(".N")
            .max_tokens(1024)
            .warehouse_url("https://warehouse.example/query")
            .build()
            .unwrap();

        assert_eq!(config.analysis_model, "test-model");
        assert_eq!(config.exchange_suffix, ".N");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_validation_token_without_url() {
        let config = ResearchConfig {
            warehouse_token: Some("secret".to_string()),
            warehouse_url: None,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_max_tokens() {
        let result = ResearchConfig::builder().max_tokens(0).build();
        assert!(result.is_err());
    }
}
