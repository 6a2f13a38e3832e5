//! Finnhub market-data API client
//!
//! Free-tier rate limit: 60 requests per minute, enforced locally so that
//! eight concurrent retrieval agents sharing one client cannot trip the
//! server-side limit.

use crate::error::{DataError, Result};
use crate::market::{Filing, LookupResult, MarketData, NewsArticle};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use invest_core::DateRange;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
const REQUESTS_PER_MINUTE: u32 = 60;

/// Finnhub REST client
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DataError::MissingCredentials(
                "finnhub API key is empty".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build()?;
        let quota = Quota::per_minute(
            NonZeroU32::new(REQUESTS_PER_MINUTE).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            api_key,
            limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        self.limiter.until_ready().await;

        debug!(path, "Finnhub request");
        let response = self
            .client
            .get(format!("{FINNHUB_BASE_URL}/{path}"))
            .query(params)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {}
            401 | 403 => {
                return Err(DataError::MissingCredentials(
                    "finnhub rejected the API key".to_string(),
                ));
            }
            429 => {
                return Err(DataError::RateLimitExceeded {
                    provider: "finnhub".to_string(),
                });
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(DataError::Api(format!("HTTP {status}: {body}")));
            }
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DataError::Api(format!("malformed response: {e}")))
    }
}

#[async_trait]
impl MarketData for FinnhubClient {
    async fn symbol_lookup(&self, query: &str) -> Result<LookupResult> {
        self.get("search", &[("q", query)]).await
    }

    async fn company_news(&self, symbol: &str, range: &DateRange) -> Result<Vec<NewsArticle>> {
        let from = range.start.to_string();
        let to = range.end.to_string();
        self.get(
            "company-news",
            &[("symbol", symbol), ("from", &from), ("to", &to)],
        )
        .await
    }

    async fn company_profile(&self, symbol: &str) -> Result<Value> {
        self.get("stock/profile2", &[("symbol", symbol)]).await
    }

    async fn basic_financials(&self, symbol: &str) -> Result<Value> {
        self.get("stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await
    }

    async fn insider_sentiment(&self, symbol: &str, range: &DateRange) -> Result<Value> {
        let from = range.start.to_string();
        let to = range.end.to_string();
        self.get(
            "stock/insider-sentiment",
            &[("symbol", symbol), ("from", &from), ("to", &to)],
        )
        .await
    }

    async fn financials_reported(&self, symbol: &str) -> Result<Value> {
        self.get("stock/financials-reported", &[("symbol", symbol)])
            .await
    }

    async fn filings(&self, symbol: &str, range: &DateRange) -> Result<Vec<Filing>> {
        let from = range.start.to_string();
        let to = range.end.to_string();
        self.get(
            "stock/filings",
            &[("symbol", symbol), ("from", &from), ("to", &to)],
        )
        .await
    }

    async fn fetch_document(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|e| DataError::InvalidUrl(format!("{url}: {e}")))?;

        // Document URLs point at the filing host, not the API; no token, but
        // the shared limiter still applies.
        self.limiter.until_ready().await;
        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            return Err(DataError::Api(format!(
                "document fetch failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}
