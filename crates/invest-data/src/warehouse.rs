//! Warehouse query interface
//!
//! The warehouse is an external collaborator: it accepts a parameterized query
//! string and returns tabular results as JSON rows. Read-only; the pipeline
//! issues one query per tool invocation with no retries.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Read-only tabular query interface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a query and return the result rows as JSON objects
    ///
    /// An empty `Vec` is a successful zero-row result, not an error.
    async fn query(&self, sql: &str) -> Result<Vec<Value>>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    rows: Vec<Value>,
}

/// HTTP-backed warehouse client
///
/// Posts the query text to a configured endpoint and expects a JSON body of
/// the form `{"rows": [...]}`.
pub struct HttpWarehouse {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpWarehouse {
    /// Create a new client for the given query endpoint
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }
}

#[async_trait]
impl Warehouse for HttpWarehouse {
    async fn query(&self, sql: &str) -> Result<Vec<Value>> {
        debug!(url = %self.url, "Executing warehouse query");

        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "query": sql }));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Warehouse(format!("HTTP {status}: {body}")));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| DataError::Warehouse(format!("malformed query response: {e}")))?;

        debug!(row_count = parsed.rows.len(), "Warehouse query completed");
        Ok(parsed.rows)
    }
}
