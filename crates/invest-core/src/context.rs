//! Execution context for agents
//!
//! The `Context` struct carries per-analysis state between the hosting runtime
//! and the pipeline: the session, the resolved identifier, and the effective
//! date parameters. It is a flexible key-value store with typed accessors for
//! the keys the pipeline actually reads and writes.

use crate::types::{DateRange, FiscalYear, Ric};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Session ID for tracking
    pub const SESSION_ID: &str = "session_id";
    /// Free-text company name under analysis
    pub const COMPANY: &str = "company";
    /// Resolved canonical identifier
    pub const RIC: &str = "ric";
    /// Effective date range
    pub const DATE_RANGE: &str = "date_range";
    /// Effective fiscal year
    pub const FISCAL_YEAR: &str = "fiscal_year";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use invest_core::Context;
///
/// let ctx = Context::new().with_session_id("session-123");
/// assert_eq!(ctx.session_id(), Some("session-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Set the company name under analysis
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.insert(keys::COMPANY, serde_json::json!(company.into()));
        self
    }

    // =========== Common Accessors ===========

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    /// Get the company name under analysis
    pub fn company(&self) -> Option<&str> {
        self.get(keys::COMPANY).and_then(|v| v.as_str())
    }

    /// Record the resolved identifier
    pub fn set_ric(&mut self, ric: &Ric) {
        self.insert(keys::RIC, serde_json::json!(ric.as_str()));
    }

    /// Get the resolved identifier, if resolution has run
    pub fn ric(&self) -> Option<Ric> {
        self.get(keys::RIC).and_then(|v| v.as_str()).map(Ric::new)
    }

    /// Record the effective date range
    pub fn set_date_range(&mut self, range: &DateRange) -> crate::Result<()> {
        self.insert_typed(keys::DATE_RANGE, range)
    }

    /// Get the effective date range
    pub fn date_range(&self) -> crate::Result<Option<DateRange>> {
        self.get_typed(keys::DATE_RANGE)
    }

    /// Record the effective fiscal year
    pub fn set_fiscal_year(&mut self, year: FiscalYear) {
        self.insert(keys::FISCAL_YEAR, serde_json::json!(year.year()));
    }

    /// Get the effective fiscal year
    pub fn fiscal_year(&self) -> Option<FiscalYear> {
        self.get(keys::FISCAL_YEAR)
            .and_then(serde_json::Value::as_i64)
            .map(|y| FiscalYear(y as i32))
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
