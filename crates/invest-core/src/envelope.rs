//! Uniform result envelope returned by every data tool function
//!
//! Every tool-call boundary in the system returns a `ToolEnvelope`. A failing
//! data source never raises through a retrieval agent's turn; it is converted
//! into an `Error`-status envelope carrying a human-readable reason.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a data tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// The call completed; `report` holds the (possibly empty) result data
    Success,
    /// The call failed; `report` holds a human-readable reason
    Error,
}

/// Result envelope for data tool functions
///
/// `function` is always the name of the tool function that produced the
/// envelope, so a downstream consumer can attribute any row of data (or any
/// failure) to its source without extra bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEnvelope {
    /// Call outcome
    pub status: ToolStatus,
    /// Name of the producing tool function
    pub function: String,
    /// Result data on success, failure reason on error
    pub report: Value,
}

impl ToolEnvelope {
    /// Create a success envelope
    pub fn success(function: impl Into<String>, report: Value) -> Self {
        Self {
            status: ToolStatus::Success,
            function: function.into(),
            report,
        }
    }

    /// Create an error envelope with a human-readable reason
    pub fn error(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            function: function.into(),
            report: Value::String(reason.into()),
        }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// The failure reason, if this is an error envelope
    pub fn error_reason(&self) -> Option<&str> {
        match self.status {
            ToolStatus::Error => self.report.as_str(),
            ToolStatus::Success => None,
        }
    }

    /// Render the report payload as pretty JSON for prompt embedding
    pub fn report_text(&self) -> String {
        match &self.report {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let env = ToolEnvelope::success("vwap", json!([{"ric": "VOD.L"}]));
        assert!(env.is_success());
        assert_eq!(env.function, "vwap");
        assert_eq!(env.error_reason(), None);
    }

    #[test]
    fn test_error_envelope() {
        let env = ToolEnvelope::error("vwap", "connection refused");
        assert!(!env.is_success());
        assert_eq!(env.error_reason(), Some("connection refused"));
    }

    #[test]
    fn test_empty_result_is_success() {
        // A zero-row result set is a successful call, not an error
        let env = ToolEnvelope::success("vwap", json!([]));
        assert!(env.is_success());
        assert_eq!(env.report, json!([]));
    }

    #[test]
    fn test_status_serialization() {
        let env = ToolEnvelope::success("company_details", json!({}));
        let text = serde_json::to_string(&env).unwrap();
        assert!(text.contains("\"status\":\"success\""));
        assert!(text.contains("\"function\":\"company_details\""));

        let back: ToolEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back.status, ToolStatus::Success);
    }
}
