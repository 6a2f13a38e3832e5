//! Data tool functions
//!
//! Stateless async functions, one per data category. Contract, for every
//! function here:
//!
//! - takes already-resolved identifiers (never free-text company names), plus
//!   an optional date range or fiscal year;
//! - issues exactly one query or API call through the injected client;
//! - always returns a [`ToolEnvelope`] whose `function` field is the
//!   function's own name. Data source failures are caught and converted to
//!   error-status envelopes; a zero-row result is a success.

mod esg;
mod market_data;
mod tick_history;

pub use esg::{esg_env_indicator, esg_gov_indicator, esg_soc_indicator};
pub use market_data::{
    basic_financials, company_news, company_profile, financials_reported, insider_sentiment,
    sec_filings,
};
pub use tick_history::{company_details, market_sentiment, significant_events, vwap};

use crate::warehouse::Warehouse;
use invest_core::{Ric, ToolEnvelope};
use serde_json::Value;
use tracing::warn;

/// Render identifiers as a quoted SQL list: `'VOD.L', 'BT.L'`
pub(crate) fn quoted_list(rics: &[Ric]) -> String {
    rics.iter()
        .map(|ric| format!("'{}'", ric.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run one warehouse query and wrap the outcome in an envelope
pub(crate) async fn run_query(
    warehouse: &dyn Warehouse,
    function: &str,
    sql: String,
) -> ToolEnvelope {
    match warehouse.query(&sql).await {
        Ok(rows) => ToolEnvelope::success(function, Value::Array(rows)),
        Err(e) => {
            warn!(function, error = %e, "Warehouse query failed");
            ToolEnvelope::error(function, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_list() {
        let rics = vec![Ric::new("VOD.L"), Ric::new("BT.L")];
        assert_eq!(quoted_list(&rics), "'VOD.L', 'BT.L'");
        assert_eq!(quoted_list(&[Ric::new("VOD.L")]), "'VOD.L'");
    }
}
