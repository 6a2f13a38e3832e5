//! Market-data API interface
//!
//! Symbol lookup, company news, profile, financials, insider sentiment, and
//! SEC filings, each keyed by symbol and optional date range. Concrete
//! implementation: [`crate::FinnhubClient`].

use crate::error::Result;
use async_trait::async_trait;
use invest_core::DateRange;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One candidate from a symbol lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    /// Company description (free text)
    pub description: String,
    /// Display symbol
    pub display_symbol: String,
    /// Tradable symbol, exchange-qualified where applicable
    pub symbol: String,
    /// Security type (e.g. "Common Stock")
    #[serde(rename = "type")]
    pub security_type: String,
}

/// Symbol lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResult {
    /// Number of candidates
    pub count: usize,
    /// Candidate matches
    pub result: Vec<SymbolMatch>,
}

/// One company news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    /// News category
    pub category: String,
    /// Publication time (unix seconds)
    pub datetime: i64,
    /// Headline
    pub headline: String,
    /// Related symbol
    pub related: String,
    /// Publisher
    pub source: String,
    /// Article summary
    pub summary: String,
    /// Article URL
    pub url: String,
}

/// One SEC filing record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filing {
    /// Accession number
    pub access_number: String,
    /// Symbol the filing belongs to
    pub symbol: String,
    /// Form type (e.g. "10-Q", "8-K")
    pub form: String,
    /// Filing date (YYYY-MM-DD)
    pub filed_date: String,
    /// URL of the filed report document
    pub report_url: String,
}

/// A filing with its fetched document text attached
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingDocument {
    /// Accession number
    pub access_number: String,
    /// Symbol the filing belongs to
    pub symbol: String,
    /// Form type
    pub form: String,
    /// Filing date
    pub filed_date: String,
    /// Full document text, or an unavailability note
    pub report: String,
}

/// Market-data API contract
///
/// All calls are read-only and safe to issue concurrently; implementations
/// handle their own rate limiting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Look up candidate symbols for a free-text company name
    async fn symbol_lookup(&self, query: &str) -> Result<LookupResult>;

    /// Company news between the range's start and end dates
    async fn company_news(&self, symbol: &str, range: &DateRange) -> Result<Vec<NewsArticle>>;

    /// Company profile for the symbol
    async fn company_profile(&self, symbol: &str) -> Result<Value>;

    /// Basic financial metrics for the symbol
    async fn basic_financials(&self, symbol: &str) -> Result<Value>;

    /// Insider sentiment for the symbol over the range
    async fn insider_sentiment(&self, symbol: &str, range: &DateRange) -> Result<Value>;

    /// Financials as reported for the symbol
    async fn financials_reported(&self, symbol: &str) -> Result<Value>;

    /// SEC filings for the symbol over the range
    async fn filings(&self, symbol: &str, range: &DateRange) -> Result<Vec<Filing>>;

    /// Fetch the text of a filing document by URL
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_match_parsing() {
        let body = r#"{
            "count": 1,
            "result": [{
                "description": "VODAFONE GROUP PLC",
                "displaySymbol": "VOD.L",
                "symbol": "VOD.L",
                "type": "Common Stock"
            }]
        }"#;
        let parsed: LookupResult = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.count, 1);
        assert_eq!(parsed.result[0].symbol, "VOD.L");
        assert_eq!(parsed.result[0].security_type, "Common Stock");
    }

    #[test]
    fn test_filing_parsing() {
        let body = r#"{
            "accessNumber": "0000320193-25-000057",
            "symbol": "VOD",
            "form": "10-Q",
            "filedDate": "2025-05-02",
            "reportUrl": "https://www.sec.gov/Archives/example.htm"
        }"#;
        let parsed: Filing = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.form, "10-Q");
        assert_eq!(parsed.filed_date, "2025-05-02");
    }
}
