//! Market-data API tool functions

use crate::market::{FilingDocument, MarketData};
use invest_core::{DateRange, Ric, ToolEnvelope};
use tracing::warn;

/// Form types whose documents are fetched in full
const KEPT_FILING_FORMS: [&str; 2] = ["10-Q", "8-K"];

fn envelope_from<T: serde::Serialize>(
    function: &str,
    result: crate::Result<T>,
) -> ToolEnvelope {
    match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(report) => ToolEnvelope::success(function, report),
            Err(e) => ToolEnvelope::error(function, format!("unserializable result: {e}")),
        },
        Err(e) => {
            warn!(function, error = %e, "Market-data call failed");
            ToolEnvelope::error(function, e.to_string())
        }
    }
}

/// Company news for the symbol over the range
pub async fn company_news(
    market: &dyn MarketData,
    symbol: &Ric,
    range: &DateRange,
) -> ToolEnvelope {
    envelope_from(
        "company_news",
        market.company_news(symbol.as_str(), range).await,
    )
}

/// Company profile for the symbol
pub async fn company_profile(market: &dyn MarketData, symbol: &Ric) -> ToolEnvelope {
    envelope_from("company_profile", market.company_profile(symbol.as_str()).await)
}

/// Basic financial metrics for the symbol
pub async fn basic_financials(market: &dyn MarketData, symbol: &Ric) -> ToolEnvelope {
    envelope_from(
        "basic_financials",
        market.basic_financials(symbol.as_str()).await,
    )
}

/// Insider sentiment for the symbol over the range
pub async fn insider_sentiment(
    market: &dyn MarketData,
    symbol: &Ric,
    range: &DateRange,
) -> ToolEnvelope {
    envelope_from(
        "insider_sentiment",
        market.insider_sentiment(symbol.as_str(), range).await,
    )
}

/// Financials as reported for the symbol
pub async fn financials_reported(market: &dyn MarketData, symbol: &Ric) -> ToolEnvelope {
    envelope_from(
        "financials_reported",
        market.financials_reported(symbol.as_str()).await,
    )
}

/// SEC filings for the symbol over the range, with document text attached
///
/// Only 10-Q and 8-K forms are kept; each kept filing's report URL is
/// dereferenced and the fetched text attached. A single unreachable document
/// does not fail the call.
pub async fn sec_filings(
    market: &dyn MarketData,
    symbol: &Ric,
    range: &DateRange,
) -> ToolEnvelope {
    let filings = match market.filings(symbol.as_str(), range).await {
        Ok(filings) => filings,
        Err(e) => {
            warn!(function = "sec_filings", error = %e, "Market-data call failed");
            return ToolEnvelope::error("sec_filings", e.to_string());
        }
    };

    let kept: Vec<_> = filings
        .into_iter()
        .filter(|f| KEPT_FILING_FORMS.contains(&f.form.as_str()))
        .collect();

    // Documents are fetched concurrently; the client's rate limiter still
    // bounds the upstream request rate
    let fetched = futures::future::join_all(
        kept.iter().map(|filing| market.fetch_document(&filing.report_url)),
    )
    .await;

    let documents: Vec<FilingDocument> = kept
        .into_iter()
        .zip(fetched)
        .map(|(filing, result)| {
            let report = match result {
                Ok(text) => text,
                Err(e) => {
                    warn!(url = %filing.report_url, error = %e, "Filing document fetch failed");
                    format!("document unavailable: {e}")
                }
            };

            FilingDocument {
                access_number: filing.access_number,
                symbol: filing.symbol,
                form: filing.form,
                filed_date: filing.filed_date,
                report,
            }
        })
        .collect();

    match serde_json::to_value(documents) {
        Ok(report) => ToolEnvelope::success("sec_filings", report),
        Err(e) => ToolEnvelope::error("sec_filings", format!("unserializable result: {e}")),
    }
}
