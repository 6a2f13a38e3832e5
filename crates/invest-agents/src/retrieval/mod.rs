//! Retrieval agents, one per data category
//!
//! Every agent is a deterministic function over an already-resolved task:
//! it calls its data tool function(s) with the task's identifier and
//! parameters, then asks the LLM for a prose analysis of the returned data.
//! `retrieve` does not return errors: a failing data source or model
//! degrades to a section carrying an explicit note, never an error that
//! could cancel sibling agents.

mod company_info;
mod esg;
mod events;
mod news;
mod sentiment;
mod vwap;

pub use company_info::CompanyInfoAgent;
pub use esg::{EsgDimension, EsgIndicatorAgent};
pub use events::SignificantEventsAgent;
pub use news::NewsAgent;
pub use sentiment::SentimentAgent;
pub use vwap::VwapAgent;

use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::{DateRange, FiscalYear, ResearchConfig, Ric, ToolEnvelope};
use invest_llm::{CompletionRequest, LlmProvider};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Parameters for one retrieval pass, resolved once by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalTask {
    /// Canonical identifier under analysis
    pub ric: Ric,
    /// Effective date range
    pub range: DateRange,
    /// Effective fiscal year for ESG lookups
    pub fiscal_year: FiscalYear,
    /// Whether the fiscal year was substituted from the documented fallback
    pub fiscal_year_defaulted: bool,
}

/// Section outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionStatus {
    /// Data was retrieved and analyzed
    Ok,
    /// Data could not be retrieved; `body` explains why
    Unavailable,
}

/// One retrieval agent's named output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionReport {
    /// The slot this section belongs to
    pub slot: SlotName,
    /// Section outcome
    pub status: SectionStatus,
    /// Markdown body (analysis, or an unavailability note)
    pub body: String,
    /// Caveat attached to the section (e.g. a defaulted parameter)
    pub annotation: Option<String>,
}

impl SectionReport {
    /// A populated section
    pub fn ok(slot: SlotName, body: impl Into<String>) -> Self {
        Self {
            slot,
            status: SectionStatus::Ok,
            body: body.into(),
            annotation: None,
        }
    }

    /// A missing-data section with a user-visible reason
    pub fn unavailable(slot: SlotName, reason: impl Into<String>) -> Self {
        Self {
            slot,
            status: SectionStatus::Unavailable,
            body: format!("Data unavailable: {}", reason.into()),
            annotation: None,
        }
    }

    /// Attach a caveat to the section
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

/// A data-category retrieval agent
///
/// Agents execute independently and concurrently; they share no mutable
/// state and must not depend on each other's output.
#[async_trait]
pub trait RetrievalAgent: Send + Sync {
    /// The slot this agent populates
    fn slot(&self) -> SlotName;

    /// Fetch and analyze this agent's data category
    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport;
}

/// Shared fetch-then-analyze step
///
/// Builds one prompt from the envelopes and asks the model for the section
/// analysis. If every envelope failed the section is unavailable; if the
/// model fails, the section degrades to the raw data with a note, so a
/// flaky LLM does not discard successfully fetched data.
pub(crate) async fn analyze_envelopes(
    llm: &dyn LlmProvider,
    config: &ResearchConfig,
    slot: SlotName,
    system_prompt: &str,
    instruction: &str,
    envelopes: &[ToolEnvelope],
) -> SectionReport {
    let failed: Vec<&ToolEnvelope> = envelopes.iter().filter(|e| !e.is_success()).collect();

    if failed.len() == envelopes.len() {
        let reasons = failed
            .iter()
            .map(|e| format!("{}: {}", e.function, e.error_reason().unwrap_or("unknown")))
            .collect::<Vec<_>>()
            .join("; ");
        return SectionReport::unavailable(slot, reasons);
    }

    let mut data_block = String::new();
    for envelope in envelopes {
        if envelope.is_success() {
            data_block.push_str(&format!(
                "### {}\n{}\n\n",
                envelope.function,
                envelope.report_text()
            ));
        } else {
            data_block.push_str(&format!(
                "### {} (unavailable)\n{}\n\n",
                envelope.function,
                envelope.error_reason().unwrap_or("unknown")
            ));
        }
    }

    let request = CompletionRequest::builder(&config.analysis_model)
        .system(system_prompt)
        .prompt(format!("{instruction}\n\nData:\n\n{data_block}"))
        .max_tokens(config.max_tokens)
        .temperature(config.temperature)
        .build();

    let mut section = match llm.complete(request).await {
        Ok(response) => SectionReport::ok(slot, response.text),
        Err(e) => {
            warn!(slot = %slot, error = %e, "Section analysis failed, falling back to raw data");
            SectionReport::ok(slot, data_block)
                .with_annotation(format!("analysis unavailable ({e}); raw data shown"))
        }
    };

    if !failed.is_empty() && section.annotation.is_none() {
        let names = failed
            .iter()
            .map(|e| e.function.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        section = section.with_annotation(format!("partial data: {names} unavailable"));
    }

    section
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic LLM provider for agent tests

    use async_trait::async_trait;
    use invest_llm::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};

    /// Echoes the prompt back, prefixed, so tests can assert on what the
    /// agent sent to the model
    pub struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> invest_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                text: format!("ANALYSIS OF: {}", request.prompt),
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    /// Always fails, for degradation tests
    pub struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> invest_llm::Result<CompletionResponse> {
            Err(invest_llm::LlmError::RequestFailed("model offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{EchoProvider, FailingProvider};
    use super::*;

    #[tokio::test]
    async fn test_all_envelopes_failed_is_unavailable() {
        let config = ResearchConfig::default();
        let envelopes = vec![ToolEnvelope::error("vwap", "connection refused")];

        let section = analyze_envelopes(
            &EchoProvider,
            &config,
            SlotName::Vwap,
            "system",
            "analyze",
            &envelopes,
        )
        .await;

        assert_eq!(section.status, SectionStatus::Unavailable);
        assert!(section.body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_partial_failure_is_annotated() {
        let config = ResearchConfig::default();
        let envelopes = vec![
            ToolEnvelope::success("company_details", serde_json::json!([{"ric": "VOD.L"}])),
            ToolEnvelope::error("company_profile", "HTTP 500"),
        ];

        let section = analyze_envelopes(
            &EchoProvider,
            &config,
            SlotName::CompanyInfo,
            "system",
            "analyze",
            &envelopes,
        )
        .await;

        assert_eq!(section.status, SectionStatus::Ok);
        assert!(section.annotation.unwrap().contains("company_profile"));
    }

    #[tokio::test]
    async fn test_llm_failure_degrades_to_raw_data() {
        let config = ResearchConfig::default();
        let envelopes = vec![ToolEnvelope::success(
            "vwap",
            serde_json::json!([{"ric": "VOD.L", "vwap": 72.5}]),
        )];

        let section = analyze_envelopes(
            &FailingProvider,
            &config,
            SlotName::Vwap,
            "system",
            "analyze",
            &envelopes,
        )
        .await;

        assert_eq!(section.status, SectionStatus::Ok);
        assert!(section.body.contains("72.5"));
        assert!(section.annotation.unwrap().contains("analysis unavailable"));
    }
}
