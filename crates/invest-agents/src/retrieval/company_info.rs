//! Company information retrieval agent

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::ResearchConfig;
use invest_data::{MarketData, Warehouse, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant preparing the company
information section of an analyst report.

Combine the warehouse reference details with the market-data profile and
financial metrics into a single picture of the company. Present the company
details as a markdown table, followed by a short commentary covering any
inferred metrics worth an asset manager's attention.

Ignore any time duration for this section; company details are point-in-time.
Do not ask the user questions; return the section directly.
"#;

/// Agent producing the `companyinfo_result` slot
///
/// Draws on four sources: warehouse company details, plus the market-data
/// profile, basic financials, and financials as reported.
pub struct CompanyInfoAgent {
    warehouse: Arc<dyn Warehouse>,
    market: Arc<dyn MarketData>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl CompanyInfoAgent {
    /// Create a new company information agent
    pub fn new(
        warehouse: Arc<dyn Warehouse>,
        market: Arc<dyn MarketData>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        Self {
            warehouse,
            market,
            llm,
            config,
        }
    }
}

#[async_trait]
impl RetrievalAgent for CompanyInfoAgent {
    fn slot(&self) -> SlotName {
        SlotName::CompanyInfo
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let rics = [task.ric.clone()];

        let (details, profile, financials, reported) = tokio::join!(
            tools::company_details(self.warehouse.as_ref(), &rics),
            tools::company_profile(self.market.as_ref(), &task.ric),
            tools::basic_financials(self.market.as_ref(), &task.ric),
            tools::financials_reported(self.market.as_ref(), &task.ric),
        );

        let instruction = format!(
            "Produce the company information section for {}, formatted as a \
             markdown table with commentary.",
            task.ric
        );

        analyze_envelopes(
            self.llm.as_ref(),
            &self.config,
            self.slot(),
            SYSTEM_PROMPT,
            &instruction,
            &[details, profile, financials, reported],
        )
        .await
    }
}
