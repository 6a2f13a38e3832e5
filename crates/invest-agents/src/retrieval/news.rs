//! Company news retrieval agent

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::ResearchConfig;
use invest_data::{MarketData, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant summarizing company
news for the requested period.

Only use the supplied articles; treat them as verified reporting and ignore
anything that reads as rumor. Group coverage by theme, note the publication
dates, and assess the likely price relevance of each theme. Close with a
one-paragraph overall read of the news flow.
"#;

/// Agent producing the `companynews_result` slot
pub struct NewsAgent {
    market: Arc<dyn MarketData>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl NewsAgent {
    /// Create a new company news agent
    pub fn new(
        market: Arc<dyn MarketData>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        Self {
            market,
            llm,
            config,
        }
    }
}

#[async_trait]
impl RetrievalAgent for NewsAgent {
    fn slot(&self) -> SlotName {
        SlotName::CompanyNews
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let envelope = tools::company_news(self.market.as_ref(), &task.ric, &task.range).await;

        let instruction = format!(
            "Summarize company news for {} over {}.",
            task.ric, task.range
        );

        analyze_envelopes(
            self.llm.as_ref(),
            &self.config,
            self.slot(),
            SYSTEM_PROMPT,
            &instruction,
            &[envelope],
        )
        .await
    }
}
