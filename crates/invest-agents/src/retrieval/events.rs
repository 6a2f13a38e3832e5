//! Significant events retrieval agent

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::ResearchConfig;
use invest_data::{MarketData, Warehouse, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant analyzing significant
corporate developments.

List the significant events in chronological order with their dates, then
analyze their materiality from an asset manager's perspective: which events
could move the valuation, which signal strategic shifts, and which are
routine. Where SEC filing documents are present, fold their contents into
the event narrative rather than listing them separately.
"#;

/// Agent producing the `significantevent_result` slot
///
/// Warehouse significant-development records plus 10-Q/8-K filing documents
/// from the market-data API.
pub struct SignificantEventsAgent {
    warehouse: Arc<dyn Warehouse>,
    market: Arc<dyn MarketData>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl SignificantEventsAgent {
    /// Create a new significant events agent
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
impl RetrievalAgent for SignificantEventsAgent {
    fn slot(&self) -> SlotName {
        SlotName::SignificantEvents
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let rics = [task.ric.clone()];

        let (events, filings) = tokio::join!(
            tools::significant_events(self.warehouse.as_ref(), &rics, &task.range),
            tools::sec_filings(self.market.as_ref(), &task.ric, &task.range),
        );

        let instruction = format!(
            "Analyze significant events for {} over {}.",
            task.ric, task.range
        );

        analyze_envelopes(
            self.llm.as_ref(),
            &self.config,
            self.slot(),
            SYSTEM_PROMPT,
            &instruction,
            &[events, filings],
        )
        .await
    }
}
