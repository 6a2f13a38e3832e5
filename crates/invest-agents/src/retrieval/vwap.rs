//! VWAP retrieval agent

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::ResearchConfig;
use invest_data::{Warehouse, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant analyzing
volume-weighted average price data.

Present the VWAP figures as a markdown table, then analyze the results:
day-over-day drift, volume concentration, and the spread between VWAP and
average price. Note days with unusually high trade counts or one-sided
ask/bid extremes. An empty result set means no qualifying trades in the
period; say so plainly rather than treating it as an error.
"#;

/// Agent producing the `vwap_result` slot
pub struct VwapAgent {
    warehouse: Arc<dyn Warehouse>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl VwapAgent {
    /// Create a new VWAP agent
    pub fn new(
        warehouse: Arc<dyn Warehouse>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        Self {
            warehouse,
            llm,
            config,
        }
    }
}

#[async_trait]
impl RetrievalAgent for VwapAgent {
    fn slot(&self) -> SlotName {
        SlotName::Vwap
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let rics = [task.ric.clone()];
        let envelope = tools::vwap(self.warehouse.as_ref(), &rics, &task.range).await;

        let instruction = format!(
            "Analyze the VWAP table for {} over {}.",
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
