//! Market sentiment retrieval agent

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::ResearchConfig;
use invest_data::{MarketData, Warehouse, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant analyzing market
sentiment indices derived from content analysis.

Present the sentiment table, then analyze it. The fields are floats:
- Bipolar indices (sentiment, optimism, lovehate, trust, conflict,
  emotionvsfact, marketrisk) range -1 to 1 and represent a net balance of
  positive versus negative references. Flag values close to 1 as highly
  favorable and values close to -1 as highly unfavorable.
- Unipolar indices (joy, anger, fear, gloom, stress, surprise, uncertainty,
  violence) range 0 to 1 and track the frequency of an emotion or topic.
  Flag values significantly above 0.5 as indicating high attention or
  concern on that topic.

For any period showing low trust or high anger/fear, cross-reference the
risk-related fields in the same table to identify potential drivers. Where
insider sentiment data is present, contrast it with the content-derived
indices. Analyze the data directly; do not generate code.
"#;

/// Agent producing the `marketpsycsentiment_result` slot
///
/// Content-derived sentiment from the warehouse, contrasted with insider
/// sentiment from the market-data API.
pub struct SentimentAgent {
    warehouse: Arc<dyn Warehouse>,
    market: Arc<dyn MarketData>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl SentimentAgent {
    /// Create a new sentiment agent
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
impl RetrievalAgent for SentimentAgent {
    fn slot(&self) -> SlotName {
        SlotName::MarketSentiment
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let rics = [task.ric.clone()];

        let (sentiment, insider) = tokio::join!(
            tools::market_sentiment(self.warehouse.as_ref(), &rics, &task.range),
            tools::insider_sentiment(self.market.as_ref(), &task.ric, &task.range),
        );

        let instruction = format!(
            "Analyze market sentiment for {} over {}.",
            task.ric, task.range
        );

        analyze_envelopes(
            self.llm.as_ref(),
            &self.config,
            self.slot(),
            SYSTEM_PROMPT,
            &instruction,
            &[sentiment, insider],
        )
        .await
    }
}
