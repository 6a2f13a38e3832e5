//! Parallel retrieval stage: fan out to all agents, join all slots
//!
//! A simple fork-join over independent tasks, not a scheduler. Each agent is
//! spawned on its own task so that a panic or failure in one cannot take a
//! sibling down; dropping the stage's future aborts in-flight tasks
//! cooperatively. The stage always returns a complete slot map: any slot a
//! task failed to deliver is backfilled with an unavailability note.

use crate::retrieval::{
    CompanyInfoAgent, EsgDimension, EsgIndicatorAgent, NewsAgent, RetrievalAgent, RetrievalTask,
    SectionReport, SentimentAgent, SignificantEventsAgent, VwapAgent,
};
use crate::slots::{SlotMap, SlotName};
use invest_core::ResearchConfig;
use invest_data::{MarketData, Warehouse};
use invest_llm::LlmProvider;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// The fan-out/fan-in retrieval stage
pub struct ParallelRetrieval {
    agents: Vec<Arc<dyn RetrievalAgent>>,
}

impl ParallelRetrieval {
    /// Create a stage over the given agents
    pub fn new(agents: Vec<Arc<dyn RetrievalAgent>>) -> Self {
        Self { agents }
    }

    /// The standard eight-agent roster over shared clients
    pub fn standard(
        warehouse: Arc<dyn Warehouse>,
        market: Arc<dyn MarketData>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        let agents: Vec<Arc<dyn RetrievalAgent>> = vec![
            Arc::new(CompanyInfoAgent::new(
                Arc::clone(&warehouse),
                Arc::clone(&market),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(VwapAgent::new(
                Arc::clone(&warehouse),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(SentimentAgent::new(
                Arc::clone(&warehouse),
                Arc::clone(&market),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(SignificantEventsAgent::new(
                Arc::clone(&warehouse),
                Arc::clone(&market),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(EsgIndicatorAgent::new(
                EsgDimension::Environmental,
                Arc::clone(&warehouse),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(EsgIndicatorAgent::new(
                EsgDimension::Governance,
                Arc::clone(&warehouse),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(EsgIndicatorAgent::new(
                EsgDimension::Social,
                Arc::clone(&warehouse),
                Arc::clone(&llm),
                Arc::clone(&config),
            )),
            Arc::new(NewsAgent::new(market, llm, config)),
        ];

        Self::new(agents)
    }

    /// Number of agents in the roster
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Run every agent concurrently and join all named outputs
    ///
    /// Completes only when every agent has produced (or failed to produce)
    /// its slot. Sibling agents never observe each other's outcome.
    pub async fn run(&self, task: &RetrievalTask) -> SlotMap {
        info!(ric = %task.ric, agent_count = self.agents.len(), "Starting parallel retrieval");

        let mut set = JoinSet::new();
        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let task = task.clone();
            set.spawn(async move { agent.retrieve(&task).await });
        }

        let mut slots = SlotMap::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(section) => {
                    slots.insert(section);
                }
                Err(e) => {
                    warn!(error = %e, "Retrieval task did not complete");
                }
            }
        }

        // A task that panicked (or a roster gap) must still not leave a slot
        // empty for synthesis
        for slot in SlotName::ALL {
            if !slots.contains(slot) {
                slots.insert(SectionReport::unavailable(
                    slot,
                    "retrieval task did not complete",
                ));
            }
        }

        info!(slot_count = slots.len(), "Parallel retrieval joined");
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::SectionStatus;
    use async_trait::async_trait;
    use invest_core::{DateRange, FiscalYear, Ric};

    fn task() -> RetrievalTask {
        RetrievalTask {
            ric: Ric::new("VOD.L"),
            range: DateRange::calendar_year(2026),
            fiscal_year: FiscalYear(2026),
            fiscal_year_defaulted: false,
        }
    }

    struct FixedAgent(SlotName);

    #[async_trait]
    impl RetrievalAgent for FixedAgent {
        fn slot(&self) -> SlotName {
            self.0
        }

        async fn retrieve(&self, _task: &RetrievalTask) -> SectionReport {
            SectionReport::ok(self.0, format!("{} body", self.0))
        }
    }

    struct PanickingAgent;

    #[async_trait]
    impl RetrievalAgent for PanickingAgent {
        fn slot(&self) -> SlotName {
            SlotName::Vwap
        }

        async fn retrieve(&self, _task: &RetrievalTask) -> SectionReport {
            panic!("agent blew up");
        }
    }

    fn full_roster() -> Vec<Arc<dyn RetrievalAgent>> {
        SlotName::ALL
            .iter()
            .map(|slot| Arc::new(FixedAgent(*slot)) as Arc<dyn RetrievalAgent>)
            .collect()
    }

    #[tokio::test]
    async fn test_all_eight_slots_populated() {
        let stage = ParallelRetrieval::new(full_roster());
        let slots = stage.run(&task()).await;

        assert!(slots.is_complete());
        assert_eq!(slots.len(), 8);
        for slot in SlotName::ALL {
            assert_eq!(slots.get(slot).unwrap().status, SectionStatus::Ok);
        }
    }

    #[tokio::test]
    async fn test_panicking_agent_does_not_cancel_siblings() {
        let mut agents = full_roster();
        // Replace the VWAP agent with one that panics
        agents[1] = Arc::new(PanickingAgent) as Arc<dyn RetrievalAgent>;

        let stage = ParallelRetrieval::new(agents);
        let slots = stage.run(&task()).await;

        // Still exactly eight slots; the failed one carries a note
        assert!(slots.is_complete());
        assert_eq!(
            slots.get(SlotName::Vwap).unwrap().status,
            SectionStatus::Unavailable
        );
        assert_eq!(
            slots.get(SlotName::CompanyNews).unwrap().status,
            SectionStatus::Ok
        );
    }

    #[tokio::test]
    async fn test_missing_roster_slot_is_backfilled() {
        // Roster with only one agent: the other seven slots are backfilled
        let stage = ParallelRetrieval::new(vec![Arc::new(FixedAgent(SlotName::Vwap)) as _]);
        let slots = stage.run(&task()).await;

        assert!(slots.is_complete());
        assert_eq!(slots.get(SlotName::Vwap).unwrap().status, SectionStatus::Ok);
        assert_eq!(
            slots.get(SlotName::CompanyInfo).unwrap().status,
            SectionStatus::Unavailable
        );
    }
}
