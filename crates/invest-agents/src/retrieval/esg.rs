//! ESG indicator retrieval agent
//!
//! One agent type instantiated three times, once per dimension; each
//! instance owns its own slot. ESG indicators are keyed by fiscal year, not
//! date range: when the orchestrator had to substitute the fallback year,
//! the section is annotated accordingly.

use super::{RetrievalAgent, RetrievalTask, SectionReport, analyze_envelopes};
use crate::slots::SlotName;
use async_trait::async_trait;
use invest_core::{FiscalYear, ResearchConfig, Ric, ToolEnvelope};
use invest_data::{Warehouse, tools};
use invest_llm::LlmProvider;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = r#"You are an investment research assistant analyzing ESG
indicators for one fiscal year.

Present the indicator values as a markdown table grouped by indicator code,
then analyze them: where the company stands on the dimension, which
indicators stand out in either direction, and what an asset manager should
watch. Analyze the data directly; do not generate code. Ignore any time
duration other than the fiscal year.
"#;

/// ESG dimension, selecting the tool function and output slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EsgDimension {
    /// Environmental indicators
    Environmental,
    /// Governance indicators
    Governance,
    /// Social indicators
    Social,
}

impl EsgDimension {
    fn slot(self) -> SlotName {
        match self {
            EsgDimension::Environmental => SlotName::EsgEnvironmental,
            EsgDimension::Governance => SlotName::EsgGovernance,
            EsgDimension::Social => SlotName::EsgSocial,
        }
    }

    fn label(self) -> &'static str {
        match self {
            EsgDimension::Environmental => "environmental",
            EsgDimension::Governance => "governance",
            EsgDimension::Social => "social",
        }
    }

    async fn fetch(
        self,
        warehouse: &dyn Warehouse,
        rics: &[Ric],
        fiscal_year: FiscalYear,
    ) -> ToolEnvelope {
        match self {
            EsgDimension::Environmental => {
                tools::esg_env_indicator(warehouse, rics, fiscal_year).await
            }
            EsgDimension::Governance => {
                tools::esg_gov_indicator(warehouse, rics, fiscal_year).await
            }
            EsgDimension::Social => tools::esg_soc_indicator(warehouse, rics, fiscal_year).await,
        }
    }
}

/// Agent producing one of the three ESG indicator slots
pub struct EsgIndicatorAgent {
    dimension: EsgDimension,
    warehouse: Arc<dyn Warehouse>,
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl EsgIndicatorAgent {
    /// Create an agent for the given ESG dimension
    pub fn new(
        dimension: EsgDimension,
        warehouse: Arc<dyn Warehouse>,
        llm: Arc<dyn LlmProvider>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        Self {
            dimension,
            warehouse,
            llm,
            config,
        }
    }
}

#[async_trait]
impl RetrievalAgent for EsgIndicatorAgent {
    fn slot(&self) -> SlotName {
        self.dimension.slot()
    }

    async fn retrieve(&self, task: &RetrievalTask) -> SectionReport {
        let rics = [task.ric.clone()];
        let envelope = self
            .dimension
            .fetch(self.warehouse.as_ref(), &rics, task.fiscal_year)
            .await;

        let instruction = format!(
            "Analyze the ESG {} indicators for {} for fiscal year {}.",
            self.dimension.label(),
            task.ric,
            task.fiscal_year
        );

        let section = analyze_envelopes(
            self.llm.as_ref(),
            &self.config,
            self.slot(),
            SYSTEM_PROMPT,
            &instruction,
            &[envelope],
        )
        .await;

        if task.fiscal_year_defaulted {
            let note = format!("fiscal year not supplied; defaulted to {}", task.fiscal_year);
            let note = match &section.annotation {
                Some(existing) => format!("{existing}; {note}"),
                None => note,
            };
            section.with_annotation(note)
        } else {
            section
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_slots() {
        assert_eq!(EsgDimension::Environmental.slot(), SlotName::EsgEnvironmental);
        assert_eq!(EsgDimension::Governance.slot(), SlotName::EsgGovernance);
        assert_eq!(EsgDimension::Social.slot(), SlotName::EsgSocial);
    }
}
