//! Report synthesis stage
//!
//! Consumes exactly the eight named slots and emits one markdown report.
//! The prompt embeds a hard grounding constraint: the model must not
//! introduce facts absent from the supplied sections, and unavailable
//! sections are reported as such rather than filled in.

use crate::retrieval::{RetrievalTask, SectionStatus};
use crate::slots::SlotMap;
use invest_core::{Error, ResearchConfig, Result};
use invest_llm::{CompletionRequest, LlmProvider};
use minijinja::Environment;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const SYSTEM_PROMPT: &str = r#"You are a financial analyst at an asset manager writing an
investment report. Evaluate the company as a potential investment, focusing
on risk, return, and long-term prospects. Present results clearly, suitable
for an asset management investor. The entire report must be professionally
formatted markdown.
"#;

/// Prompt template over the eight named slots
///
/// The rendered prompt is the synthesis agent's full input; every section
/// the model may cite appears here by key.
const REPORT_TEMPLATE: &str = r#"Your task is to synthesize the research summaries below into
one coherent report on {{ company }} ({{ ric }}), analysis period {{ range }},
clearly attributing findings to their source areas.

Crucially: your entire response MUST be grounded exclusively on the
information provided in the input summaries below. Do NOT add any external
knowledge, facts, or details not present in these specific summaries. Where
a summary is marked unavailable, state that the section's data is
unavailable; never substitute outside knowledge for it.

Structure:
- Start with the company information as given in companyinfo_result,
  formatted as a table with all the detail and any inferred metrics.
- Then one section per remaining summary, with a heading per topic.
- End with a correlation section that correlates vwap_result with
  marketpsycsentiment_result and companynews_result, explaining how
  sentiment and news flow relate to the VWAP movements, and folds
  significantevent_result, esgenvindicator_result, esggovindicator_result,
  and esgsocindicator_result into the same narrative.
- Carry every annotation below into the relevant section as an explicit
  caveat (e.g. a defaulted fiscal year or partial data).

Input summaries:
{% for section in sections %}
## {{ section.key }} ({{ section.title }})
{% if section.unavailable %}[UNAVAILABLE] {% endif %}{{ section.body }}
{% if section.annotation %}Annotation: {{ section.annotation }}{% endif %}
{% endfor %}
"#;

/// The report synthesis agent
pub struct ReportSynthesizer {
    llm: Arc<dyn LlmProvider>,
    config: Arc<ResearchConfig>,
}

impl ReportSynthesizer {
    /// Create a new synthesizer
    pub fn new(llm: Arc<dyn LlmProvider>, config: Arc<ResearchConfig>) -> Self {
        Self { llm, config }
    }

    /// Render the synthesis prompt for the given slots
    fn render_prompt(&self, company: &str, task: &RetrievalTask, slots: &SlotMap) -> Result<String> {
        let sections: Vec<_> = slots
            .iter()
            .map(|section| {
                json!({
                    "key": section.slot.key(),
                    "title": section.slot.title(),
                    "body": section.body,
                    "annotation": section.annotation,
                    "unavailable": section.status == SectionStatus::Unavailable,
                })
            })
            .collect();

        let env = Environment::new();
        env.render_str(
            REPORT_TEMPLATE,
            json!({
                "company": company,
                "ric": task.ric.as_str(),
                "range": task.range.to_string(),
                "sections": sections,
            }),
        )
        .map_err(|e| Error::Template(e.to_string()))
    }

    /// Produce the final markdown report from the eight slots
    ///
    /// All eight slots must be populated before synthesis proceeds; a
    /// partial slot map is rejected rather than silently synthesized.
    pub async fn synthesize(
        &self,
        company: &str,
        task: &RetrievalTask,
        slots: &SlotMap,
    ) -> Result<String> {
        if !slots.is_complete() {
            return Err(Error::ProcessingFailed(format!(
                "synthesis requires all 8 slots, got {}",
                slots.len()
            )));
        }

        let prompt = self.render_prompt(company, task, slots)?;

        info!(company, ric = %task.ric, "Synthesizing report");
        let request = CompletionRequest::builder(&self.config.synthesis_model)
            .system(SYSTEM_PROMPT)
            .prompt(prompt)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self.llm.complete(request).await?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::SectionReport;
    use crate::retrieval::testing::EchoProvider;
    use crate::slots::SlotName;
    use invest_core::{DateRange, FiscalYear, Ric};

    fn task() -> RetrievalTask {
        RetrievalTask {
            ric: Ric::new("VOD.L"),
            range: DateRange::calendar_year(2026),
            fiscal_year: FiscalYear(2026),
            fiscal_year_defaulted: false,
        }
    }

    fn full_slots() -> SlotMap {
        let mut slots = SlotMap::new();
        for slot in SlotName::ALL {
            slots.insert(SectionReport::ok(slot, format!("{} findings", slot.key())));
        }
        slots
    }

    #[tokio::test]
    async fn test_prompt_includes_every_slot_key() {
        let config = Arc::new(ResearchConfig::default());
        let synthesizer = ReportSynthesizer::new(Arc::new(EchoProvider), config);

        // EchoProvider reflects the prompt, so the report must mention every key
        let report = synthesizer
            .synthesize("Vodafone", &task(), &full_slots())
            .await
            .unwrap();

        for slot in SlotName::ALL {
            assert!(report.contains(slot.key()), "missing {}", slot.key());
        }
        assert!(report.contains("VOD.L"));
        assert!(report.contains("correlation"));
    }

    #[tokio::test]
    async fn test_incomplete_slots_rejected() {
        let config = Arc::new(ResearchConfig::default());
        let synthesizer = ReportSynthesizer::new(Arc::new(EchoProvider), config);

        let mut slots = SlotMap::new();
        slots.insert(SectionReport::ok(SlotName::Vwap, "only one"));

        let result = synthesizer.synthesize("Vodafone", &task(), &slots).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unavailable_section_is_flagged_in_prompt() {
        let config = Arc::new(ResearchConfig::default());
        let synthesizer = ReportSynthesizer::new(Arc::new(EchoProvider), config);

        let mut slots = full_slots();
        slots.insert(SectionReport::unavailable(SlotName::Vwap, "warehouse down"));

        let report = synthesizer
            .synthesize("Vodafone", &task(), &slots)
            .await
            .unwrap();

        assert!(report.contains("[UNAVAILABLE]"));
        assert!(report.contains("warehouse down"));
    }

    #[tokio::test]
    async fn test_annotation_carried_into_prompt() {
        let config = Arc::new(ResearchConfig::default());
        let synthesizer = ReportSynthesizer::new(Arc::new(EchoProvider), config);

        let mut slots = full_slots();
        slots.insert(
            SectionReport::ok(SlotName::EsgEnvironmental, "indicator table")
                .with_annotation("fiscal year not supplied; defaulted to 2025"),
        );

        let report = synthesizer
            .synthesize("Vodafone", &task(), &slots)
            .await
            .unwrap();

        assert!(report.contains("defaulted to 2025"));
    }
}
