//! Root orchestrator: the single entry point for one analysis
//!
//! Sequence: resolve the current date, resolve the canonical identifier
//! exactly once (the resolved code is passed down to every retrieval
//! agent), fan out to the parallel retrieval stage, then hand all eight
//! slots to the synthesis stage. The state machine is explicit; `Aborted`
//! is reachable only from identifier resolution, and no data function runs
//! before the identifier is resolved.

use crate::parallel::ParallelRetrieval;
use crate::resolver::{CachedResolver, LookupResolver, ResolveError, Resolver};
use crate::retrieval::RetrievalTask;
use crate::synthesis::ReportSynthesizer;
use async_trait::async_trait;
use invest_core::{
    Agent, Clock, Context, DateRange, Error, FiscalYear, ResearchConfig, Result, Ric,
};
use invest_data::{MarketData, Warehouse};
use invest_llm::LlmProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// One analysis request
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Free-text company name
    pub company: String,
    /// Explicit date range; defaults to the current calendar year
    pub date_range: Option<DateRange>,
    /// Explicit fiscal year for ESG lookups; defaults to the documented
    /// fallback year, with the affected sections annotated
    pub fiscal_year: Option<FiscalYear>,
}

impl AnalysisRequest {
    /// Request with default date policy
    pub fn company(name: impl Into<String>) -> Self {
        Self {
            company: name.into(),
            date_range: None,
            fiscal_year: None,
        }
    }
}

/// Pipeline progress states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Analysis accepted
    Start,
    /// Current date and default parameters resolved
    DateResolved,
    /// Canonical identifier resolved
    IdentifierResolved,
    /// All eight slots joined
    DataRetrieved,
    /// Final report produced
    ReportSynthesized,
    /// Terminal success
    Done,
    /// Terminal failure, reachable only from identifier resolution
    Aborted,
}

/// Outcome of one analysis
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// The full report was produced
    Completed {
        /// Resolved identifier the analysis ran against
        ric: Ric,
        /// Final markdown report
        report: String,
    },
    /// Identifier resolution failed; no data was retrieved
    Aborted {
        /// User-facing failure message
        message: String,
    },
}

impl PipelineOutcome {
    /// The user-visible text of this outcome
    pub fn text(&self) -> &str {
        match self {
            PipelineOutcome::Completed { report, .. } => report,
            PipelineOutcome::Aborted { message } => message,
        }
    }
}

/// The root orchestrator
pub struct ResearchPipeline {
    resolver: Arc<dyn Resolver>,
    retrieval: ParallelRetrieval,
    synthesizer: ReportSynthesizer,
    clock: Arc<dyn Clock>,
    config: Arc<ResearchConfig>,
}

impl ResearchPipeline {
    /// Assemble a pipeline from its stages
    pub fn new(
        resolver: Arc<dyn Resolver>,
        retrieval: ParallelRetrieval,
        synthesizer: ReportSynthesizer,
        clock: Arc<dyn Clock>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        Self {
            resolver,
            retrieval,
            synthesizer,
            clock,
            config,
        }
    }

    /// Wire the standard pipeline over shared clients
    ///
    /// Resolution goes through the market-data lookup with a cache on top,
    /// so repeated resolutions of the same name within one analysis are
    /// idempotent.
    pub fn standard(
        warehouse: Arc<dyn Warehouse>,
        market: Arc<dyn MarketData>,
        llm: Arc<dyn LlmProvider>,
        clock: Arc<dyn Clock>,
        config: Arc<ResearchConfig>,
    ) -> Self {
        let lookup = Arc::new(LookupResolver::new(
            Arc::clone(&market),
            config.exchange_suffix.clone(),
        ));
        let resolver = Arc::new(CachedResolver::new(lookup, config.resolver_cache_ttl));

        let retrieval = ParallelRetrieval::standard(
            warehouse,
            market,
            Arc::clone(&llm),
            Arc::clone(&config),
        );
        let synthesizer = ReportSynthesizer::new(llm, Arc::clone(&config));

        Self::new(resolver, retrieval, synthesizer, clock, config)
    }

    fn transition(state: &mut PipelineState, next: PipelineState) {
        info!(from = ?state, to = ?next, "Pipeline state transition");
        *state = next;
    }

    /// Run one analysis to completion (or abort)
    pub async fn run(&self, request: AnalysisRequest) -> Result<PipelineOutcome> {
        let mut state = PipelineState::Start;
        info!(company = %request.company, "Starting analysis");

        // Date policy: current date is resolved once, at pipeline start
        let today = self.clock.today();
        let range = request.date_range.unwrap_or_else(|| self.clock.default_range());
        let (fiscal_year, fiscal_year_defaulted) = match request.fiscal_year {
            Some(year) => (year, false),
            None => (self.config.fallback_fiscal_year, true),
        };
        info!(%today, %range, %fiscal_year, "Analysis parameters resolved");
        Self::transition(&mut state, PipelineState::DateResolved);

        // Mandatory first step: a failed lookup halts the whole analysis
        let ric = match self.resolver.resolve(&request.company).await {
            Ok(ric) => ric,
            Err(ResolveError::NotFound(name)) => {
                Self::transition(&mut state, PipelineState::Aborted);
                warn!(company = %name, "Identifier resolution failed, aborting analysis");
                return Ok(PipelineOutcome::Aborted {
                    message: format!(
                        "Could not identify a listed company for '{name}'. \
                         No analysis was performed."
                    ),
                });
            }
            Err(ResolveError::Source(reason)) => {
                Self::transition(&mut state, PipelineState::Aborted);
                return Err(Error::ResolutionFailed(reason));
            }
        };
        Self::transition(&mut state, PipelineState::IdentifierResolved);

        let task = RetrievalTask {
            ric: ric.clone(),
            range,
            fiscal_year,
            fiscal_year_defaulted,
        };

        let slots = self.retrieval.run(&task).await;
        Self::transition(&mut state, PipelineState::DataRetrieved);

        let report = self
            .synthesizer
            .synthesize(&request.company, &task, &slots)
            .await?;
        Self::transition(&mut state, PipelineState::ReportSynthesized);

        Self::transition(&mut state, PipelineState::Done);
        Ok(PipelineOutcome::Completed { ric, report })
    }
}

#[async_trait]
impl Agent for ResearchPipeline {
    /// Treat the input as the company name; date overrides come from the
    /// conversation context, and the resolved parameters are written back
    /// into it.
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let request = AnalysisRequest {
            company: input.trim().to_string(),
            date_range: context.date_range()?,
            fiscal_year: context.fiscal_year(),
        };

        let outcome = self.run(request).await?;

        if let PipelineOutcome::Completed { ric, .. } = &outcome {
            context.set_ric(ric);
        }

        Ok(outcome.text().to_string())
    }

    fn name(&self) -> &str {
        "research-pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = AnalysisRequest::company("Vodafone");
        assert_eq!(request.company, "Vodafone");
        assert!(request.date_range.is_none());
        assert!(request.fiscal_year.is_none());
    }

    #[test]
    fn test_outcome_text() {
        let outcome = PipelineOutcome::Aborted {
            message: "Could not identify a listed company for 'X'.".to_string(),
        };
        assert!(outcome.text().contains("Could not identify"));
    }
}
