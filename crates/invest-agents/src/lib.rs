//! Multi-agent orchestration for the investment research pipeline
//!
//! The pipeline is a fixed two-stage fork-join over typed agents:
//!
//! 1. the root [`ResearchPipeline`] resolves the current date and the
//!    canonical identifier (once, via a [`Resolver`]);
//! 2. [`ParallelRetrieval`] fans out to eight independent retrieval agents,
//!    one per data category, and joins all eight named output slots;
//! 3. [`ReportSynthesizer`] consumes exactly those slots and emits one
//!    markdown report.
//!
//! Control flow is explicit and typed throughout: agents are deterministic
//! functions over resolved parameters; the LLM only writes prose about data
//! that has already been fetched.

pub mod parallel;
pub mod pipeline;
pub mod resolver;
pub mod retrieval;
pub mod slots;
pub mod synthesis;

pub use parallel::ParallelRetrieval;
pub use pipeline::{AnalysisRequest, PipelineOutcome, PipelineState, ResearchPipeline};
pub use resolver::{CachedResolver, LookupResolver, ResolveError, Resolver, StaticResolver};
pub use retrieval::{RetrievalAgent, RetrievalTask, SectionReport, SectionStatus};
pub use slots::{SlotMap, SlotName};
pub use synthesis::ReportSynthesizer;
