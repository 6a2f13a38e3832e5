//! Core abstractions for the investment research pipeline
//!
//! This crate defines the fundamental traits and types shared by every stage of
//! the pipeline: the `Agent` entry-point trait, the analysis `Context`, the
//! uniform `ToolEnvelope` returned by every data tool function, the canonical
//! identifier and date types, and the injected `Clock` and `ResearchConfig`.

pub mod agent;
pub mod clock;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod types;

pub use agent::Agent;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ResearchConfig, ResearchConfigBuilder};
pub use context::Context;
pub use envelope::{ToolEnvelope, ToolStatus};
pub use error::{Error, Result};
pub use types::{DateRange, FiscalYear, Ric};
