//! Solar system sizing pipeline: load analysis, irradiance lookup, panel and
//! battery sizing, component matching, budget ranking, annual simulation and
//! reporting.

pub mod config;
pub mod domain;
pub mod error;
pub mod irradiance;
pub mod matcher;
pub mod optimizer;
pub mod pipeline;
pub mod report;
pub mod simulation;
pub mod sizing;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Degradation, PipelineError};
pub use pipeline::{Pipeline, PipelineResponse, WorkflowState};
