use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::irradiance::IrradianceSource;

/// Fatal pipeline errors. Any of these halts the run and is surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Data not found: {0}")]
    DataNotFound(String),
}

impl PipelineError {
    pub fn calculation(message: impl Into<String>) -> Self {
        PipelineError::Calculation(message.into())
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "ValidationError",
            PipelineError::Calculation(_) => "CalculationError",
            PipelineError::DataNotFound(_) => "DataNotFoundError",
        }
    }
}

impl From<validator::ValidationErrors> for PipelineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PipelineError::Validation(errors.to_string())
    }
}

/// Non-fatal downgrades. The pipeline logs them, substitutes the documented
/// fallback and keeps going.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// Coordinates were supplied but the live irradiance lookup was not used.
    IrradianceFallback { source: IrradianceSource },
    /// No configuration fits the budget; the closest ones were kept instead.
    NoAffordableConfiguration { budget: f64, cheapest_cost: f64 },
    /// Matching produced nothing, so simulation was skipped.
    NoConfigurations,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::IrradianceFallback { source } => {
                write!(f, "live irradiance unavailable, using {} estimate", source)
            }
            Degradation::NoAffordableConfiguration {
                budget,
                cheapest_cost,
            } => write!(
                f,
                "no configuration within budget {:.2}; cheapest option costs {:.2}",
                budget, cheapest_cost
            ),
            Degradation::NoConfigurations => {
                write!(f, "no compatible configuration found, simulation skipped")
            }
        }
    }
}
