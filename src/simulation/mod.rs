//! # Annual Performance Simulation
//!
//! Steps the selected configuration through 365 days of identical load,
//! tracking battery state of charge and grid imports, then derives
//! performance metrics and recommendations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use solar_sizer::simulation::PerformanceSimulator;
//!
//! let outcome = PerformanceSimulator::default().simulate(&configuration, 5.0, &irradiance)?;
//! println!("{:?}", outcome.performance_metrics.self_sufficiency_ratio);
//! ```

pub mod annual;
pub mod metrics;

pub use annual::{
    month_of_day, run_annual, self_consumption_ratio, AnnualSimulationResult, AnnualTotals,
    DailySimulationRecord, MonthlySummary,
};
pub use metrics::{
    recommendations, PerformanceMetrics, Recommendation, RecommendationCategory,
    RecommendationPriority,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::domain::SystemConfiguration;
use crate::error::PipelineError;
use crate::irradiance::IrradianceEstimate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub simulation_results: AnnualSimulationResult,
    pub performance_metrics: PerformanceMetrics,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone)]
pub struct PerformanceSimulator {
    pub initial_soc: f64,
    pub reference_system_kw: f64,
}

impl Default for PerformanceSimulator {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for PerformanceSimulator {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            initial_soc: config.initial_soc,
            reference_system_kw: config.reference_system_kw,
        }
    }
}

impl PerformanceSimulator {
    pub fn simulate(
        &self,
        configuration: &SystemConfiguration,
        daily_consumption_kwh: f64,
        irradiance: &IrradianceEstimate,
    ) -> Result<SimulationOutcome, PipelineError> {
        if !(self.reference_system_kw > 0.0) {
            return Err(PipelineError::calculation(format!(
                "reference system size must be greater than zero, got {}",
                self.reference_system_kw
            )));
        }

        let simulation_results = run_annual(
            configuration,
            daily_consumption_kwh,
            irradiance,
            self.initial_soc,
        )?;
        let performance_metrics =
            PerformanceMetrics::from_annual(&simulation_results, self.reference_system_kw);
        let recommendations = recommendations(&simulation_results);

        info!(
            config_id = %configuration.config_id,
            generation_kwh = simulation_results.annual_totals.generation_kwh,
            grid_import_kwh = simulation_results.annual_totals.grid_import_kwh,
            grid_independence_days = performance_metrics.grid_independence_days,
            "annual simulation finished"
        );

        Ok(SimulationOutcome {
            simulation_results,
            performance_metrics,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irradiance::IrradianceSource;
    use crate::test_support::configuration;

    #[test]
    fn test_simulate_bundles_metrics_and_recommendations() {
        let config = configuration("C", 500.0, 200.0, 1.0);
        let sun = IrradianceEstimate::flat(5.0, 5.0, IrradianceSource::Default);
        let outcome = PerformanceSimulator::default().simulate(&config, 5.0, &sun).unwrap();
        assert_eq!(outcome.simulation_results.daily_records.len(), 365);
        assert_eq!(outcome.recommendations.len(), 2);
        assert_eq!(outcome.performance_metrics.grid_independence_days, 0);
    }

    #[test]
    fn test_invalid_reference_size() {
        let simulator = PerformanceSimulator {
            initial_soc: 0.8,
            reference_system_kw: 0.0,
        };
        let config = configuration("C", 500.0, 200.0, 1.0);
        let sun = IrradianceEstimate::flat(5.0, 5.0, IrradianceSource::Default);
        let err = simulator.simulate(&config, 5.0, &sun).unwrap_err();
        assert!(matches!(err, PipelineError::Calculation(_)));
    }
}
