use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::domain::{Priority, SystemConfiguration};
use crate::error::Degradation;

/// Rough savings estimate for one ranked configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAnalysis {
    pub config_id: String,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Infinite (serialized as `null`) when the system saves nothing
    pub payback_period_years: f64,
    pub roi_percentage: f64,
}

/// Ways to afford a system that exceeds the budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option", rename_all = "snake_case")]
pub enum FinancingOption {
    #[serde(rename = "installment_payment")]
    Installment {
        description: String,
        monthly_payment: f64,
        /// Cost including the financing surcharge
        total_cost: f64,
    },
    #[serde(rename = "phased_installation")]
    Phased {
        description: String,
        phase_1_cost: f64,
        remaining_cost: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub budget: f64,
    pub priority: Priority,
    /// False when nothing fit and the closest configurations were kept
    pub within_budget: bool,
    /// Ranked by `priority`
    pub configurations: Vec<SystemConfiguration>,
    pub savings_analysis: Vec<SavingsAnalysis>,
    pub financing_options: Vec<FinancingOption>,
}

impl OptimizationResult {
    /// The configuration the rest of the pipeline proceeds with.
    pub fn selected(&self) -> Option<&SystemConfiguration> {
        self.configurations.first()
    }

    pub fn cheapest_cost(&self) -> Option<f64> {
        self.configurations
            .iter()
            .map(|c| OrderedFloat(c.total_cost))
            .min()
            .map(|c| c.0)
    }

    pub fn degradation(&self) -> Option<Degradation> {
        if self.within_budget {
            return None;
        }
        self.cheapest_cost()
            .map(|cheapest_cost| Degradation::NoAffordableConfiguration {
                budget: self.budget,
                cheapest_cost,
            })
    }
}
