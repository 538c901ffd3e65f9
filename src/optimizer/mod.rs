//! Budget filtering, priority ranking, savings and financing suggestions.

pub mod ranking;
pub mod types;

pub use ranking::*;
pub use types::*;

use tracing::{info, warn};

use crate::config::TariffConfig;
use crate::domain::{Priority, SystemConfiguration};

/// Assumed sun hours per day for the quick savings estimate
pub const SAVINGS_SUN_HOURS: f64 = 6.0;
pub const SAVINGS_DAYS_PER_MONTH: f64 = 30.0;
/// Configurations kept when nothing fits the budget
pub const FALLBACK_CONFIGURATIONS: usize = 3;
/// Configurations that get a savings analysis
pub const SAVINGS_ANALYZED: usize = 3;
pub const INSTALLMENT_MONTHS: u32 = 12;
pub const FINANCING_SURCHARGE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct CostOptimizer {
    /// Grid tariff per kWh
    pub tariff: f64,
}

impl Default for CostOptimizer {
    fn default() -> Self {
        Self::from(&TariffConfig::default())
    }
}

impl From<&TariffConfig> for CostOptimizer {
    fn from(config: &TariffConfig) -> Self {
        Self {
            tariff: config.grid_price_per_kwh,
        }
    }
}

impl CostOptimizer {
    pub fn optimize(
        &self,
        configurations: &[SystemConfiguration],
        budget: f64,
        priority: Priority,
    ) -> OptimizationResult {
        let affordable: Vec<_> = configurations
            .iter()
            .filter(|c| c.total_cost <= budget)
            .cloned()
            .collect();
        let within_budget = !affordable.is_empty();

        let mut ranked = if within_budget {
            affordable
        } else {
            if !configurations.is_empty() {
                warn!(budget, "no configuration within budget, keeping the closest");
            }
            closest_to_budget(configurations, budget, FALLBACK_CONFIGURATIONS)
        };
        rank_by_priority(&mut ranked, priority);

        let savings_analysis = ranked
            .iter()
            .take(SAVINGS_ANALYZED)
            .map(|c| self.savings(c))
            .collect();

        let result = OptimizationResult {
            budget,
            priority,
            within_budget,
            financing_options: Vec::new(),
            configurations: ranked,
            savings_analysis,
        };
        let financing_options = financing_options(budget, result.cheapest_cost());
        info!(
            %priority,
            within_budget,
            kept = result.configurations.len(),
            "configurations ranked"
        );
        OptimizationResult {
            financing_options,
            ..result
        }
    }

    pub fn savings(&self, configuration: &SystemConfiguration) -> SavingsAnalysis {
        let monthly_generation_kwh =
            configuration.panel_watts() * SAVINGS_SUN_HOURS * SAVINGS_DAYS_PER_MONTH / 1000.0;
        let monthly_savings = monthly_generation_kwh * self.tariff;
        let annual_savings = monthly_savings * 12.0;
        let cost = configuration.total_cost;

        SavingsAnalysis {
            config_id: configuration.config_id.clone(),
            monthly_savings,
            annual_savings,
            payback_period_years: if annual_savings > 0.0 {
                cost / annual_savings
            } else {
                f64::INFINITY
            },
            roi_percentage: if cost > 0.0 {
                annual_savings / cost * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Suggestions for when even the cheapest option is over budget.
pub fn financing_options(budget: f64, cheapest_cost: Option<f64>) -> Vec<FinancingOption> {
    match cheapest_cost {
        Some(cost) if cost > budget => vec![
            FinancingOption::Installment {
                description: format!("Pay in installments over {} months", INSTALLMENT_MONTHS),
                monthly_payment: cost / INSTALLMENT_MONTHS as f64,
                total_cost: cost * (1.0 + FINANCING_SURCHARGE),
            },
            FinancingOption::Phased {
                description: "Install the system in phases".to_string(),
                phase_1_cost: budget,
                remaining_cost: cost - budget,
            },
        ],
        _ => Vec::new(),
    }
}
