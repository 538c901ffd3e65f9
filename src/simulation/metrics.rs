use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::annual::AnnualSimulationResult;

const HOURS_PER_YEAR: f64 = 8760.0;
/// Reference full-sun hours per year (5 h × 365 d)
const REFERENCE_SUN_HOURS_PER_YEAR: f64 = 1825.0;

const SELF_SUFFICIENCY_TARGET: f64 = 0.7;
const GRID_DEPENDENCE_LIMIT: f64 = 0.5;
const SEASONAL_SELF_CONSUMPTION_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub system_efficiency: f64,
    pub self_sufficiency_ratio: Option<f64>,
    pub capacity_factor: f64,
    pub performance_ratio: f64,
    /// Days without any grid import
    pub grid_independence_days: usize,
}

impl PerformanceMetrics {
    /// Capacity factor and performance ratio are quoted against a
    /// `reference_system_kw` system.
    pub fn from_annual(result: &AnnualSimulationResult, reference_system_kw: f64) -> Self {
        let totals = &result.annual_totals;
        let supplied = totals.generation_kwh + totals.grid_import_kwh;
        Self {
            system_efficiency: if supplied > 0.0 {
                totals.generation_kwh / supplied
            } else {
                0.0
            },
            self_sufficiency_ratio: totals.self_sufficiency_ratio,
            capacity_factor: totals.generation_kwh / (HOURS_PER_YEAR * reference_system_kw),
            performance_ratio: totals.generation_kwh
                / (reference_system_kw * REFERENCE_SUN_HOURS_PER_YEAR),
            grid_independence_days: result
                .daily_records
                .iter()
                .filter(|r| r.grid_import_kwh == 0.0)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationCategory {
    SystemSizing,
    EnergyManagement,
    SeasonalOptimization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub message: String,
    pub priority: RecommendationPriority,
}

pub fn recommendations(result: &AnnualSimulationResult) -> Vec<Recommendation> {
    let totals = &result.annual_totals;
    let mut out = Vec::new();

    if totals
        .self_sufficiency_ratio
        .is_some_and(|ratio| ratio < SELF_SUFFICIENCY_TARGET)
    {
        out.push(Recommendation {
            category: RecommendationCategory::SystemSizing,
            message: "Consider increasing battery or panel capacity for better self-sufficiency"
                .to_string(),
            priority: RecommendationPriority::High,
        });
    }

    if totals.grid_import_kwh > totals.consumption_kwh * GRID_DEPENDENCE_LIMIT {
        out.push(Recommendation {
            category: RecommendationCategory::EnergyManagement,
            message: "Optimize energy usage patterns to maximize solar utilization".to_string(),
            priority: RecommendationPriority::Medium,
        });
    }

    // First month wins ties.
    let worst = result
        .monthly_summaries
        .iter()
        .min_by_key(|m| OrderedFloat(m.self_consumption_ratio));
    let worst = worst.filter(|m| m.self_consumption_ratio < SEASONAL_SELF_CONSUMPTION_FLOOR);
    if let Some(worst) = worst {
        out.push(Recommendation {
            category: RecommendationCategory::SeasonalOptimization,
            message: format!("Consider energy storage optimization for month {}", worst.month),
            priority: RecommendationPriority::Medium,
        });
    }

    out
}
