//! Final report: executive summary, technical details and a long-range
//! financial projection assembled from the stage outputs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::TariffConfig;
use crate::domain::{ComponentCandidate, PipelineRequest, SystemConfiguration};
use crate::error::Degradation;
use crate::optimizer::{FinancingOption, OptimizationResult};
use crate::simulation::{Recommendation, SimulationOutcome};
use crate::sizing::LoadAnalysis;

pub const PROJECTION_YEARS: u32 = 25;
/// Grid emission factor, kg CO₂ per kWh
pub const GRID_CO2_KG_PER_KWH: f64 = 0.459;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    pub location: String,
    pub analysis_date: NaiveDate,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub recommended_system_cost: f64,
    pub daily_energy_needs_kwh: f64,
    pub projected_annual_savings: f64,
    pub payback_period_years: f64,
    pub annual_co2_avoided_kg: f64,
    pub key_benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSpecifications {
    pub total_panel_capacity_watts: f64,
    pub total_battery_capacity_ah: f64,
    pub inverter_capacity_watts: f64,
    pub expected_daily_generation_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalDetails {
    pub solar_panels: ComponentCandidate,
    pub battery_system: ComponentCandidate,
    pub inverter: ComponentCandidate,
    pub charge_controller: ComponentCandidate,
    pub system_specifications: SystemSpecifications,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialProjection {
    pub initial_investment: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    /// Running total per year, investment deducted in year 1
    pub cumulative_savings: Vec<f64>,
    pub net_savings: f64,
    pub roi_percentage: f64,
    /// First 1-based year with a positive running total
    pub break_even_year: Option<u32>,
}

impl FinancialProjection {
    /// Project `annual_savings` forward, growing each year by `inflation`.
    pub fn project(
        initial_investment: f64,
        annual_savings: f64,
        inflation: f64,
        years: u32,
    ) -> Self {
        let cumulative_savings: Vec<f64> = (1..=years)
            .scan(-initial_investment, |running, year| {
                *running += annual_savings * (1.0 + inflation).powi(year as i32);
                Some(*running)
            })
            .collect();

        let net_savings = cumulative_savings.last().copied().unwrap_or(0.0);
        let break_even_year = cumulative_savings
            .iter()
            .position(|c| *c > 0.0)
            .map(|i| i as u32 + 1);

        Self {
            initial_investment,
            annual_savings,
            payback_years: if annual_savings > 0.0 {
                initial_investment / annual_savings
            } else {
                f64::INFINITY
            },
            cumulative_savings,
            net_savings,
            roi_percentage: if initial_investment > 0.0 {
                net_savings / initial_investment * 100.0
            } else {
                0.0
            },
            break_even_year,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub generated_at: DateTime<Utc>,
    pub project_info: ProjectInfo,
    pub executive_summary: ExecutiveSummary,
    /// Absent when no configuration was selected
    pub technical_details: Option<TechnicalDetails>,
    pub financial_analysis: FinancialProjection,
    pub recommendations: Vec<Recommendation>,
    pub financing_options: Vec<FinancingOption>,
    pub degradations: Vec<Degradation>,
}

#[derive(Debug, Clone)]
pub struct ReportCompiler {
    pub annual_inflation: f64,
    pub currency_symbol: String,
    pub projection_years: u32,
}

impl Default for ReportCompiler {
    fn default() -> Self {
        Self::from(&TariffConfig::default())
    }
}

impl From<&TariffConfig> for ReportCompiler {
    fn from(config: &TariffConfig) -> Self {
        Self {
            annual_inflation: config.annual_inflation,
            currency_symbol: config.currency_symbol.clone(),
            projection_years: PROJECTION_YEARS,
        }
    }
}

impl ReportCompiler {
    pub fn compile(
        &self,
        request: &PipelineRequest,
        load: &LoadAnalysis,
        optimization: &OptimizationResult,
        simulation: Option<&SimulationOutcome>,
        degradations: &[Degradation],
    ) -> SystemReport {
        let generated_at = Utc::now();
        let selected = optimization.selected();
        let annual_savings = selected
            .and_then(|s| {
                optimization
                    .savings_analysis
                    .iter()
                    .find(|a| a.config_id == s.config_id)
            })
            .map(|a| a.annual_savings)
            .unwrap_or(0.0);
        let investment = selected.map(|s| s.total_cost).unwrap_or(0.0);
        let annual_generation_kwh = simulation
            .map(|s| s.simulation_results.annual_totals.generation_kwh)
            .unwrap_or(0.0);

        let financial_analysis = FinancialProjection::project(
            investment,
            annual_savings,
            self.annual_inflation,
            self.projection_years,
        );
        let daily_kwh = load.profile.daily_consumption_kwh;
        debug!(
            investment,
            annual_savings,
            break_even_year = ?financial_analysis.break_even_year,
            "financial projection built"
        );

        SystemReport {
            generated_at,
            project_info: ProjectInfo {
                location: request.location.clone(),
                analysis_date: generated_at.date_naive(),
                budget: request.budget,
            },
            executive_summary: ExecutiveSummary {
                recommended_system_cost: investment,
                daily_energy_needs_kwh: daily_kwh,
                projected_annual_savings: annual_savings,
                payback_period_years: financial_analysis.payback_years,
                annual_co2_avoided_kg: annual_generation_kwh * GRID_CO2_KG_PER_KWH,
                key_benefits: vec![
                    format!(
                        "Reduce electricity costs by {}{} annually",
                        self.currency_symbol,
                        group_thousands(annual_savings)
                    ),
                    format!("Meet {:.1} kWh daily energy needs", daily_kwh),
                    "Reduce carbon footprint".to_string(),
                    "Energy independence from grid instability".to_string(),
                ],
            },
            technical_details: selected.map(|s| technical_details(s, annual_generation_kwh)),
            financial_analysis,
            recommendations: simulation
                .map(|s| s.recommendations.clone())
                .unwrap_or_default(),
            financing_options: optimization.financing_options.clone(),
            degradations: degradations.to_vec(),
        }
    }
}

/// Whole-unit amount with comma thousands separators, e.g. `97,200`.
fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn technical_details(
    selected: &SystemConfiguration,
    annual_generation_kwh: f64,
) -> TechnicalDetails {
    TechnicalDetails {
        solar_panels: selected.panel.clone(),
        battery_system: selected.battery.clone(),
        inverter: selected.inverter.clone(),
        charge_controller: selected.controller.clone(),
        system_specifications: SystemSpecifications {
            total_panel_capacity_watts: selected.panel_watts(),
            total_battery_capacity_ah: selected.battery_ah(),
            inverter_capacity_watts: selected.inverter_watts(),
            expected_daily_generation_kwh: annual_generation_kwh / 365.0,
        },
    }
}
