use serde::{Deserialize, Serialize};

use crate::domain::SystemConfiguration;
use crate::error::PipelineError;
use crate::irradiance::IrradianceEstimate;

pub const DAYS_PER_YEAR: u32 = 365;
pub const MIN_SOC: f64 = 0.2;
pub const MAX_SOC: f64 = 1.0;
/// Panel output derate applied to nameplate × irradiance
pub const GENERATION_DERATE: f64 = 0.8;
/// Bus voltage used to express the battery bank in kWh
pub const BATTERY_REFERENCE_VOLTAGE: f64 = 12.0;

/// Thirty-day buckets; month 12 absorbs days 331–365.
pub fn month_of_day(day: u32) -> u32 {
    ((day.saturating_sub(1) / 30) + 1).min(12)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySimulationRecord {
    pub day: u32,
    pub month: u32,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    /// State of charge after the day, in [0.2, 1.0]
    pub battery_soc: f64,
    pub grid_import_kwh: f64,
    pub excess_energy_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub days: u32,
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    pub grid_import_kwh: f64,
    pub self_consumption_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualTotals {
    pub generation_kwh: f64,
    pub consumption_kwh: f64,
    pub grid_import_kwh: f64,
    /// `1 − grid / consumption`; absent when nothing was consumed
    pub self_sufficiency_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualSimulationResult {
    pub daily_records: Vec<DailySimulationRecord>,
    pub monthly_summaries: Vec<MonthlySummary>,
    pub annual_totals: AnnualTotals,
}

/// Share of generation that covered consumption over a period.
pub fn self_consumption_ratio(generation_kwh: f64, consumption_kwh: f64) -> f64 {
    if generation_kwh <= 0.0 {
        return 0.0;
    }
    generation_kwh.min(consumption_kwh) / generation_kwh
}

/// Step the battery through one year of identical daily loads.
pub fn run_annual(
    configuration: &SystemConfiguration,
    daily_consumption_kwh: f64,
    irradiance: &IrradianceEstimate,
    initial_soc: f64,
) -> Result<AnnualSimulationResult, PipelineError> {
    let battery_kwh = configuration.battery_ah() * BATTERY_REFERENCE_VOLTAGE / 1000.0;
    if !(battery_kwh > 0.0) {
        return Err(PipelineError::calculation(format!(
            "{}: battery bank has no capacity",
            configuration.config_id
        )));
    }
    let panel_watts = configuration.panel_watts();

    let mut soc = initial_soc.clamp(MIN_SOC, MAX_SOC);
    let daily_records: Vec<_> = (1..=DAYS_PER_YEAR)
        .map(|day| {
            let month = month_of_day(day);
            let generation_kwh =
                panel_watts * irradiance.for_month(month as usize) * GENERATION_DERATE / 1000.0;
            let excess = generation_kwh - daily_consumption_kwh;

            soc = (soc + excess / battery_kwh).clamp(MIN_SOC, MAX_SOC);
            let grid_import_kwh = if soc <= MIN_SOC { (-excess).max(0.0) } else { 0.0 };

            DailySimulationRecord {
                day,
                month,
                generation_kwh,
                consumption_kwh: daily_consumption_kwh,
                battery_soc: soc,
                grid_import_kwh,
                excess_energy_kwh: excess.max(0.0),
            }
        })
        .collect();

    let monthly_summaries = (1..=12)
        .map(|month| summarize_month(month, &daily_records))
        .collect();

    let generation_kwh: f64 = daily_records.iter().map(|r| r.generation_kwh).sum();
    let consumption_kwh: f64 = daily_records.iter().map(|r| r.consumption_kwh).sum();
    let grid_import_kwh: f64 = daily_records.iter().map(|r| r.grid_import_kwh).sum();
    let self_sufficiency_ratio =
        (consumption_kwh > 0.0).then(|| 1.0 - grid_import_kwh / consumption_kwh);

    Ok(AnnualSimulationResult {
        daily_records,
        monthly_summaries,
        annual_totals: AnnualTotals {
            generation_kwh,
            consumption_kwh,
            grid_import_kwh,
            self_sufficiency_ratio,
        },
    })
}

fn summarize_month(month: u32, records: &[DailySimulationRecord]) -> MonthlySummary {
    let (days, generation_kwh, consumption_kwh, grid_import_kwh) = records
        .iter()
        .filter(|r| r.month == month)
        .fold((0, 0.0, 0.0, 0.0), |(n, g, c, i), r| {
            (n + 1, g + r.generation_kwh, c + r.consumption_kwh, i + r.grid_import_kwh)
        });
    MonthlySummary {
        month,
        days,
        generation_kwh,
        consumption_kwh,
        grid_import_kwh,
        self_consumption_ratio: self_consumption_ratio(generation_kwh, consumption_kwh),
    }
}
