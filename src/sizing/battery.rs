use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SizingConfig;
use crate::domain::{rank_by_unit_cost, ComponentCandidate, ComponentCatalog, ComponentKind};
use crate::error::PipelineError;

/// Usable fraction of nameplate capacity
pub const DEPTH_OF_DISCHARGE: f64 = 0.8;

const VOLTAGE_TOLERANCE: f64 = 1e-6;

/// Minimum bank capacity in Ah to carry `backup_hours` of average load.
pub fn required_battery_ah(
    daily_kwh: f64,
    backup_hours: f64,
    system_voltage: f64,
    depth_of_discharge: f64,
) -> Result<f64, PipelineError> {
    if !(system_voltage > 0.0) {
        return Err(PipelineError::calculation(format!(
            "system voltage must be greater than zero, got {}",
            system_voltage
        )));
    }
    if !(depth_of_discharge > 0.0 && depth_of_discharge <= 1.0) {
        return Err(PipelineError::calculation(format!(
            "depth of discharge must be within (0, 1], got {}",
            depth_of_discharge
        )));
    }
    let backup_fraction = backup_hours / 24.0;
    Ok((daily_kwh * backup_fraction * 1000.0) / (system_voltage * depth_of_discharge))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySizing {
    pub required_capacity_ah: f64,
    pub system_voltage: f64,
    pub backup_hours: f64,
    pub backup_energy_kwh: f64,
    pub depth_of_discharge: f64,
    /// Ascending cost per Ah, system-voltage batteries only
    pub candidates: Vec<ComponentCandidate>,
}

#[derive(Debug, Clone)]
pub struct BatterySizer {
    pub max_candidates: usize,
}

impl Default for BatterySizer {
    fn default() -> Self {
        Self::from(&SizingConfig::default())
    }
}

impl From<&SizingConfig> for BatterySizer {
    fn from(config: &SizingConfig) -> Self {
        Self {
            max_candidates: config.max_candidates,
        }
    }
}

impl BatterySizer {
    pub fn size(
        &self,
        daily_kwh: f64,
        backup_hours: f64,
        system_voltage: f64,
        catalog: &ComponentCatalog,
    ) -> Result<BatterySizing, PipelineError> {
        let required =
            required_battery_ah(daily_kwh, backup_hours, system_voltage, DEPTH_OF_DISCHARGE)?;

        // No series stacking: only banks built from system-voltage units.
        let candidates = catalog
            .entries(ComponentKind::Battery)
            .into_iter()
            .filter(|entry| entry.rating() > 0.0)
            .filter(|entry| (entry.voltage() - system_voltage).abs() < VOLTAGE_TOLERANCE)
            .map(|entry| ComponentCandidate::sized(entry, required))
            .collect::<Result<Vec<_>, PipelineError>>()?;
        debug!(
            required_ah = required,
            system_voltage,
            evaluated = candidates.len(),
            "battery candidates built"
        );

        Ok(BatterySizing {
            required_capacity_ah: required,
            system_voltage,
            backup_hours,
            backup_energy_kwh: daily_kwh * backup_hours / 24.0,
            depth_of_discharge: DEPTH_OF_DISCHARGE,
            candidates: rank_by_unit_cost(candidates, self.max_candidates),
        })
    }
}
