use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SizingConfig;
use crate::domain::{rank_by_unit_cost, ComponentCandidate, ComponentCatalog, ComponentKind};
use crate::error::PipelineError;
use crate::irradiance::IrradianceEstimate;

/// Minimum array wattage to cover `daily_kwh` after system losses.
pub fn required_panel_watts(
    daily_kwh: f64,
    peak_sun_hours: f64,
    system_efficiency: f64,
) -> Result<f64, PipelineError> {
    if !(system_efficiency > 0.0 && system_efficiency <= 1.0) {
        return Err(PipelineError::calculation(format!(
            "system efficiency must be within (0, 1], got {}",
            system_efficiency
        )));
    }
    if !(peak_sun_hours > 0.0) {
        return Err(PipelineError::calculation(format!(
            "peak sun hours must be greater than zero, got {}",
            peak_sun_hours
        )));
    }
    Ok((daily_kwh / system_efficiency) * 1000.0 / peak_sun_hours)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSizingDetails {
    pub daily_consumption_kwh: f64,
    pub peak_sun_hours: f64,
    pub derating_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSizing {
    pub required_capacity_watts: f64,
    pub system_efficiency: f64,
    /// Ascending cost per watt
    pub candidates: Vec<ComponentCandidate>,
    pub sizing_details: PanelSizingDetails,
}

#[derive(Debug, Clone)]
pub struct PanelSizer {
    pub system_efficiency: f64,
    pub max_candidates: usize,
}

impl Default for PanelSizer {
    fn default() -> Self {
        Self::from(&SizingConfig::default())
    }
}

impl From<&SizingConfig> for PanelSizer {
    fn from(config: &SizingConfig) -> Self {
        Self {
            system_efficiency: config.system_efficiency,
            max_candidates: config.max_candidates,
        }
    }
}

impl PanelSizer {
    pub fn size(
        &self,
        daily_kwh: f64,
        irradiance: &IrradianceEstimate,
        catalog: &ComponentCatalog,
    ) -> Result<PanelSizing, PipelineError> {
        let required =
            required_panel_watts(daily_kwh, irradiance.peak_sun_hours, self.system_efficiency)?;

        let candidates = catalog
            .entries(ComponentKind::Panel)
            .into_iter()
            .filter(|entry| entry.rating() > 0.0)
            .map(|entry| ComponentCandidate::sized(entry, required))
            .collect::<Result<Vec<_>, PipelineError>>()?;
        debug!(required_watts = required, evaluated = candidates.len(), "panel candidates built");

        Ok(PanelSizing {
            required_capacity_watts: required,
            system_efficiency: self.system_efficiency,
            candidates: rank_by_unit_cost(candidates, self.max_candidates),
            sizing_details: PanelSizingDetails {
                daily_consumption_kwh: daily_kwh,
                peak_sun_hours: irradiance.peak_sun_hours,
                derating_factor: 1.0 - self.system_efficiency,
            },
        })
    }
}
