use serde::{Deserialize, Serialize};

use super::ComponentCandidate;
use crate::error::PipelineError;

/// Optional ranking scores attached to a configuration by an upstream
/// scorer. A missing score ranks as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balanced: Option<f64>,
}

/// A complete, buildable system: panels, battery bank, inverter and charge
/// controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    pub config_id: String,
    pub panel: ComponentCandidate,
    pub battery: ComponentCandidate,
    pub inverter: ComponentCandidate,
    pub controller: ComponentCandidate,
    /// Exact sum of the four candidate costs
    pub total_cost: f64,
    /// `total_cost` per watt of installed panel capacity
    pub cost_per_watt: f64,
    #[serde(default)]
    pub scores: ConfigurationScores,
}

impl SystemConfiguration {
    pub fn assemble(
        config_id: impl Into<String>,
        panel: ComponentCandidate,
        battery: ComponentCandidate,
        inverter: ComponentCandidate,
        controller: ComponentCandidate,
    ) -> Result<Self, PipelineError> {
        let config_id = config_id.into();
        if panel.total_rating <= 0.0 {
            return Err(PipelineError::calculation(format!(
                "{}: panel array has no rated capacity, cost per watt is undefined",
                config_id
            )));
        }
        let total_cost =
            panel.total_cost + battery.total_cost + inverter.total_cost + controller.total_cost;
        let cost_per_watt = total_cost / panel.total_rating;

        Ok(Self {
            config_id,
            panel,
            battery,
            inverter,
            controller,
            total_cost,
            cost_per_watt,
            scores: ConfigurationScores::default(),
        })
    }

    pub fn with_scores(mut self, scores: ConfigurationScores) -> Self {
        self.scores = scores;
        self
    }

    /// Installed panel capacity in W
    pub fn panel_watts(&self) -> f64 {
        self.panel.total_rating
    }

    /// Battery bank capacity in Ah
    pub fn battery_ah(&self) -> f64 {
        self.battery.total_rating
    }

    pub fn inverter_watts(&self) -> f64 {
        self.inverter.total_rating
    }
}
