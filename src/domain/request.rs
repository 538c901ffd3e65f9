use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::ApplianceLoad;
use crate::error::PipelineError;

/// Ranking objective for the cost optimizer
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Cost,
    Reliability,
    Efficiency,
    #[default]
    Balanced,
}

/// Where the system will be installed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Site {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// A household's design request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PipelineRequest {
    #[validate(length(min = 1, message = "at least one appliance is required"))]
    #[validate(nested)]
    pub appliances: Vec<ApplianceLoad>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "budget must be greater than 0"))]
    pub budget: f64,
    #[serde(default = "default_backup_hours")]
    #[validate(range(min = 1.0, max = 72.0))]
    pub backup_hours: f64,
    #[serde(default = "default_system_voltage")]
    #[validate(range(exclusive_min = 0.0))]
    pub system_voltage: f64,
    #[serde(default)]
    pub priority: Priority,
}

fn default_backup_hours() -> f64 {
    4.0
}

fn default_system_voltage() -> f64 {
    12.0
}

impl PipelineRequest {
    pub fn site(&self) -> Site {
        Site {
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Run the field rules and map failures into the pipeline taxonomy.
    pub fn validated(&self) -> Result<&Self, PipelineError> {
        self.validate()?;
        Ok(self)
    }
}
