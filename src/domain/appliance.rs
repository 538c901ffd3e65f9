use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::Validate;

/// One line of the household appliance list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApplianceLoad {
    #[serde(alias = "appliance")]
    #[validate(length(min = 1, message = "appliance name must not be empty"))]
    pub name: String,
    #[serde(alias = "power_rating")]
    #[validate(range(exclusive_min = 0.0, message = "rated power must be positive"))]
    pub rated_power_watts: f64,
    #[validate(range(min = 0.0, max = 24.0, message = "hours per day must be within 0-24"))]
    pub hours_per_day: f64,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ApplianceLoad {
    pub fn new(
        name: impl Into<String>,
        rated_power_watts: f64,
        hours_per_day: f64,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            rated_power_watts,
            hours_per_day,
            quantity,
        }
    }

    /// Daily energy in kWh (nameplate power, no duty cycle).
    pub fn daily_energy_kwh(&self) -> f64 {
        self.rated_power_watts * self.hours_per_day * self.quantity as f64 / 1000.0
    }

    /// Simultaneous nameplate draw of every unit, in watts.
    pub fn peak_power_watts(&self) -> f64 {
        self.rated_power_watts * self.quantity as f64
    }

    pub fn category(&self) -> LoadCategory {
        LoadCategory::classify(&self.name)
    }
}

/// Coarse appliance grouping used in the load breakdown
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadCategory {
    Lighting,
    Cooling,
    Electronics,
    Other,
}

const CATEGORY_KEYWORDS: [(LoadCategory, &[&str]); 3] = [
    (LoadCategory::Lighting, &["light", "bulb", "lamp"]),
    (LoadCategory::Cooling, &["fan", "air", "cool"]),
    (LoadCategory::Electronics, &["tv", "laptop", "phone", "computer"]),
];

impl LoadCategory {
    /// Case-insensitive substring match; the first matching category wins.
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(LoadCategory::Other)
    }
}
