//! Solar irradiance estimates for a site.
//!
//! The pipeline only depends on the [`IrradianceProvider`] trait. The default
//! [`IrradianceService`] tries one live NASA POWER query when coordinates are
//! known and otherwise (or on any failure) degrades through a stored location
//! table, a latitude band and finally a fixed default. It never fails.

pub mod nasa;
pub mod service;
pub mod stored;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::domain::Site;

pub use nasa::NasaPowerClient;
pub use service::IrradianceService;
pub use stored::StoredIrradiance;

/// Where an irradiance figure came from, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum IrradianceSource {
    #[serde(rename = "nasa_power_api")]
    #[strum(serialize = "nasa_power_api")]
    NasaPower,
    #[serde(rename = "stored_data")]
    #[strum(serialize = "stored_data")]
    StoredTable,
    #[serde(rename = "estimated")]
    #[strum(serialize = "estimated")]
    Estimated,
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradianceEstimate {
    pub daily_irradiance_kwh_per_m2: f64,
    pub peak_sun_hours: f64,
    #[serde(rename = "source_tag")]
    pub source: IrradianceSource,
    /// Calendar-month means (January first), when the source provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_kwh_per_m2: Option<[f64; 12]>,
}

impl IrradianceEstimate {
    pub fn flat(
        daily_irradiance_kwh_per_m2: f64,
        peak_sun_hours: f64,
        source: IrradianceSource,
    ) -> Self {
        Self {
            daily_irradiance_kwh_per_m2,
            peak_sun_hours,
            source,
            monthly_kwh_per_m2: None,
        }
    }

    /// Irradiance to use for a 1-based month, falling back to the daily mean.
    pub fn for_month(&self, month: usize) -> f64 {
        self.monthly_kwh_per_m2
            .and_then(|m| m.get(month.wrapping_sub(1)).copied())
            .unwrap_or(self.daily_irradiance_kwh_per_m2)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IrradianceProvider: Send + Sync {
    /// Best available estimate for `site`. Implementations degrade instead of
    /// failing.
    async fn estimate(&self, site: &Site) -> IrradianceEstimate;
}
