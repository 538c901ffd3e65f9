use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::matcher::SearchLimits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub irradiance: IrradianceConfig,
    pub sizing: SizingConfig,
    pub search: SearchLimits,
    pub tariff: TariffConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: String,
}
impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: "config/catalog.toml".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrradianceConfig {
    /// Query NASA POWER when the request carries coordinates
    pub live_lookup: bool,
    pub base_url: String,
    pub http_timeout_seconds: u64,
    /// Calendar year of daily data to average
    pub data_year: i32,
}
impl Default for IrradianceConfig {
    fn default() -> Self {
        Self {
            live_lookup: true,
            base_url: "https://power.larc.nasa.gov/api".to_string(),
            http_timeout_seconds: 30,
            data_year: 2023,
        }
    }
}
impl IrradianceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Whole-system derating applied to panel sizing, in (0, 1]
    pub system_efficiency: f64,
    /// Candidates kept per sizer after ranking
    pub max_candidates: usize,
}
impl Default for SizingConfig {
    fn default() -> Self {
        Self { system_efficiency: 0.8, max_candidates: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Grid electricity price per kWh
    pub grid_price_per_kwh: f64,
    /// Yearly tariff growth used in the long-range projection
    pub annual_inflation: f64,
    pub currency_symbol: String,
}
impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            grid_price_per_kwh: 45.0,
            annual_inflation: 0.05,
            currency_symbol: "₦".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_soc: f64,
    /// System size the capacity factor and performance ratio are quoted against
    pub reference_system_kw: f64,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        Self { initial_soc: 0.8, reference_system_kw: 5.0 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Built-in defaults, then the TOML file (if present), then `SOLAR__*`
    /// environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SOLAR__").split("__"));
        Ok(figment.extract()?)
    }
}
