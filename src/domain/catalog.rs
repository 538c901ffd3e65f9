//! Component catalog: the hardware rows the sizers and matcher draw from.
//!
//! Rows are loaded from a TOML file with one array of tables per component
//! type (`[[panel]]`, `[[battery]]`, `[[inverter]]`, `[[controller]]`). Rows
//! with a non-positive rating, price or voltage are dropped at load time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, info};

use crate::error::PipelineError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComponentKind {
    Panel,
    Battery,
    Inverter,
    Controller,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub model: String,
    /// Nameplate power in W
    pub power_rating: f64,
    pub voltage: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterySpec {
    pub model: String,
    pub capacity_ah: f64,
    pub voltage: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverterSpec {
    pub model: String,
    /// Continuous output rating in W
    pub power_rating: f64,
    #[serde(alias = "voltage")]
    pub input_voltage: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSpec {
    pub model: String,
    /// Maximum charging current in A
    pub max_current: f64,
    pub voltage: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
}

/// A single catalog row of any component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntry {
    Panel(PanelSpec),
    Battery(BatterySpec),
    Inverter(InverterSpec),
    Controller(ControllerSpec),
}

impl CatalogEntry {
    pub fn kind(&self) -> ComponentKind {
        match self {
            CatalogEntry::Panel(_) => ComponentKind::Panel,
            CatalogEntry::Battery(_) => ComponentKind::Battery,
            CatalogEntry::Inverter(_) => ComponentKind::Inverter,
            CatalogEntry::Controller(_) => ComponentKind::Controller,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            CatalogEntry::Panel(p) => &p.model,
            CatalogEntry::Battery(b) => &b.model,
            CatalogEntry::Inverter(i) => &i.model,
            CatalogEntry::Controller(c) => &c.model,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            CatalogEntry::Panel(p) => p.price,
            CatalogEntry::Battery(b) => b.price,
            CatalogEntry::Inverter(i) => i.price,
            CatalogEntry::Controller(c) => c.price,
        }
    }

    /// Type-specific rating: W for panels and inverters, Ah for batteries,
    /// A for charge controllers.
    pub fn rating(&self) -> f64 {
        match self {
            CatalogEntry::Panel(p) => p.power_rating,
            CatalogEntry::Battery(b) => b.capacity_ah,
            CatalogEntry::Inverter(i) => i.power_rating,
            CatalogEntry::Controller(c) => c.max_current,
        }
    }

    pub fn voltage(&self) -> f64 {
        match self {
            CatalogEntry::Panel(p) => p.voltage,
            CatalogEntry::Battery(b) => b.voltage,
            CatalogEntry::Inverter(i) => i.input_voltage,
            CatalogEntry::Controller(c) => c.voltage,
        }
    }

    /// Conversion efficiency, falling back to the typical value for the type.
    /// Panels and batteries have no conversion stage here and report `None`.
    pub fn efficiency(&self) -> Option<f64> {
        match self {
            CatalogEntry::Inverter(i) => Some(i.efficiency.unwrap_or(0.90)),
            CatalogEntry::Controller(c) => Some(c.efficiency.unwrap_or(0.98)),
            CatalogEntry::Panel(p) => p.efficiency,
            CatalogEntry::Battery(_) => None,
        }
    }

    fn is_usable(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        positive(self.rating()) && positive(self.price()) && positive(self.voltage())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentCatalog {
    #[serde(default, rename = "panel")]
    pub panels: Vec<PanelSpec>,
    #[serde(default, rename = "battery")]
    pub batteries: Vec<BatterySpec>,
    #[serde(default, rename = "inverter")]
    pub inverters: Vec<InverterSpec>,
    #[serde(default, rename = "controller")]
    pub controllers: Vec<ControllerSpec>,
}

impl ComponentCatalog {
    /// Parse a TOML catalog and drop unusable rows.
    pub fn from_toml_str(source: &str) -> Result<Self, PipelineError> {
        let raw: ComponentCatalog = toml::from_str(source).map_err(|e| {
            PipelineError::DataNotFound(format!("component catalog is malformed: {}", e))
        })?;
        Ok(raw.sanitized())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::DataNotFound(format!(
                "component catalog not found at {}: {}",
                path.display(),
                e
            ))
        })?;
        let catalog = Self::from_toml_str(&source)?;
        info!(
            path = %path.display(),
            panels = catalog.panels.len(),
            batteries = catalog.batteries.len(),
            inverters = catalog.inverters.len(),
            controllers = catalog.controllers.len(),
            "component catalog loaded"
        );
        Ok(catalog)
    }

    /// All rows of one type, in catalog order.
    pub fn entries(&self, kind: ComponentKind) -> Vec<CatalogEntry> {
        match kind {
            ComponentKind::Panel => self.panels.iter().cloned().map(CatalogEntry::Panel).collect(),
            ComponentKind::Battery => self
                .batteries
                .iter()
                .cloned()
                .map(CatalogEntry::Battery)
                .collect(),
            ComponentKind::Inverter => self
                .inverters
                .iter()
                .cloned()
                .map(CatalogEntry::Inverter)
                .collect(),
            ComponentKind::Controller => self
                .controllers
                .iter()
                .cloned()
                .map(CatalogEntry::Controller)
                .collect(),
        }
    }

    /// Look up rows by component type name (`panel`, `battery`, ...).
    pub fn lookup(&self, kind: &str) -> Result<Vec<CatalogEntry>, PipelineError> {
        let kind = ComponentKind::from_str(kind.trim())
            .map_err(|_| PipelineError::DataNotFound(format!("Unknown component type: {}", kind)))?;
        Ok(self.entries(kind))
    }

    fn sanitized(self) -> Self {
        fn keep<T: Clone>(rows: Vec<T>, wrap: fn(T) -> CatalogEntry) -> Vec<T> {
            rows.into_iter()
                .filter(|row| {
                    let entry = wrap(row.clone());
                    let usable = entry.is_usable();
                    if !usable {
                        debug!(
                            kind = %entry.kind(),
                            model = entry.model(),
                            "excluding catalog row with non-positive values"
                        );
                    }
                    usable
                })
                .collect()
        }

        Self {
            panels: keep(self.panels, CatalogEntry::Panel),
            batteries: keep(self.batteries, CatalogEntry::Battery),
            inverters: keep(self.inverters, CatalogEntry::Inverter),
            controllers: keep(self.controllers, CatalogEntry::Controller),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [[panel]]
        model = "Mono 300"
        power_rating = 300
        voltage = 24
        price = 60000

        [[panel]]
        model = "Broken"
        power_rating = 0
        voltage = 24
        price = 10000

        [[battery]]
        model = "Gel 200"
        capacity_ah = 200
        voltage = 12
        price = 180000

        [[inverter]]
        model = "Hybrid 5k"
        power_rating = 5000
        input_voltage = 48
        price = 400000
        efficiency = 0.93

        [[controller]]
        model = "MPPT 60"
        max_current = 60
        voltage = 24
        price = 70000
    "#;

    #[test]
    fn test_parse_drops_non_positive_rows() {
        let catalog = ComponentCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.panels.len(), 1);
        assert_eq!(catalog.panels[0].model, "Mono 300");
        assert_eq!(catalog.batteries.len(), 1);
        assert_eq!(catalog.inverters.len(), 1);
        assert_eq!(catalog.controllers.len(), 1);
    }

    #[test]
    fn test_zero_price_row_is_dropped() {
        let catalog = ComponentCatalog::from_toml_str(
            r#"
            [[battery]]
            model = "Free"
            capacity_ah = 100
            voltage = 12
            price = 0

            [[battery]]
            model = "Paid"
            capacity_ah = 100
            voltage = 12
            price = 90000
            "#,
        )
        .unwrap();
        let models: Vec<_> = catalog.batteries.iter().map(|b| b.model.as_str()).collect();
        assert_eq!(models, vec!["Paid"]);
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = ComponentCatalog::from_toml_str(CATALOG).unwrap();
        let inverters = catalog.lookup("Inverter").unwrap();
        assert_eq!(inverters.len(), 1);
        assert_eq!(inverters[0].kind(), ComponentKind::Inverter);
        assert_eq!(inverters[0].rating(), 5000.0);
        assert_eq!(inverters[0].efficiency(), Some(0.93));
    }

    #[test]
    fn test_unknown_kind_is_data_not_found() {
        let catalog = ComponentCatalog::default();
        let err = catalog.lookup("turbine").unwrap_err();
        assert!(matches!(err, PipelineError::DataNotFound(_)));
        assert_eq!(err.to_string(), "Data not found: Unknown component type: turbine");
    }

    #[test]
    fn test_missing_file_is_data_not_found() {
        let err = ComponentCatalog::from_toml_file("/nonexistent/catalog.toml").unwrap_err();
        assert!(matches!(err, PipelineError::DataNotFound(_)));
    }

    #[test]
    fn test_default_efficiencies() {
        let controller = CatalogEntry::Controller(ControllerSpec {
            model: "PWM 30".to_string(),
            max_current: 30.0,
            voltage: 12.0,
            price: 15000.0,
            efficiency: None,
        });
        assert_eq!(controller.efficiency(), Some(0.98));
    }
}
