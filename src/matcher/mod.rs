//! Component matching: crosses sized panel arrays and battery banks with
//! eligible inverters and charge controllers into complete configurations.

use itertools::iproduct;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{ComponentCandidate, ComponentCatalog, ComponentKind, SystemConfiguration};
use crate::error::PipelineError;

/// Inverter headroom over the household peak load
pub const INVERTER_SAFETY_FACTOR: f64 = 1.25;
/// Controller headroom over the array charging current
pub const CONTROLLER_SAFETY_FACTOR: f64 = 1.25;
/// Bus voltage used to turn array watts into charging amps
pub const CONTROLLER_REFERENCE_VOLTAGE: f64 = 12.0;
/// Max panel/battery voltage gap that still counts as compatible
pub const COMPATIBILITY_VOLTAGE_TOLERANCE: f64 = 2.0;

/// How many of each input the search considers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub panels: usize,
    pub batteries: usize,
    pub inverters: usize,
    pub controllers: usize,
    /// Configurations returned after sorting by cost
    pub configurations: usize,
    pub compatibility_panels: usize,
    pub compatibility_batteries: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            panels: 3,
            batteries: 3,
            inverters: 2,
            controllers: 2,
            configurations: 10,
            compatibility_panels: 5,
            compatibility_batteries: 5,
        }
    }
}

/// Voltage check for one panel/battery pair. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub panel_model: String,
    pub battery_model: String,
    pub compatible: bool,
    pub compatibility_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    /// Ascending total cost
    pub configurations: Vec<SystemConfiguration>,
    pub compatibility_matrix: Vec<CompatibilityEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ComponentMatcher {
    pub limits: SearchLimits,
}

impl ComponentMatcher {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Inverters able to carry the peak load with headroom, cheapest first.
    pub fn eligible_inverters(
        catalog: &ComponentCatalog,
        peak_load_watts: f64,
    ) -> Vec<ComponentCandidate> {
        let required = peak_load_watts * INVERTER_SAFETY_FACTOR;
        let mut eligible: Vec<_> = catalog
            .entries(ComponentKind::Inverter)
            .into_iter()
            .filter(|entry| entry.rating() >= required)
            .map(ComponentCandidate::single)
            .collect();
        eligible.sort_by_key(|c| OrderedFloat(c.total_cost));
        eligible
    }

    /// Controllers rated for the largest candidate array, cheapest first.
    /// Without panel candidates nothing is eligible.
    pub fn eligible_controllers(
        catalog: &ComponentCatalog,
        panels: &[ComponentCandidate],
    ) -> Vec<ComponentCandidate> {
        let Some(max_array_watts) = panels.iter().map(|p| OrderedFloat(p.total_rating)).max() else {
            return Vec::new();
        };
        let required = max_array_watts.0 / CONTROLLER_REFERENCE_VOLTAGE * CONTROLLER_SAFETY_FACTOR;
        let mut eligible: Vec<_> = catalog
            .entries(ComponentKind::Controller)
            .into_iter()
            .filter(|entry| entry.rating() >= required)
            .map(ComponentCandidate::single)
            .collect();
        eligible.sort_by_key(|c| OrderedFloat(c.total_cost));
        eligible
    }

    pub fn match_components(
        &self,
        panels: &[ComponentCandidate],
        batteries: &[ComponentCandidate],
        peak_load_watts: f64,
        catalog: &ComponentCatalog,
    ) -> Result<MatchingResult, PipelineError> {
        let inverters = Self::eligible_inverters(catalog, peak_load_watts);
        let controllers = Self::eligible_controllers(catalog, panels);
        debug!(
            inverters = inverters.len(),
            controllers = controllers.len(),
            "eligible power electronics"
        );

        let limits = &self.limits;
        let mut configurations = iproduct!(
            panels.iter().take(limits.panels).enumerate(),
            batteries.iter().take(limits.batteries).enumerate(),
            inverters.iter().take(limits.inverters).enumerate(),
            controllers.iter().take(limits.controllers).enumerate()
        )
        .map(|((p, panel), (b, battery), (i, inverter), (c, controller))| {
            SystemConfiguration::assemble(
                format!("CONFIG_{}_{}_{}_{}", p, b, i, c),
                panel.clone(),
                battery.clone(),
                inverter.clone(),
                controller.clone(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

        let considered = configurations.len();
        configurations.sort_by_key(|c| OrderedFloat(c.total_cost));
        configurations.truncate(limits.configurations);
        info!(considered, kept = configurations.len(), "configurations matched");

        Ok(MatchingResult {
            configurations,
            compatibility_matrix: self.compatibility_matrix(panels, batteries),
        })
    }

    pub fn compatibility_matrix(
        &self,
        panels: &[ComponentCandidate],
        batteries: &[ComponentCandidate],
    ) -> Vec<CompatibilityEntry> {
        iproduct!(
            panels.iter().take(self.limits.compatibility_panels),
            batteries.iter().take(self.limits.compatibility_batteries)
        )
        .map(|(panel, battery)| {
            let compatible =
                (panel.voltage() - battery.voltage()).abs() <= COMPATIBILITY_VOLTAGE_TOLERANCE;
            CompatibilityEntry {
                panel_model: panel.model().to_string(),
                battery_model: battery.model().to_string(),
                compatible,
                compatibility_score: if compatible { 1.0 } else { 0.5 },
            }
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BatterySpec, CatalogEntry, ControllerSpec, InverterSpec, PanelSpec};

    fn panel(
        model: &str,
        watts: f64,
        voltage: f64,
        price: f64,
        requirement: f64,
    ) -> ComponentCandidate {
        ComponentCandidate::sized(
            CatalogEntry::Panel(PanelSpec {
                model: model.to_string(),
                power_rating: watts,
                voltage,
                price,
                efficiency: None,
            }),
            requirement,
        )
        .unwrap()
    }

    fn battery(model: &str, ah: f64, price: f64, requirement: f64) -> ComponentCandidate {
        ComponentCandidate::sized(
            CatalogEntry::Battery(BatterySpec {
                model: model.to_string(),
                capacity_ah: ah,
                voltage: 12.0,
                price,
                brand: None,
                warranty_years: None,
            }),
            requirement,
        )
        .unwrap()
    }

    fn catalog() -> ComponentCatalog {
        ComponentCatalog {
            inverters: vec![
                InverterSpec {
                    model: "INV-1K".into(),
                    power_rating: 1000.0,
                    input_voltage: 12.0,
                    price: 60000.0,
                    efficiency: None,
                },
                InverterSpec {
                    model: "INV-5K".into(),
                    power_rating: 5000.0,
                    input_voltage: 24.0,
                    price: 250000.0,
                    efficiency: Some(0.93),
                },
                InverterSpec {
                    model: "INV-3K".into(),
                    power_rating: 3000.0,
                    input_voltage: 24.0,
                    price: 150000.0,
                    efficiency: None,
                },
                InverterSpec {
                    model: "INV-2K".into(),
                    power_rating: 2000.0,
                    input_voltage: 12.0,
                    price: 90000.0,
                    efficiency: None,
                },
            ],
            controllers: vec![
                ControllerSpec {
                    model: "MPPT-60".into(),
                    max_current: 60.0,
                    voltage: 12.0,
                    price: 45000.0,
                    efficiency: None,
                },
                ControllerSpec {
                    model: "PWM-20".into(),
                    max_current: 20.0,
                    voltage: 12.0,
                    price: 8000.0,
                    efficiency: None,
                },
                ControllerSpec {
                    model: "MPPT-150".into(),
                    max_current: 150.0,
                    voltage: 12.0,
                    price: 110000.0,
                    efficiency: None,
                },
                ControllerSpec {
                    model: "MPPT-100".into(),
                    max_current: 100.0,
                    voltage: 12.0,
                    price: 70000.0,
                    efficiency: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_inverters_need_headroom_and_sort_by_price() {
        let eligible = ComponentMatcher::eligible_inverters(&catalog(), 2000.0);
        let models: Vec<_> = eligible.iter().map(|c| c.model()).collect();
        assert_eq!(models, vec!["INV-3K", "INV-5K"]);
        assert!(eligible.iter().all(|c| c.count_needed == 1));
    }

    #[test]
    fn test_controllers_sized_from_largest_array() {
        let panels = vec![
            panel("A", 300.0, 24.0, 60000.0, 600.0),
            panel("B", 400.0, 24.0, 70000.0, 1100.0),
        ];
        // 1200 W / 12 V * 1.25 = 125 A
        let eligible = ComponentMatcher::eligible_controllers(&catalog(), &panels);
        let models: Vec<_> = eligible.iter().map(|c| c.model()).collect();
        assert_eq!(models, vec!["MPPT-150"]);
    }

    #[test]
    fn test_no_panels_means_no_controllers() {
        assert!(ComponentMatcher::eligible_controllers(&catalog(), &[]).is_empty());
    }

    #[test]
    fn test_cross_product_is_bounded_and_sorted() {
        let panels: Vec<_> = (0..4)
            .map(|i| panel(&format!("P{}", i), 100.0, 12.0, 20000.0 + i as f64 * 1000.0, 400.0))
            .collect();
        let batteries: Vec<_> = (0..4)
            .map(|i| battery(&format!("B{}", i), 100.0, 50000.0 + i as f64 * 5000.0, 200.0))
            .collect();

        let result = ComponentMatcher::default()
            .match_components(&panels, &batteries, 500.0, &catalog())
            .unwrap();

        assert_eq!(result.configurations.len(), 10);
        assert!(result
            .configurations
            .windows(2)
            .all(|w| w[0].total_cost <= w[1].total_cost));
        let cheapest = &result.configurations[0];
        assert_eq!(cheapest.config_id, "CONFIG_0_0_0_0");
        assert_eq!(
            cheapest.total_cost,
            cheapest.panel.total_cost
                + cheapest.battery.total_cost
                + cheapest.inverter.total_cost
                + cheapest.controller.total_cost
        );
        assert_eq!(result.compatibility_matrix.len(), 16);
    }

    #[test]
    fn test_config_ids_are_unique() {
        let panels = vec![
            panel("P0", 100.0, 12.0, 1.0, 100.0),
            panel("P1", 100.0, 12.0, 1.0, 100.0),
        ];
        let batteries = vec![battery("B0", 100.0, 1.0, 100.0)];
        let result = ComponentMatcher::default()
            .match_components(&panels, &batteries, 100.0, &catalog())
            .unwrap();
        let mut ids: Vec<_> = result.configurations.iter().map(|c| c.config_id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 8);
    }

    #[test]
    fn test_nothing_eligible_yields_empty_result() {
        let panels = vec![panel("P0", 100.0, 12.0, 1.0, 100.0)];
        let batteries = vec![battery("B0", 100.0, 1.0, 100.0)];
        let result = ComponentMatcher::default()
            .match_components(&panels, &batteries, 10_000.0, &catalog())
            .unwrap();
        assert!(result.configurations.is_empty());
    }

    #[test]
    fn test_zero_rated_array_is_calculation_error() {
        let panels = vec![panel("P0", 100.0, 12.0, 1.0, 0.0)];
        let batteries = vec![battery("B0", 100.0, 1.0, 100.0)];
        let err = ComponentMatcher::default()
            .match_components(&panels, &batteries, 100.0, &catalog())
            .unwrap_err();
        assert_eq!(err.error_type(), "CalculationError");
    }

    #[test]
    fn test_compatibility_by_voltage_gap() {
        let panels = vec![
            panel("P12", 100.0, 13.5, 1.0, 100.0),
            panel("P24", 100.0, 24.0, 1.0, 100.0),
        ];
        let batteries = vec![battery("B12", 100.0, 1.0, 100.0)];
        let matrix = ComponentMatcher::default().compatibility_matrix(&panels, &batteries);
        assert!(matrix[0].compatible);
        assert_eq!(matrix[0].compatibility_score, 1.0);
        assert!(!matrix[1].compatible);
        assert_eq!(matrix[1].compatibility_score, 0.5);
    }
}
