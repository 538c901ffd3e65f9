//! Builders shared by unit tests.

use crate::domain::{
    BatterySpec, CatalogEntry, ComponentCandidate, ControllerSpec, InverterSpec, PanelSpec,
    SystemConfiguration,
};

fn candidate(entry: CatalogEntry, total_rating: f64, total_cost: f64) -> ComponentCandidate {
    ComponentCandidate {
        entry,
        count_needed: 1,
        total_rating,
        total_cost,
        unit_cost_metric: if total_rating > 0.0 {
            total_cost / total_rating
        } else {
            0.0
        },
    }
}

/// A configuration whose whole cost sits on the panel array. Zero panel
/// watts are allowed here so degenerate arrays can be simulated.
pub fn configuration(
    id: &str,
    panel_watts: f64,
    battery_ah: f64,
    total_cost: f64,
) -> SystemConfiguration {
    let panel = candidate(
        CatalogEntry::Panel(PanelSpec {
            model: format!("{}-panel", id),
            power_rating: panel_watts,
            voltage: 12.0,
            price: total_cost,
            efficiency: None,
        }),
        panel_watts,
        total_cost,
    );
    let battery = candidate(
        CatalogEntry::Battery(BatterySpec {
            model: format!("{}-battery", id),
            capacity_ah: battery_ah,
            voltage: 12.0,
            price: 0.0,
            brand: None,
            warranty_years: None,
        }),
        battery_ah,
        0.0,
    );
    let inverter = candidate(
        CatalogEntry::Inverter(InverterSpec {
            model: format!("{}-inverter", id),
            power_rating: 3000.0,
            input_voltage: 12.0,
            price: 0.0,
            efficiency: None,
        }),
        3000.0,
        0.0,
    );
    let controller = candidate(
        CatalogEntry::Controller(ControllerSpec {
            model: format!("{}-controller", id),
            max_current: 60.0,
            voltage: 12.0,
            price: 0.0,
            efficiency: None,
        }),
        60.0,
        0.0,
    );

    SystemConfiguration {
        config_id: id.to_string(),
        cost_per_watt: if panel_watts > 0.0 { total_cost / panel_watts } else { 0.0 },
        total_cost,
        panel,
        battery,
        inverter,
        controller,
        scores: Default::default(),
    }
}
