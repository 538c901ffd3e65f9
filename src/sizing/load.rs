use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::domain::{ApplianceLoad, LoadCategory};

/// Per-appliance row of the load breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceUsage {
    pub name: String,
    /// Rated power times quantity
    pub power_watts: f64,
    pub hours_per_day: f64,
    pub daily_energy_kwh: f64,
    pub category: LoadCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub daily_consumption_kwh: f64,
    pub peak_load_watts: f64,
    /// Daily kWh per category; every category is present
    pub category_breakdown: BTreeMap<LoadCategory, f64>,
    pub appliance_breakdown: Vec<ApplianceUsage>,
    pub total_appliances: usize,
}

/// Output of the load stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAnalysis {
    #[serde(flatten)]
    pub profile: EnergyProfile,
    /// Energy to carry the full peak load for the requested backup window
    pub backup_energy_kwh: f64,
}

pub struct LoadModel;

impl LoadModel {
    /// Aggregate an appliance list. An empty list is a valid zero profile.
    pub fn profile(appliances: &[ApplianceLoad]) -> EnergyProfile {
        let mut category_breakdown: BTreeMap<LoadCategory, f64> =
            LoadCategory::iter().map(|c| (c, 0.0)).collect();
        let mut appliance_breakdown = Vec::with_capacity(appliances.len());
        let mut daily_consumption_kwh = 0.0;
        let mut peak_load_watts = 0.0;

        for appliance in appliances {
            let daily_energy_kwh = appliance.daily_energy_kwh();
            let category = appliance.category();

            daily_consumption_kwh += daily_energy_kwh;
            peak_load_watts += appliance.peak_power_watts();
            *category_breakdown.entry(category).or_insert(0.0) += daily_energy_kwh;

            appliance_breakdown.push(ApplianceUsage {
                name: appliance.name.clone(),
                power_watts: appliance.peak_power_watts(),
                hours_per_day: appliance.hours_per_day,
                daily_energy_kwh,
                category,
            });
        }

        EnergyProfile {
            daily_consumption_kwh,
            peak_load_watts,
            category_breakdown,
            appliance_breakdown,
            total_appliances: appliances.len(),
        }
    }

    pub fn analyze(appliances: &[ApplianceLoad], backup_hours: f64) -> LoadAnalysis {
        let profile = Self::profile(appliances);
        let backup_energy_kwh = profile.peak_load_watts * backup_hours / 1000.0;
        LoadAnalysis {
            profile,
            backup_energy_kwh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fridge_and_air_conditioners() {
        let appliances = vec![
            ApplianceLoad::new("Fridge", 200.0, 24.0, 1),
            ApplianceLoad::new("AC", 1500.0, 8.0, 2),
        ];
        let profile = LoadModel::profile(&appliances);

        assert!((profile.daily_consumption_kwh - 28.8).abs() < 1e-9);
        assert_eq!(profile.peak_load_watts, 3200.0);
        assert_eq!(profile.total_appliances, 2);
        // "AC" has no keyword, "Fridge" neither
        assert!((profile.category_breakdown[&LoadCategory::Other] - 28.8).abs() < 1e-9);
        assert_eq!(profile.category_breakdown[&LoadCategory::Cooling], 0.0);
        assert_eq!(profile.appliance_breakdown[1].power_watts, 3000.0);
    }

    #[test]
    fn test_empty_list_is_zero_profile() {
        let profile = LoadModel::profile(&[]);
        assert_eq!(profile.daily_consumption_kwh, 0.0);
        assert_eq!(profile.peak_load_watts, 0.0);
        assert_eq!(profile.category_breakdown.len(), 4);
        assert!(profile.appliance_breakdown.is_empty());
    }

    #[test]
    fn test_categories_accumulate() {
        let appliances = vec![
            ApplianceLoad::new("Energy saving bulb", 15.0, 6.0, 4),
            ApplianceLoad::new("Standing fan", 60.0, 10.0, 2),
            ApplianceLoad::new("Smart TV", 100.0, 5.0, 1),
        ];
        let profile = LoadModel::profile(&appliances);
        assert!((profile.category_breakdown[&LoadCategory::Lighting] - 0.36).abs() < 1e-9);
        assert!((profile.category_breakdown[&LoadCategory::Cooling] - 1.2).abs() < 1e-9);
        assert!((profile.category_breakdown[&LoadCategory::Electronics] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_backup_energy_uses_peak_load() {
        let analysis = LoadModel::analyze(&[ApplianceLoad::new("Pump", 750.0, 2.0, 1)], 4.0);
        assert_eq!(analysis.backup_energy_kwh, 3.0);
    }

    #[test]
    fn test_profile_is_deterministic() {
        let appliances = vec![
            ApplianceLoad::new("Laptop", 65.0, 8.0, 2),
            ApplianceLoad::new("Lamp", 10.0, 5.0, 3),
        ];
        assert_eq!(LoadModel::profile(&appliances), LoadModel::profile(&appliances));
    }

    fn appliance_strategy() -> impl Strategy<Value = ApplianceLoad> {
        ("[a-z]{1,8}", 1.0..5000.0f64, 0.0..=24.0f64, 1u32..10)
            .prop_map(|(name, watts, hours, qty)| ApplianceLoad::new(name, watts, hours, qty))
    }

    proptest! {
        #[test]
        fn prop_consumption_is_additive(
            a in prop::collection::vec(appliance_strategy(), 0..8),
            b in prop::collection::vec(appliance_strategy(), 0..8),
        ) {
            let joined: Vec<_> = a.iter().chain(b.iter()).cloned().collect();
            let whole = LoadModel::profile(&joined);
            let left = LoadModel::profile(&a);
            let right = LoadModel::profile(&b);

            let tolerance = 1e-9 * whole.daily_consumption_kwh.max(1.0);
            let parts = left.daily_consumption_kwh + right.daily_consumption_kwh;
            prop_assert!((whole.daily_consumption_kwh - parts).abs() <= tolerance);
            let tolerance = 1e-9 * whole.peak_load_watts.max(1.0);
            let parts = left.peak_load_watts + right.peak_load_watts;
            prop_assert!((whole.peak_load_watts - parts).abs() <= tolerance);
            prop_assert!(whole.daily_consumption_kwh >= 0.0);
        }
    }
}
