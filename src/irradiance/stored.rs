use std::collections::BTreeMap;

use super::{IrradianceEstimate, IrradianceSource};

/// Fallback used when neither coordinates nor a known location are given.
pub const DEFAULT_DAILY_IRRADIANCE: f64 = 5.0;
pub const DEFAULT_PEAK_SUN_HOURS: f64 = 6.0;

/// Peak sun hours per kWh/m²/day for latitude-band estimates
const BAND_PEAK_SUN_FACTOR: f64 = 1.2;

/// Offline irradiance figures: a per-location table plus latitude bands.
#[derive(Debug, Clone)]
pub struct StoredIrradiance {
    /// Lower-cased location -> (daily kWh/m², peak sun hours)
    table: BTreeMap<String, (f64, f64)>,
}

impl Default for StoredIrradiance {
    fn default() -> Self {
        Self::new([("lagos", 4.8, 5.8), ("abuja", 5.2, 6.2), ("kano", 5.8, 6.8)])
    }
}

impl StoredIrradiance {
    pub fn new<'a>(rows: impl IntoIterator<Item = (&'a str, f64, f64)>) -> Self {
        let table = rows
            .into_iter()
            .map(|(name, daily, psh)| (name.to_lowercase(), (daily, psh)))
            .collect();
        Self { table }
    }

    /// Table hit first, then the latitude band, then the fixed default.
    pub fn lookup(&self, location: &str, latitude: Option<f64>) -> IrradianceEstimate {
        if let Some(&(daily, psh)) = self.table.get(&location.trim().to_lowercase()) {
            return IrradianceEstimate::flat(daily, psh, IrradianceSource::StoredTable);
        }
        match latitude {
            Some(lat) => Self::latitude_band(lat),
            None => IrradianceEstimate::flat(
                DEFAULT_DAILY_IRRADIANCE,
                DEFAULT_PEAK_SUN_HOURS,
                IrradianceSource::Default,
            ),
        }
    }

    /// Three bands tuned for West Africa: north of 12°, 8°-12°, and south.
    pub fn latitude_band(latitude: f64) -> IrradianceEstimate {
        let daily = if latitude > 12.0 {
            5.8
        } else if latitude > 8.0 {
            5.2
        } else {
            4.8
        };
        IrradianceEstimate::flat(daily, daily * BAND_PEAK_SUN_FACTOR, IrradianceSource::Estimated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Lagos", 4.8, 5.8)]
    #[case("  ABUJA ", 5.2, 6.2)]
    #[case("kano", 5.8, 6.8)]
    fn test_table_lookup(#[case] location: &str, #[case] daily: f64, #[case] psh: f64) {
        let estimate = StoredIrradiance::default().lookup(location, Some(0.0));
        assert_eq!(estimate.daily_irradiance_kwh_per_m2, daily);
        assert_eq!(estimate.peak_sun_hours, psh);
        assert_eq!(estimate.source, IrradianceSource::StoredTable);
    }

    #[rstest]
    #[case(13.0, 5.8)]
    #[case(12.0, 5.2)]
    #[case(9.0, 5.2)]
    #[case(8.0, 4.8)]
    #[case(-33.9, 4.8)]
    fn test_latitude_band(#[case] latitude: f64, #[case] daily: f64) {
        let estimate = StoredIrradiance::default().lookup("Nowhere", Some(latitude));
        assert_eq!(estimate.source, IrradianceSource::Estimated);
        assert_eq!(estimate.daily_irradiance_kwh_per_m2, daily);
        assert!((estimate.peak_sun_hours - daily * 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_everything_uses_default() {
        let estimate = StoredIrradiance::default().lookup("Atlantis", None);
        assert_eq!(estimate.source, IrradianceSource::Default);
        assert_eq!(estimate.daily_irradiance_kwh_per_m2, 5.0);
        assert_eq!(estimate.peak_sun_hours, 6.0);
    }
}
