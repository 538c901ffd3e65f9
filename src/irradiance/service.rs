use async_trait::async_trait;
use tracing::{debug, warn};

use super::{IrradianceEstimate, IrradianceProvider, NasaPowerClient, StoredIrradiance};
use crate::config::IrradianceConfig;
use crate::domain::Site;

/// Live lookup with offline fallbacks.
pub struct IrradianceService {
    live: Option<NasaPowerClient>,
    stored: StoredIrradiance,
}

impl IrradianceService {
    pub fn new(config: &IrradianceConfig) -> Self {
        let live = if config.live_lookup {
            usable_client(NasaPowerClient::new(
                config.base_url.clone(),
                config.timeout(),
                config.data_year,
            ))
        } else {
            None
        };
        Self {
            live,
            stored: StoredIrradiance::default(),
        }
    }

    /// No network access; stored table and latitude bands only.
    pub fn offline() -> Self {
        Self {
            live: None,
            stored: StoredIrradiance::default(),
        }
    }

    pub fn with_stored(mut self, stored: StoredIrradiance) -> Self {
        self.stored = stored;
        self
    }
}

/// A client that cannot be built leaves only the offline estimates.
fn usable_client(client: anyhow::Result<NasaPowerClient>) -> Option<NasaPowerClient> {
    match client {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(error = %err, "live irradiance lookup unavailable, using offline estimates");
            None
        }
    }
}

#[async_trait]
impl IrradianceProvider for IrradianceService {
    async fn estimate(&self, site: &Site) -> IrradianceEstimate {
        let Some((latitude, longitude)) = site.coordinates() else {
            debug!(location = %site.location, "no coordinates, using stored irradiance");
            return self.stored.lookup(&site.location, site.latitude);
        };

        match &self.live {
            Some(client) => match client.fetch_irradiance(latitude, longitude).await {
                Ok(estimate) => estimate,
                Err(err) => {
                    warn!(
                        error = %err,
                        latitude,
                        longitude,
                        "live irradiance lookup failed, using latitude estimate"
                    );
                    StoredIrradiance::latitude_band(latitude)
                }
            },
            None => StoredIrradiance::latitude_band(latitude),
        }
    }
}
