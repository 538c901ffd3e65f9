//! NASA POWER integration (Prediction Of Worldwide Energy Resources)
//!
//! Fetches one year of daily all-sky surface shortwave irradiance
//! (`ALLSKY_SFC_SW_DWN`, kWh/m²/day) for a point and reduces it to a daily
//! mean and twelve monthly means.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, error, info};

use super::{IrradianceEstimate, IrradianceSource};

const PARAMETER: &str = "ALLSKY_SFC_SW_DWN";

/// NASA POWER API client
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    year: i32,
}

impl NasaPowerClient {
    /// Create a new client. `timeout` bounds the whole request.
    pub fn new(base_url: impl Into<String>, timeout: Duration, year: i32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build NASA POWER HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            year,
        })
    }

    /// Fetch the irradiance profile for a point. One attempt, no retry.
    pub async fn fetch_irradiance(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<IrradianceEstimate> {
        let url = format!(
            "{}/temporal/daily/point?parameters={}&community=RE&longitude={:.4}&latitude={:.4}&start={}0101&end={}1231&format=JSON",
            self.base_url, PARAMETER, longitude, latitude, self.year, self.year
        );

        debug!("Fetching irradiance from NASA POWER: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to NASA POWER API")?;

        if !response.status().is_success() {
            error!("NASA POWER API returned error status: {}", response.status());
            anyhow::bail!("NASA POWER API error: {}", response.status());
        }

        let power_response: PowerResponse = response
            .json()
            .await
            .context("Failed to parse NASA POWER response")?;

        let estimate = Self::parse_response(power_response)?;

        info!(
            latitude,
            longitude,
            daily_kwh_m2 = estimate.daily_irradiance_kwh_per_m2,
            "Fetched irradiance from NASA POWER"
        );

        Ok(estimate)
    }

    /// Reduce the daily series. Negative values are POWER fill values.
    fn parse_response(response: PowerResponse) -> Result<IrradianceEstimate> {
        let series = response
            .properties
            .parameter
            .get(PARAMETER)
            .with_context(|| format!("NASA POWER response has no {} series", PARAMETER))?;

        let mut monthly_sum = [0.0_f64; 12];
        let mut monthly_count = [0_u32; 12];
        let mut total = 0.0;
        let mut count = 0_u32;

        for (date, &value) in series {
            if value < 0.0 || !value.is_finite() {
                continue;
            }
            let Some(month) = date.get(4..6).and_then(|m| m.parse::<usize>().ok()) else {
                continue;
            };
            if !(1..=12).contains(&month) {
                continue;
            }
            monthly_sum[month - 1] += value;
            monthly_count[month - 1] += 1;
            total += value;
            count += 1;
        }

        if count == 0 {
            anyhow::bail!("NASA POWER response contains no valid irradiance samples");
        }

        let daily = total / count as f64;
        let mut monthly = [daily; 12];
        for (i, slot) in monthly.iter_mut().enumerate() {
            if monthly_count[i] > 0 {
                *slot = monthly_sum[i] / monthly_count[i] as f64;
            }
        }

        // 1 kWh/m²/day equals one hour at the 1 kW/m² standard test irradiance.
        Ok(IrradianceEstimate {
            daily_irradiance_kwh_per_m2: daily,
            peak_sun_hours: daily,
            source: IrradianceSource::NasaPower,
            monthly_kwh_per_m2: Some(monthly),
        })
    }
}

// NASA POWER API response structures
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: HashMap<String, BTreeMap<String, f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> serde_json::Value {
        json!({
            "properties": {
                "parameter": {
                    "ALLSKY_SFC_SW_DWN": {
                        "20230101": 4.0,
                        "20230102": 6.0,
                        "20230103": -999.0,
                        "20230601": 8.0
                    }
                }
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_reduces_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/temporal/daily/point"))
            .and(query_param("parameters", "ALLSKY_SFC_SW_DWN"))
            .and(query_param("start", "20230101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(server.uri(), Duration::from_secs(5), 2023).unwrap();
        let estimate = client.fetch_irradiance(9.05, 7.49).await.unwrap();

        assert_eq!(estimate.source, IrradianceSource::NasaPower);
        assert!((estimate.daily_irradiance_kwh_per_m2 - 6.0).abs() < 1e-12);
        assert_eq!(estimate.peak_sun_hours, estimate.daily_irradiance_kwh_per_m2);

        let monthly = estimate.monthly_kwh_per_m2.unwrap();
        assert!((monthly[0] - 5.0).abs() < 1e-12);
        assert!((monthly[5] - 8.0).abs() < 1e-12);
        // Months without samples carry the annual mean
        assert!((monthly[2] - 6.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = NasaPowerClient::new(server.uri(), Duration::from_secs(5), 2023).unwrap();
        let err = client.fetch_irradiance(9.05, 7.49).await.unwrap_err();
        assert!(err.to_string().contains("NASA POWER API error"));
    }

    #[test]
    fn test_all_fill_values_is_error() {
        let response: PowerResponse = serde_json::from_value(json!({
            "properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"20230101": -999.0}}}
        }))
        .unwrap();
        assert!(NasaPowerClient::parse_response(response).is_err());
    }

    #[test]
    fn test_missing_parameter_is_error() {
        let response: PowerResponse = serde_json::from_value(json!({
            "properties": {"parameter": {}}
        }))
        .unwrap();
        assert!(NasaPowerClient::parse_response(response).is_err());
    }
}
