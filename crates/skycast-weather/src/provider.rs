//! OpenWeatherMap current conditions.

use reqwest::Client;
use skycast_core::{WeatherConfig, WeatherError};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{icon_url, kelvin_to_celsius, mps_to_kph, title_case, CurrentResponse, WeatherReading};

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Client for the geocoding and current-weather endpoints.
///
/// Never notifies on its own: failures come back as [`WeatherError`] and the
/// caller decides what the user sees.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    pub(crate) client: Arc<Client>,
    pub(crate) api_key: String,
    pub(crate) geocoding_url: String,
    pub(crate) current_url: String,
    pub(crate) icon_base_url: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone(),
            geocoding_url: config.geocoding_url.clone(),
            current_url: config.current_url.clone(),
            icon_base_url: config.icon_base_url.clone(),
        })
    }

    /// Fetch current conditions at the given coordinates.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Result<WeatherReading, WeatherError> {
        let response = self
            .client
            .get(&self.current_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather endpoint returned status {}", status);
            return Err(WeatherError::Unavailable(format!("status {}", status)));
        }

        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Unavailable(format!("JSON parse error: {}", e)))?;

        let reading = self.reading_from(body)?;
        tracing::debug!(
            "Current weather: {:.2}°C, {}",
            reading.temperature_c,
            reading.description
        );
        Ok(reading)
    }

    fn reading_from(&self, body: CurrentResponse) -> Result<WeatherReading, WeatherError> {
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Unavailable("response has no conditions".to_string()))?;

        Ok(WeatherReading {
            temperature_c: kelvin_to_celsius(body.main.temp),
            humidity_pct: body.main.humidity,
            cloud_pct: body.clouds.all,
            wind_kph: mps_to_kph(body.wind.speed),
            status: condition.main,
            description: title_case(&condition.description),
            icon_url: icon_url(&self.icon_base_url, &condition.icon),
        })
    }
}
