//! Direct geocoding: turn a city name into coordinates.

use reqwest::StatusCode;
use skycast_core::config::API_KEY_ENV;
use skycast_core::WeatherError;
use tracing::instrument;

use crate::provider::WeatherProvider;
use crate::types::{City, GeoEntry};

impl WeatherProvider {
    /// Resolve a city name to its normalized name, country and coordinates.
    ///
    /// Only the best match is requested. A transport failure or non-success
    /// status is `ConnectionFailed`, an empty result is `NotFound`, and a body
    /// we cannot use is `InvalidData`.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_city(&self, name: &str) -> Result<City, WeatherError> {
        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("q", name), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Geocoding request failed: {}", e);
                WeatherError::ConnectionFailed(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(
                "OpenWeatherMap rejected the API key ({}); set weather.api_key or {}",
                status,
                API_KEY_ENV
            );
            return Err(WeatherError::ConnectionFailed(format!(
                "status {}: API key rejected",
                status
            )));
        }
        if !status.is_success() {
            tracing::debug!("Geocoding returned status {}", status);
            return Err(WeatherError::ConnectionFailed(format!("status {}", status)));
        }

        let entries: Option<Vec<GeoEntry>> = response.json().await.map_err(|e| {
            if e.is_decode() {
                WeatherError::InvalidData(format!("JSON parse error: {}", e))
            } else {
                WeatherError::ConnectionFailed(e.to_string())
            }
        })?;

        let entry = entries
            .and_then(|list| list.into_iter().next())
            .ok_or_else(|| WeatherError::NotFound(name.to_string()))?;

        let city = city_from(entry)?;
        tracing::info!("Resolved \"{}\" to {} ({}, {})", name, city.display_name(), city.lat, city.lon);
        Ok(city)
    }
}

fn city_from(entry: GeoEntry) -> Result<City, WeatherError> {
    match entry {
        GeoEntry {
            name: Some(name),
            country: Some(country),
            lat: Some(lat),
            lon: Some(lon),
        } if !name.is_empty() && !country.is_empty() => Ok(City {
            name,
            country_code: country,
            lat,
            lon,
        }),
        other => Err(WeatherError::InvalidData(format!(
            "incomplete geocoding entry: {:?}",
            other
        ))),
    }
}
