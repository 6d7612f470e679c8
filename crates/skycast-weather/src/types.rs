use serde::{Deserialize, Serialize};

/// Absolute zero offset between Kelvin and Celsius.
const KELVIN_OFFSET: f64 = 273.15;

/// Metres per second to kilometres per hour.
const MPS_TO_KPH: f64 = 3.6;

/// A place the geocoder resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Normalized place name as the provider spells it
    pub name: String,
    /// ISO 3166 country code
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    /// "Manila, PH"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country_code)
    }
}

/// Current conditions, normalized to metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub cloud_pct: u8,
    pub wind_kph: f64,
    /// Condition group, e.g. "Rain"
    pub status: String,
    /// Condition detail with every word capitalized, e.g. "Light Rain"
    pub description: String,
    pub icon_url: String,
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn mps_to_kph(mps: f64) -> f64 {
    mps * MPS_TO_KPH
}

/// Capitalize the first letter of every space-separated word.
///
/// Only the first letter is touched: "scattered clouds" becomes
/// "Scattered Clouds", "SHOWER rain" becomes "SHOWER Rain".
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Icon URL for a provider icon code, e.g. "10d".
pub fn icon_url(base: &str, icon: &str) -> String {
    format!("{}/{}@4x.png", base.trim_end_matches('/'), icon)
}

// Provider response shapes.

/// One entry of the direct geocoding response. Everything is optional so
/// incomplete entries can be told apart from malformed bodies.
#[derive(Debug, Deserialize)]
pub(crate) struct GeoEntry {
    pub name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub main: MainBlock,
    pub clouds: CloudBlock,
    pub wind: WindBlock,
    pub weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
    /// Kelvin
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudBlock {
    pub all: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindBlock {
    /// Metres per second
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    pub main: String,
    pub description: String,
    pub icon: String,
}
