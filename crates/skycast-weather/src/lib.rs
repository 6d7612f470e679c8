//! Weather lookup for Skycast
//!
//! Resolves city names and fetches current conditions from OpenWeatherMap,
//! normalized to Celsius and km/h.

pub mod geocode;
pub mod provider;
pub mod types;

pub use provider::WeatherProvider;
pub use skycast_core::WeatherError;
pub use types::*;
