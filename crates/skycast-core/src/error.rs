//! Centralized error types for Skycast.
//!
//! Every failure the widget can hit ends up as exactly one notification, so
//! each error type carries the text shown to the user alongside the
//! technical `Display` text used for logging.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get the text for the notification surface.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in a notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Weather(e) => e.user_message(),
            AppError::Validation(e) => e.user_message().to_string(),
        }
    }
}

/// Failures of the city lookup and weather fetch.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoder answered with no match for the query.
    #[error("City not found: {0}")]
    NotFound(String),

    /// Transport failure or a non-success status from the geocoder.
    #[error("Failed to connect to weather service: {0}")]
    ConnectionFailed(String),

    /// The geocoder answered with something we could not use.
    #[error("Invalid city data received: {0}")]
    InvalidData(String),

    /// Any failure while fetching current conditions.
    #[error("Weather data not available: {0}")]
    Unavailable(String),
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::NotFound(city) => format!(
                "Unable to find \"{}\". Please check the city name and try again.",
                city
            ),
            WeatherError::ConnectionFailed(_) => {
                "Unable to connect to weather service. Please check your internet connection."
                    .to_string()
            }
            WeatherError::InvalidData(_) => {
                "An error occurred while searching for the city. Please try again.".to_string()
            }
            WeatherError::Unavailable(_) => {
                "Failed to retrieve weather data. Please try again later.".to_string()
            }
        }
    }
}

/// Rejections of the search form input. Detected before any lookup runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("city name is empty")]
    Empty,

    #[error("city name shorter than {min} characters")]
    TooShort { min: usize },
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::Empty => "Please enter a city name to search for weather.",
            ValidationError::TooShort { .. } => "City name must be at least 2 characters long.",
        }
    }
}

/// Failures while locating, reading or writing `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "Could not find a place to keep the Skycast settings.",
            ConfigError::Read { .. } | ConfigError::Write { .. } => {
                "The Skycast settings file could not be accessed."
            }
            ConfigError::Parse { .. } => "The Skycast settings file is not valid TOML.",
            ConfigError::Serialize(_) => "The Skycast settings could not be saved.",
            ConfigError::Invalid(_) => "The Skycast settings contain invalid values.",
        }
    }
}
