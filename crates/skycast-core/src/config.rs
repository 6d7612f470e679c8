use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_OPENWEATHER_API_KEY";

/// How bad a config problem is. Errors stop startup, warnings are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in a config field.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.field)
    }
}

/// Everything `Config::validate` found, in field order.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ConfigIssue>,
}

impl ValidationResult {
    /// Warnings alone still count as valid.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    fn push(&mut self, severity: Severity, field: &str, message: impl Into<String>) {
        self.issues.push(ConfigIssue {
            field: field.to_string(),
            message: message.into(),
            severity,
        });
    }

    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.push(Severity::Error, field, message);
    }

    pub fn add_warning(&mut self, field: &str, message: impl Into<String>) {
        self.push(Severity::Warning, field, message);
    }

    /// All errors joined into one line, for the startup failure message.
    pub fn error_summary(&self) -> String {
        let parts: Vec<String> = self.errors().map(ToString::to_string).collect();
        parts.join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Notification timing and queueing
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap access key (overridden by `SKYCAST_API_KEY`)
    pub api_key: String,

    /// Direct geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Current conditions endpoint
    #[serde(default = "default_current_url")]
    pub current_url: String,

    /// Base for condition icons; `{icon}@4x.png` is appended
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// City shown when the widget starts
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_geocoding_url() -> String {
    "https://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_current_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_city() -> String {
    "manila".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl WeatherConfig {
    /// Check if an API key is configured (not the placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            geocoding_url: default_geocoding_url(),
            current_url: default_current_url(),
            icon_base_url: default_icon_base_url(),
            default_city: default_city(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// What `notify` does while a notification is already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPolicy {
    /// The newest request replaces whatever is showing.
    #[default]
    Preempt,
    /// Requests wait in a per-category de-duplicated FIFO.
    Queue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub policy: NotificationPolicy,

    /// Delay standing in for the next animation frame
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,

    /// Time a notification stays up before it starts leaving
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,

    /// Duration of the entrance and exit transitions
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Pause between a removal and the next queued notification
    #[serde(default = "default_promotion_delay_ms")]
    pub promotion_delay_ms: u64,
}

fn default_frame_ms() -> u64 {
    16
}

fn default_display_ms() -> u64 {
    2000
}

fn default_transition_ms() -> u64 {
    300
}

fn default_promotion_delay_ms() -> u64 {
    100
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            policy: NotificationPolicy::default(),
            frame_ms: default_frame_ms(),
            display_ms: default_display_ms(),
            transition_ms: default_transition_ms(),
            promotion_delay_ms: default_promotion_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

/// An endpoint must be an absolute http(s) URL with a host.
fn check_endpoint(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("Not a valid URL: {}", e))?;
    match (url.scheme(), url.host()) {
        ("http" | "https", Some(_)) => Ok(()),
        ("http" | "https", None) => Err("URL has no host".to_string()),
        (scheme, _) => Err(format!("Expected an http or https URL, got {}://", scheme)),
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location and validate it
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        Self::load()?.into_validated()
    }

    /// Validate, logging warnings. Errors reject the whole config.
    pub fn into_validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in validation.warnings() {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                tracing::debug!("Using API key from {}", API_KEY_ENV);
                self.weather.api_key = key.trim().to_string();
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let endpoints = [
            ("weather.geocoding_url", &self.weather.geocoding_url),
            ("weather.current_url", &self.weather.current_url),
            ("weather.icon_base_url", &self.weather.icon_base_url),
        ];
        for (field, raw) in endpoints {
            if let Err(message) = check_endpoint(raw) {
                result.add_error(field, message);
            }
        }

        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                format!("API key not configured - set it in config.toml or {}", API_KEY_ENV),
            );
        }

        if self.weather.default_city.trim().chars().count() < 2 {
            result.add_error(
                "weather.default_city",
                "Default city must be at least 2 characters long",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.notifications.display_ms == 0 {
            result.add_warning(
                "notifications.display_ms",
                "Notifications will start leaving as soon as they appear",
            );
        } else if self.notifications.display_ms > 60_000 {
            result.add_warning(
                "notifications.display_ms",
                "Notifications stay up for more than a minute",
            );
        }

        if self.notifications.transition_ms > self.notifications.display_ms {
            result.add_warning(
                "notifications.transition_ms",
                "Transition is longer than the display time",
            );
        }

        result
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(write_err)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
