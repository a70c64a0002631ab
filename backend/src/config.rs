//! Configuration management for the weather assistant backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WXA_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Forecast API configuration
    pub weather: WeatherConfig,

    /// LLM chat API configuration
    pub ai: AiConfig,

    /// Forecast cache policy
    pub forecast_cache: ForecastCacheConfig,

    /// Prediction notification settings
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo compatible API endpoint
    pub api_endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// OpenAI compatible chat completions endpoint (without the path)
    pub api_endpoint: String,

    /// API key; empty disables generated text
    #[serde(default)]
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How long initial weather tips are reused, in minutes
    pub tip_cache_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastCacheConfig {
    /// Cached forecasts older than this are treated as absent
    pub max_age_minutes: i64,

    /// Location change (degrees) that invalidates the cache
    pub coordinate_threshold: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Upper bound on a single text generation call
    pub composer_timeout_secs: u64,

    /// How far ahead predictions may be scheduled
    pub horizon_hours: i64,

    /// How often the delivery loop checks for due notifications
    pub delivery_poll_secs: u64,

    /// Initial notification permission of the in-process delivery platform
    pub permission_granted: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WXA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1")?
            .set_default("weather.timeout_secs", 10)?
            .set_default("ai.api_endpoint", "https://api.groq.com/openai/v1")?
            .set_default("ai.api_key", "")?
            .set_default("ai.model", "compound-beta")?
            .set_default("ai.timeout_secs", 10)?
            .set_default("ai.tip_cache_minutes", 10)?
            .set_default("forecast_cache.max_age_minutes", 30)?
            .set_default("forecast_cache.coordinate_threshold", 0.01)?
            .set_default("notifications.composer_timeout_secs", 5)?
            .set_default(
                "notifications.horizon_hours",
                shared::detection::SCHEDULING_HORIZON_HOURS,
            )?
            .set_default("notifications.delivery_poll_secs", 30)?
            .set_default("notifications.permission_granted", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WXA_ prefix)
            .add_source(
                Environment::with_prefix("WXA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ForecastCacheConfig {
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.max_age_minutes)
    }
}

impl NotificationConfig {
    pub fn composer_timeout(&self) -> Duration {
        Duration::from_secs(self.composer_timeout_secs)
    }

    pub fn horizon(&self) -> chrono::Duration {
        chrono::Duration::hours(self.horizon_hours)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            ai: AiConfig::default(),
            forecast_cache: ForecastCacheConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.open-meteo.com/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: String::new(),
            model: "compound-beta".to_string(),
            timeout_secs: 10,
            tip_cache_minutes: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ForecastCacheConfig {
    fn default() -> Self {
        Self {
            max_age_minutes: 30,
            coordinate_threshold: shared::DEFAULT_COORDINATE_THRESHOLD,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            composer_timeout_secs: 5,
            horizon_hours: shared::detection::SCHEDULING_HORIZON_HOURS,
            delivery_poll_secs: 30,
            permission_granted: true,
        }
    }
}
