//! Configuration management for the plot lifecycle service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PLOT_ prefix

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use config::{
    builder::{ConfigBuilder, DefaultState},
    ConfigError, Environment, File,
};
use serde::Deserialize;
use shared::{MetricsPolicy, PlantingOffset};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Metrics policy shared by every plot view
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct MetricsConfig {
    /// Window for the "shade opening soon" alert
    #[validate(range(min = 1, max = 60))]
    pub shade_opening_soon_days: i64,

    /// `signed` or `clamp_to_planting_day`
    pub planting_offset: PlantingOffset,

    /// Offset used to decide which calendar day "today" is
    pub utc_offset_hours: i32,
}

impl MetricsConfig {
    pub fn policy(&self) -> MetricsPolicy {
        MetricsPolicy {
            planting_offset: self.planting_offset,
            shade_opening_soon_days: self.shade_opening_soon_days,
        }
    }

    /// Configured offset; out-of-range values are rejected at load time
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or(Utc.fix())
    }

    /// Calendar date of `now` in the configured offset
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone()).date_naive()
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            shade_opening_soon_days: shared::lifecycle::policy::DEFAULT_SHADE_OPENING_SOON_DAYS,
            planting_offset: PlantingOffset::Signed,
            utc_offset_hours: 7,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PLOT_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::with_defaults(config::Config::builder(), &environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PLOT_ prefix)
            .add_source(
                Environment::with_prefix("PLOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Config = config.try_deserialize()?;
        loaded
            .metrics
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid metrics configuration: {}", e)))?;
        if !(-12..=14).contains(&loaded.metrics.utc_offset_hours) {
            return Err(ConfigError::Message(format!(
                "metrics.utc_offset_hours must be between -12 and 14, got {}",
                loaded.metrics.utc_offset_hours
            )));
        }

        Ok(loaded)
    }

    /// Default values for every section except the database URL
    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
        environment: &str,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("metrics.shade_opening_soon_days", 7)?
            .set_default("metrics.planting_offset", "signed")?
            .set_default("metrics.utc_offset_hours", 7)
    }
}
