//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `VOICELINE`
//! prefix and `__` (double underscore) separating nested keys.
//!
//! # Example
//!
//! ```no_run
//! use voiceline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod business;
mod database;
mod error;
mod notifications;
mod server;

pub use ai::ClassifierConfig;
pub use business::{BusinessConfig, FinancialConfig, MenuItemConfig, RestaurantConfig};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use notifications::NotificationsConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults, so a bare environment boots a demo
/// deployment: in-memory stores, rule-based classification, log-only
/// notifications.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL; in-memory stores when unset)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Classifier backend configuration
    #[serde(default)]
    pub ai: ClassifierConfig,

    /// Outbound SMS notification configuration
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Per-deployment business facts (names, phones, hours, menu)
    #[serde(default)]
    pub business: BusinessConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present (development), then reads variables with the
    /// `VOICELINE` prefix, e.g.:
    ///
    /// - `VOICELINE__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `VOICELINE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VOICELINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.notifications.validate()?;
        self.business.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
