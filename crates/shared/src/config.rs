//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Dashboard projection configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Demo data configuration.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Dashboard projection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// How far ahead (in days) the overview looks for upcoming renewals.
    #[serde(default = "default_renewal_window_days")]
    pub renewal_window_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            renewal_window_days: default_renewal_window_days(),
        }
    }
}

fn default_renewal_window_days() -> u32 {
    90
}

/// Demo data configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoConfig {
    /// Seed the store with demo fixtures at startup.
    #[serde(default)]
    pub seed: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPENDHUB").separator("__"))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}
