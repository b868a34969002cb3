use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::domain::ComplianceParams;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub compliance: ComplianceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS (the dashboard dev server)
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_frontend_origin() -> String {
    "http://localhost:5173".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceConfig {
    /// Target GHG intensity in gCO2e/MJ
    pub target_intensity: Decimal,
    /// Fuel to energy conversion in MJ/t
    pub energy_factor: Decimal,
    /// Earliest reporting year accepted
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Latest reporting year accepted
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_min_year() -> i32 {
    2020
}

fn default_max_year() -> i32 {
    2100
}

impl ComplianceConfig {
    pub fn params(&self) -> ComplianceParams {
        ComplianceParams {
            target_intensity: self.target_intensity,
            energy_factor: self.energy_factor,
            min_year: self.min_year,
            max_year: self.max_year,
        }
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        let params = ComplianceParams::default();
        Self {
            target_intensity: params.target_intensity,
            energy_factor: params.energy_factor,
            min_year: params.min_year,
            max_year: params.max_year,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rolling log files; console only when unset
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.frontend_origin", default_frontend_origin())?
            .set_default("database.max_connections", 5)?
            .set_default("compliance.target_intensity", "89.3368")?
            .set_default("compliance.energy_factor", "41000")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("FUELEU_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (FUELEU__DATABASE__URL, etc.)
            .add_source(
                Environment::with_prefix("FUELEU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Configuration for local runs without any config files
    pub fn default_config(database_url: &str) -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                frontend_origin: default_frontend_origin(),
            },
            database: DatabaseConfig {
                url: database_url.to_string(),
                max_connections: default_max_connections(),
            },
            compliance: ComplianceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.compliance.target_intensity <= Decimal::ZERO {
            errors.push("compliance.target_intensity must be positive".to_string());
        }

        if self.compliance.energy_factor <= Decimal::ZERO {
            errors.push("compliance.energy_factor must be positive".to_string());
        }

        if self.compliance.min_year > self.compliance.max_year {
            errors.push(format!(
                "compliance.min_year ({}) must not exceed compliance.max_year ({})",
                self.compliance.min_year, self.compliance.max_year
            ));
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".to_string());
        }

        if self.server.frontend_origin.trim().is_empty() {
            errors.push("server.frontend_origin must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
