use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the compliance service
#[derive(Error, Debug)]
pub enum FuelError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Client input errors
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Insufficient banked balance. Available: {available}, Requested: {requested}")]
    InsufficientBanked {
        available: Decimal,
        requested: Decimal,
    },

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FuelError {
    /// Errors caused by the request itself, reported back to the caller verbatim.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FuelError::Validation(_) | FuelError::NotFound(_) | FuelError::InsufficientBanked { .. }
        )
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FuelError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        FuelError::NotFound(msg.into())
    }
}

/// Result type alias for FuelError
pub type Result<T> = std::result::Result<T, FuelError>;
