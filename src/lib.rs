pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;

pub use adapters::{InMemoryStore, PostgresStore};
pub use config::AppConfig;
pub use error::{FuelError, Result};
pub use services::Services;
