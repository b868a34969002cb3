use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fueleu::adapters::{start_api_server, InMemoryStore, PostgresStore};
use fueleu::api::AppState;
use fueleu::cli::{self, Cli, Commands, OutputMode};
use fueleu::config::AppConfig;
use fueleu::domain::seed_routes;
use fueleu::logging::{init_logging, init_logging_simple};
use fueleu::services::{RouteRepository, Services};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Allocate { file, json } => {
            init_logging_simple();
            cli::run_allocate(&file, OutputMode::from_json_flag(json))?;
        }
        Commands::Serve { in_memory } => {
            let (config, _log_guard) = load_config(&cli.config)?;
            run_serve(&config, in_memory).await?;
        }
        Commands::Migrate => {
            let (config, _log_guard) = load_config(&cli.config)?;
            let store = connect(&config).await?;
            store.migrate().await?;
        }
        Commands::Seed => {
            let (config, _log_guard) = load_config(&cli.config)?;
            let store = connect(&config).await?;
            store.migrate().await?;
            let written = store.upsert_routes(&seed_routes()).await?;
            info!("Seeded {} routes", written);
        }
    }

    Ok(())
}

/// Load and validate configuration, then install logging from it.
fn load_config(dir: &Path) -> anyhow::Result<(AppConfig, Option<WorkerGuard>)> {
    let config = AppConfig::load_from(dir)
        .with_context(|| format!("failed to load configuration from {}", dir.display()))?;
    if let Err(problems) = config.validate() {
        anyhow::bail!("invalid configuration:\n  - {}", problems.join("\n  - "));
    }
    let guard = init_logging(&config.logging);
    Ok((config, guard))
}

async fn connect(config: &AppConfig) -> anyhow::Result<PostgresStore> {
    PostgresStore::new(&config.database.url, config.database.max_connections)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_serve(config: &AppConfig, in_memory: bool) -> anyhow::Result<()> {
    let params = config.compliance.params();

    let services = if in_memory {
        info!("Using seeded in-memory store");
        Services::new(Arc::new(InMemoryStore::with_seed()), params)
    } else {
        let store = connect(config).await?;
        store.migrate().await?;
        Services::new(Arc::new(store), params)
    };

    start_api_server(AppState::new(services), &config.server).await?;
    Ok(())
}
