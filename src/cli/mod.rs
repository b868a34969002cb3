pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::api::types::PoolMemberRequest;
use crate::domain::{allocate, pool_total, validate_members, PoolMember, PoolMemberInput};

pub use output::{print_items, OutputMode};

#[derive(Parser)]
#[command(name = "fueleu")]
#[command(version)]
#[command(about = "FuelEU Maritime compliance balance, banking and pooling service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and per-environment overrides
    #[arg(short, long, default_value = "config", env = "FUELEU_CONFIG_DIR", global = true)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Use a seeded in-memory store instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Apply database migrations
    Migrate,
    /// Load the reference routes into the database
    Seed,
    /// Run pool allocation offline on a JSON member list
    Allocate {
        /// JSON file: `[{"shipId", "cb_before"}]` or `{"members": [...]}`
        file: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllocationFile {
    Members(Vec<PoolMemberRequest>),
    Request { members: Vec<PoolMemberRequest> },
}

impl AllocationFile {
    fn into_inputs(self) -> Vec<PoolMemberInput> {
        let members = match self {
            AllocationFile::Members(m) | AllocationFile::Request { members: m } => m,
        };
        members
            .into_iter()
            .map(|m| PoolMemberInput::new(m.ship_id, m.cb_before))
            .collect()
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    #[tabled(rename = "Ship")]
    pub ship_id: String,
    #[tabled(rename = "CB before")]
    #[serde(rename = "cb_before", with = "rust_decimal::serde::float")]
    pub cb_before: Decimal,
    #[tabled(rename = "CB after")]
    #[serde(rename = "cb_after", with = "rust_decimal::serde::float")]
    pub cb_after: Decimal,
    #[tabled(rename = "Change")]
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
}

impl From<&PoolMember> for AllocationRow {
    fn from(m: &PoolMember) -> Self {
        Self {
            ship_id: m.ship_id.clone(),
            cb_before: m.cb_before,
            cb_after: m.cb_after,
            change: m.cb_after - m.cb_before,
        }
    }
}

/// Parse, validate and allocate the members listed in `raw`.
pub fn allocate_from_json(raw: &str) -> anyhow::Result<Vec<PoolMember>> {
    let file: AllocationFile =
        serde_json::from_str(raw).context("expected a member list or {\"members\": [...]}")?;
    let inputs = file.into_inputs();
    validate_members(&inputs)?;
    Ok(allocate(&inputs))
}

/// `fueleu allocate <file>`
pub fn run_allocate(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let members = allocate_from_json(&raw)?;

    let rows: Vec<AllocationRow> = members.iter().map(AllocationRow::from).collect();
    print_items(&rows, mode)?;
    if mode == OutputMode::Table {
        println!("Pool total: {}", pool_total(&members));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_parses_serve_flags() {
        let cli = Cli::try_parse_from(["fueleu", "serve", "--in-memory"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { in_memory: true }));
        assert_eq!(cli.config, PathBuf::from("config"));
    }

    #[test]
    fn cli_parses_allocate() {
        let cli =
            Cli::try_parse_from(["fueleu", "allocate", "pool.json", "--json", "-c", "conf"]).unwrap();
        match cli.command {
            Commands::Allocate { file, json } => {
                assert_eq!(file, PathBuf::from("pool.json"));
                assert!(json);
            }
            _ => panic!("expected allocate"),
        }
        assert_eq!(cli.config, PathBuf::from("conf"));
    }

    #[test]
    fn allocate_accepts_bare_member_list() {
        let members = allocate_from_json(
            r#"[{"shipId": "B", "cb_before": -40}, {"shipId": "A", "cb_before": 100}]"#,
        )
        .unwrap();
        assert_eq!(members[0].ship_id, "A");
        assert_eq!(members[0].cb_after, dec!(60));
        assert_eq!(members[1].cb_after, dec!(0));
    }

    #[test]
    fn allocate_accepts_request_shape() {
        let members = allocate_from_json(
            r#"{"year": 2024, "members": [{"shipId": "S", "cb_before": 12.345}]}"#,
        )
        .unwrap();
        assert_eq!(members[0].cb_after, dec!(12.35));
    }

    #[test]
    fn allocate_rejects_negative_pool() {
        let err = allocate_from_json(
            r#"[{"shipId": "A", "cb_before": 10}, {"shipId": "B", "cb_before": -40}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("total adjusted CB must be >= 0"));
    }

    #[test]
    fn allocation_row_reports_change() {
        let row = AllocationRow::from(&PoolMember {
            ship_id: "A".into(),
            cb_before: dec!(100),
            cb_after: dec!(60),
        });
        assert_eq!(row.change, dec!(-40));
    }
}
