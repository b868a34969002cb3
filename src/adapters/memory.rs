use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::{
    banked_balance, plan_apply, pool_total, seed_routes, ApplyOutcome, BankEntry, Pool,
    PoolMember, Route, RouteFilter,
};
use crate::error::Result;
use crate::services::{BankingRepository, PoolingRepository, RouteRepository};

#[derive(Default)]
struct Tables {
    routes: Vec<Route>,
    bank_entries: Vec<BankEntry>,
    pools: Vec<Pool>,
}

/// Process-local store with the same semantics as `PostgresStore`.
///
/// Every operation takes the single lock, so read-check-write sequences
/// (baseline switch, banked withdrawal) are atomic.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the reference routes.
    pub fn with_seed() -> Self {
        Self {
            tables: RwLock::new(Tables {
                routes: seed_routes(),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_routes(&self, filter: &RouteFilter) -> Result<Vec<Route>> {
        let tables = self.tables.read().await;
        let mut routes: Vec<Route> = tables
            .routes
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        routes.sort_by(|a, b| a.route_id.cmp(&b.route_id));
        Ok(routes)
    }

    async fn find_route(&self, route_id: &str) -> Result<Option<Route>> {
        let tables = self.tables.read().await;
        Ok(tables.routes.iter().find(|r| r.route_id == route_id).cloned())
    }

    async fn set_baseline(&self, route_id: &str) -> Result<Option<Route>> {
        let mut tables = self.tables.write().await;
        if !tables.routes.iter().any(|r| r.route_id == route_id) {
            return Ok(None);
        }

        let mut selected = None;
        for route in tables.routes.iter_mut() {
            route.is_baseline = route.route_id == route_id;
            if route.is_baseline {
                selected = Some(route.clone());
            }
        }
        Ok(selected)
    }

    async fn baseline_route(&self) -> Result<Option<Route>> {
        let tables = self.tables.read().await;
        Ok(tables.routes.iter().find(|r| r.is_baseline).cloned())
    }

    async fn non_baseline_routes(&self) -> Result<Vec<Route>> {
        let mut routes = self.list_routes(&RouteFilter::default()).await?;
        routes.retain(|r| !r.is_baseline);
        Ok(routes)
    }

    async fn upsert_routes(&self, routes: &[Route]) -> Result<usize> {
        let mut tables = self.tables.write().await;

        if routes.iter().any(|r| r.is_baseline) {
            for existing in tables.routes.iter_mut() {
                existing.is_baseline = false;
            }
        }

        for route in routes {
            match tables.routes.iter().position(|r| r.route_id == route.route_id) {
                Some(idx) => {
                    let id = tables.routes[idx].id;
                    tables.routes[idx] = Route { id, ..route.clone() };
                }
                None => {
                    let id = tables.routes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
                    tables.routes.push(Route { id, ..route.clone() });
                }
            }
        }
        Ok(routes.len())
    }
}

#[async_trait]
impl BankingRepository for InMemoryStore {
    async fn insert_bank_entry(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<BankEntry> {
        let mut tables = self.tables.write().await;
        let entry = BankEntry {
            id: tables.bank_entries.len() as i64 + 1,
            ship_id: ship_id.to_string(),
            year,
            amount,
            created_at: Utc::now(),
        };
        tables.bank_entries.push(entry.clone());
        Ok(entry)
    }

    async fn banked_balance(&self, ship_id: &str) -> Result<Decimal> {
        let tables = self.tables.read().await;
        Ok(banked_balance(
            tables.bank_entries.iter().filter(|e| e.ship_id == ship_id),
        ))
    }

    async fn apply_banked(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<ApplyOutcome> {
        let mut tables = self.tables.write().await;
        let available = banked_balance(
            tables.bank_entries.iter().filter(|e| e.ship_id == ship_id),
        );
        let outcome = plan_apply(available, amount)?;

        let id = tables.bank_entries.len() as i64 + 1;
        tables.bank_entries.push(BankEntry {
            id,
            ship_id: ship_id.to_string(),
            year,
            amount: -outcome.applied,
            created_at: Utc::now(),
        });
        Ok(outcome)
    }
}

#[async_trait]
impl PoolingRepository for InMemoryStore {
    async fn create_pool(&self, year: i32, members: &[PoolMember]) -> Result<Pool> {
        let mut tables = self.tables.write().await;
        let pool = Pool {
            pool_id: tables.pools.len() as i64 + 1,
            year,
            total_cb: pool_total(members),
            members: members.to_vec(),
            created_at: Utc::now(),
        };
        tables.pools.push(pool.clone());
        Ok(pool)
    }

    async fn get_pool(&self, pool_id: i64) -> Result<Option<Pool>> {
        let tables = self.tables.read().await;
        Ok(tables.pools.iter().find(|p| p.pool_id == pool_id).cloned())
    }
}
