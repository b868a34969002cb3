//! Storage ports. Services only see these traits; `PostgresStore` and
//! `InMemoryStore` implement all of them.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{ApplyOutcome, BankEntry, Pool, PoolMember, Route, RouteFilter};
use crate::error::Result;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Routes matching the filter, ordered by `route_id`
    async fn list_routes(&self, filter: &RouteFilter) -> Result<Vec<Route>>;

    async fn find_route(&self, route_id: &str) -> Result<Option<Route>>;

    /// Make `route_id` the only baseline. `None` when the route does not exist.
    async fn set_baseline(&self, route_id: &str) -> Result<Option<Route>>;

    async fn baseline_route(&self) -> Result<Option<Route>>;

    async fn non_baseline_routes(&self) -> Result<Vec<Route>>;

    /// Insert or replace routes keyed by `route_id`; returns the number written
    async fn upsert_routes(&self, routes: &[Route]) -> Result<usize>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BankingRepository: Send + Sync {
    async fn insert_bank_entry(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<BankEntry>;

    async fn banked_balance(&self, ship_id: &str) -> Result<Decimal>;

    /// Read, check and withdraw as one atomic step per ship.
    async fn apply_banked(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<ApplyOutcome>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolingRepository: Send + Sync {
    /// Persist the pool and all members in one transaction.
    async fn create_pool(&self, year: i32, members: &[PoolMember]) -> Result<Pool>;

    async fn get_pool(&self, pool_id: i64) -> Result<Option<Pool>>;
}
