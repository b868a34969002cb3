use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row, Transaction};
use tracing::{debug, info, instrument};

use crate::domain::{
    plan_apply, pool_total, ApplyOutcome, BankEntry, Pool, PoolMember, Route, RouteFilter,
};
use crate::error::Result;
use crate::services::{BankingRepository, PoolingRepository, RouteRepository};

const ROUTE_COLUMNS: &str = r#"
    id, route_id, vessel_type, fuel_type, year, ghg_intensity,
    fuel_consumption, distance, total_emissions, is_baseline
"#;

/// Advisory lock key shared by every writer of the baseline flag.
const BASELINE_LOCK_KEY: i64 = 0x6675_656c_6275;

/// PostgreSQL storage adapter
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn route_from_row(row: &PgRow) -> Result<Route> {
    Ok(Route {
        id: row.try_get("id")?,
        route_id: row.try_get("route_id")?,
        vessel_type: row.try_get("vessel_type")?,
        fuel_type: row.try_get("fuel_type")?,
        year: row.try_get("year")?,
        ghg_intensity: row.try_get("ghg_intensity")?,
        fuel_consumption: row.try_get("fuel_consumption")?,
        distance: row.try_get("distance")?,
        total_emissions: row.try_get("total_emissions")?,
        is_baseline: row.try_get("is_baseline")?,
    })
}

/// Serialize baseline writers until the transaction ends.
async fn lock_baseline(tx: &mut Transaction<'_, Postgres>) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BASELINE_LOCK_KEY)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// ==================== Routes ====================

#[async_trait]
impl RouteRepository for PostgresStore {
    async fn list_routes(&self, filter: &RouteFilter) -> Result<Vec<Route>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ROUTE_COLUMNS} FROM routes WHERE 1=1"
        ));
        if let Some(ref vessel_type) = filter.vessel_type {
            qb.push(" AND vessel_type = ").push_bind(vessel_type);
        }
        if let Some(ref fuel_type) = filter.fuel_type {
            qb.push(" AND fuel_type = ").push_bind(fuel_type);
        }
        if let Some(year) = filter.year {
            qb.push(" AND year = ").push_bind(year);
        }
        qb.push(" ORDER BY route_id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(route_from_row).collect()
    }

    async fn find_route(&self, route_id: &str) -> Result<Option<Route>> {
        let row = sqlx::query(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes WHERE route_id = $1"
        ))
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(route_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn set_baseline(&self, route_id: &str) -> Result<Option<Route>> {
        let mut tx = self.pool.begin().await?;
        lock_baseline(&mut tx).await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM routes WHERE route_id = $1 FOR UPDATE")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE routes SET is_baseline = FALSE WHERE is_baseline AND route_id <> $1")
            .bind(route_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(&format!(
            "UPDATE routes SET is_baseline = TRUE WHERE route_id = $1 RETURNING {ROUTE_COLUMNS}"
        ))
        .bind(route_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        route_from_row(&row).map(Some)
    }

    async fn baseline_route(&self) -> Result<Option<Route>> {
        let row = sqlx::query(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes WHERE is_baseline LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(route_from_row).transpose()
    }

    async fn non_baseline_routes(&self) -> Result<Vec<Route>> {
        let rows = sqlx::query(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes WHERE NOT is_baseline ORDER BY route_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(route_from_row).collect()
    }

    #[instrument(skip(self, routes), fields(count = routes.len()))]
    async fn upsert_routes(&self, routes: &[Route]) -> Result<usize> {
        if routes.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        if routes.iter().any(|r| r.is_baseline) {
            lock_baseline(&mut tx).await?;
            sqlx::query("UPDATE routes SET is_baseline = FALSE WHERE is_baseline")
                .execute(&mut *tx)
                .await?;
        }

        for route in routes {
            sqlx::query(
                r#"
                INSERT INTO routes (route_id, vessel_type, fuel_type, year, ghg_intensity,
                                    fuel_consumption, distance, total_emissions, is_baseline)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (route_id) DO UPDATE SET
                    vessel_type = EXCLUDED.vessel_type,
                    fuel_type = EXCLUDED.fuel_type,
                    year = EXCLUDED.year,
                    ghg_intensity = EXCLUDED.ghg_intensity,
                    fuel_consumption = EXCLUDED.fuel_consumption,
                    distance = EXCLUDED.distance,
                    total_emissions = EXCLUDED.total_emissions,
                    is_baseline = EXCLUDED.is_baseline
                "#,
            )
            .bind(&route.route_id)
            .bind(&route.vessel_type)
            .bind(&route.fuel_type)
            .bind(route.year)
            .bind(route.ghg_intensity)
            .bind(route.fuel_consumption)
            .bind(route.distance)
            .bind(route.total_emissions)
            .bind(route.is_baseline)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("Upserted {} routes", routes.len());
        Ok(routes.len())
    }
}

// ==================== Banking ====================

#[async_trait]
impl BankingRepository for PostgresStore {
    #[instrument(skip(self))]
    async fn insert_bank_entry(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<BankEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO bank_entries (ship_id, year, amount_gco2eq)
            VALUES ($1, $2, $3)
            RETURNING id, ship_id, year, amount_gco2eq, created_at
            "#,
        )
        .bind(ship_id)
        .bind(year)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(BankEntry {
            id: row.try_get("id")?,
            ship_id: row.try_get("ship_id")?,
            year: row.try_get("year")?,
            amount: row.try_get("amount_gco2eq")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn banked_balance(&self, ship_id: &str) -> Result<Decimal> {
        let balance: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_gco2eq), 0) FROM bank_entries WHERE ship_id = $1",
        )
        .bind(ship_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    #[instrument(skip(self))]
    async fn apply_banked(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<ApplyOutcome> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent withdrawals for the same ship until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(ship_id)
            .execute(&mut *tx)
            .await?;

        let available: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_gco2eq), 0) FROM bank_entries WHERE ship_id = $1",
        )
        .bind(ship_id)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = plan_apply(available, amount)?;

        sqlx::query("INSERT INTO bank_entries (ship_id, year, amount_gco2eq) VALUES ($1, $2, $3)")
            .bind(ship_id)
            .bind(year)
            .bind(-outcome.applied)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(outcome)
    }
}

// ==================== Pools ====================

#[async_trait]
impl PoolingRepository for PostgresStore {
    #[instrument(skip(self, members), fields(members = members.len()))]
    async fn create_pool(&self, year: i32, members: &[PoolMember]) -> Result<Pool> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("INSERT INTO pools (year) VALUES ($1) RETURNING id, created_at")
            .bind(year)
            .fetch_one(&mut *tx)
            .await?;
        let pool_id: i64 = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        for (position, member) in members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO pool_members (pool_id, ship_id, position, cb_before, cb_after)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(pool_id)
            .bind(&member.ship_id)
            .bind(position as i32)
            .bind(member.cb_before)
            .bind(member.cb_after)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Pool {
            pool_id,
            year,
            total_cb: pool_total(members),
            members: members.to_vec(),
            created_at,
        })
    }

    async fn get_pool(&self, pool_id: i64) -> Result<Option<Pool>> {
        let Some(row) = sqlx::query("SELECT id, year, created_at FROM pools WHERE id = $1")
            .bind(pool_id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let member_rows = sqlx::query(
            r#"
            SELECT ship_id, cb_before, cb_after
            FROM pool_members
            WHERE pool_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;

        let members = member_rows
            .iter()
            .map(|r| {
                Ok(PoolMember {
                    ship_id: r.try_get("ship_id")?,
                    cb_before: r.try_get("cb_before")?,
                    cb_after: r.try_get("cb_after")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Pool {
            pool_id: row.try_get("id")?,
            year: row.try_get("year")?,
            total_cb: pool_total(&members),
            members,
            created_at: row.try_get("created_at")?,
        }))
    }
}
