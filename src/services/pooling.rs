use std::sync::Arc;

use tracing::{info, instrument};

use super::{ComplianceService, PoolingRepository};
use crate::domain::{allocate, validate_members, AdjustedCb, Pool, PoolMemberInput};
use crate::error::{FuelError, Result};

/// Validates pool requests, runs the allocation engine and stores the result.
pub struct PoolingService {
    pools: Arc<dyn PoolingRepository>,
    compliance: ComplianceService,
}

impl PoolingService {
    pub fn new(pools: Arc<dyn PoolingRepository>, compliance: ComplianceService) -> Self {
        Self { pools, compliance }
    }

    pub async fn adjusted_cb(&self, year: i32) -> Result<Vec<AdjustedCb>> {
        self.compliance.adjusted_cb(year).await
    }

    #[instrument(skip(self, members), fields(members = members.len()))]
    pub async fn create_pool(&self, year: i32, members: &[PoolMemberInput]) -> Result<Pool> {
        self.compliance.params().validate_year(year)?;
        validate_members(members)?;

        let allocated = allocate(members);
        let pool = self.pools.create_pool(year, &allocated).await?;

        info!(pool_id = pool.pool_id, year, total_cb = %pool.total_cb, "pool created");
        Ok(pool)
    }

    pub async fn get_pool(&self, pool_id: i64) -> Result<Pool> {
        self.pools
            .get_pool(pool_id)
            .await?
            .ok_or_else(|| FuelError::not_found(format!("Pool with ID {pool_id} not found")))
    }
}
