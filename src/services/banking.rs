use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::{BankingRepository, RouteRepository};
use crate::domain::{ensure_positive_amount, ApplyOutcome, BankedSurplus, ComplianceParams};
use crate::error::{FuelError, Result};

/// Carry surplus CB forward and draw it down later.
pub struct BankingService {
    routes: Arc<dyn RouteRepository>,
    bank: Arc<dyn BankingRepository>,
    params: ComplianceParams,
}

impl BankingService {
    pub fn new(
        routes: Arc<dyn RouteRepository>,
        bank: Arc<dyn BankingRepository>,
        params: ComplianceParams,
    ) -> Self {
        Self {
            routes,
            bank,
            params,
        }
    }

    #[instrument(skip(self))]
    pub async fn bank_surplus(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<BankedSurplus> {
        self.params.validate_year(year)?;

        if self.routes.find_route(ship_id).await?.is_none() {
            return Err(FuelError::not_found(format!("Ship with ID {ship_id} not found")));
        }
        ensure_positive_amount(amount, "Bank")?;

        let entry = self.bank.insert_bank_entry(ship_id, year, amount).await?;
        info!(ship_id, year, %amount, "banked surplus");

        Ok(BankedSurplus {
            ship_id: entry.ship_id,
            year: entry.year,
            amount: entry.amount,
        })
    }

    #[instrument(skip(self))]
    pub async fn apply_banked(&self, ship_id: &str, year: i32, amount: Decimal) -> Result<ApplyOutcome> {
        self.params.validate_year(year)?;
        ensure_positive_amount(amount, "Apply")?;

        let outcome = self.bank.apply_banked(ship_id, year, amount).await?;
        info!(ship_id, year, applied = %outcome.applied, remaining = %outcome.cb_after, "applied banked surplus");
        Ok(outcome)
    }

    pub async fn banked_balance(&self, ship_id: &str) -> Result<Decimal> {
        self.bank.banked_balance(ship_id).await
    }
}
