use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FuelError, Result};

/// One ledger line; positive when banked, negative when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    pub id: i64,
    pub ship_id: String,
    pub year: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Result of banking surplus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankedSurplus {
    pub ship_id: String,
    pub year: i32,
    pub amount: Decimal,
}

/// Result of applying banked surplus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub cb_before: Decimal,
    pub applied: Decimal,
    pub cb_after: Decimal,
}

pub fn ensure_positive_amount(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(FuelError::validation(format!("{what} amount must be positive")));
    }
    Ok(())
}

/// Withdraw `requested` from an available banked balance.
pub fn plan_apply(available: Decimal, requested: Decimal) -> Result<ApplyOutcome> {
    ensure_positive_amount(requested, "Apply")?;
    if requested > available {
        return Err(FuelError::InsufficientBanked {
            available,
            requested,
        });
    }
    Ok(ApplyOutcome {
        cb_before: available,
        applied: requested,
        cb_after: available - requested,
    })
}

/// Banked balance is the plain sum of the ledger.
pub fn banked_balance<'a, I>(entries: I) -> Decimal
where
    I: IntoIterator<Item = &'a BankEntry>,
{
    entries.into_iter().map(|e| e.amount).sum()
}
