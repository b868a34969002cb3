//! Pool allocation engine
//!
//! Redistributes surplus compliance balance onto deficit ships within a pool.
//! Members are ordered by `cb_before` descending (ties by ship id), which puts
//! the largest donors first and services the smallest shortfalls first. The same
//! order is used for the returned members.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round_cb;
use crate::error::{FuelError, Result};

/// A ship entering a pool with its adjusted CB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMemberInput {
    pub ship_id: String,
    pub cb_before: Decimal,
}

impl PoolMemberInput {
    pub fn new(ship_id: impl Into<String>, cb_before: Decimal) -> Self {
        Self {
            ship_id: ship_id.into(),
            cb_before,
        }
    }
}

/// A ship after allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    pub ship_id: String,
    pub cb_before: Decimal,
    pub cb_after: Decimal,
}

/// A persisted pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub pool_id: i64,
    pub year: i32,
    pub total_cb: Decimal,
    pub members: Vec<PoolMember>,
    pub created_at: DateTime<Utc>,
}

/// Sum of `cb_after` over the members, rounded to 2 dp.
pub fn pool_total(members: &[PoolMember]) -> Decimal {
    round_cb(members.iter().map(|m| m.cb_after).sum())
}

/// Caller-side checks that must pass before [`allocate`] is invoked.
pub fn validate_members(members: &[PoolMemberInput]) -> Result<()> {
    if members.is_empty() {
        return Err(FuelError::validation("Pool must have at least one member"));
    }

    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if member.ship_id.trim().is_empty() {
            return Err(FuelError::validation("All members must have a shipId"));
        }
        if !seen.insert(member.ship_id.as_str()) {
            return Err(FuelError::validation(format!(
                "Duplicate shipId in pool: {}",
                member.ship_id
            )));
        }
    }

    let total = members
        .iter()
        .try_fold(Decimal::ZERO, |acc, m| acc.checked_add(m.cb_before))
        .ok_or_else(|| FuelError::validation("Pool total is out of range"))?;
    if total < Decimal::ZERO {
        return Err(FuelError::validation(format!(
            "Pool invalid: total adjusted CB must be >= 0. Current total: {:.2}",
            round_cb(total)
        )));
    }

    Ok(())
}

/// Greedy surplus-to-deficit transfer.
///
/// Expects input that passed [`validate_members`]. Balances are exact decimals;
/// rounding (half away from zero, 2 dp) is applied to every value on the way out.
pub fn allocate(members: &[PoolMemberInput]) -> Vec<PoolMember> {
    let mut working: Vec<PoolMember> = members
        .iter()
        .map(|m| PoolMember {
            ship_id: m.ship_id.clone(),
            cb_before: m.cb_before,
            cb_after: m.cb_before,
        })
        .collect();

    working.sort_by(|a, b| {
        b.cb_before
            .cmp(&a.cb_before)
            .then_with(|| a.ship_id.cmp(&b.ship_id))
    });

    let donors: Vec<usize> = (0..working.len())
        .filter(|&i| working[i].cb_before > Decimal::ZERO)
        .collect();
    let deficits: Vec<usize> = (0..working.len())
        .filter(|&i| working[i].cb_before < Decimal::ZERO)
        .collect();

    for &d in &deficits {
        let mut shortfall = -working[d].cb_before;

        for &s in &donors {
            if shortfall <= Decimal::ZERO {
                break;
            }
            let available = working[s].cb_after;
            if available <= Decimal::ZERO {
                continue;
            }

            let transfer = available.min(shortfall);
            working[s].cb_after -= transfer;
            working[d].cb_after += transfer;
            shortfall -= transfer;
        }

        // deficit ships never leave worse off
        if working[d].cb_after < working[d].cb_before {
            working[d].cb_after = working[d].cb_before;
        }
    }

    // surplus ships never leave negative
    for member in working.iter_mut() {
        if member.cb_before > Decimal::ZERO && member.cb_after < Decimal::ZERO {
            member.cb_after = Decimal::ZERO;
        }
    }

    working
        .into_iter()
        .map(|m| PoolMember {
            ship_id: m.ship_id,
            cb_before: round_cb(m.cb_before),
            cb_after: round_cb(m.cb_after),
        })
        .collect()
}
