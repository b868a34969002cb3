use std::collections::btree_map::{BTreeMap, Entry};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{round_cb, Route};
use crate::error::{FuelError, Result};

/// Regulatory constants used by every compliance balance calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceParams {
    /// Target GHG intensity (gCO2e/MJ)
    pub target_intensity: Decimal,
    /// Energy content of one tonne of fuel (MJ/t)
    pub energy_factor: Decimal,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ComplianceParams {
    fn default() -> Self {
        Self {
            target_intensity: dec!(89.3368),
            energy_factor: dec!(41000),
            min_year: 2020,
            max_year: 2100,
        }
    }
}

impl ComplianceParams {
    /// Energy in scope (MJ) for a fuel consumption in tonnes
    pub fn energy_in_scope(&self, fuel_consumption: Decimal) -> Result<Decimal> {
        fuel_consumption
            .checked_mul(self.energy_factor)
            .ok_or_else(|| out_of_range("energy in scope", fuel_consumption))
    }

    /// CB = (target - actual) * fuel * energy_factor
    ///
    /// Positive values are a surplus, negative values a deficit (gCO2e).
    pub fn compliance_balance(&self, ghg_intensity: Decimal, fuel_consumption: Decimal) -> Result<Decimal> {
        let energy = self.energy_in_scope(fuel_consumption)?;
        self.target_intensity
            .checked_sub(ghg_intensity)
            .and_then(|gap| gap.checked_mul(energy))
            .ok_or_else(|| out_of_range("compliance balance", ghg_intensity))
    }

    pub fn is_compliant(&self, ghg_intensity: Decimal) -> bool {
        ghg_intensity <= self.target_intensity
    }

    pub fn validate_year(&self, year: i32) -> Result<()> {
        if year < self.min_year || year > self.max_year {
            return Err(FuelError::validation(format!(
                "Year must be between {} and {}",
                self.min_year, self.max_year
            )));
        }
        Ok(())
    }
}

fn out_of_range(what: &str, input: Decimal) -> FuelError {
    FuelError::Internal(format!("{what} out of decimal range for input {input}"))
}

/// A ship's compliance balance for one reporting year, before banking or pooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustedCb {
    pub ship_id: String,
    pub vessel_type: String,
    pub cb_before: Decimal,
}

/// Sum the compliance balance of every route per ship.
///
/// Ships are keyed by `route_id`; output is ordered by ship id and each total is
/// rounded to 2 dp once, after summing.
pub fn adjusted_balances<'a, I>(params: &ComplianceParams, routes: I) -> Result<Vec<AdjustedCb>>
where
    I: IntoIterator<Item = &'a Route>,
{
    let mut per_ship: BTreeMap<&str, (&str, Decimal)> = BTreeMap::new();

    for route in routes {
        let cb = params.compliance_balance(route.ghg_intensity, route.fuel_consumption)?;
        match per_ship.entry(route.route_id.as_str()) {
            Entry::Occupied(mut slot) => {
                let (_, total) = slot.get_mut();
                *total = total
                    .checked_add(cb)
                    .ok_or_else(|| out_of_range("ship total", cb))?;
            }
            Entry::Vacant(slot) => {
                slot.insert((route.vessel_type.as_str(), cb));
            }
        }
    }

    Ok(per_ship
        .into_iter()
        .map(|(ship_id, (vessel_type, total))| AdjustedCb {
            ship_id: ship_id.to_string(),
            vessel_type: vessel_type.to_string(),
            cb_before: round_cb(total),
        })
        .collect())
}

/// One non-baseline route measured against the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub route_id: String,
    pub baseline_intensity: Decimal,
    pub comparison_intensity: Decimal,
    /// (comparison / baseline - 1) * 100, rounded to 2 dp
    pub percent_diff: Decimal,
    pub compliant: bool,
}

pub fn compare_routes(
    params: &ComplianceParams,
    baseline: &Route,
    others: &[Route],
) -> Result<Vec<RouteComparison>> {
    if baseline.ghg_intensity.is_zero() {
        return Err(FuelError::Internal(format!(
            "baseline route {} has zero GHG intensity",
            baseline.route_id
        )));
    }

    others
        .iter()
        .map(|route| {
            let percent_diff = route
                .ghg_intensity
                .checked_div(baseline.ghg_intensity)
                .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
                .and_then(|delta| delta.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| out_of_range("percent diff", route.ghg_intensity))?;
            Ok(RouteComparison {
                route_id: route.route_id.clone(),
                baseline_intensity: baseline.ghg_intensity,
                comparison_intensity: route.ghg_intensity,
                percent_diff: round_cb(percent_diff),
                compliant: params.is_compliant(route.ghg_intensity),
            })
        })
        .collect()
}
