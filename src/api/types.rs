use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AdjustedCb, ApplyOutcome, BankedSurplus, Pool, PoolMember, PoolMemberInput, Route, RouteComparison};

/// Balances are exact decimals internally; JSON carries plain numbers.
pub fn as_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// ============================================================================
// Envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearListResponse<T> {
    pub success: bool,
    pub year: i32,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> YearListResponse<T> {
    pub fn new(year: i32, data: Vec<T>) -> Self {
        Self {
            success: true,
            year,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Route Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub id: i64,
    pub route_id: String,
    pub vessel_type: String,
    pub fuel_type: String,
    pub year: i32,
    pub ghg_intensity: f64,
    pub fuel_consumption: f64,
    pub distance: f64,
    pub total_emissions: f64,
    pub is_baseline: bool,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            route_id: route.route_id,
            vessel_type: route.vessel_type,
            fuel_type: route.fuel_type,
            year: route.year,
            ghg_intensity: as_number(route.ghg_intensity),
            fuel_consumption: as_number(route.fuel_consumption),
            distance: as_number(route.distance),
            total_emissions: as_number(route.total_emissions),
            is_baseline: route.is_baseline,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub vessel_type: Option<String>,
    pub fuel_type: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineResponse {
    pub success: bool,
    pub message: String,
    pub data: RouteResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub route_id: String,
    pub baseline_intensity: f64,
    pub comparison_intensity: f64,
    pub percent_diff: f64,
    pub compliant: bool,
}

impl From<RouteComparison> for ComparisonResponse {
    fn from(c: RouteComparison) -> Self {
        Self {
            route_id: c.route_id,
            baseline_intensity: as_number(c.baseline_intensity),
            comparison_intensity: as_number(c.comparison_intensity),
            percent_diff: as_number(c.percent_diff),
            compliant: c.compliant,
        }
    }
}

// ============================================================================
// Compliance Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedCbResponse {
    pub ship_id: String,
    pub vessel_type: String,
    #[serde(rename = "cb_before")]
    pub cb_before: f64,
}

impl From<AdjustedCb> for AdjustedCbResponse {
    fn from(cb: AdjustedCb) -> Self {
        Self {
            ship_id: cb.ship_id,
            vessel_type: cb.vessel_type,
            cb_before: as_number(cb.cb_before),
        }
    }
}

// ============================================================================
// Banking Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankRequest {
    pub ship_id: String,
    pub year: i32,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub ship_id: String,
    pub year: i32,
    pub apply_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankedResult {
    pub ship_id: String,
    pub year: i32,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankResponse {
    pub success: bool,
    pub message: String,
    pub result: BankedResult,
}

impl From<BankedSurplus> for BankResponse {
    fn from(banked: BankedSurplus) -> Self {
        Self {
            success: true,
            message: "Banked successfully".to_string(),
            result: BankedResult {
                ship_id: banked.ship_id,
                year: banked.year,
                amount: as_number(banked.amount),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub cb_before: f64,
    pub applied: f64,
    pub cb_after: f64,
}

impl From<ApplyOutcome> for ApplyResponse {
    fn from(outcome: ApplyOutcome) -> Self {
        Self {
            success: true,
            cb_before: as_number(outcome.cb_before),
            applied: as_number(outcome.applied),
            cb_after: as_number(outcome.cb_after),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub success: bool,
    pub ship_id: String,
    pub balance: f64,
}

// ============================================================================
// Pool Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberRequest {
    pub ship_id: String,
    #[serde(rename = "cb_before")]
    pub cb_before: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePoolRequest {
    pub year: i32,
    pub members: Vec<PoolMemberRequest>,
}

impl CreatePoolRequest {
    pub fn member_inputs(&self) -> Vec<PoolMemberInput> {
        self.members
            .iter()
            .map(|m| PoolMemberInput::new(m.ship_id.clone(), m.cb_before))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberResponse {
    pub ship_id: String,
    #[serde(rename = "cb_before")]
    pub cb_before: f64,
    #[serde(rename = "cb_after")]
    pub cb_after: f64,
}

impl From<PoolMember> for PoolMemberResponse {
    fn from(m: PoolMember) -> Self {
        Self {
            ship_id: m.ship_id,
            cb_before: as_number(m.cb_before),
            cb_after: as_number(m.cb_after),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResponse {
    pub pool_id: i64,
    pub year: i32,
    #[serde(rename = "totalCB")]
    pub total_cb: f64,
    pub members: Vec<PoolMemberResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Pool> for PoolResponse {
    fn from(pool: Pool) -> Self {
        Self {
            pool_id: pool.pool_id,
            year: pool.year,
            total_cb: as_number(pool.total_cb),
            members: pool.members.into_iter().map(Into::into).collect(),
            created_at: pool.created_at,
        }
    }
}
