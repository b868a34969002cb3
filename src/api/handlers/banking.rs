use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::api::{error::ApiResult, state::AppState, types::*};

/// POST /api/banking/bank
pub async fn bank_surplus(
    State(state): State<AppState>,
    payload: Result<Json<BankRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BankResponse>)> {
    let Json(req) = payload?;
    let banked = state
        .services
        .banking
        .bank_surplus(&req.ship_id, req.year, req.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(banked.into())))
}

/// POST /api/banking/apply
pub async fn apply_banked(
    State(state): State<AppState>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<Json<ApplyResponse>> {
    let Json(req) = payload?;
    let outcome = state
        .services
        .banking
        .apply_banked(&req.ship_id, req.year, req.apply_amount)
        .await?;

    Ok(Json(outcome.into()))
}

/// GET /api/banking/:ship_id/balance
pub async fn get_banked_balance(
    State(state): State<AppState>,
    Path(ship_id): Path<String>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state.services.banking.banked_balance(&ship_id).await?;

    Ok(Json(BalanceResponse {
        success: true,
        ship_id,
        balance: as_number(balance),
    }))
}
