use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::require_year;
use crate::api::{error::ApiResult, state::AppState, types::*};

/// GET /api/pools/adjusted-cb?year=
pub async fn get_pool_candidates(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<YearListResponse<AdjustedCbResponse>>> {
    let year = require_year(query.year.as_deref())?;
    let balances = state.services.pooling.adjusted_cb(year).await?;

    Ok(Json(YearListResponse::new(
        year,
        balances.into_iter().map(AdjustedCbResponse::from).collect(),
    )))
}

/// POST /api/pools
pub async fn create_pool(
    State(state): State<AppState>,
    payload: Result<Json<CreatePoolRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PoolResponse>)> {
    let Json(req) = payload?;
    let pool = state
        .services
        .pooling
        .create_pool(req.year, &req.member_inputs())
        .await?;

    Ok((StatusCode::CREATED, Json(pool.into())))
}

/// GET /api/pools/:pool_id
pub async fn get_pool(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<PoolResponse>> {
    let Path(pool_id) = path?;
    let pool = state.services.pooling.get_pool(pool_id).await?;
    Ok(Json(pool.into()))
}
