use axum::{
    extract::{Query, State},
    Json,
};

use super::require_year;
use crate::api::{error::ApiResult, state::AppState, types::*};

/// GET /api/compliance/adjusted-cb?year=
pub async fn get_adjusted_cb(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<YearListResponse<AdjustedCbResponse>>> {
    let year = require_year(query.year.as_deref())?;
    let balances = state.services.compliance.adjusted_cb(year).await?;

    Ok(Json(YearListResponse::new(
        year,
        balances.into_iter().map(AdjustedCbResponse::from).collect(),
    )))
}
