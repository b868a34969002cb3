use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::parse_year;
use crate::api::{error::ApiResult, state::AppState, types::*};
use crate::domain::RouteFilter;

/// GET /api/routes?vesselType=&fuelType=&year=
pub async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> ApiResult<Json<ListResponse<RouteResponse>>> {
    let year = match query.year.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_year(raw)?),
        None => None,
    };
    let filter = RouteFilter {
        vessel_type: query.vessel_type.filter(|s| !s.is_empty()),
        fuel_type: query.fuel_type.filter(|s| !s.is_empty()),
        year,
    };

    let routes = state.services.routes.list_routes(&filter).await?;
    Ok(Json(ListResponse::new(
        routes.into_iter().map(RouteResponse::from).collect(),
    )))
}

/// POST /api/routes/:route_id/baseline
pub async fn set_baseline(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
) -> ApiResult<Json<BaselineResponse>> {
    let route = state.services.routes.set_baseline(&route_id).await?;
    Ok(Json(BaselineResponse {
        success: true,
        message: "Baseline updated successfully".to_string(),
        data: route.into(),
    }))
}

/// GET /api/routes/comparison
pub async fn get_comparison(
    State(state): State<AppState>,
) -> ApiResult<Json<ListResponse<ComparisonResponse>>> {
    let comparisons = state.services.routes.comparison().await?;
    Ok(Json(ListResponse::new(
        comparisons.into_iter().map(ComparisonResponse::from).collect(),
    )))
}
