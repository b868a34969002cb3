use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{handlers, state::AppState};
use crate::error::{FuelError, Result};

pub fn create_router(state: AppState, frontend_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(frontend_origin)
        .map_err(|e| FuelError::Internal(format!("invalid frontend origin {frontend_origin:?}: {e}")))?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        // Route endpoints
        .route("/api/routes", get(handlers::list_routes))
        .route("/api/routes/comparison", get(handlers::get_comparison))
        .route("/api/routes/:route_id/baseline", post(handlers::set_baseline))
        // Compliance endpoints
        .route("/api/compliance/adjusted-cb", get(handlers::get_adjusted_cb))
        // Banking endpoints
        .route("/api/banking/bank", post(handlers::bank_surplus))
        .route("/api/banking/apply", post(handlers::apply_banked))
        .route("/api/banking/:ship_id/balance", get(handlers::get_banked_balance))
        // Pool endpoints
        .route("/api/pools", post(handlers::create_pool))
        .route("/api/pools/adjusted-cb", get(handlers::get_pool_candidates))
        .route("/api/pools/:pool_id", get(handlers::get_pool))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(router)
}
