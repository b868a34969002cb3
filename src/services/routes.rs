use std::sync::Arc;

use tracing::{info, instrument};

use super::RouteRepository;
use crate::domain::{compare_routes, ComplianceParams, Route, RouteComparison, RouteFilter};
use crate::error::{FuelError, Result};

/// Route listing, baseline selection and baseline comparison.
pub struct RouteService {
    repo: Arc<dyn RouteRepository>,
    params: ComplianceParams,
}

impl RouteService {
    pub fn new(repo: Arc<dyn RouteRepository>, params: ComplianceParams) -> Self {
        Self { repo, params }
    }

    pub async fn list_routes(&self, filter: &RouteFilter) -> Result<Vec<Route>> {
        self.repo.list_routes(filter).await
    }

    #[instrument(skip(self))]
    pub async fn set_baseline(&self, route_id: &str) -> Result<Route> {
        let route = self
            .repo
            .set_baseline(route_id)
            .await?
            .ok_or_else(|| FuelError::not_found(format!("Route with ID {route_id} not found")))?;

        info!(route_id, "baseline route updated");
        Ok(route)
    }

    pub async fn comparison(&self) -> Result<Vec<RouteComparison>> {
        let baseline = self.repo.baseline_route().await?.ok_or_else(|| {
            FuelError::not_found("No baseline route found. Please set a baseline first.")
        })?;

        let others = self.repo.non_baseline_routes().await?;
        if others.is_empty() {
            return Ok(Vec::new());
        }

        compare_routes(&self.params, &baseline, &others)
    }
}
