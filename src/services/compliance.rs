use std::sync::Arc;

use tracing::debug;

use super::RouteRepository;
use crate::domain::{adjusted_balances, AdjustedCb, ComplianceParams, RouteFilter};
use crate::error::Result;

/// Per-ship compliance balance for a reporting year.
#[derive(Clone)]
pub struct ComplianceService {
    routes: Arc<dyn RouteRepository>,
    params: ComplianceParams,
}

impl ComplianceService {
    pub fn new(routes: Arc<dyn RouteRepository>, params: ComplianceParams) -> Self {
        Self { routes, params }
    }

    pub fn params(&self) -> &ComplianceParams {
        &self.params
    }

    pub async fn adjusted_cb(&self, year: i32) -> Result<Vec<AdjustedCb>> {
        self.params.validate_year(year)?;

        let filter = RouteFilter {
            year: Some(year),
            ..Default::default()
        };
        let routes = self.routes.list_routes(&filter).await?;
        let balances = adjusted_balances(&self.params, &routes)?;

        debug!(year, ships = balances.len(), "computed adjusted CB");
        Ok(balances)
    }
}
