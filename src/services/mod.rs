pub mod banking;
pub mod compliance;
pub mod pooling;
pub mod routes;
pub mod traits;

pub use banking::BankingService;
pub use compliance::ComplianceService;
pub use pooling::PoolingService;
pub use routes::RouteService;
pub use traits::{BankingRepository, PoolingRepository, RouteRepository};

#[cfg(test)]
pub use traits::{MockBankingRepository, MockPoolingRepository, MockRouteRepository};

use std::sync::Arc;

use crate::domain::ComplianceParams;

/// Every service wired against one store.
#[derive(Clone)]
pub struct Services {
    pub routes: Arc<RouteService>,
    pub compliance: Arc<ComplianceService>,
    pub banking: Arc<BankingService>,
    pub pooling: Arc<PoolingService>,
}

impl Services {
    pub fn new<S>(store: Arc<S>, params: ComplianceParams) -> Self
    where
        S: RouteRepository + BankingRepository + PoolingRepository + 'static,
    {
        let routes: Arc<dyn RouteRepository> = store.clone();
        let bank: Arc<dyn BankingRepository> = store.clone();
        let pools: Arc<dyn PoolingRepository> = store;

        let compliance = ComplianceService::new(routes.clone(), params);

        Self {
            routes: Arc::new(RouteService::new(routes.clone(), params)),
            compliance: Arc::new(compliance.clone()),
            banking: Arc::new(BankingService::new(routes, bank, params)),
            pooling: Arc::new(PoolingService::new(pools, compliance)),
        }
    }
}
