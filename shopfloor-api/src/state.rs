use shopfloor_order::{OrderService, ReportAggregator};
use shopfloor_core::OrderRepository;
use shopfloor_store::app_config::ReportingConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub reports: Arc<ReportAggregator>,
    pub reporting: ReportingConfig,
}

impl AppState {
    /// Wire the service and aggregator over one shared repository
    pub fn new(repo: Arc<dyn OrderRepository>, reporting: ReportingConfig) -> Self {
        Self {
            orders: Arc::new(OrderService::new(repo.clone())),
            reports: Arc::new(ReportAggregator::new(repo)),
            reporting,
        }
    }
}
