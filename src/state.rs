//! Shared application state for all routes.

use crate::service::{CarQueryService, CarService};
use crate::store::CarRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cars: CarService,
    pub queries: CarQueryService,
    /// Prefix for alert headers, e.g. `carApp`.
    pub app_name: Arc<str>,
}

impl AppState {
    pub fn new(repository: Arc<dyn CarRepository>, app_name: &str) -> Self {
        Self {
            cars: CarService::new(repository.clone()),
            queries: CarQueryService::new(repository),
            app_name: Arc::from(app_name),
        }
    }
}
