//! Read-only criteria search over cars.

use crate::criteria::{CarCriteria, Sort};
use crate::domain::CarDto;
use crate::error::AppError;
use crate::mapper;
use crate::store::CarRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct CarQueryService {
    repository: Arc<dyn CarRepository>,
}

impl CarQueryService {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_by_criteria(&self, criteria: &CarCriteria, sort: &[Sort]) -> Result<Vec<CarDto>, AppError> {
        tracing::debug!(criteria = ?criteria, sort = ?sort, "find by criteria");
        let cars = self.repository.find_all(criteria, sort).await?;
        Ok(mapper::to_dtos(&cars))
    }

    pub async fn count_by_criteria(&self, criteria: &CarCriteria) -> Result<u64, AppError> {
        tracing::debug!(criteria = ?criteria, "count by criteria");
        self.repository.count(criteria).await
    }
}
