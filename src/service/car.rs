//! Car use cases over a [`CarRepository`]. Holds no state beyond the repository handle.

use crate::domain::{Car, CarDto, CarPatch};
use crate::error::AppError;
use crate::mapper;
use crate::store::CarRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct CarService {
    repository: Arc<dyn CarRepository>,
}

impl CarService {
    pub fn new(repository: Arc<dyn CarRepository>) -> Self {
        Self { repository }
    }

    /// Persist a new car; the returned DTO carries the assigned id.
    pub async fn save(&self, dto: CarDto) -> Result<CarDto, AppError> {
        tracing::debug!(car = ?dto, "Request to save Car");
        let car = self.repository.save(mapper::to_entity(&dto)).await?;
        Ok(mapper::to_dto(&car))
    }

    /// Replace every field of the stored car in one unit of work. `None` when `dto.id` is unset or unknown.
    pub async fn update(&self, dto: CarDto) -> Result<Option<CarDto>, AppError> {
        tracing::debug!(car = ?dto, "Request to update Car");
        let Some(id) = dto.id else {
            return Ok(None);
        };
        let updated = self
            .repository
            .update_with(id, Box::new(move |car: &mut Car| mapper::replace(car, &dto)))
            .await?;
        Ok(updated.as_ref().map(mapper::to_dto))
    }

    /// Merge the non-null fields of `patch` onto the stored car. `None` when `patch.id` is unset or unknown.
    pub async fn partial_update(&self, patch: CarPatch) -> Result<Option<CarDto>, AppError> {
        tracing::debug!(car = ?patch, "Request to partially update Car");
        let Some(id) = patch.id else {
            return Ok(None);
        };
        let updated = self
            .repository
            .update_with(id, Box::new(move |car: &mut Car| mapper::partial_update(car, &patch)))
            .await?;
        Ok(updated.as_ref().map(mapper::to_dto))
    }

    pub async fn find_one(&self, id: i64) -> Result<Option<CarDto>, AppError> {
        tracing::debug!(id, "Request to get Car");
        let car = self.repository.find_by_id(id).await?;
        Ok(car.as_ref().map(mapper::to_dto))
    }

    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        self.repository.exists_by_id(id).await
    }

    /// Idempotent: deleting an unknown id succeeds.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        tracing::debug!(id, "Request to delete Car");
        self.repository.delete_by_id(id).await
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
