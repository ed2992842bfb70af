//! Car persistence: the repository trait, its PostgreSQL and in-memory implementations,
//! and database bootstrap.

mod memory;
mod postgres;

pub use memory::InMemoryCarRepository;
pub use postgres::{ensure_database_exists, ensure_schema, PgCarRepository};

use crate::criteria::{CarCriteria, Sort};
use crate::domain::Car;
use crate::error::AppError;
use async_trait::async_trait;

/// Mutation applied by [`CarRepository::update_with`] while the row is held.
pub type UpdateFn = Box<dyn FnOnce(&mut Car) + Send>;

#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Insert when `car.id` is `None`, otherwise replace the row with that id. Returns the stored row.
    async fn save(&self, car: Car) -> Result<Car, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError>;

    /// Rows matching `criteria`, ordered by `sort` then id.
    async fn find_all(&self, criteria: &CarCriteria, sort: &[Sort]) -> Result<Vec<Car>, AppError>;

    async fn count(&self, criteria: &CarCriteria) -> Result<u64, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// No-op when the id does not exist.
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;

    /// Load, mutate and write back one row as a single unit of work. `None` if the id does not exist.
    async fn update_with(&self, id: i64, apply: UpdateFn) -> Result<Option<Car>, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
