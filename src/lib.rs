//! Car service: REST CRUD and criteria search for the Car resource.

pub mod config;
pub mod criteria;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mapper;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::Settings;
pub use criteria::{CarCriteria, CarField, Condition, FieldValue, Sort, SortOrder};
pub use domain::{Car, CarDto, CarPatch};
pub use error::{AppError, ConfigError};
pub use routes::{app, car_routes, common_routes};
pub use service::{CarQueryService, CarService};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, CarRepository, InMemoryCarRepository, PgCarRepository};
