//! CarService (writes and single reads) and CarQueryService (criteria search).

mod car;
mod query;
pub use car::CarService;
pub use query::CarQueryService;
