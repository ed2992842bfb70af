pub mod car_query;

pub use car_query::CarQuery;
