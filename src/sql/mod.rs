//! Safe SQL builder: identifiers are fixed per field, values are always bound parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
