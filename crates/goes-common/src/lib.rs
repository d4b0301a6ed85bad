//! Common types and utilities shared across the GOES brightness-temperature crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod request;

pub use bbox::BoundingBox;
pub use error::{GoesError, GoesResult};
pub use grid::Grid2D;
pub use request::{Product, Satellite, ScanRequest};
