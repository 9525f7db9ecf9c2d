//! Data module - frequency CSV and country geometry loading

mod geometry;
mod loader;
mod processor;
mod types;

pub use geometry::{Bounds, CountryGeometry, GeometryLoader, GeometrySet, PolygonShape};
pub use loader::{FrequencyLoader, LoaderError};
pub use processor::DataProcessor;
pub use types::{FrequencyRecord, FrequencyTable};
