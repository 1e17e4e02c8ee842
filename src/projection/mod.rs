//! Coordinate reference systems: Swiss LV95 and WGS84

pub mod coordinate;
pub mod converter;
pub mod parse;

pub use coordinate::{GeoPoint, ProjectedPoint};
pub use converter::CoordinateConverter;
pub use parse::parse_coords;

