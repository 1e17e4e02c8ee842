//! Spatial interpolation of point measurements

pub mod distance;
pub mod idw;
pub mod measurement;
pub mod params;

pub use distance::haversine_m;
pub use idw::{interpolate, InterpolationResult, SpatialInterpolator};
pub use measurement::Measurement;
pub use params::{IdwParams, IdwParamsBuilder};
