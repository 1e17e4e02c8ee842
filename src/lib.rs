//! imping-geo - Swiss coordinate conversion and spatial interpolation
//!
//! imping-geo aligns air-quality station data published in the Swiss LV95
//! projection with WGS84 locations and estimates pollutant concentrations at
//! arbitrary places using inverse distance weighting.
//!
//! # Examples
//!
//! ## Converting coordinates
//!
//! ```
//! use imping_geo::{CoordinateConverter, ProjectedPoint};
//!
//! let converter = CoordinateConverter::new();
//! let bern = converter.to_wgs84(ProjectedPoint::new(2_600_000.0, 1_200_000.0)?)?;
//! assert!((bern.latitude() - 46.95).abs() < 0.01);
//!
//! let back = converter.to_lv95(bern)?;
//! assert!((back.easting() - 2_600_000.0).abs() < 1.0);
//! # Ok::<(), imping_geo::Error>(())
//! ```
//!
//! ## Interpolating station measurements
//!
//! ```
//! use imping_geo::{GeoPoint, IdwParams, Measurement, SpatialInterpolator};
//!
//! let stations = vec![
//!     Measurement::new(GeoPoint::new(47.3776, 8.5304)?, 11.9).with_source("ZÜRICH-KASERNE"),
//!     Measurement::new(GeoPoint::new(47.4029, 8.6129)?, 10.2).with_source("DÜBENDORF-EMPA"),
//! ];
//!
//! let params = IdwParams::builder().power(2.0).max_neighbors(4).build()?;
//! let interpolator = SpatialInterpolator::new(stations, params)?;
//!
//! let steinhausen = interpolator.interpolate_at(GeoPoint::new(47.195, 8.486)?)?;
//! assert!(steinhausen.value > 10.2 && steinhausen.value < 11.9);
//! # Ok::<(), imping_geo::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod interpolation;
pub mod parallel;
pub mod projection;
pub mod settings;
pub mod stations;

pub use error::{Error, Result};
pub use interpolation::{interpolate, IdwParams, InterpolationResult, Measurement, SpatialInterpolator};
pub use projection::{parse_coords, CoordinateConverter, GeoPoint, ProjectedPoint};
pub use settings::Settings;
pub use stations::{enrich_stations, load_measurements, EnrichmentSummary};
