use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Valid LV95 easting range in metres
pub const EASTING_RANGE: (f64, f64) = (2_485_000.0, 2_834_000.0);

/// Valid LV95 northing range in metres
pub const NORTHING_RANGE: (f64, f64) = (1_075_000.0, 1_296_000.0);

/// Valid WGS84 latitude range in degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid WGS84 longitude range in degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

fn check(axis: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(Error::OutOfRangeCoordinate { axis, value, min, max })
    }
}

/// A point in the Swiss LV95 projected reference system (EPSG:2056)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    easting: f64,
    northing: f64,
}

impl ProjectedPoint {
    /// Creates a point, rejecting values outside the cadastral range
    pub fn new(easting: f64, northing: f64) -> Result<Self> {
        Ok(Self {
            easting: check("easting", easting, EASTING_RANGE)?,
            northing: check("northing", northing, NORTHING_RANGE)?,
        })
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }
}

/// A point in WGS84 geographic coordinates (EPSG:4326), decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting latitudes beyond the poles and longitudes beyond the antimeridian
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: check("latitude", latitude, LATITUDE_RANGE)?,
            longitude: check("longitude", longitude, LONGITUDE_RANGE)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct RawProjectedPoint {
    easting: f64,
    northing: f64,
}

impl<'de> Deserialize<'de> for ProjectedPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawProjectedPoint::deserialize(deserializer)?;
        ProjectedPoint::new(raw.easting, raw.northing).map_err(serde::de::Error::custom)
    }
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawGeoPoint::deserialize(deserializer)?;
        GeoPoint::new(raw.latitude, raw.longitude).map_err(serde::de::Error::custom)
    }
}
