use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::projection::GeoPoint;

/// A single observed value at a WGS84 location
///
/// A non-finite value marks a missing reading. Such measurements are kept so
/// that station tables survive import intact, but the interpolator ignores
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    location: GeoPoint,
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl Measurement {
    pub fn new(location: GeoPoint, value: f64) -> Self {
        Self {
            location,
            value,
            timestamp: None,
            source: None,
        }
    }

    /// Returns a copy carrying the given source identifier (e.g. a station name)
    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    /// Returns a copy carrying the observation time
    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..self
        }
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// True when the value can take part in interpolation
    pub fn is_usable(&self) -> bool {
        self.value.is_finite()
    }
}
