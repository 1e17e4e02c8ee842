use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interpolation::InterpolationResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct Lv95Query {
    pub easting: f64,
    pub northing: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Wgs84Query {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Wgs84Response {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Lv95Response {
    pub easting: f64,
    pub northing: f64,
}

/// A measurement as posted by clients; `value: null` marks a missing reading
#[derive(Debug, Deserialize)]
pub struct MeasurementInput {
    pub latitude: f64,
    pub longitude: f64,
    pub value: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct InterpolateRequest {
    pub measurements: Vec<MeasurementInput>,
    pub queries: Vec<Wgs84Query>,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(default)]
    pub max_neighbors: Option<usize>,
    #[serde(default)]
    pub max_distance_m: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct InterpolateResponse {
    pub results: Vec<InterpolationResult>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
