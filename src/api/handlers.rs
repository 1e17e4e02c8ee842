use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::io::Cursor;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::Error;
use crate::interpolation::{IdwParams, Measurement, SpatialInterpolator};
use crate::projection::{CoordinateConverter, GeoPoint};
use crate::stations::enrich_stations;

use super::models::*;

/// Shared state of the HTTP service
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub converter: CoordinateConverter,
    pub default_params: IdwParams,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            converter: CoordinateConverter::new(),
            default_params: IdwParams::default(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(error: Error) -> ApiError {
    let status = match error.root() {
        Error::OutOfRangeCoordinate { .. }
        | Error::InvalidConfiguration(_)
        | Error::Parse(_)
        | Error::MissingColumn(_)
        | Error::Csv(_) => StatusCode::BAD_REQUEST,
        Error::InsufficientData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        warn!(error = %error, "request failed");
    }

    (status, Json(ErrorResponse { error: error.to_string() }))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message.into() }))
}

pub async fn get_lv95_to_wgs84(
    State(state): State<AppState>,
    Query(req): Query<Lv95Query>,
) -> Result<Json<Wgs84Response>, ApiError> {
    let geo = state
        .converter
        .lv95_pair_to_wgs84(req.easting, req.northing)
        .map_err(api_error)?;

    Ok(Json(Wgs84Response {
        latitude: geo.latitude(),
        longitude: geo.longitude(),
    }))
}

pub async fn get_wgs84_to_lv95(
    State(state): State<AppState>,
    Query(req): Query<Wgs84Query>,
) -> Result<Json<Lv95Response>, ApiError> {
    let point = GeoPoint::new(req.latitude, req.longitude)
        .and_then(|g| state.converter.to_lv95(g))
        .map_err(api_error)?;

    Ok(Json(Lv95Response {
        easting: point.easting(),
        northing: point.northing(),
    }))
}

pub async fn post_interpolate(
    State(state): State<AppState>,
    payload: Result<Json<InterpolateRequest>, JsonRejection>,
) -> Result<Json<InterpolateResponse>, ApiError> {
    let start = Instant::now();
    let Json(req) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let params = IdwParams {
        power: req.power.unwrap_or(state.default_params.power),
        max_neighbors: req.max_neighbors.or(state.default_params.max_neighbors),
        max_distance_m: req.max_distance_m.or(state.default_params.max_distance_m),
    };

    let measurements = req
        .measurements
        .into_iter()
        .enumerate()
        .map(|(index, m)| -> Result<Measurement, Error> {
            let location = GeoPoint::new(m.latitude, m.longitude).map_err(|e| Error::at_index(index, e))?;
            let mut measurement = Measurement::new(location, m.value.unwrap_or(f64::NAN));
            if let Some(source) = m.source {
                measurement = measurement.with_source(source);
            }
            if let Some(timestamp) = m.timestamp {
                measurement = measurement.with_timestamp(timestamp);
            }
            Ok(measurement)
        })
        .collect::<Result<Vec<_>, Error>>()
        .map_err(api_error)?;

    let queries = req
        .queries
        .iter()
        .enumerate()
        .map(|(index, q)| GeoPoint::new(q.latitude, q.longitude).map_err(|e| Error::at_index(index, e)))
        .collect::<Result<Vec<_>, Error>>()
        .map_err(api_error)?;

    let results = SpatialInterpolator::new(measurements, params)
        .and_then(|interpolator| interpolator.interpolate(&queries))
        .map_err(api_error)?;

    Ok(Json(InterpolateResponse {
        results,
        execution_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    }))
}

pub async fn upload_stations(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut csv_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("csv") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Could not read CSV field: {}", e)))?;
            csv_data = Some(bytes.to_vec());
        }
    }

    let csv_data = csv_data.ok_or_else(|| bad_request("Missing CSV file"))?;

    let mut output = Vec::with_capacity(csv_data.len() * 2);
    let summary = enrich_stations(Cursor::new(csv_data), &mut output, &state.converter).map_err(api_error)?;

    info!(total = summary.total, failed = summary.failed, "enriched uploaded station table");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"stations_with_wgs84.csv\"".to_string(),
            ),
            (header::HeaderName::from_static("x-stations-total"), summary.total.to_string()),
            (header::HeaderName::from_static("x-stations-failed"), summary.failed.to_string()),
        ],
        output,
    )
        .into_response())
}
