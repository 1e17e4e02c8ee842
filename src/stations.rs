//! Station table import and WGS84 enrichment
//!
//! Station registries (NABEL, MeteoSwiss) publish their sites with LV95
//! coordinates. [`enrich_stations`] appends WGS84 columns to such a table and
//! [`load_measurements`] turns an enriched table into interpolation input.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::interpolation::Measurement;
use crate::projection::{parse_coords, CoordinateConverter, GeoPoint};

pub const EASTING_COLUMN: &str = "Easting";
pub const NORTHING_COLUMN: &str = "Northing";
pub const LATITUDE_COLUMN: &str = "WGS84_Latitude";
pub const LONGITUDE_COLUMN: &str = "WGS84_Longitude";
pub const STATION_COLUMN: &str = "Station";

/// Outcome of an enrichment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_column(headers: &StringRecord, name: &str) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| Error::MissingColumn(name.to_string()))
}

/// Copies a station table, appending `WGS84_Latitude`/`WGS84_Longitude`
///
/// Rows whose coordinates cannot be parsed or converted keep empty WGS84
/// cells and are counted as failed; they do not abort the run.
pub fn enrich_stations<R: Read, W: Write>(
    reader: R,
    writer: W,
    converter: &CoordinateConverter,
) -> Result<EnrichmentSummary> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let easting_idx = require_column(&headers, EASTING_COLUMN)?;
    let northing_idx = find_column(&headers, NORTHING_COLUMN);

    let mut out_headers = headers.clone();
    out_headers.push_field(LATITUDE_COLUMN);
    out_headers.push_field(LONGITUDE_COLUMN);

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&out_headers)?;

    let mut summary = EnrichmentSummary::default();

    for (row, record) in csv_reader.records().enumerate() {
        let mut record = record?;
        summary.total += 1;

        let easting_raw = record.get(easting_idx).unwrap_or("");
        let northing_raw = northing_idx.and_then(|i| record.get(i));

        match parse_coords(easting_raw, northing_raw).and_then(|p| converter.to_wgs84(p)) {
            Ok(geo) => {
                record.push_field(&geo.latitude().to_string());
                record.push_field(&geo.longitude().to_string());
                summary.converted += 1;
            }
            Err(e) => {
                warn!(row, error = %e, "station coordinates left unconverted");
                record.push_field("");
                record.push_field("");
                summary.failed += 1;
            }
        }

        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    info!(
        total = summary.total,
        converted = summary.converted,
        failed = summary.failed,
        "station table enriched"
    );

    Ok(summary)
}

/// File-based [`enrich_stations`]
pub fn enrich_stations_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    converter: &CoordinateConverter,
) -> Result<EnrichmentSummary> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    enrich_stations(reader, writer, converter)
}

/// Reads measurements of `value_column` from an enriched station table
///
/// Rows without WGS84 coordinates are skipped. Empty or non-numeric values
/// become NaN, i.e. missing readings.
pub fn load_measurements<R: Read>(reader: R, value_column: &str) -> Result<Vec<Measurement>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let lat_idx = require_column(&headers, LATITUDE_COLUMN)?;
    let lon_idx = require_column(&headers, LONGITUDE_COLUMN)?;
    let value_idx = require_column(&headers, value_column)?;
    let station_idx = find_column(&headers, STATION_COLUMN);

    let mut measurements = Vec::new();

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;

        let lat = record.get(lat_idx).and_then(parse_field);
        let lon = record.get(lon_idx).and_then(parse_field);
        let (Some(lat), Some(lon)) = (lat, lon) else {
            debug!(row, "skipping station without WGS84 coordinates");
            continue;
        };

        let location = match GeoPoint::new(lat, lon) {
            Ok(location) => location,
            Err(e) => {
                warn!(row, error = %e, "skipping station with invalid coordinates");
                continue;
            }
        };

        let value = record.get(value_idx).and_then(parse_field).unwrap_or(f64::NAN);
        let mut measurement = Measurement::new(location, value);

        if let Some(name) = station_idx.and_then(|i| record.get(i)).map(str::trim) {
            if !name.is_empty() {
                measurement = measurement.with_source(name);
            }
        }

        measurements.push(measurement);
    }

    debug!(count = measurements.len(), column = value_column, "loaded measurements");
    Ok(measurements)
}

/// File-based [`load_measurements`]
pub fn load_measurements_file<P: AsRef<Path>>(path: P, value_column: &str) -> Result<Vec<Measurement>> {
    load_measurements(BufReader::new(File::open(path)?), value_column)
}

fn parse_field(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}
