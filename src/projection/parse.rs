use crate::error::{Error, Result};
use crate::projection::coordinate::ProjectedPoint;

/// Parses raw station-table coordinate fields into an LV95 point
///
/// Accepts two numeric fields, or a single `"easting/northing"` field in
/// `easting_raw` when `northing_raw` is absent or not numeric.
pub fn parse_coords(easting_raw: &str, northing_raw: Option<&str>) -> Result<ProjectedPoint> {
    let (easting, northing) = split_pair(easting_raw, northing_raw)?;
    ProjectedPoint::new(easting, northing)
}

fn split_pair(easting_raw: &str, northing_raw: Option<&str>) -> Result<(f64, f64)> {
    let easting = parse_number(easting_raw);
    let northing = northing_raw.and_then(parse_number);

    if let (Some(e), Some(n)) = (easting, northing) {
        return Ok((e, n));
    }

    if let Some((east, north)) = easting_raw.split_once('/') {
        return match (parse_number(east), parse_number(north)) {
            (Some(e), Some(n)) => Ok((e, n)),
            _ => Err(Error::Parse(format!("Invalid coordinate pair: {:?}", easting_raw))),
        };
    }

    Err(Error::Parse(format!(
        "Invalid coordinates: easting {:?}, northing {:?}",
        easting_raw, northing_raw
    )))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
