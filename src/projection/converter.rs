use tracing::debug;

use crate::error::Result;
use crate::parallel::map_ordered;
use crate::projection::coordinate::{GeoPoint, ProjectedPoint, EASTING_RANGE, NORTHING_RANGE};

/// Converts coordinates between Swiss LV95 and WGS84
///
/// Uses the swisstopo closed-form approximation formulas. The inverse
/// direction (LV95 to WGS84) starts from its own polynomial and is then
/// refined with Newton steps against the forward polynomial, which keeps
/// both directions consistent to well below a metre across the whole
/// cadastral range.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateConverter {
    max_iterations: usize,
    tolerance_m: f64,
}

impl CoordinateConverter {
    /// Creates a converter with the default refinement settings
    pub fn new() -> Self {
        Self {
            max_iterations: 8,
            tolerance_m: 1e-3,
        }
    }

    /// Converts an LV95 point to WGS84
    pub fn to_wgs84(&self, point: ProjectedPoint) -> Result<GeoPoint> {
        let (easting, northing) = (point.easting(), point.northing());
        let (mut lat, mut lon) = lv95_to_wgs84_approx(easting, northing);

        for _ in 0..self.max_iterations {
            let (e, n) = wgs84_to_lv95_approx(lat, lon);
            let (res_e, res_n) = (easting - e, northing - n);
            if res_e.abs() < self.tolerance_m && res_n.abs() < self.tolerance_m {
                break;
            }

            let [[de_dlat, de_dlon], [dn_dlat, dn_dlon]] = lv95_jacobian(lat, lon);
            let det = de_dlat * dn_dlon - de_dlon * dn_dlat;
            if det == 0.0 || !det.is_finite() {
                break;
            }

            lat += (dn_dlon * res_e - de_dlon * res_n) / det;
            lon += (de_dlat * res_n - dn_dlat * res_e) / det;
        }

        GeoPoint::new(lat, lon)
    }

    /// Converts a WGS84 point to LV95
    ///
    /// Fails when the resulting point lies outside the LV95 cadastral range,
    /// i.e. the input is too far from Switzerland for the formulas to apply.
    /// Results within the refinement tolerance of a bound are placed on it.
    pub fn to_lv95(&self, point: GeoPoint) -> Result<ProjectedPoint> {
        let (easting, northing) = wgs84_to_lv95_approx(point.latitude(), point.longitude());
        ProjectedPoint::new(
            snap_to_range(easting, EASTING_RANGE, self.tolerance_m),
            snap_to_range(northing, NORTHING_RANGE, self.tolerance_m),
        )
    }

    /// Converts LV95 points to WGS84, preserving input order
    ///
    /// Fails fast: the whole call fails with [`Error::Batch`](crate::Error::Batch) naming the
    /// first invalid element.
    pub fn to_wgs84_many(&self, points: &[ProjectedPoint]) -> Result<Vec<GeoPoint>> {
        debug!(count = points.len(), "converting LV95 batch to WGS84");
        map_ordered(points, |&p| self.to_wgs84(p))
    }

    /// Converts WGS84 points to LV95, preserving input order
    ///
    /// Same fail-fast policy as [`CoordinateConverter::to_wgs84_many`].
    pub fn to_lv95_many(&self, points: &[GeoPoint]) -> Result<Vec<ProjectedPoint>> {
        debug!(count = points.len(), "converting WGS84 batch to LV95");
        map_ordered(points, |&p| self.to_lv95(p))
    }

    /// Converts a raw easting/northing pair to WGS84
    pub fn lv95_pair_to_wgs84(&self, easting: f64, northing: f64) -> Result<GeoPoint> {
        self.to_wgs84(ProjectedPoint::new(easting, northing)?)
    }
}

impl Default for CoordinateConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves `value` onto the nearest bound when it misses the range by at most `slack`
fn snap_to_range(value: f64, (min, max): (f64, f64), slack: f64) -> f64 {
    if value < min && min - value <= slack {
        min
    } else if value > max && value - max <= slack {
        max
    } else {
        value
    }
}

/// Auxiliary latitude/longitude in units of 10000" relative to Bern
fn wgs84_aux(lat: f64, lon: f64) -> (f64, f64) {
    ((lat * 3600.0 - 169_028.66) / 10_000.0, (lon * 3600.0 - 26_782.5) / 10_000.0)
}

/// d(aux)/d(degree) for both auxiliary values
const AUX_PER_DEGREE: f64 = 0.36;

fn wgs84_to_lv95_approx(lat: f64, lon: f64) -> (f64, f64) {
    let (phi, lambda) = wgs84_aux(lat, lon);

    let easting = 2_600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi.powi(2)
        - 44.54 * lambda.powi(3);

    let northing = 1_200_147.07 + 308_807.95 * phi
        + 3_745.25 * lambda.powi(2)
        + 76.63 * phi.powi(2)
        - 194.56 * lambda.powi(2) * phi
        + 119.79 * phi.powi(3);

    (easting, northing)
}

/// Partial derivatives of [`wgs84_to_lv95_approx`], rows (easting, northing), columns (lat, lon)
fn lv95_jacobian(lat: f64, lon: f64) -> [[f64; 2]; 2] {
    let (phi, lambda) = wgs84_aux(lat, lon);

    let de_dphi = -10_938.51 * lambda - 0.72 * lambda * phi;
    let de_dlambda = 211_455.93 - 10_938.51 * phi - 0.36 * phi.powi(2) - 133.62 * lambda.powi(2);
    let dn_dphi = 308_807.95 + 153.26 * phi - 194.56 * lambda.powi(2) + 359.37 * phi.powi(2);
    let dn_dlambda = 7_490.5 * lambda - 389.12 * lambda * phi;

    [
        [de_dphi * AUX_PER_DEGREE, de_dlambda * AUX_PER_DEGREE],
        [dn_dphi * AUX_PER_DEGREE, dn_dlambda * AUX_PER_DEGREE],
    ]
}

fn lv95_to_wgs84_approx(easting: f64, northing: f64) -> (f64, f64) {
    let y = (easting - 2_600_000.0) / 1_000_000.0;
    let x = (northing - 1_200_000.0) / 1_000_000.0;

    let lambda = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.130_6 * y * x.powi(2)
        - 0.043_6 * y.powi(3);

    let phi = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.044_7 * y.powi(2) * x
        - 0.014_0 * x.powi(3);

    (phi * 100.0 / 36.0, lambda * 100.0 / 36.0)
}
