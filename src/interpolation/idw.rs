//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates the value at a query location as a weighted average of the
//! measurements around it:
//!
//! ```text
//! z(q) = Σ(wi * zi) / Σ(wi)
//! where wi = 1 / ((d(q, pi) / dmin)^p + ε)
//! ```
//!
//! `dmin` is the distance to the nearest contributing measurement. Scaling by
//! it leaves the estimate unchanged and keeps the weights finite for large
//! powers and for queries very close to a measurement.
//!
//! Distances are great-circle distances in metres. A measurement located
//! exactly at the query returns its own value instead of a weighted mix.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::parallel::map_ordered;
use crate::projection::GeoPoint;

use super::distance::haversine_m;
use super::measurement::Measurement;
use super::params::IdwParams;

/// Added to every weighted distance so the weights stay finite
pub const EPSILON: f64 = 1e-12;

/// Interpolated value at one query location
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterpolationResult {
    pub query: GeoPoint,
    pub value: f64,
    /// Sum of the weights used, relative to a nearest weight of about 1.
    /// `None` when the query hit a measurement exactly.
    pub weight_sum: Option<f64>,
    /// Number of measurements that contributed
    pub neighbors: usize,
    /// Distance to the closest contributing measurement in metres
    pub nearest_distance_m: f64,
}

impl InterpolationResult {
    /// True when the value was taken directly from a coincident measurement
    pub fn is_exact(&self) -> bool {
        self.weight_sum.is_none()
    }
}

/// Estimates values at arbitrary locations from a set of measurements
#[derive(Debug, Clone)]
pub struct SpatialInterpolator {
    measurements: Vec<Measurement>,
    params: IdwParams,
}

impl SpatialInterpolator {
    /// Creates an interpolator over the given measurements
    ///
    /// Fails with [`Error::InvalidConfiguration`] for bad parameters and
    /// with [`Error::InsufficientData`] when no measurement carries a usable
    /// value.
    pub fn new(measurements: Vec<Measurement>, params: IdwParams) -> Result<Self> {
        params.validate()?;

        let total = measurements.len();
        let measurements: Vec<Measurement> = measurements.into_iter().filter(Measurement::is_usable).collect();

        if measurements.is_empty() {
            return Err(Error::InsufficientData(format!(
                "none of the {} measurements has a usable value",
                total
            )));
        }

        if measurements.len() < total {
            debug!(skipped = total - measurements.len(), "ignoring measurements without a value");
        }

        Ok(Self { measurements, params })
    }

    /// Number of measurements taking part in interpolation
    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    /// Estimates the value at a single location
    pub fn interpolate_at(&self, query: GeoPoint) -> Result<InterpolationResult> {
        let mut candidates = self.candidates(&query);

        let Some(&(nearest, _)) = candidates.first() else {
            return Err(Error::InsufficientData(format!(
                "no measurement within reach of ({}, {})",
                query.latitude(),
                query.longitude()
            )));
        };

        // Coincident measurements win regardless of the neighbour limit.
        if nearest == 0.0 {
            let coincident: Vec<f64> = candidates
                .iter()
                .take_while(|(d, _)| *d == 0.0)
                .map(|&(_, v)| v)
                .collect();

            let value = if coincident.len() == 1 {
                coincident[0]
            } else {
                coincident.iter().sum::<f64>() / coincident.len() as f64
            };

            return Ok(InterpolationResult {
                query,
                value,
                weight_sum: None,
                neighbors: coincident.len(),
                nearest_distance_m: 0.0,
            });
        }

        if let Some(k) = self.params.max_neighbors {
            candidates.truncate(k);
        }

        // Distances are taken relative to the nearest one so the nearest
        // weight stays close to 1 for any power.
        let mut sum_w = 0.0;
        let mut sum_wz = 0.0;

        for &(d, value) in &candidates {
            let w = 1.0 / ((d / nearest).powf(self.params.power) + EPSILON);
            sum_w += w;
            sum_wz += w * value;
        }

        let value = sum_wz / sum_w;
        if !value.is_finite() {
            return Err(Error::InsufficientData(format!(
                "weights at ({}, {}) do not yield a finite value",
                query.latitude(),
                query.longitude()
            )));
        }

        Ok(InterpolationResult {
            query,
            value,
            weight_sum: Some(sum_w),
            neighbors: candidates.len(),
            nearest_distance_m: nearest,
        })
    }

    /// Estimates values at every query, preserving order
    ///
    /// Queries are evaluated in parallel. If any query lacks usable
    /// measurements the call fails with [`Error::Batch`] naming the first
    /// such query.
    pub fn interpolate(&self, queries: &[GeoPoint]) -> Result<Vec<InterpolationResult>> {
        debug!(
            queries = queries.len(),
            measurements = self.measurement_count(),
            power = self.params.power,
            "interpolating"
        );
        map_ordered(queries, |&q| self.interpolate_at(q))
    }

    /// Distance/value pairs within reach of `query`, nearest first
    ///
    /// Sorting on both distance and value gives a canonical order, so the
    /// weighted sums do not depend on how the measurements were supplied.
    fn candidates(&self, query: &GeoPoint) -> Vec<(f64, f64)> {
        let max_distance = self.params.max_distance_m;

        let mut candidates: Vec<(f64, f64)> = self
            .measurements
            .iter()
            .map(|m| (haversine_m(query, &m.location()), m.value()))
            .filter(|&(d, _)| max_distance.map_or(true, |max| d <= max))
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        candidates
    }
}

/// Interpolates `measurements` at every query location
///
/// Convenience wrapper around [`SpatialInterpolator`].
pub fn interpolate(
    measurements: &[Measurement],
    queries: &[GeoPoint],
    params: &IdwParams,
) -> Result<Vec<InterpolationResult>> {
    SpatialInterpolator::new(measurements.to_vec(), *params)?.interpolate(queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn measurement(lat: f64, lon: f64, value: f64) -> Measurement {
        Measurement::new(geo(lat, lon), value)
    }

    fn stations() -> Vec<Measurement> {
        vec![
            measurement(47.5125, 7.5444, 9.1).with_source("BASEL-BINNINGEN"),
            measurement(46.9510, 7.4407, 12.4).with_source("BERN-BOLLWERK"),
            measurement(47.4029, 8.6129, 10.2).with_source("DÜBENDORF-EMPA"),
            measurement(46.5219, 6.6394, 11.7).with_source("LAUSANNE-CÉSAR-ROUX"),
            measurement(46.0114, 8.9571, 13.8).with_source("LUGANO-UNIVERSITA"),
            measurement(47.3776, 8.5304, 11.9).with_source("ZÜRICH-KASERNE"),
        ]
    }

    #[test]
    fn test_exact_match_returns_value() {
        let measurements = vec![measurement(46.0, 7.0, 10.0), measurement(46.5, 7.5, 20.0)];
        let result = interpolate(&measurements, &[geo(46.0, 7.0)], &IdwParams::default()).unwrap();

        assert_eq!(result[0].value, 10.0);
        assert!(result[0].is_exact());
        assert_eq!(result[0].nearest_distance_m, 0.0);
    }

    #[test]
    fn test_single_exact_measurement_independent_of_power() {
        let measurements = vec![measurement(47.05, 8.3, 17.25)];
        for power in [0.5, 1.0, 2.0, 3.0, 10.0] {
            let params = IdwParams::builder().power(power).build().unwrap();
            let result = interpolate(&measurements, &[geo(47.05, 8.3)], &params).unwrap();
            assert_eq!(result[0].value, 17.25);
        }
    }

    #[test]
    fn test_coincident_measurements_are_averaged() {
        let measurements = vec![
            measurement(46.2, 6.15, 8.0),
            measurement(46.2, 6.15, 12.0),
            measurement(46.3, 6.15, 100.0),
        ];
        let result = interpolate(&measurements, &[geo(46.2, 6.15)], &IdwParams::default()).unwrap();
        assert_eq!(result[0].value, 10.0);
        assert_eq!(result[0].neighbors, 2);
    }

    #[test]
    fn test_equidistant_points_average() {
        let measurements = vec![measurement(0.0, -1.0, 10.0), measurement(0.0, 1.0, 30.0)];
        let params = IdwParams::builder().max_neighbors(2).power(2.0).build().unwrap();
        let result = interpolate(&measurements, &[geo(0.0, 0.0)], &params).unwrap();

        assert!((result[0].value - 20.0).abs() < 1e-9);
        assert_eq!(result[0].neighbors, 2);
    }

    #[test]
    fn test_nan_values_are_skipped_and_k_exceeds_count() {
        let measurements = vec![
            measurement(0.0, 0.0, f64::NAN),
            measurement(0.1, 0.0, 40.0),
            measurement(0.2, 0.0, 80.0),
        ];
        let params = IdwParams::builder().max_neighbors(10).build().unwrap();
        let result = interpolate(&measurements, &[geo(0.00001, 0.0)], &params).unwrap();

        assert!(result[0].value >= 40.0 && result[0].value <= 80.0);
        assert_eq!(result[0].neighbors, 2);
    }

    #[test]
    fn test_all_nan_is_insufficient() {
        let measurements = vec![measurement(0.0, 0.0, f64::NAN), measurement(0.1, 0.1, f64::NAN)];
        let err = interpolate(&measurements, &[geo(0.0, 0.0)], &IdwParams::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_empty_measurements_fail() {
        let err = interpolate(&[], &[geo(46.9, 7.4)], &IdwParams::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_order_of_measurements_does_not_matter() {
        let queries = vec![geo(47.17, 8.51), geo(46.8, 9.8), geo(46.2, 7.36)];
        let params = IdwParams::builder().max_neighbors(4).build().unwrap();
        let expected = interpolate(&stations(), &queries, &params).unwrap();

        for shift in 0..stations().len() {
            let mut rotated = stations();
            rotated.rotate_left(shift);
            assert_eq!(interpolate(&rotated, &queries, &params).unwrap(), expected, "rotation {}", shift);

            rotated.reverse();
            assert_eq!(interpolate(&rotated, &queries, &params).unwrap(), expected, "reversed rotation {}", shift);
        }
    }

    #[test]
    fn test_large_power_stays_finite() {
        // about 70 km north and 73 km east of the query
        let measurements = vec![measurement(46.63, 7.0, 10.0), measurement(46.0, 7.95, 30.0)];

        for power in [80.0, 400.0, 5_000.0] {
            let params = IdwParams::builder().power(power).build().unwrap();
            let result = interpolate(&measurements, &[geo(46.0, 7.0)], &params).unwrap();

            assert!(result[0].value.is_finite(), "power {}", power);
            assert!(result[0].value >= 10.0 && result[0].value < 20.0, "power {}", power);
            assert!(result[0].weight_sum.unwrap().is_finite());
        }

        let params = IdwParams::builder().power(5_000.0).build().unwrap();
        let result = interpolate(&measurements, &[geo(46.0, 7.0)], &params).unwrap();
        assert!((result[0].value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_next_to_measurement() {
        let measurements = vec![measurement(46.5, 7.5, 10.0), measurement(46.6, 7.5, 50.0)];
        // about 0.1 mm from the first measurement
        let result = interpolate(&measurements, &[geo(46.500000001, 7.5)], &IdwParams::default()).unwrap();

        assert!(!result[0].is_exact());
        assert!(result[0].nearest_distance_m > 0.0 && result[0].nearest_distance_m < 1e-3);
        assert!((result[0].value - 10.0).abs() < 1e-9);
        assert_eq!(result[0].neighbors, 2);
    }

    #[test]
    fn test_coincident_measurements_bypass_neighbor_limit() {
        let measurements = vec![
            measurement(46.2, 6.15, 12.0),
            measurement(46.2, 6.15, 8.0),
            measurement(46.21, 6.15, 100.0),
        ];
        let params = IdwParams::builder().max_neighbors(1).build().unwrap();
        let result = interpolate(&measurements, &[geo(46.2, 6.15)], &params).unwrap();

        assert_eq!(result[0].value, 10.0);
        assert_eq!(result[0].neighbors, 2);
        assert!(result[0].is_exact());
    }

    #[test]
    fn test_zero_max_distance_without_coincident_point() {
        let params = IdwParams::builder().max_distance_m(0.0).build().unwrap();
        let err = interpolate(&stations(), &[geo(47.17, 8.51)], &params).unwrap_err();

        match err {
            Error::Batch { index, source } => {
                assert_eq!(index, 0);
                assert!(matches!(*source, Error::InsufficientData(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_zero_max_distance_with_coincident_point() {
        let params = IdwParams::builder().max_distance_m(0.0).build().unwrap();
        let result = interpolate(&stations(), &[geo(46.5219, 6.6394)], &params).unwrap();
        assert_eq!(result[0].value, 11.7);
    }

    #[test]
    fn test_max_distance_excludes_far_points() {
        // roughly 11.1 km and 22.2 km north of the query
        let measurements = vec![measurement(46.6, 7.5, 5.0), measurement(46.7, 7.5, 50.0)];
        let params = IdwParams::builder().max_distance_m(15_000.0).build().unwrap();
        let result = interpolate(&measurements, &[geo(46.5, 7.5)], &params).unwrap();

        assert!((result[0].value - 5.0).abs() < 1e-12);
        assert_eq!(result[0].neighbors, 1);
    }

    #[test]
    fn test_max_neighbors_keeps_nearest() {
        let params = IdwParams::builder().max_neighbors(1).build().unwrap();
        // next to Zürich-Kaserne
        let result = interpolate(&stations(), &[geo(47.38, 8.53)], &params).unwrap();

        assert!((result[0].value - 11.9).abs() < 1e-12);
        assert_eq!(result[0].neighbors, 1);
        assert!(result[0].weight_sum.is_some());
    }

    #[test]
    fn test_estimate_within_value_range() {
        let result = interpolate(&stations(), &[geo(47.17, 8.51)], &IdwParams::default()).unwrap();
        let value = result[0].value;
        assert!((9.1..=13.8).contains(&value));
        // Steinhausen sits closest to the Zürich stations
        assert!((value - 11.0).abs() < 1.5);
    }

    #[test]
    fn test_higher_power_favours_nearest() {
        let measurements = vec![measurement(46.6, 7.5, 0.0), measurement(46.8, 7.5, 100.0)];
        let query = [geo(46.65, 7.5)];

        let low = interpolate(&measurements, &query, &IdwParams::builder().power(1.0).build().unwrap()).unwrap();
        let high = interpolate(&measurements, &query, &IdwParams::builder().power(4.0).build().unwrap()).unwrap();

        assert!(high[0].value < low[0].value);
    }

    #[test]
    fn test_results_follow_query_order() {
        let interpolator = SpatialInterpolator::new(stations(), IdwParams::default()).unwrap();
        let queries = vec![geo(46.0114, 8.9571), geo(47.5125, 7.5444), geo(46.9510, 7.4407)];
        let results = interpolator.interpolate(&queries).unwrap();

        let values: Vec<f64> = results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![13.8, 9.1, 12.4]);
        for (query, result) in queries.iter().zip(&results) {
            assert_eq!(result.query, *query);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = IdwParams { power: -1.0, ..Default::default() };
        let err = SpatialInterpolator::new(stations(), params).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_interpolator_drops_unusable_measurements() {
        let mut measurements = stations();
        measurements.push(measurement(46.8, 9.8, f64::NAN));
        let interpolator = SpatialInterpolator::new(measurements, IdwParams::default()).unwrap();
        assert_eq!(interpolator.measurement_count(), 6);
    }
}
