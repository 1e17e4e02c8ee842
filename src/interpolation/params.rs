use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters for inverse-distance-weighted interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdwParams {
    /// Distance exponent (default: 2.0). Higher values favour nearby points.
    pub power: f64,
    /// Maximum number of nearest measurements to use.
    /// `None` means every measurement within range contributes.
    pub max_neighbors: Option<usize>,
    /// Search radius in metres, inclusive. `None` means unbounded.
    pub max_distance_m: Option<f64>,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            max_neighbors: None,
            max_distance_m: None,
        }
    }
}

impl IdwParams {
    pub fn builder() -> IdwParamsBuilder {
        IdwParamsBuilder::new()
    }

    /// Checks that the parameters describe a usable interpolation
    pub fn validate(&self) -> Result<()> {
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "power must be a positive number, got {}",
                self.power
            )));
        }

        if let Some(max_distance) = self.max_distance_m {
            if max_distance.is_nan() || max_distance < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "max_distance_m must not be negative, got {}",
                    max_distance
                )));
            }
        }

        if self.max_neighbors == Some(0) {
            return Err(Error::InvalidConfiguration(
                "max_neighbors must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`IdwParams`]
#[derive(Debug, Default)]
pub struct IdwParamsBuilder {
    params: IdwParams,
}

impl IdwParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distance exponent
    pub fn power(mut self, power: f64) -> Self {
        self.params.power = power;
        self
    }

    /// Limits interpolation to the `k` nearest measurements
    pub fn max_neighbors(mut self, k: usize) -> Self {
        self.params.max_neighbors = Some(k);
        self
    }

    /// Ignores measurements farther than `metres` from the query
    pub fn max_distance_m(mut self, metres: f64) -> Self {
        self.params.max_distance_m = Some(metres);
        self
    }

    /// Validates and returns the parameters
    pub fn build(self) -> Result<IdwParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = IdwParams::default();
        assert_eq!(params.power, 2.0);
        assert_eq!(params.max_neighbors, None);
        assert_eq!(params.max_distance_m, None);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = IdwParams::builder()
            .power(3.0)
            .max_neighbors(4)
            .max_distance_m(25_000.0)
            .build()
            .unwrap();

        assert_eq!(params.power, 3.0);
        assert_eq!(params.max_neighbors, Some(4));
        assert_eq!(params.max_distance_m, Some(25_000.0));
    }

    #[test]
    fn test_zero_max_distance_is_valid() {
        assert!(IdwParams::builder().max_distance_m(0.0).build().is_ok());
    }

    #[rstest]
    #[case(IdwParams { power: 0.0, ..Default::default() })]
    #[case(IdwParams { power: -2.0, ..Default::default() })]
    #[case(IdwParams { power: f64::NAN, ..Default::default() })]
    #[case(IdwParams { power: f64::INFINITY, ..Default::default() })]
    #[case(IdwParams { max_distance_m: Some(-1.0), ..Default::default() })]
    #[case(IdwParams { max_distance_m: Some(f64::NAN), ..Default::default() })]
    #[case(IdwParams { max_neighbors: Some(0), ..Default::default() })]
    fn test_invalid_params(#[case] params: IdwParams) {
        assert!(matches!(params.validate(), Err(Error::InvalidConfiguration(_))));
    }
}
