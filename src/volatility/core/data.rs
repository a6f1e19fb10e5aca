//! Estimation payload for the GARCH likelihood.
use crate::{
    returns::ReturnSeries,
    volatility::errors::{GarchError, GarchResult},
};
use ndarray::Array1;

/// Returns plus the pre-sample variance that seeds the recursion.
///
/// `backcast` is the population sample variance of `returns`; it is used as
/// `h_0` and does not depend on the parameters, so its derivative in the
/// score recursion is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchData {
    pub returns: Array1<f64>,
    pub backcast: f64,
}

impl GarchData {
    /// # Errors
    /// [`GarchError::DegenerateVariance`] when the sample variance is zero or
    /// non-finite (a constant series has no volatility to model).
    pub fn new(series: &ReturnSeries) -> GarchResult<Self> {
        let backcast = series.variance();
        if !(backcast.is_finite() && backcast > 0.0) {
            return Err(GarchError::DegenerateVariance { value: backcast });
        }
        Ok(Self { returns: series.values().to_owned(), backcast })
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
