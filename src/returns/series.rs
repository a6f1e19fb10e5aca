//! Price and return series plus the price → log-return transform.
//!
//! Purpose
//! -------
//! Turn a chronological closing-price series into scaled log-returns
//! `r_t = scale · ln(p_t / p_{t−1})`, validated once so that every model
//! downstream can assume a finite sample of adequate length.
//!
//! Key behaviors
//! -------------
//! - [`ReturnsProcessor::compute`] rejects the first non-positive or
//!   non-finite price with its index, drops the undefined first return and
//!   enforces the configured minimum length.
//! - [`ReturnSeries::new`] applies the same length and finiteness rules to
//!   returns computed elsewhere.
//! - [`ReturnSeries`] exposes the sample moments used as optimizer seeds.
//!
//! Conventions
//! -----------
//! - `scale = 100` yields percent returns. Daily crypto variances are then
//!   of order 1–10, which keeps the GARCH likelihood surface well
//!   conditioned for L-BFGS; with raw fractions `omega` sits near 1e-5.
//! - Moments are population moments (divide by `n`).
use crate::errors::{RiskError, RiskResult};
use ndarray::{Array1, ArrayView1, Zip, s};

/// Default return scale (percent returns).
pub const DEFAULT_SCALE: f64 = 100.0;

/// Default minimum number of returns.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 30;

/// Chronological closing prices. Validation happens in
/// [`ReturnsProcessor::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    prices: Array1<f64>,
}

impl PriceSeries {
    pub fn new(prices: Array1<f64>) -> Self {
        Self { prices }
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.prices.view()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self::new(Array1::from(prices))
    }
}

/// Finite, scaled log-returns of validated length.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    values: Array1<f64>,
    scale: f64,
}

impl ReturnSeries {
    /// Wrap pre-computed scaled returns.
    ///
    /// # Errors
    /// - [`RiskError::InvalidParameter`] for a bad `scale` or
    ///   `min_observations < 2`.
    /// - [`RiskError::InsufficientData`] when `values.len() < min_observations`.
    /// - [`RiskError::Numerical`] for a non-finite return.
    pub fn new(values: Array1<f64>, scale: f64, min_observations: usize) -> RiskResult<Self> {
        validate_scale(scale)?;
        validate_min_observations(min_observations)?;
        if values.len() < min_observations {
            return Err(RiskError::InsufficientData {
                required: min_observations,
                actual: values.len(),
                context: "return series",
            });
        }
        if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
            return Err(RiskError::Numerical { context: "return", value });
        }
        Ok(Self { values, scale })
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent return `r_T`.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn mean(&self) -> f64 {
        self.values.mean().unwrap_or(f64::NAN)
    }

    /// Population variance `Σ (r − mean)² / n`.
    pub fn variance(&self) -> f64 {
        self.central_moment(2)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Population excess kurtosis `m₄ / m₂² − 3`; NaN for a constant series.
    pub fn excess_kurtosis(&self) -> f64 {
        let m2 = self.variance();
        if m2 <= 0.0 {
            return f64::NAN;
        }
        self.central_moment(4) / (m2 * m2) - 3.0
    }

    // ---- Helper methods ----

    fn central_moment(&self, order: i32) -> f64 {
        let mean = self.mean();
        self.values.mapv(|r| (r - mean).powi(order)).mean().unwrap_or(f64::NAN)
    }
}

/// Converts prices into a [`ReturnSeries`].
///
/// Default: `scale = 100`, `min_observations = 30`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnsProcessor {
    scale: f64,
    min_observations: usize,
}

impl ReturnsProcessor {
    /// # Errors
    /// [`RiskError::InvalidParameter`] unless `scale` is finite and `> 0`
    /// and `min_observations ≥ 2`.
    pub fn new(scale: f64, min_observations: usize) -> RiskResult<Self> {
        validate_scale(scale)?;
        validate_min_observations(min_observations)?;
        Ok(Self { scale, min_observations })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn min_observations(&self) -> usize {
        self.min_observations
    }

    /// `scale · ln(p_t / p_{t−1})` for `t = 1..n`.
    ///
    /// # Errors
    /// - [`RiskError::InvalidPrice`] at the first non-positive or
    ///   non-finite price.
    /// - [`RiskError::InsufficientData`] when fewer than `min_observations`
    ///   returns remain.
    pub fn compute(&self, prices: &PriceSeries) -> RiskResult<ReturnSeries> {
        let values = prices.values();
        if let Some((index, &value)) =
            values.iter().enumerate().find(|(_, p)| !(p.is_finite() && **p > 0.0))
        {
            return Err(RiskError::InvalidPrice { index, value });
        }
        let n_returns = values.len().saturating_sub(1);
        if n_returns < self.min_observations {
            return Err(RiskError::InsufficientData {
                required: self.min_observations,
                actual: n_returns,
                context: "price series returns",
            });
        }
        let mut returns = Array1::<f64>::zeros(n_returns);
        Zip::from(&mut returns)
            .and(values.slice(s![1..]))
            .and(values.slice(s![..-1]))
            .for_each(|r, &p, &p_prev| *r = self.scale * (p / p_prev).ln());
        ReturnSeries::new(returns, self.scale, self.min_observations)
    }
}

impl Default for ReturnsProcessor {
    fn default() -> Self {
        Self { scale: DEFAULT_SCALE, min_observations: DEFAULT_MIN_OBSERVATIONS }
    }
}

// ---- Helper methods ----

fn validate_scale(scale: f64) -> RiskResult<()> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "scale",
            value: scale,
            reason: "return scale must be finite and > 0",
        });
    }
    Ok(())
}

fn validate_min_observations(min_observations: usize) -> RiskResult<()> {
    if min_observations < 2 {
        return Err(RiskError::InvalidParameter {
            name: "min_observations",
            value: min_observations as f64,
            reason: "at least two returns are needed for a variance",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The scaled log-return transform and its length.
    // - Rejection of invalid prices, short samples and bad configuration.
    // - Sample moments on a small hand-checked series.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Returns are `scale · ln(p_t/p_{t−1})`, one fewer than prices.
    //
    // Given
    // -----
    // - Prices (100, 110, 99, 99) with scale 100 and minimum 2.
    //
    // Expect
    // ------
    // - Three returns matching the formula, the last exactly zero.
    fn compute_produces_scaled_log_returns() {
        // Arrange
        let processor = ReturnsProcessor::new(100.0, 2).unwrap();
        let prices = PriceSeries::from(vec![100.0, 110.0, 99.0, 99.0]);

        // Act
        let returns = processor.compute(&prices).unwrap();

        // Assert
        assert_eq!(returns.len(), 3);
        assert_relative_eq!(returns.values()[0], 100.0 * (1.1_f64).ln(), epsilon = 1e-12);
        assert_relative_eq!(returns.values()[1], 100.0 * (0.9_f64).ln(), epsilon = 1e-12);
        assert_eq!(returns.last(), Some(0.0));
        assert_relative_eq!(returns.scale(), 100.0);
    }

    #[test]
    // Purpose
    // -------
    // The first invalid price is reported with its index.
    //
    // Given
    // -----
    // - A zero at index 2 and a NaN at index 4.
    //
    // Expect
    // ------
    // - `InvalidPrice { index: 2, value: 0.0 }`.
    fn compute_rejects_non_positive_prices() {
        // Arrange
        let processor = ReturnsProcessor::new(100.0, 2).unwrap();
        let prices = PriceSeries::from(vec![1.0, 2.0, 0.0, 3.0, f64::NAN]);

        // Act
        let err = processor.compute(&prices);

        // Assert
        assert_eq!(err, Err(RiskError::InvalidPrice { index: 2, value: 0.0 }));
    }

    #[test]
    // Purpose
    // -------
    // Too few returns after dropping the first observation is an error.
    //
    // Given
    // -----
    // - 30 prices (29 returns) with the default minimum of 30.
    //
    // Expect
    // ------
    // - `InsufficientData { required: 30, actual: 29, .. }`.
    fn compute_enforces_minimum_length() {
        // Arrange
        let prices = PriceSeries::new(Array1::linspace(100.0, 129.0, 30));

        // Act
        let err = ReturnsProcessor::default().compute(&prices);

        // Assert
        assert!(matches!(
            err,
            Err(RiskError::InsufficientData { required: 30, actual: 29, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Configuration and pre-computed returns are validated.
    //
    // Given
    // -----
    // - scale 0, min_observations 1 and a return series containing inf.
    //
    // Expect
    // ------
    // - Two `InvalidParameter`s and one `Numerical`.
    fn invalid_configuration_and_returns_are_rejected() {
        // Act
        let bad_scale = ReturnsProcessor::new(0.0, 30);
        let bad_min = ReturnsProcessor::new(100.0, 1);
        let bad_returns = ReturnSeries::new(array![0.1, f64::INFINITY, 0.2], 100.0, 2);

        // Assert
        assert!(matches!(bad_scale, Err(RiskError::InvalidParameter { name: "scale", .. })));
        assert!(matches!(
            bad_min,
            Err(RiskError::InvalidParameter { name: "min_observations", .. })
        ));
        assert!(matches!(bad_returns, Err(RiskError::Numerical { context: "return", .. })));
    }

    #[test]
    // Purpose
    // -------
    // Sample moments use population normalization.
    //
    // Given
    // -----
    // - Returns (−2, −1, 0, 1, 2).
    //
    // Expect
    // ------
    // - mean 0, variance 2, excess kurtosis 6.8/4 − 3 = −1.3.
    fn moments_use_population_normalization() {
        // Arrange
        let returns = ReturnSeries::new(array![-2.0, -1.0, 0.0, 1.0, 2.0], 100.0, 2).unwrap();

        // Act + Assert
        assert_relative_eq!(returns.mean(), 0.0);
        assert_relative_eq!(returns.variance(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(returns.excess_kurtosis(), 6.8 / 4.0 - 3.0, epsilon = 1e-12);
    }
}
