//! Empirical expected shortfall.
//!
//! Given a VaR threshold `v` (a positive loss in return units), the
//! shortfall is the average loss on the returns at or beyond it:
//! `ES = −mean{ r : r ≤ −v }`. Because every averaged return is `≤ −v`,
//! `ES ≥ v` whenever the tail is non-empty.
use crate::errors::{RiskError, RiskResult};
use ndarray::ArrayView1;

/// `−mean(r ≤ −var_threshold)` in the units of `returns`.
///
/// # Errors
/// - [`RiskError::Numerical`] for a non-finite threshold.
/// - [`RiskError::EmptyTail`] when no return reaches the threshold.
pub fn expected_shortfall(returns: ArrayView1<f64>, var_threshold: f64) -> RiskResult<f64> {
    if !var_threshold.is_finite() {
        return Err(RiskError::Numerical { context: "VaR threshold", value: var_threshold });
    }
    let cutoff = -var_threshold;
    let (sum, count) = returns
        .iter()
        .filter(|&&r| r <= cutoff)
        .fold((0.0, 0_usize), |(sum, count), &r| (sum + r, count + 1));
    if count == 0 {
        return Err(RiskError::EmptyTail { threshold: var_threshold });
    }
    Ok(-sum / count as f64)
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
    // - The tail mean on a hand-checked sample, including a return exactly at
    //   the threshold.
    // - The empty-tail and non-finite-threshold errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // ES averages every loss at or beyond the threshold.
    //
    // Given
    // -----
    // - Returns (−4, −2, −1, 0.5, 3) and threshold 2.
    //
    // Expect
    // ------
    // - ES = 3 (mean of −4 and −2, negated), and ES ≥ threshold.
    fn shortfall_averages_tail_losses() {
        // Arrange
        let returns = array![-4.0, -2.0, -1.0, 0.5, 3.0];

        // Act
        let es = expected_shortfall(returns.view(), 2.0).unwrap();

        // Assert
        assert_relative_eq!(es, 3.0);
        assert!(es >= 2.0);
    }

    #[test]
    // Purpose
    // -------
    // An empty tail or a NaN threshold is an error, not a zero.
    //
    // Given
    // -----
    // - Returns all above −10; threshold 10 and NaN.
    //
    // Expect
    // ------
    // - `EmptyTail { threshold: 10 }` and `Numerical`.
    fn empty_tail_and_nan_threshold_are_errors() {
        // Arrange
        let returns = array![-1.0, 0.0, 1.0];

        // Act
        let empty = expected_shortfall(returns.view(), 10.0);
        let nan = expected_shortfall(returns.view(), f64::NAN);

        // Assert
        assert_eq!(empty, Err(RiskError::EmptyTail { threshold: 10.0 }));
        assert!(matches!(nan, Err(RiskError::Numerical { .. })));
    }
}
