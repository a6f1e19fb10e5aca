//! Historical-simulation VaR over trailing windows.
//!
//! For every full trailing window of `window` returns the VaR is the
//! negated empirical `risk_level` quantile, giving `n − window + 1` values
//! in chronological order. Values are in the units of the input returns.
use crate::{
    errors::{RiskError, RiskResult},
    risk::quantiles::{empirical_quantile, validate_risk_level},
};
use ndarray::{Array1, ArrayView1};

/// Rolling historical VaR series.
///
/// # Errors
/// - [`RiskError::InvalidParameter`] for `window == 0` or an invalid
///   `risk_level`.
/// - [`RiskError::InsufficientData`] when `window > returns.len()`.
pub fn historical_var(
    returns: ArrayView1<f64>, window: usize, risk_level: f64,
) -> RiskResult<Array1<f64>> {
    validate_risk_level(risk_level)?;
    validate_window(window)?;
    if window > returns.len() {
        return Err(RiskError::InsufficientData {
            required: window,
            actual: returns.len(),
            context: "historical simulation window",
        });
    }
    let mut buffer = Vec::with_capacity(window);
    Ok(returns
        .windows(window)
        .into_iter()
        .map(|w| {
            buffer.clear();
            buffer.extend(w.iter().copied());
            buffer.sort_unstable_by(f64::total_cmp);
            -empirical_quantile(&buffer, risk_level)
        })
        .collect())
}

/// Mean of a rolling VaR series.
///
/// # Errors
/// [`RiskError::Numerical`] for an empty or non-finite series.
pub fn mean_var(series: ArrayView1<f64>) -> RiskResult<f64> {
    match series.mean() {
        Some(mean) if mean.is_finite() => Ok(mean),
        other => Err(RiskError::Numerical {
            context: "mean historical VaR",
            value: other.unwrap_or(f64::NAN),
        }),
    }
}

pub fn validate_window(window: usize) -> RiskResult<()> {
    if window == 0 {
        return Err(RiskError::InvalidParameter {
            name: "historical_window",
            value: 0.0,
            reason: "historical window must be at least 1",
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
    // - Series length and values on a small hand-checked sample.
    // - Window edge cases: equal to the sample, zero, longer than the sample.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Each element is the negated interpolated quantile of its window.
    //
    // Given
    // -----
    // - Returns (−3, 1, −1, 2, 0), window 3, risk level 0.25.
    //
    // Expect
    // ------
    // - Quantiles at position 0.5 of each sorted window, (−2, 0, −0.5),
    //   negated: (2, 0, 0.5).
    fn rolling_quantiles_match_hand_computation() {
        // Arrange
        let returns = array![-3.0, 1.0, -1.0, 2.0, 0.0];

        // Act
        let var = historical_var(returns.view(), 3, 0.25).unwrap();

        // Assert
        assert_eq!(var.len(), 3);
        assert_relative_eq!(var[0], 2.0);
        assert_relative_eq!(var[1], 0.0);
        assert_relative_eq!(var[2], 0.5);
    }

    #[test]
    // Purpose
    // -------
    // A window equal to the sample length yields exactly one value.
    //
    // Given
    // -----
    // - 5 returns, window 5, risk level 0.25.
    //
    // Expect
    // ------
    // - One value, the negated 25% quantile (position 1 → −2).
    fn window_equal_to_length_yields_single_value() {
        // Arrange
        let returns = array![4.0, -2.0, 0.5, -5.0, 1.0];

        // Act
        let var = historical_var(returns.view(), 5, 0.25).unwrap();

        // Assert
        assert_eq!(var.len(), 1);
        assert_relative_eq!(var[0], 2.0);
        assert_relative_eq!(mean_var(var.view()).unwrap(), 2.0);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate windows fail with the right category.
    //
    // Given
    // -----
    // - window 0 and window 6 on 5 returns.
    //
    // Expect
    // ------
    // - `InvalidParameter` and `InsufficientData { required: 6, actual: 5 }`.
    fn degenerate_windows_are_rejected() {
        // Arrange
        let returns = array![1.0, 2.0, 3.0, 4.0, 5.0];

        // Act
        let zero = historical_var(returns.view(), 0, 0.05);
        let long = historical_var(returns.view(), 6, 0.05);

        // Assert
        assert!(matches!(zero, Err(RiskError::InvalidParameter { name: "historical_window", .. })));
        assert!(matches!(long, Err(RiskError::InsufficientData { required: 6, actual: 5, .. })));
    }
}
