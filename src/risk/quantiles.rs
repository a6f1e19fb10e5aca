//! Quantile multipliers and empirical quantiles.
//!
//! A VaR multiplier is the negated lower-tail quantile of a standardized
//! law at the risk level, so a 1% normal VaR scales volatility by ≈ 2.326.
//! The Student-t multiplier uses the standard t (location 0, scale 1) at the
//! **fitted** degrees of freedom; location and scale of the fit are not
//! used here.
//!
//! The risk level is a lower-tail probability in `(0, 0.5)`. At or above
//! one half the quantile is no longer a loss and the parametric and
//! historical figures stop being comparable, so such levels are refused.
use crate::errors::{RiskError, RiskResult};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Standardized law behind a quantile multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TailModel {
    Normal,
    StudentT { dof: f64 },
}

/// `−F⁻¹(risk_level)` for the standard normal or standard Student-t.
///
/// Positive and strictly decreasing in `risk_level`.
///
/// # Errors
/// [`RiskError::InvalidParameter`] for `risk_level ∉ (0, 0.5)` or a `dof`
/// that is not finite and positive.
pub fn quantile_multiplier(model: TailModel, risk_level: f64) -> RiskResult<f64> {
    validate_risk_level(risk_level)?;
    let quantile = match model {
        TailModel::Normal => Normal::new(0.0, 1.0)?.inverse_cdf(risk_level),
        TailModel::StudentT { dof } => {
            if !(dof.is_finite() && dof > 0.0) {
                return Err(RiskError::InvalidParameter {
                    name: "dof",
                    value: dof,
                    reason: "degrees of freedom must be finite and > 0",
                });
            }
            StudentsT::new(0.0, 1.0, dof)?.inverse_cdf(risk_level)
        }
    };
    if !quantile.is_finite() {
        return Err(RiskError::Numerical { context: "quantile", value: quantile });
    }
    Ok(-quantile)
}

/// `risk_level` must lie strictly inside `(0, 0.5)`.
pub fn validate_risk_level(risk_level: f64) -> RiskResult<()> {
    if !(risk_level > 0.0 && risk_level < 0.5) {
        return Err(RiskError::InvalidParameter {
            name: "risk_level",
            value: risk_level,
            reason: "risk level is a lower-tail probability in (0, 0.5)",
        });
    }
    Ok(())
}

/// Linearly interpolated quantile of an ascending slice at position
/// `(n − 1)·p`. Returns NaN for an empty slice.
pub fn empirical_quantile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = (n - 1) as f64 * p;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Multipliers against tabulated normal and t quantiles.
    // - Monotonicity in the risk level and the t ≥ normal ordering.
    // - Parameter validation and empirical interpolation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Multipliers match standard tables.
    //
    // Given
    // -----
    // - risk_level = 0.01; normal and t(5).
    //
    // Expect
    // ------
    // - 2.32635 and 3.36493 to 1e-4.
    fn multipliers_match_tables() {
        // Act
        let z = quantile_multiplier(TailModel::Normal, 0.01).unwrap();
        let t = quantile_multiplier(TailModel::StudentT { dof: 5.0 }, 0.01).unwrap();

        // Assert
        assert_relative_eq!(z, 2.326_348, epsilon = 1e-4);
        assert_relative_eq!(t, 3.364_930, epsilon = 1e-4);
    }

    #[test]
    // Purpose
    // -------
    // Multipliers shrink as the risk level grows, and fat tails widen them.
    //
    // Given
    // -----
    // - A grid of risk levels in (0, 0.5) and dof = 4.
    //
    // Expect
    // ------
    // - Strictly decreasing sequences; t multiplier above normal at every
    //   level.
    fn multipliers_decrease_with_risk_level() {
        // Arrange
        let levels = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.4];

        // Act
        let normal: Vec<f64> =
            levels.iter().map(|&p| quantile_multiplier(TailModel::Normal, p).unwrap()).collect();
        let student: Vec<f64> = levels
            .iter()
            .map(|&p| quantile_multiplier(TailModel::StudentT { dof: 4.0 }, p).unwrap())
            .collect();

        // Assert
        assert!(normal.windows(2).all(|w| w[1] < w[0]));
        assert!(student.windows(2).all(|w| w[1] < w[0]));
        assert!(normal.iter().zip(&student).all(|(z, t)| t > z));
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain inputs are rejected.
    //
    // Given
    // -----
    // - risk levels 0, 0.5, 0.7, 1, NaN and dof = 0.
    //
    // Expect
    // ------
    // - `InvalidParameter` naming the input; levels at or above one half are
    //   refused rather than turned into negative multipliers.
    fn invalid_inputs_are_rejected() {
        // Act + Assert
        for p in [0.0, 0.5, 0.7, 1.0, f64::NAN] {
            assert!(matches!(
                quantile_multiplier(TailModel::Normal, p),
                Err(RiskError::InvalidParameter { name: "risk_level", .. })
            ));
        }
        assert!(matches!(
            quantile_multiplier(TailModel::StudentT { dof: 4.0 }, 0.7),
            Err(RiskError::InvalidParameter { name: "risk_level", .. })
        ));
        assert!(matches!(
            quantile_multiplier(TailModel::StudentT { dof: 0.0 }, 0.05),
            Err(RiskError::InvalidParameter { name: "dof", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Empirical quantiles interpolate between order statistics.
    //
    // Given
    // -----
    // - Sorted (1, 2, 3, 4, 5).
    //
    // Expect
    // ------
    // - p = 0.1 → 1.4, p = 0.5 → 3, p = 1 → 5.
    fn empirical_quantile_interpolates_linearly() {
        // Arrange
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];

        // Act + Assert
        assert_relative_eq!(empirical_quantile(&sorted, 0.1), 1.4, epsilon = 1e-12);
        assert_relative_eq!(empirical_quantile(&sorted, 0.5), 3.0);
        assert_relative_eq!(empirical_quantile(&sorted, 1.0), 5.0);
        assert!(empirical_quantile(&[], 0.5).is_nan());
    }
}
