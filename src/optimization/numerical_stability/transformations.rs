//! Numerical stability utilities.
//!
//! Guarded versions of the nonlinear maps used to move GARCH and Student-t
//! parameters between the unconstrained optimizer space and model space.
//! Each transform keeps `f64` arithmetic in a well-conditioned regime with
//! explicit cutoffs (`x > 20.0`) or max-shifts instead of relying on naïve
//! `exp`/`ln` compositions.
//!
//! # Provided items
//! - [`STATIONARITY_MARGIN`]: buffer keeping `alpha + beta` strictly below one.
//! - [`LOGIT_EPS`]: floor applied to simplex weights before taking logs.
//! - [`EIGEN_EPS`]: eigenvalue cutoff for pseudo-inverse covariance solves.
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞).
//! - [`safe_logistic`]: derivative of softplus, ℝ → (0, 1).
//! - [`safe_softmax`] / [`safe_softmax_deriv`]: logits ↔ scaled simplex with
//!   an implicit slack component, plus its Jacobian-vector product.
use ndarray::{ArrayView1, ArrayViewMut1, Zip};

/// Safety margin for strict stationarity of the variance recursion.
///
/// GARCH(1,1) requires `alpha + beta < 1`. The simplex mapping reserves this
/// buffer so that `alpha + beta + slack = 1 - STATIONARITY_MARGIN` and every
/// optimizer iterate stays inside the stationary region.
pub const STATIONARITY_MARGIN: f64 = 1e-6;

/// Smallest simplex weight allowed before converting to log-odds.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalues at or below this threshold are treated as zero when forming
/// pseudo-inverses of an information matrix.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20` the correction term `ln1p(exp(-x))` is below `f64`
/// resolution relative to `x`, so `x` is returned directly.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: `t = ln(exp(x) - 1)`.
///
/// Uses `ln(expm1(x))` below the cutoff and the identity branch above it,
/// mirroring [`safe_softplus`]. `x` must be finite and `> 0`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `1 / (1 + exp(-x))`.
///
/// This is the derivative of [`safe_softplus`] and is used to push
/// model-space gradients for softplus-mapped parameters back to θ-space.
/// The branch on the sign of `x` keeps `exp` from overflowing.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Scaled softmax with an implicit zero-logit slack component.
///
/// Writes `weights[k] = M · exp(logits[k]) / (1 + Σ_j exp(logits[j]))` and
/// returns the slack `M / (1 + Σ_j exp(logits[j]))`, where
/// `M = 1 - STATIONARITY_MARGIN`. The computation is max-shifted (the slack
/// logit `0` included in the maximum) so no term overflows.
///
/// Invariant: `Σ weights + slack = M` and every component is `≥ 0`.
///
/// `weights` and `logits` must have the same length.
pub fn safe_softmax(mut weights: ArrayViewMut1<f64>, logits: ArrayView1<f64>) -> f64 {
    let shift = logits.iter().fold(0.0_f64, |acc, &x| acc.max(x));
    let baseline = (-shift).exp();
    Zip::from(&mut weights).and(&logits).for_each(|w, &x| *w = (x - shift).exp());
    let denom = baseline + weights.sum();
    let mass = 1.0 - STATIONARITY_MARGIN;
    weights.mapv_inplace(|w| mass * w / denom);
    mass * baseline / denom
}

/// Jacobian-vector product for [`safe_softmax`].
///
/// On entry `grad[k]` holds `∂ℓ/∂c_k` for the simplex weights `c = weights`;
/// on exit it holds `∂ℓ/∂θ_k` for the logits, using
/// `∂ℓ/∂θ_j = c_j · (g_j − Σ_k c_k g_k / M)`.
pub fn safe_softmax_deriv(weights: ArrayView1<f64>, mut grad: ArrayViewMut1<f64>) {
    let mass = 1.0 - STATIONARITY_MARGIN;
    let weighted = weights.dot(&grad) / mass;
    Zip::from(&mut grad).and(&weights).for_each(|g, &c| *g = c * (*g - weighted));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the guarded transforms with naïve formulas on safe inputs.
    // - Mass conservation and non-negativity of the scaled softmax.
    // - The softmax Jacobian-vector product against central differences.
    //
    // They intentionally DO NOT cover:
    // - How models use these maps (see volatility and tails parameter tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus and its inverse round-trip across both sides of the cutoff.
    //
    // Given
    // -----
    // - Inputs below and above the `x > 20` branch.
    //
    // Expect
    // ------
    // - `safe_softplus_inv(safe_softplus(x)) ≈ x`.
    fn softplus_inverse_recovers_input_on_both_branches() {
        for &x in &[-5.0, -0.3, 0.0, 1.7, 12.0, 35.0] {
            // Act
            let back = safe_softplus_inv(safe_softplus(x));

            // Assert
            assert_relative_eq!(back, x, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // The logistic helper matches the textbook form and stays finite in the tails.
    //
    // Given
    // -----
    // - Moderate and extreme arguments.
    //
    // Expect
    // ------
    // - Agreement with `1/(1+exp(-x))` for moderate x; values in [0, 1] at ±800.
    fn logistic_matches_naive_form_and_saturates() {
        // Assert
        for &x in &[-3.0, 0.0, 2.5] {
            assert_relative_eq!(safe_logistic(x), 1.0 / (1.0 + (-x).exp()), epsilon = 1e-15);
        }
        assert_eq!(safe_logistic(800.0), 1.0);
        assert!(safe_logistic(-800.0) >= 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The scaled softmax conserves mass and keeps every component non-negative,
    // even for logits that would overflow a naïve implementation.
    //
    // Given
    // -----
    // - Logits containing a very large positive value.
    //
    // Expect
    // ------
    // - `Σ weights + slack = 1 − STATIONARITY_MARGIN`, all components ≥ 0.
    fn softmax_conserves_mass_for_extreme_logits() {
        // Arrange
        let logits = array![900.0, -2.0];
        let mut weights = Array1::zeros(2);

        // Act
        let slack = safe_softmax(weights.view_mut(), logits.view());

        // Assert
        assert!(weights.iter().all(|&w| w >= 0.0) && slack >= 0.0);
        assert_relative_eq!(weights.sum() + slack, 1.0 - STATIONARITY_MARGIN, epsilon = 1e-12);
        assert!(weights[0] > 0.99);
    }

    #[test]
    // Purpose
    // -------
    // `safe_softmax_deriv` agrees with a central-difference chain rule.
    //
    // Given
    // -----
    // - A linear functional ℓ(c) = gᵀc composed with the softmax.
    //
    // Expect
    // ------
    // - Analytic θ-gradient ≈ numerical derivative of ℓ(softmax(θ)).
    fn softmax_deriv_matches_central_differences() {
        // Arrange
        let theta = array![-1.2, 2.3];
        let g = array![0.7, -1.9];
        let objective = |t: &Array1<f64>| {
            let mut w = Array1::zeros(2);
            safe_softmax(w.view_mut(), t.view());
            w.dot(&g)
        };
        let mut weights = Array1::zeros(2);
        safe_softmax(weights.view_mut(), theta.view());
        let mut analytic = g.clone();

        // Act
        safe_softmax_deriv(weights.view(), analytic.view_mut());

        // Assert
        let h = 1e-6;
        for k in 0..2 {
            let mut up = theta.clone();
            let mut down = theta.clone();
            up[k] += h;
            down[k] -= h;
            let numeric = (objective(&up) - objective(&down)) / (2.0 * h);
            assert_relative_eq!(analytic[k], numeric, epsilon = 1e-7);
        }
    }
}
