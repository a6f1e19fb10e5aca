//! inference::hessian — standard errors from the observed information.
//!
//! Purpose
//! -------
//! Turn a gradient map evaluated around an MLE into per-parameter standard
//! errors. The observed information `J(θ̂)` comes from a finite-difference
//! Hessian of the supplied gradient; its pseudoinverse gives classical
//! errors, and a sandwich `J⁺ S J⁺` gives robust ones when a score
//! outer-product matrix `S` is supplied.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`] differentiates `f` at `θ̂` through
//!   [`compute_hessian`], copies the result into `nalgebra`, and solves
//!   with a symmetric eigendecomposition.
//! - Eigenvalues at or below [`EIGEN_EPS`] are dropped, so weakly
//!   identified directions contribute no finite variance instead of
//!   exploding.
//!
//! Invariants & assumptions
//! ------------------------
//! - `f` is the gradient of the **negative total** log-likelihood, so its
//!   Jacobian is the information matrix itself (positive semidefinite at a
//!   maximum).
//! - When present, `meat` is `k × k` with `k = θ̂.len()`, built as
//!   `Σ_t s_t s_tᵀ` from per-observation scores on the same scale.
//!
//! Conventions
//! -----------
//! - Returns standard errors (square roots), not variances.
//! - No explicit inverse is formed.
//!
//! Downstream usage
//! ----------------
//! - `volatility::models::garch` calls [`calc_standard_errors`] in model
//!   space `(mu, omega, alpha, beta)` after a fit.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};

/// Classical (`meat = None`) or sandwich (`meat = Some(S)`) standard errors.
///
/// Parameters
/// ----------
/// - `f`: gradient of `-ℓ(θ)` (total scale), C¹ near `theta_hat`.
/// - `theta_hat`: evaluation point, length `k`.
/// - `meat`: optional `k × k` score outer-product matrix.
///
/// Returns
/// -------
/// Length-`k` standard errors:
/// - classical: `sqrt(diag(J⁺))`,
/// - robust: `sqrt(diag(J⁺ S J⁺))`.
///
/// Errors
/// ------
/// Propagates [`compute_hessian`] failures (non-finite or mis-shaped
/// Hessian).
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>, meat: Option<&Array2<f64>>,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    let eigen = to_dmatrix(&obs_info).symmetric_eigen();
    Ok(match meat {
        Some(s) => solve_for_se_robust(&eigen, s),
        None => solve_for_se(&eigen),
    })
}

// ---- Helper methods ----

fn to_dmatrix(matrix: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |i, j| matrix[[i, j]])
}

/// Column `i` of the pseudoinverse: `Σ_{λ_k > EIGEN_EPS} Q[i,k] Q[·,k] / λ_k`.
fn pinv_column(eigen: &SymmetricEigen<f64, nalgebra::Dyn>, i: usize) -> Array1<f64> {
    let q = &eigen.eigenvectors;
    let dim = q.nrows();
    let mut column = Array1::<f64>::zeros(dim);
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda > EIGEN_EPS {
            let coeff = q[(i, k)] / lambda;
            column.iter_mut().enumerate().for_each(|(j, w)| *w += coeff * q[(j, k)]);
        }
    }
    column
}

fn solve_for_se(eigen: &SymmetricEigen<f64, nalgebra::Dyn>) -> Array1<f64> {
    let dim = eigen.eigenvectors.nrows();
    Array1::from_shape_fn(dim, |i| pinv_column(eigen, i)[i].sqrt())
}

fn solve_for_se_robust(
    eigen: &SymmetricEigen<f64, nalgebra::Dyn>, meat: &Array2<f64>,
) -> Array1<f64> {
    let dim = eigen.eigenvectors.nrows();
    Array1::from_shape_fn(dim, |i| {
        let w = pinv_column(eigen, i);
        w.dot(&meat.dot(&w)).sqrt()
    })
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
    // - Classical errors for a quadratic with known information.
    // - Sandwich errors inflating when the score variance exceeds the information.
    // - Eigenvalue truncation on a singular information matrix.
    //
    // They intentionally DO NOT cover:
    // - GARCH-specific information matrices (see `volatility::models::garch`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // For f(θ) = Aθ with A = [[4, 1], [1, 2]], classical SEs equal sqrt(diag(A⁻¹)).
    //
    // Given
    // -----
    // - det(A) = 7 so A⁻¹ = [[2/7, −1/7], [−1/7, 4/7]].
    //
    // Expect
    // ------
    // - SE ≈ [sqrt(2/7), sqrt(4/7)].
    fn classical_se_matches_inverse_information() {
        // Arrange
        let a = array![[4.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Array1<f64>| a.dot(theta);
        let theta_hat = array![0.3, -0.7];

        // Act
        let se = calc_standard_errors(&f, &theta_hat, None).unwrap();

        // Assert
        assert_relative_eq!(se[0], (2.0_f64 / 7.0).sqrt(), epsilon = 1e-6);
        assert_relative_eq!(se[1], (4.0_f64 / 7.0).sqrt(), epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // With J = I and S = 2I the sandwich gives sqrt(2), above the classical 1.
    //
    // Given
    // -----
    // - f(θ) = θ and meat = 2I.
    //
    // Expect
    // ------
    // - Robust SE ≈ sqrt(2) in each coordinate.
    fn robust_se_inflates_with_larger_score_variance() {
        // Arrange
        let f = |theta: &Array1<f64>| theta.clone();
        let meat = array![[2.0, 0.0], [0.0, 2.0]];
        let theta_hat = array![1.0, 1.0];

        // Act
        let classical = calc_standard_errors(&f, &theta_hat, None).unwrap();
        let robust = calc_standard_errors(&f, &theta_hat, Some(&meat)).unwrap();

        // Assert
        assert_relative_eq!(classical[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(robust[0], 2.0_f64.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(robust[1], 2.0_f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A zero eigenvalue is skipped rather than divided by.
    //
    // Given
    // -----
    // - J = diag(4, 0).
    //
    // Expect
    // ------
    // - SE = [0.5, 0.0], both finite.
    fn singular_direction_is_truncated() {
        // Arrange
        let f = |theta: &Array1<f64>| array![4.0 * theta[0], 0.0];
        let theta_hat = array![0.0, 0.0];

        // Act
        let se = calc_standard_errors(&f, &theta_hat, None).unwrap();

        // Assert
        assert_relative_eq!(se[0], 0.5, epsilon = 1e-6);
        assert_eq!(se[1], 0.0);
    }
}
