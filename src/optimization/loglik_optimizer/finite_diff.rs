//! Finite-difference gradients and Hessians on top of `finitediff`.
//!
//! Two callers rely on this module: the argmin adapter, when a model has no
//! analytic gradient, and `inference::hessian`, which differentiates the
//! score to obtain the observed information for standard errors.
//!
//! Invariants
//! ----------
//! - Anything returned here has passed [`validate_grad`] /
//!   [`validate_hessian`].
//! - Objective errors raised inside a finite-difference closure are captured
//!   in a `RefCell` slot (the closure itself must return `f64`) and
//!   re-raised afterwards.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Zip;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// Clears `closure_err` first; if `func` stored an error during the sweep,
/// that error is returned instead of the gradient.
///
/// # Errors
/// - The captured objective error.
/// - [`validate_grad`] failures.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Hessian of the scalar function whose gradient is `f`, evaluated at `theta`.
///
/// Central differences first; if that matrix fails validation the forward
/// scheme is tried and its validation error, if any, is returned. The
/// result is symmetrized.
///
/// # Errors
/// [`validate_hessian`] failures on the forward-difference fallback.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Replace `H` by `(H + Hᵀ) / 2` in place.
fn symmetrize_hess(hess: &mut Hessian) {
    let transposed = hess.t().to_owned();
    Zip::from(hess).and(&transposed).for_each(|h, &ht| *h = 0.5 * (*h + ht));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Error capture and re-raise in `run_fd_diff`.
    // - Accuracy and symmetry of `compute_hessian` on a known function.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An error stored by the objective during differencing wins over the result.
    //
    // Given
    // -----
    // - An objective that records `NonFiniteVariance` and returns NaN.
    //
    // Expect
    // ------
    // - `run_fd_diff` returns that exact `OptError`.
    fn run_fd_diff_reraises_captured_error() {
        // Arrange
        let theta = array![0.5, -0.5];
        let slot: RefCell<Option<Error>> = RefCell::new(None);
        let objective = |_: &Theta| {
            slot.borrow_mut().get_or_insert_with(|| {
                OptError::NonFiniteVariance { index: 3, value: -0.1 }.into()
            });
            f64::NAN
        };

        // Act
        let result = run_fd_diff(&theta, &objective, &slot);

        // Assert
        assert_eq!(result, Err(OptError::NonFiniteVariance { index: 3, value: -0.1 }));
    }

    #[test]
    // Purpose
    // -------
    // The Hessian of f(x, y) = x²y + 3y² is recovered and symmetric.
    //
    // Given
    // -----
    // - Its gradient (2xy, x² + 6y) at (1, 2).
    //
    // Expect
    // ------
    // - H ≈ [[4, 2], [2, 6]] and H == Hᵀ exactly.
    fn compute_hessian_matches_closed_form() {
        // Arrange
        let grad = |t: &Theta| array![2.0 * t[0] * t[1], t[0] * t[0] + 6.0 * t[1]];
        let theta: Theta = Array1::from(vec![1.0, 2.0]);

        // Act
        let hess = compute_hessian(&grad, &theta).unwrap();

        // Assert
        assert_relative_eq!(hess[[0, 0]], 4.0, epsilon = 1e-5);
        assert_relative_eq!(hess[[0, 1]], 2.0, epsilon = 1e-5);
        assert_relative_eq!(hess[[1, 1]], 6.0, epsilon = 1e-5);
        assert_eq!(hess[[0, 1]], hess[[1, 0]]);
    }
}
