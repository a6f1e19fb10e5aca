//! Entry point for maximizing a [`LogLikelihood`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS and the line search chosen in `opts`.
///
/// Validates `theta0` with `f.check`, wraps `(f, data)` in an
/// [`ArgMinAdapter`] that minimizes `-ℓ(θ)`, builds the solver and runs it.
///
/// # Errors
/// - Anything returned by `f.check`.
/// - Builder errors (invalid tolerances for the chosen solver).
/// - Runtime errors raised by the model or by argmin during the search.
///
/// A run that stops on the iteration cap is *not* an error; inspect
/// [`OptimOutcome::converged`].
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        loglik_optimizer::{Cost, Grad},
    };
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `maximize` on a concave quadratic with and without an analytic gradient,
    //   under both line searches.
    // - Rejection of an invalid starting point through `check`.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = −Σ (θ_i − target_i)², optionally with its exact gradient.
    struct Quadratic {
        analytic: bool,
    }

    impl LogLikelihood for Quadratic {
        type Data = Array1<f64>;

        fn value(&self, theta: &Theta, target: &Self::Data) -> OptResult<Cost> {
            Ok(-(theta - target).mapv(|d| d * d).sum())
        }

        fn check(&self, theta: &Theta, target: &Self::Data) -> OptResult<()> {
            if theta.len() != target.len() {
                return Err(OptError::ThetaLengthMismatch {
                    expected: target.len(),
                    actual: theta.len(),
                });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, target: &Self::Data) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            Ok(-2.0 * (theta - target))
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches locate the maximizer, with analytic or FD gradients.
    //
    // Given
    // -----
    // - A quadratic with maximizer (1.5, −0.5) and θ₀ = 0.
    //
    // Expect
    // ------
    // - θ̂ ≈ target, ℓ(θ̂) ≈ 0 and `converged == true` in every configuration.
    fn maximize_recovers_quadratic_peak() {
        // Arrange
        let target = array![1.5, -0.5];
        for searcher in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            for analytic in [true, false] {
                let opts = MLEOptions { line_searcher: searcher, ..MLEOptions::default() };

                // Act
                let out =
                    maximize(&Quadratic { analytic }, Array1::zeros(2), &target, &opts).unwrap();

                // Assert
                assert!(out.converged, "{searcher:?} analytic={analytic}: {}", out.status);
                assert_relative_eq!(out.theta_hat[0], 1.5, epsilon = 1e-5);
                assert_relative_eq!(out.theta_hat[1], -0.5, epsilon = 1e-5);
                assert!(out.value.abs() < 1e-8);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // An invalid θ₀ never reaches the solver.
    //
    // Given
    // -----
    // - A three-element θ₀ for a two-dimensional problem.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` from `check`.
    fn maximize_surfaces_check_failure() {
        // Act
        let err = maximize(
            &Quadratic { analytic: true },
            Array1::zeros(3),
            &array![0.0, 0.0],
            &MLEOptions::default(),
        );

        // Assert
        assert_eq!(err, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 }));
    }
}
