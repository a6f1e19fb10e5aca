//! GARCH(1,1) model: analytic log-likelihood, gradient and fitting.
//!
//! This module wires the GARCH(1,1) recursion to the `LogLikelihood` trait and
//! drives the L-BFGS optimizer in unconstrained θ-space.
//!
//! Key ideas:
//! - `θ = (mu, softplus⁻¹ omega, logit_α, logit_β)`; every finite θ decodes to
//!   a stationary parameter set via [`GarchParams::from_theta`].
//! - The optimizer sees the **average** log-likelihood `ℓ(θ)/n` so gradient
//!   tolerances do not depend on the sample size. Reported log-likelihoods
//!   and information criteria use the total.
//! - The gradient uses the chain rule:
//!   1) model-space scores from the derivative recursion in `variance`;
//!   2) `∂omega/∂θ₁ = logistic(θ₁)` and the scaled-softmax Jacobian for the
//!      `(alpha, beta)` logits.
//! - Standard errors are computed in model space `(mu, omega, alpha, beta)`
//!   from a finite-difference Hessian of the analytic score.
use crate::{
    inference::calc_standard_errors,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{FLAT_GRAD_TOL, Grad, LogLikelihood, OptimOutcome, Theta, maximize},
        numerical_stability::transformations::{safe_logistic, safe_softmax_deriv},
    },
    returns::ReturnSeries,
    volatility::{
        core::{
            data::GarchData,
            forecasts::{forecast_one_step, forecast_path},
            options::{Covariance, GarchOptions},
            params::GarchParams,
            validation::{GARCH_DIM, validate_theta},
            variance::{conditional_variances, log_likelihood, score_matrix, score_total},
        },
        errors::{GarchError, GarchResult},
    },
};
use ndarray::{Array1, array, s};

/// Initial ARCH coefficient.
const INIT_ALPHA: f64 = 0.05;
/// Initial GARCH coefficient.
const INIT_BETA: f64 = 0.90;

/// GARCH(1,1) estimator with a constant conditional mean.
///
/// Stateless apart from its options: one instance can fit any number of
/// series, and `fit` takes `&self`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GarchModel {
    pub options: GarchOptions,
}

/// Result of a successful GARCH(1,1) fit.
///
/// Fields:
/// - `params`: fitted model-space parameters.
/// - `outcome`: optimizer summary in θ-space (averaged objective).
/// - `variances`: in-sample conditional variances `h_t`.
/// - `std_resid`: standardized residuals `(r_t − mu) / sqrt(h_t)`.
/// - `last_return` / `last_variance`: `r_T` and `h_T`, the forecast seed.
/// - `loglik`, `aic`, `bic`: total log-likelihood and information criteria.
/// - `std_errors`: standard errors of `(mu, omega, alpha, beta)` when the
///   covariance could be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct GarchFit {
    pub params: GarchParams,
    pub outcome: OptimOutcome,
    pub variances: Array1<f64>,
    pub std_resid: Array1<f64>,
    pub last_return: f64,
    pub last_variance: f64,
    pub loglik: f64,
    pub aic: f64,
    pub bic: f64,
    pub std_errors: Option<Array1<f64>>,
}

impl GarchModel {
    pub fn new(options: GarchOptions) -> Self {
        Self { options }
    }

    /// Fit GARCH(1,1) to `returns` by maximum likelihood.
    ///
    /// ## Steps
    /// 1. Build [`GarchData`] (returns plus variance backcast).
    /// 2. Seed `mu` with the sample mean, `omega` with
    ///    `variance · (1 − 0.05 − 0.90)`, `alpha = 0.05`, `beta = 0.90`.
    /// 3. Run L-BFGS per `options.mle_opts`.
    /// 4. Decode θ̂, rebuild the variance path and residuals, and compute
    ///    information criteria and (optionally) standard errors.
    ///
    /// ## Errors
    /// - [`GarchError::DegenerateVariance`] for a constant series.
    /// - [`GarchError::Optimization`] if the solver fails outright.
    /// - [`GarchError::NotConverged`] if it stops without meeting a tolerance
    ///   and away from a flat gradient (`FLAT_GRAD_TOL`).
    /// - [`GarchError::Param`] if θ̂ decodes to an invalid parameter set.
    ///
    /// A standard-error failure is logged and leaves `std_errors = None`.
    pub fn fit(&self, returns: &ReturnSeries) -> GarchResult<GarchFit> {
        let data = GarchData::new(returns)?;
        let init = GarchParams::new(
            returns.mean(),
            data.backcast * (1.0 - INIT_ALPHA - INIT_BETA),
            INIT_ALPHA,
            INIT_BETA,
        )?;
        let outcome = maximize(self, init.to_theta(), &data, &self.options.mle_opts)?;
        if !outcome.accepted(FLAT_GRAD_TOL) {
            tracing::warn!(
                status = %outcome.status,
                iterations = outcome.iterations,
                "GARCH(1,1) optimizer stopped without converging"
            );
            return Err(GarchError::NotConverged {
                status: outcome.status.clone(),
                iterations: outcome.iterations,
            });
        }

        let params = GarchParams::from_theta(outcome.theta_hat.view())?;
        let view = data.returns.view();
        let variances = conditional_variances(&params, view, data.backcast)?;
        let std_resid = (&data.returns - params.mu) / &variances.mapv(f64::sqrt);
        let (last_return, last_variance) = match (returns.last(), variances.last()) {
            (Some(r), Some(&h)) => (r, h),
            _ => return Err(GarchError::DegenerateVariance { value: data.backcast }),
        };

        let loglik = log_likelihood(&params, view, data.backcast)?;
        let k = GARCH_DIM as f64;
        let n = data.len() as f64;
        let aic = 2.0 * k - 2.0 * loglik;
        let bic = k * n.ln() - 2.0 * loglik;

        let std_errors = match self.standard_errors(&params, &data) {
            Ok(se) => se,
            Err(err) => {
                tracing::warn!(error = %err, "GARCH(1,1) standard errors unavailable");
                None
            }
        };

        tracing::debug!(
            mu = params.mu,
            omega = params.omega,
            alpha = params.alpha,
            beta = params.beta,
            loglik,
            iterations = outcome.iterations,
            "GARCH(1,1) fit complete"
        );

        Ok(GarchFit {
            params,
            outcome,
            variances,
            std_resid,
            last_return,
            last_variance,
            loglik,
            aic,
            bic,
            std_errors,
        })
    }

    // ---- Helper methods ----

    /// Model-space standard errors per `options.covariance`.
    ///
    /// The Hessian probe evaluates unvalidated parameters so a step that
    /// crosses a boundary by rounding still returns a score; a genuinely
    /// invalid variance yields NaN, which the Hessian validation rejects.
    fn standard_errors(
        &self, params: &GarchParams, data: &GarchData,
    ) -> GarchResult<Option<Array1<f64>>> {
        let meat = match self.options.covariance {
            Covariance::None => return Ok(None),
            Covariance::Classical => None,
            Covariance::Robust => {
                let scores = score_matrix(params, data.returns.view(), data.backcast)?;
                Some(scores.t().dot(&scores))
            }
        };
        let neg_score = |x: &Array1<f64>| {
            let probe = GarchParams::unchecked(x[0], x[1], x[2], x[3]);
            score_total(&probe, data.returns.view(), data.backcast)
                .map(|g| -g)
                .unwrap_or_else(|_| Array1::from_elem(GARCH_DIM, f64::NAN))
        };
        let se = calc_standard_errors(&neg_score, &params.to_array(), meat.as_ref())?;
        if se.iter().any(|v| !v.is_finite()) {
            tracing::warn!("GARCH(1,1) information matrix is not usable; dropping standard errors");
            return Ok(None);
        }
        Ok(Some(se))
    }
}

impl GarchFit {
    /// `alpha + beta`.
    pub fn persistence(&self) -> f64 {
        self.params.persistence()
    }

    /// Long-run variance `omega / (1 − alpha − beta)`.
    pub fn uncond_variance(&self) -> f64 {
        self.params.uncond_variance()
    }

    /// One-step conditional standard deviation `sqrt(h_{T+1})`, in scaled
    /// return units.
    pub fn forecast_one_step(&self) -> GarchResult<f64> {
        forecast_one_step(&self.params, self.last_return, self.last_variance)
    }

    /// Variance path `[h_{T+1}, …, h_{T+horizon}]`.
    pub fn forecast(&self, horizon: usize) -> GarchResult<Array1<f64>> {
        forecast_path(&self.params, self.last_return, self.last_variance, horizon)
    }
}

impl LogLikelihood for GarchModel {
    type Data = GarchData;

    /// Average Gaussian log-likelihood `ℓ(θ)/n`.
    ///
    /// # Errors
    /// - Parameter-mapping failures from [`GarchParams::from_theta`].
    /// - `NonFiniteVariance` from the recursion.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = GarchParams::from_theta(theta.view())?;
        let total = log_likelihood(&params, data.returns.view(), data.backcast)?;
        Ok(total / data.len() as f64)
    }

    /// θ must have four finite entries that decode to valid parameters, and
    /// the sample must be non-empty.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view())?;
        GarchParams::from_theta(theta.view())?;
        if data.is_empty() {
            return Err(OptError::ModelEvaluation {
                text: "GARCH(1,1) likelihood needs at least one return".to_string(),
            });
        }
        Ok(())
    }

    /// Analytic gradient of `ℓ(θ)/n` w.r.t. θ.
    ///
    /// # Steps
    /// 1. Decode θ and accumulate model-space scores.
    /// 2. Multiply `∂ℓ/∂omega` by `logistic(θ₁)`.
    /// 3. Map `∂ℓ/∂(alpha, beta)` through the scaled-softmax Jacobian.
    /// 4. Divide by `n`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params = GarchParams::from_theta(theta.view())?;
        let mut grad = score_total(&params, data.returns.view(), data.backcast)?;
        grad[1] *= safe_logistic(theta[1]);
        let weights = array![params.alpha, params.beta];
        safe_softmax_deriv(weights.view(), grad.slice_mut(s![2..]));
        grad /= data.len() as f64;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{MLEOptions, Tolerances};
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rand_distr::{Distribution, StandardNormal};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `LogLikelihood` conformance: the analytic θ-gradient against central
    //   differences of `value`.
    // - `fit` on a simulated GARCH(1,1) path: parameter recovery, stationarity,
    //   information criteria and standard errors.
    // - `NotConverged` when the iteration cap is hit.
    //
    // They intentionally DO NOT cover:
    // - Heavy-tailed innovations (see the pipeline integration test).
    // -------------------------------------------------------------------------

    const TRUE_MU: f64 = 0.05;
    const TRUE_OMEGA: f64 = 0.1;
    const TRUE_ALPHA: f64 = 0.1;
    const TRUE_BETA: f64 = 0.85;

    fn simulate(n: usize, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut h = TRUE_OMEGA / (1.0 - TRUE_ALPHA - TRUE_BETA);
        let mut e = 0.0_f64;
        (0..n)
            .map(|_| {
                h = TRUE_OMEGA + TRUE_ALPHA * e * e + TRUE_BETA * h;
                let z: f64 = StandardNormal.sample(&mut rng);
                e = h.sqrt() * z;
                TRUE_MU + e
            })
            .collect()
    }

    fn series(n: usize, seed: u64) -> ReturnSeries {
        ReturnSeries::new(simulate(n, seed), 100.0, 30).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The analytic θ-gradient matches numerical differentiation of the
    // averaged log-likelihood.
    //
    // Given
    // -----
    // - 300 simulated returns and an interior θ.
    //
    // Expect
    // ------
    // - Each component agrees with a central difference to 1e-6.
    fn analytic_gradient_matches_finite_differences() {
        // Arrange
        let data = GarchData::new(&series(300, 7)).unwrap();
        let model = GarchModel::default();
        let theta = GarchParams::new(0.02, 0.2, 0.08, 0.85).unwrap().to_theta();

        // Act
        let grad = model.grad(&theta, &data).unwrap();

        // Assert
        let step = 1e-6;
        for k in 0..GARCH_DIM {
            let (mut up, mut down) = (theta.clone(), theta.clone());
            up[k] += step;
            down[k] -= step;
            let numeric = (model.value(&up, &data).unwrap() - model.value(&down, &data).unwrap())
                / (2.0 * step);
            assert_relative_eq!(grad[k], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // `check` rejects malformed θ before the optimizer starts.
    //
    // Given
    // -----
    // - θ of the wrong length and θ with a NaN.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` and `InvalidThetaInput`.
    fn check_rejects_malformed_theta() {
        // Arrange
        let data = GarchData::new(&series(100, 1)).unwrap();
        let model = GarchModel::default();

        // Act
        let short = model.check(&array![0.0, 0.0, 0.0], &data);
        let nan = model.check(&array![0.0, f64::NAN, 0.0, 0.0], &data);

        // Assert
        assert_eq!(short, Err(OptError::ThetaLengthMismatch { expected: 4, actual: 3 }));
        assert!(matches!(nan, Err(OptError::InvalidThetaInput { index: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // A fit on a long simulated path recovers the generating parameters
    // and reports consistent diagnostics.
    //
    // Given
    // -----
    // - 2000 Gaussian GARCH(1,1) returns with omega = 0.1, alpha = 0.1,
    //   beta = 0.85.
    //
    // Expect
    // ------
    // - alpha, beta near their true values and `alpha + beta < 1`.
    // - AIC/BIC follow from the total log-likelihood with k = 4.
    // - Finite positive robust standard errors.
    // - A one-step forecast equal to the recursion applied to `(r_T, h_T)`.
    fn fit_recovers_simulated_parameters() {
        // Arrange
        let returns = series(2000, 42);
        let model = GarchModel::default();

        // Act
        let fit = model.fit(&returns).unwrap();

        // Assert
        let p = fit.params;
        assert!(fit.outcome.converged);
        assert!((p.alpha - TRUE_ALPHA).abs() < 0.06, "alpha = {}", p.alpha);
        assert!((p.beta - TRUE_BETA).abs() < 0.1, "beta = {}", p.beta);
        assert!(fit.persistence() < 1.0);
        assert_eq!(fit.variances.len(), 2000);
        assert_eq!(fit.std_resid.len(), 2000);
        assert_relative_eq!(fit.aic, 8.0 - 2.0 * fit.loglik, epsilon = 1e-9);
        assert_relative_eq!(fit.bic, 4.0 * 2000_f64.ln() - 2.0 * fit.loglik, epsilon = 1e-9);

        let se = fit.std_errors.as_ref().unwrap();
        assert_eq!(se.len(), 4);
        assert!(se.iter().all(|v| v.is_finite() && *v > 0.0));

        let resid = fit.last_return - p.mu;
        let expected = (p.omega + p.alpha * resid * resid + p.beta * fit.last_variance).sqrt();
        assert_relative_eq!(fit.forecast_one_step().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Hitting the iteration cap is reported as non-convergence.
    //
    // Given
    // -----
    // - `max_iter = 1` and no other stopping rule.
    //
    // Expect
    // ------
    // - `GarchError::NotConverged`.
    fn iteration_cap_reports_not_converged() {
        // Arrange
        let tols = Tolerances::new(None, None, Some(1)).unwrap();
        let mle_opts = MLEOptions::new(tols, Default::default(), 7).unwrap();
        let model = GarchModel::new(GarchOptions::new(mle_opts, Covariance::None));

        // Act
        let result = model.fit(&series(500, 3));

        // Assert
        assert!(matches!(result, Err(GarchError::NotConverged { iterations: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // A constant return series cannot seed the recursion.
    //
    // Given
    // -----
    // - 50 identical returns.
    //
    // Expect
    // ------
    // - `DegenerateVariance`.
    fn constant_series_is_degenerate() {
        // Arrange
        let flat = ReturnSeries::new(Array1::from_elem(50, 0.5), 100.0, 30).unwrap();

        // Act
        let result = GarchModel::default().fit(&flat);

        // Assert
        assert!(matches!(result, Err(GarchError::DegenerateVariance { .. })));
    }
}
