//! GARCH(1,1) parameters in model space and their optimizer-space mapping.
//!
//! ## Model space
//! `(mu, omega, alpha, beta)` with a derived `slack` such that
//! `alpha + beta + slack = 1 − STATIONARITY_MARGIN`. Validated constructors
//! guarantee `omega > 0`, `alpha, beta ≥ 0` and strict stationarity.
//!
//! ## Optimizer space
//! `θ = [mu, softplus⁻¹(omega), logit_α, logit_β]`, where the logits are
//! log-odds relative to the slack component under a scaled softmax. Every
//! finite θ maps to a stationary parameter set, so the optimizer never has
//! to handle a constraint.
use crate::{
    optimization::numerical_stability::transformations::{
        LOGIT_EPS, STATIONARITY_MARGIN, safe_softmax, safe_softplus, safe_softplus_inv,
    },
    volatility::{
        core::validation::{
            GARCH_DIM, validate_alpha, validate_beta, validate_mu, validate_omega,
            validate_stationarity_and_slack, validate_theta,
        },
        errors::{ParamError, ParamResult},
    },
};
use ndarray::{Array1, ArrayView1, array, s};

/// Validated GARCH(1,1) parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GarchParams {
    /// Constant conditional mean.
    pub mu: f64,
    /// Variance intercept, `> 0`.
    pub omega: f64,
    /// ARCH coefficient, `≥ 0`.
    pub alpha: f64,
    /// GARCH coefficient, `≥ 0`.
    pub beta: f64,
    /// `1 − margin − alpha − beta`, `≥ 0`.
    pub slack: f64,
}

impl GarchParams {
    /// Build parameters from model-space values.
    ///
    /// # Errors
    /// - [`ParamError::InvalidMu`] / [`ParamError::InvalidOmega`] /
    ///   [`ParamError::InvalidAlpha`] / [`ParamError::InvalidBeta`] for
    ///   out-of-domain scalars.
    /// - [`ParamError::StationarityViolated`] when
    ///   `alpha + beta ≥ 1 − STATIONARITY_MARGIN`.
    pub fn new(mu: f64, omega: f64, alpha: f64, beta: f64) -> ParamResult<Self> {
        validate_mu(mu)?;
        validate_omega(omega)?;
        validate_alpha(alpha)?;
        validate_beta(beta)?;
        let slack = 1.0 - STATIONARITY_MARGIN - alpha - beta;
        if slack < 0.0 {
            return Err(ParamError::StationarityViolated { coeff_sum: alpha + beta });
        }
        validate_stationarity_and_slack(alpha, beta, slack)?;
        Ok(Self { mu, omega, alpha, beta, slack })
    }

    /// Map an optimizer vector `θ` to validated parameters.
    ///
    /// `mu = θ₀`, `omega = softplus(θ₁)`, and `(alpha, beta, slack)` from a
    /// max-shifted scaled softmax of `(θ₂, θ₃, 0)`.
    ///
    /// # Errors
    /// - [`ParamError::ThetaLengthMismatch`] / [`ParamError::InvalidThetaInput`].
    /// - Domain errors if the mapped values underflow (e.g. `omega == 0`).
    pub fn from_theta(theta: ArrayView1<f64>) -> ParamResult<Self> {
        validate_theta(theta)?;
        let mu = theta[0];
        let omega = safe_softplus(theta[1]);
        let mut weights = Array1::<f64>::zeros(2);
        let slack = safe_softmax(weights.view_mut(), theta.slice(s![2..]));
        let (alpha, beta) = (weights[0], weights[1]);
        validate_mu(mu)?;
        validate_omega(omega)?;
        validate_alpha(alpha)?;
        validate_beta(beta)?;
        validate_stationarity_and_slack(alpha, beta, slack)?;
        Ok(Self { mu, omega, alpha, beta, slack })
    }

    /// Inverse of [`from_theta`](Self::from_theta).
    ///
    /// Simplex weights are normalized by `1 − margin` and floored at
    /// `LOGIT_EPS` before taking logs, so boundary values (`alpha == 0`)
    /// map to a large negative logit instead of `-∞`.
    pub fn to_theta(&self) -> Array1<f64> {
        let mass = 1.0 - STATIONARITY_MARGIN;
        let log_odds = |w: f64| (w / mass).max(LOGIT_EPS).ln();
        let log_slack = log_odds(self.slack);
        array![
            self.mu,
            safe_softplus_inv(self.omega),
            log_odds(self.alpha) - log_slack,
            log_odds(self.beta) - log_slack,
        ]
    }

    /// Unvalidated parameters for finite-difference probes around an
    /// estimate, where a step may leave the domain by a rounding error.
    pub(crate) fn unchecked(mu: f64, omega: f64, alpha: f64, beta: f64) -> Self {
        Self { mu, omega, alpha, beta, slack: 1.0 - STATIONARITY_MARGIN - alpha - beta }
    }

    /// Model-space vector `[mu, omega, alpha, beta]`.
    pub fn to_array(&self) -> Array1<f64> {
        array![self.mu, self.omega, self.alpha, self.beta]
    }

    /// `alpha + beta`.
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Long-run variance `omega / (1 − alpha − beta)`.
    pub fn uncond_variance(&self) -> f64 {
        self.omega / (1.0 - self.persistence())
    }

    pub const fn dim() -> usize {
        GARCH_DIM
    }
}
