//! Location-scale Student-t fit by maximum likelihood.
//!
//! Purpose
//! -------
//! Estimate `(dof, loc, scale)` of the unconditional return distribution so
//! the risk layer can use a fat-tailed quantile multiplier at the fitted
//! degrees of freedom.
//!
//! Key behaviors
//! -------------
//! - Optimizer space: `θ = (loc, softplus⁻¹ scale, θ_ν)` with
//!   `dof = DOF_FLOOR + (DOF_CAP − DOF_FLOOR) · logistic(θ_ν)`; every finite θ
//!   decodes to `scale > 0` and `dof ∈ (DOF_FLOOR, DOF_CAP)`. Thin-tailed
//!   samples push `dof` toward the cap, where the θ-gradient vanishes.
//! - Log-density from `statrs::distribution::StudentsT::ln_pdf`; analytic
//!   gradient with `z = (x − loc)/scale`:
//!
//! ```text
//! ∂/∂loc   = (ν+1) z / (scale (ν + z²))
//! ∂/∂scale = −1/scale + (ν+1) z² / (scale (ν + z²))
//! ∂/∂ν     = ½ [ψ((ν+1)/2) − ψ(ν/2)] − 1/(2ν) − ½ ln(1 + z²/ν)
//!            + (ν+1) z² / (2ν (ν + z²))
//! ```
//!
//!   pushed through the softplus / scaled-logistic chain rule.
//! - Seeds: `loc` = mean, `dof = min(4 + 6/κ, 30)` for excess kurtosis
//!   `κ > 0` (method of moments), else 30; `scale = sd · sqrt((dof − 2)/dof)`.
//! - A solver stop on a flat surface (final gradient norm below
//!   `FLAT_GRAD_TOL`) is accepted as a fit.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer sees the average log-likelihood.
//! - A fit with `dof < min_dof` is rejected as degenerate.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{FLAT_GRAD_TOL, Grad, LogLikelihood, MLEOptions, Theta, maximize},
        numerical_stability::transformations::{
            LOGIT_EPS, safe_logistic, safe_softplus, safe_softplus_inv,
        },
    },
    returns::ReturnSeries,
    tails::errors::{TailError, TailResult},
};
use ndarray::{Array1, ArrayView1, array};
use statrs::{
    distribution::{Continuous, StudentsT},
    function::gamma::digamma,
};

/// Number of free parameters `(loc, scale, dof)`.
pub const TAIL_DIM: usize = 3;

/// Degrees of freedom used when the sample shows no excess kurtosis, and the
/// largest moment-based seed.
const THIN_TAIL_DOF: f64 = 30.0;

/// Lower bound of the fitted degrees of freedom.
pub const DOF_FLOOR: f64 = 0.1;

/// Upper bound of the fitted degrees of freedom. Beyond it the t quantile
/// is indistinguishable from the normal one.
pub const DOF_CAP: f64 = 1_000.0;

/// Fitted location-scale Student-t parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TDistParams {
    pub dof: f64,
    pub loc: f64,
    pub scale: f64,
}

impl TDistParams {
    /// # Errors
    /// [`TailError::InvalidParam`] unless `0 < dof ≤ DOF_CAP`, `scale > 0`
    /// and all three values are finite.
    pub fn new(dof: f64, loc: f64, scale: f64) -> TailResult<Self> {
        if !(dof.is_finite() && dof > 0.0 && dof <= DOF_CAP) {
            return Err(TailError::InvalidParam { name: "dof", value: dof });
        }
        if !loc.is_finite() {
            return Err(TailError::InvalidParam { name: "loc", value: loc });
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TailError::InvalidParam { name: "scale", value: scale });
        }
        Ok(Self { dof, loc, scale })
    }

    /// Decode `θ = (loc, softplus⁻¹ scale, θ_ν)`.
    pub fn from_theta(theta: ArrayView1<f64>) -> TailResult<Self> {
        if theta.len() != TAIL_DIM {
            return Err(TailError::ThetaLengthMismatch {
                expected: TAIL_DIM,
                actual: theta.len(),
            });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(TailError::InvalidThetaInput { index, value });
        }
        Self::new(dof_from_theta(theta[2]), theta[0], safe_softplus(theta[1]))
    }

    /// Encode into θ; a `dof` at or below [`DOF_FLOOR`] maps to the floor.
    pub fn to_theta(&self) -> Array1<f64> {
        let p = ((self.dof - DOF_FLOOR) / (DOF_CAP - DOF_FLOOR)).clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
        array![self.loc, safe_softplus_inv(self.scale), (p / (1.0 - p)).ln()]
    }

    /// `scale² · dof / (dof − 2)`, or `None` when `dof ≤ 2`.
    pub fn variance(&self) -> Option<f64> {
        (self.dof > 2.0).then(|| self.scale * self.scale * self.dof / (self.dof - 2.0))
    }
}

/// Options for [`StudentTFitter`].
///
/// Default: [`MLEOptions::default`] and `min_dof = 2.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TailOptions {
    pub mle_opts: MLEOptions,
    pub min_dof: f64,
}

impl TailOptions {
    /// # Errors
    /// [`TailError::InvalidParam`] unless `min_dof` is finite and `> 0`.
    pub fn new(mle_opts: MLEOptions, min_dof: f64) -> TailResult<Self> {
        if !(min_dof.is_finite() && min_dof > 0.0) {
            return Err(TailError::InvalidParam { name: "min_dof", value: min_dof });
        }
        Ok(Self { mle_opts, min_dof })
    }
}

impl Default for TailOptions {
    fn default() -> Self {
        Self { mle_opts: MLEOptions::default(), min_dof: 2.0 }
    }
}

/// Student-t maximum-likelihood fitter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudentTFitter {
    pub options: TailOptions,
}

impl StudentTFitter {
    pub fn new(options: TailOptions) -> Self {
        Self { options }
    }

    /// Fit `(dof, loc, scale)` to the unconditional distribution of `returns`.
    ///
    /// # Errors
    /// - [`TailError::DegenerateSample`] for a constant series.
    /// - [`TailError::Optimization`] / [`TailError::NotConverged`] from the
    ///   solver.
    /// - [`TailError::DegenerateTail`] when the fitted `dof < min_dof`.
    pub fn fit(&self, returns: &ReturnSeries) -> TailResult<TDistParams> {
        let variance = returns.variance();
        if !(variance.is_finite() && variance > 0.0) {
            return Err(TailError::DegenerateSample { value: variance });
        }
        let init = initial_params(returns.mean(), variance, returns.excess_kurtosis())?;
        let data = returns.values().to_owned();
        let outcome = maximize(self, init.to_theta(), &data, &self.options.mle_opts)?;
        if !outcome.accepted(FLAT_GRAD_TOL) {
            tracing::warn!(
                status = %outcome.status,
                iterations = outcome.iterations,
                "Student-t optimizer stopped without converging"
            );
            return Err(TailError::NotConverged {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        }
        if !outcome.converged {
            tracing::debug!(
                status = %outcome.status,
                grad_norm = ?outcome.grad_norm,
                "Student-t optimizer stopped on a flat likelihood"
            );
        }
        let params = TDistParams::from_theta(outcome.theta_hat.view())?;
        if params.dof < self.options.min_dof {
            tracing::warn!(
                dof = params.dof,
                min_dof = self.options.min_dof,
                "Student-t fit is degenerate (infinite variance)"
            );
            let min_dof = self.options.min_dof;
            return Err(TailError::DegenerateTail { dof: params.dof, min_dof });
        }
        tracing::debug!(
            dof = params.dof,
            loc = params.loc,
            scale = params.scale,
            iterations = outcome.iterations,
            "Student-t fit complete"
        );
        Ok(params)
    }
}

impl LogLikelihood for StudentTFitter {
    type Data = Array1<f64>;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = TDistParams::from_theta(theta.view())?;
        let dist = StudentsT::new(params.loc, params.scale, params.dof).map_err(TailError::from)?;
        let total: f64 = data.iter().map(|&x| dist.ln_pdf(x)).sum();
        Ok(total / data.len() as f64)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        TDistParams::from_theta(theta.view())?;
        if data.is_empty() {
            return Err(TailError::DegenerateSample { value: f64::NAN }.into());
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let params = TDistParams::from_theta(theta.view())?;
        let TDistParams { dof: nu, loc, scale } = params;
        let n = data.len() as f64;
        let const_dof = 0.5 * (digamma(0.5 * (nu + 1.0)) - digamma(0.5 * nu)) - 0.5 / nu;
        let mut grad = data.iter().fold(Array1::<f64>::zeros(TAIL_DIM), |mut acc, &x| {
            let z = (x - loc) / scale;
            let z2 = z * z;
            let denom = nu + z2;
            acc[0] += (nu + 1.0) * z / (scale * denom);
            acc[1] += -1.0 / scale + (nu + 1.0) * z2 / (scale * denom);
            acc[2] += -0.5 * (z2 / nu).ln_1p() + (nu + 1.0) * z2 / (2.0 * nu * denom);
            acc
        });
        grad[2] += n * const_dof;
        grad[1] *= safe_logistic(theta[1]);
        let w = safe_logistic(theta[2]);
        grad[2] *= (DOF_CAP - DOF_FLOOR) * w * (1.0 - w);
        grad /= n;
        Ok(grad)
    }
}

// ---- Helper methods ----

fn dof_from_theta(raw: f64) -> f64 {
    DOF_FLOOR + (DOF_CAP - DOF_FLOOR) * safe_logistic(raw)
}

fn initial_params(mean: f64, variance: f64, excess_kurtosis: f64) -> TailResult<TDistParams> {
    let dof = if excess_kurtosis.is_finite() && excess_kurtosis > 0.0 {
        (4.0 + 6.0 / excess_kurtosis).min(THIN_TAIL_DOF)
    } else {
        THIN_TAIL_DOF
    };
    let scale = variance.sqrt() * ((dof - 2.0) / dof).sqrt();
    TDistParams::new(dof, mean, scale)
}
