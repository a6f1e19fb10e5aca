//! Domain checks for GARCH(1,1) parameters and optimizer vectors.
//!
//! Each helper performs scalar checks only and returns the first violation
//! as a [`ParamError`]. They are called from the validated constructors in
//! [`params`](super::params) and from `LogLikelihood::check`.
use crate::{
    optimization::numerical_stability::transformations::STATIONARITY_MARGIN,
    volatility::errors::{ParamError, ParamResult},
};
use ndarray::ArrayView1;

/// Number of free GARCH(1,1) parameters `(mu, omega, alpha, beta)`.
pub const GARCH_DIM: usize = 4;

/// Tolerance on `alpha + beta + slack = 1 − margin`.
const SUM_TOL: f64 = 1e-10;

pub fn validate_mu(mu: f64) -> ParamResult<()> {
    if !mu.is_finite() {
        return Err(ParamError::InvalidMu { value: mu });
    }
    Ok(())
}

pub fn validate_omega(omega: f64) -> ParamResult<()> {
    if !omega.is_finite() || omega <= 0.0 {
        return Err(ParamError::InvalidOmega { value: omega });
    }
    Ok(())
}

pub fn validate_alpha(alpha: f64) -> ParamResult<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(ParamError::InvalidAlpha { value: alpha });
    }
    Ok(())
}

pub fn validate_beta(beta: f64) -> ParamResult<()> {
    if !beta.is_finite() || beta < 0.0 {
        return Err(ParamError::InvalidBeta { value: beta });
    }
    Ok(())
}

/// Slack must be finite and `≥ 0`, and `alpha + beta + slack` must equal
/// `1 − STATIONARITY_MARGIN`, which makes `alpha + beta < 1` strict.
///
/// # Errors
/// - [`ParamError::InvalidSlack`] for a negative or non-finite slack.
/// - [`ParamError::StationarityViolated`] when the mass is inconsistent.
pub fn validate_stationarity_and_slack(alpha: f64, beta: f64, slack: f64) -> ParamResult<()> {
    if !(slack >= 0.0 && slack.is_finite()) {
        return Err(ParamError::InvalidSlack { value: slack });
    }
    let target = 1.0 - STATIONARITY_MARGIN;
    if (alpha + beta + slack - target).abs() > SUM_TOL {
        return Err(ParamError::StationarityViolated { coeff_sum: alpha + beta });
    }
    Ok(())
}

/// θ must have [`GARCH_DIM`] finite coordinates.
pub fn validate_theta(theta: ArrayView1<f64>) -> ParamResult<()> {
    if theta.len() != GARCH_DIM {
        return Err(ParamError::ThetaLengthMismatch { expected: GARCH_DIM, actual: theta.len() });
    }
    match theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(ParamError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}
