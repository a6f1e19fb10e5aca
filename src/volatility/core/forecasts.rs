//! One-step and multi-step GARCH(1,1) variance forecasts.
//!
//! Given fitted parameters, the last in-sample return `r_T` and variance
//! `h_T`:
//!
//! ```text
//! h_{T+1} = omega + alpha (r_T − mu)² + beta h_T
//! h_{T+k} = omega + (alpha + beta) h_{T+k−1},   k ≥ 2
//! ```
//!
//! Both functions are pure. Inputs are checked up front so a NaN never
//! propagates silently into a VaR figure.
use crate::volatility::{
    core::params::GarchParams,
    errors::{GarchError, GarchResult},
};
use ndarray::Array1;

/// Conditional standard deviation `sqrt(h_{T+1})`.
///
/// # Errors
/// - [`GarchError::NonFiniteInput`] if `last_return` is not finite or
///   `last_variance` is not finite and positive.
/// - [`GarchError::NonFiniteVariance`] if the forecast itself is unusable.
pub fn forecast_one_step(
    params: &GarchParams, last_return: f64, last_variance: f64,
) -> GarchResult<f64> {
    Ok(next_variance(params, last_return, last_variance)?.sqrt())
}

/// Variance path `[h_{T+1}, …, h_{T+horizon}]`.
///
/// The path converges monotonically to `params.uncond_variance()`.
///
/// # Errors
/// - [`GarchError::InvalidHorizon`] for `horizon == 0`.
/// - The input errors of [`forecast_one_step`].
pub fn forecast_path(
    params: &GarchParams, last_return: f64, last_variance: f64, horizon: usize,
) -> GarchResult<Array1<f64>> {
    if horizon == 0 {
        return Err(GarchError::InvalidHorizon { horizon });
    }
    let first = next_variance(params, last_return, last_variance)?;
    let persistence = params.persistence();
    let path = std::iter::successors(Some(first), |&h| Some(params.omega + persistence * h));
    Ok(path.take(horizon).collect())
}

// ---- Helper methods ----

fn next_variance(params: &GarchParams, last_return: f64, last_variance: f64) -> GarchResult<f64> {
    if !last_return.is_finite() {
        return Err(GarchError::NonFiniteInput { name: "last_return", value: last_return });
    }
    if !(last_variance.is_finite() && last_variance > 0.0) {
        return Err(GarchError::NonFiniteInput { name: "last_variance", value: last_variance });
    }
    let resid = last_return - params.mu;
    let h = params.omega + params.alpha * resid * resid + params.beta * last_variance;
    if !(h.is_finite() && h > 0.0) {
        return Err(GarchError::NonFiniteVariance { index: 0, value: h });
    }
    Ok(h)
}
