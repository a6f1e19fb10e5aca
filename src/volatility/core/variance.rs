//! Conditional-variance recursion, Gaussian log-likelihood and scores.
//!
//! The recursion
//!
//! ```text
//! e_t = r_t − mu
//! h_0 = backcast
//! h_t = omega + alpha · e_{t−1}² + beta · h_{t−1}
//! ```
//!
//! is expressed as a fold over the return sequence: [`variance_steps`]
//! threads the previous `(e, h)` pair through `Iterator::scan`, with no
//! buffers shared between calls. The likelihood and its model-space score
//! are further folds over the same iterator.
//!
//! Score recursion (all derivatives zero at `t = 0`):
//!
//! ```text
//! ∂h_t/∂mu    = −2 alpha e_{t−1} + beta ∂h_{t−1}/∂mu
//! ∂h_t/∂omega = 1                + beta ∂h_{t−1}/∂omega
//! ∂h_t/∂alpha = e_{t−1}²         + beta ∂h_{t−1}/∂alpha
//! ∂h_t/∂beta  = h_{t−1}          + beta ∂h_{t−1}/∂beta
//! ∂l_t/∂h_t   = −½ (1/h_t − e_t²/h_t²),   ∂l_t/∂mu (direct) = e_t/h_t
//! ```
use crate::volatility::{
    core::{params::GarchParams, validation::GARCH_DIM},
    errors::{GarchError, GarchResult},
};
use ndarray::{Array1, Array2, ArrayView1};

/// `ln(2π)`.
const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// One element of the recursion: residual `e_t` and variance `h_t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceStep {
    pub resid: f64,
    pub variance: f64,
}

/// Lazily evaluate `(e_t, h_t)` for every return.
///
/// No validation happens here; consumers check each variance.
pub fn variance_steps<'a>(
    params: GarchParams, returns: ArrayView1<'a, f64>, backcast: f64,
) -> impl Iterator<Item = VarianceStep> + 'a {
    returns.into_iter().scan(None::<VarianceStep>, move |prev, &r| {
        let variance = match *prev {
            None => backcast,
            Some(p) => params.omega + params.alpha * p.resid * p.resid + params.beta * p.variance,
        };
        let step = VarianceStep { resid: r - params.mu, variance };
        *prev = Some(step);
        Some(step)
    })
}

/// Total Gaussian log-likelihood `Σ −½ (ln 2π + ln h_t + e_t²/h_t)`.
///
/// # Errors
/// [`GarchError::NonFiniteVariance`] at the first `h_t` outside `(0, ∞)`.
pub fn log_likelihood(
    params: &GarchParams, returns: ArrayView1<f64>, backcast: f64,
) -> GarchResult<f64> {
    variance_steps(*params, returns, backcast).enumerate().try_fold(0.0, |acc, (t, step)| {
        let h = checked_variance(t, step.variance)?;
        Ok(acc - 0.5 * (LN_2PI + h.ln() + step.resid * step.resid / h))
    })
}

/// Conditional variance path `h_0, …, h_{n−1}`.
///
/// # Errors
/// [`GarchError::NonFiniteVariance`] at the first invalid element.
pub fn conditional_variances(
    params: &GarchParams, returns: ArrayView1<f64>, backcast: f64,
) -> GarchResult<Array1<f64>> {
    variance_steps(*params, returns, backcast)
        .enumerate()
        .map(|(t, step)| checked_variance(t, step.variance))
        .collect::<GarchResult<Vec<f64>>>()
        .map(Array1::from)
}

/// Per-observation scores `∂l_t/∂(mu, omega, alpha, beta)` as an `n × 4`
/// matrix; rows feed the robust covariance "meat" `Σ s_t s_tᵀ`.
pub fn score_matrix(
    params: &GarchParams, returns: ArrayView1<f64>, backcast: f64,
) -> GarchResult<Array2<f64>> {
    let mut scores = Array2::<f64>::zeros((returns.len(), GARCH_DIM));
    for (mut out, row) in scores.rows_mut().into_iter().zip(score_rows(*params, returns, backcast))
    {
        let row = row?;
        out.assign(&ArrayView1::from(&row[..]));
    }
    Ok(scores)
}

/// Model-space gradient of the total log-likelihood.
pub fn score_total(
    params: &GarchParams, returns: ArrayView1<f64>, backcast: f64,
) -> GarchResult<Array1<f64>> {
    score_rows(*params, returns, backcast).try_fold(Array1::zeros(GARCH_DIM), |mut acc, row| {
        let row = row?;
        acc += &ArrayView1::from(&row[..]);
        Ok(acc)
    })
}

// ---- Helper methods ----

fn score_rows<'a>(
    params: GarchParams, returns: ArrayView1<'a, f64>, backcast: f64,
) -> impl Iterator<Item = GarchResult<[f64; GARCH_DIM]>> + 'a {
    let mut dh = [0.0_f64; GARCH_DIM];
    let mut prev: Option<VarianceStep> = None;
    variance_steps(params, returns, backcast).enumerate().map(move |(t, step)| {
        if let Some(p) = prev {
            dh = [
                -2.0 * params.alpha * p.resid + params.beta * dh[0],
                1.0 + params.beta * dh[1],
                p.resid * p.resid + params.beta * dh[2],
                p.variance + params.beta * dh[3],
            ];
        }
        prev = Some(step);
        let h = checked_variance(t, step.variance)?;
        let e = step.resid;
        let dl_dh = -0.5 * (1.0 / h - e * e / (h * h));
        let mut row = dh.map(|d| dl_dh * d);
        row[0] += e / h;
        Ok(row)
    })
}

fn checked_variance(index: usize, value: f64) -> GarchResult<f64> {
    if !(value.is_finite() && value > 0.0) {
        return Err(GarchError::NonFiniteVariance { index, value });
    }
    Ok(value)
}
