//! core — GARCH(1,1) parameters, data, variance recursion and forecasts.
//!
//! Purpose
//! -------
//! Hold the numerical building blocks of the GARCH(1,1) estimator: validated
//! parameters and their optimizer-space mapping, the estimation payload,
//! the conditional-variance recursion with its likelihood and scores, and
//! the closed-form variance forecasts. `volatility::models` wires these into
//! the generic maximum-likelihood optimizer.
//!
//! Key behaviors
//! -------------
//! - [`GarchParams`] maps `θ = (mu, softplus⁻¹ omega, logit_α, logit_β)` to
//!   a stationary `(mu, omega, alpha, beta, slack)` and back.
//! - [`variance_steps`] expresses the recursion as a lazy fold; the
//!   likelihood, variance path and score matrix are consumers of it.
//! - [`forecast_one_step`] / [`forecast_path`] extend the recursion past the
//!   sample.
//!
//! Invariants & assumptions
//! ------------------------
//! - `omega > 0`, `alpha, beta ≥ 0` and
//!   `alpha + beta + slack = 1 − STATIONARITY_MARGIN` for every constructed
//!   [`GarchParams`].
//! - The recursion is seeded with the population sample variance held in
//!   [`GarchData::backcast`].
//! - Any variance outside `(0, ∞)` is an error, never a clamp.
//!
//! Conventions
//! -----------
//! - Returns are in scaled units (percent by default); variances are in the
//!   same squared units.
//! - Index `t` of every path lines up with index `t` of the return series.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover validation, the θ round trip, the recursion
//!   against hand-computed values, scores against finite differences, and
//!   forecast mean reversion.

pub mod data;
pub mod forecasts;
pub mod options;
pub mod params;
pub mod validation;
pub mod variance;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::GarchData;
pub use self::forecasts::{forecast_one_step, forecast_path};
pub use self::options::{Covariance, GarchOptions};
pub use self::params::GarchParams;
pub use self::validation::{
    GARCH_DIM, validate_alpha, validate_beta, validate_mu, validate_omega,
    validate_stationarity_and_slack, validate_theta,
};
pub use self::variance::{
    VarianceStep, conditional_variances, log_likelihood, score_matrix, score_total,
    variance_steps,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::data::GarchData;
    pub use super::forecasts::{forecast_one_step, forecast_path};
    pub use super::options::{Covariance, GarchOptions};
    pub use super::params::GarchParams;
    pub use super::variance::{conditional_variances, log_likelihood};
}
