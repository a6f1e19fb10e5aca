//! volatility — GARCH(1,1) conditional volatility: core numerics, model, errors.
//!
//! Purpose
//! -------
//! Estimate the conditional variance of a return series with a GARCH(1,1)
//! model and a constant mean, and forecast it forward. This is the source
//! of the daily volatility that parametric VaR scales.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds parameters, data, the variance recursion with its
//!   likelihood and scores, and closed-form forecasts.
//! - [`models`] exposes [`GarchModel::fit`], which runs L-BFGS on the
//!   averaged likelihood with analytic gradients and returns a [`GarchFit`].
//! - [`errors`] defines [`GarchError`] and [`ParamError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitted parameters always satisfy `omega > 0`, `alpha, beta ≥ 0` and
//!   `alpha + beta < 1` (with a fixed margin).
//! - Returns are finite and in scaled units; the backcast variance is
//!   strictly positive.
//!
//! Conventions
//! -----------
//! - Variances and volatilities are in the units of the scaled returns.
//!   Callers divide by the return scale to obtain fractions.
//! - The module performs no I/O. It emits `tracing` events on fit
//!   completion, non-convergence and dropped standard errors.
//!
//! Downstream usage
//! ----------------
//! - `risk::pipeline` fits a [`GarchModel`] per request and consumes
//!   [`GarchFit::forecast_one_step`].
//! - `GarchError` / `ParamError` convert into the crate-level `RiskError`.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; the pipeline integration test
//!   fits a simulated heavy-tailed path end to end.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Covariance, GarchData, GarchOptions, GarchParams, forecast_one_step, forecast_path,
};
pub use self::errors::{GarchError, GarchResult, ParamError, ParamResult};
pub use self::models::{GarchFit, GarchModel};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use crypto_risk::volatility::prelude::*;
//
// to import the GARCH surface in a single line.

pub mod prelude {
    pub use super::{
        Covariance, GarchError, GarchFit, GarchModel, GarchOptions, GarchParams, GarchResult,
        ParamError, forecast_one_step, forecast_path,
    };
}
