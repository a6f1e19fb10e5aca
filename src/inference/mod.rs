//! inference — post-estimation uncertainty for fitted models.
//!
//! Purpose
//! -------
//! Convert an MLE and its gradient into standard errors. Classical errors
//! come from the observed information alone; robust (QMLE) errors use the
//! sandwich `J⁺ S J⁺` with the outer product of per-observation scores.
//!
//! Conventions
//! -----------
//! - Gradients and score products are on the total log-likelihood scale.
//! - Failures are `OptError`s; callers decide whether to degrade to "no
//!   standard errors" or abort.
//!
//! Downstream usage
//! ----------------
//! - `volatility::models::garch::GarchModel::fit`.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::calc_standard_errors;

pub mod prelude {
    pub use super::hessian::calc_standard_errors;
}
