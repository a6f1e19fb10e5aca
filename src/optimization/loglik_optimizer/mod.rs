//! loglik_optimizer — argmin-powered maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Let an estimator implement a single trait, [`LogLikelihood`], and obtain
//! an MLE through [`maximize`]. The module hides argmin's solver generics,
//! line-search wiring, finite-difference fallbacks and result validation.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] exposes `c(θ) = -ℓ(θ)` to argmin and flips
//!   the sign of analytic gradients.
//! - [`maximize`] validates θ₀ with [`LogLikelihood::check`], picks an L-BFGS
//!   solver in [`builders`] from [`traits::LineSearcher`], runs it via
//!   [`run::run_lbfgs`], and returns an [`OptimOutcome`].
//! - [`finite_diff`] provides gradient and Hessian approximations used both
//!   during the search and afterwards for standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `value` and `grad` report failures as [`OptError`]; nothing here panics
//!   on bad model output.
//! - [`MLEOptions`] and [`Tolerances`] are validated at construction.
//!
//! Conventions
//! -----------
//! - [`OptimOutcome::value`] is `ℓ(θ̂)` on whatever scale the model returns
//!   (the GARCH and Student-t objectives return per-observation averages).
//! - [`OptimOutcome::converged`] is `true` only when the solver hit one of
//!   its own stopping rules; an iteration cap does not count.
//!   [`OptimOutcome::accepted`] also admits a stop whose last gradient norm
//!   is below [`FLAT_GRAD_TOL`].
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign handling in [`adapter`], solver wiring in
//!   [`builders`], derivative checks in [`finite_diff`] and [`validation`],
//!   and configuration in [`traits`]. End-to-end use is exercised by the
//!   GARCH and Student-t fits.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{
    Cost, DEFAULT_LBFGS_MEM, FLAT_GRAD_TOL, FnEvalMap, Grad, Hessian, Theta,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
