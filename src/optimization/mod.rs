//! optimization — maximum-likelihood machinery shared by every estimator.
//!
//! Purpose
//! -------
//! Give the volatility and tail estimators one place to turn "here is a
//! log-likelihood" into "here are fitted parameters". The layer bundles an
//! argmin-backed L-BFGS driver, guarded parameter transforms, and a single
//! error surface so estimators never touch solver generics directly.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer` maximizes a user `ℓ(θ)` with L-BFGS and a selectable
//!   line search, falling back to finite differences when no analytic
//!   gradient exists.
//! - `numerical_stability` maps unconstrained θ onto positive scales and a
//!   stationary `(alpha, beta)` simplex.
//! - `errors::OptError` collects configuration, backend, and
//!   model-evaluation failures behind `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimization always happens in unconstrained θ-space; the model layer
//!   owns the θ ↔ parameter mapping and reports domain violations as
//!   `OptError` values rather than panicking.
//! - Every θ reachable by the solver maps to an admissible parameter set, so
//!   a failed evaluation means numerical trouble, not an out-of-bounds step.
//!
//! Conventions
//! -----------
//! - The solver minimizes `c(θ) = -ℓ(θ)`; everything user-facing (outcome
//!   values, gradients supplied by models) is stated in terms of `ℓ`.
//! - This layer does not log except through the optional `obs_slog` observer;
//!   estimators emit their own `tracing` events around each fit.
//!
//! Downstream usage
//! ----------------
//! - `volatility::models::garch` and `tails::student_t` implement
//!   `LogLikelihood` and call `maximize`.
//! - `inference::hessian` reuses the finite-difference Hessian helpers for
//!   standard errors.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use crypto_risk::optimization::prelude::*;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
