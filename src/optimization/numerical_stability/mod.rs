//! numerical_stability — guarded transforms between optimizer and model space.
//!
//! Purpose
//! -------
//! Collect the scalar and vector maps that turn an unconstrained optimizer
//! vector `θ` into valid model parameters: strictly positive scales
//! (softplus), and stationary GARCH coefficients on a scaled simplex
//! (softmax with an implicit slack). Tolerances shared by the model and
//! inference layers live here so every caller agrees on them.
//!
//! Key behaviors
//! -------------
//! - `safe_softplus` / `safe_softplus_inv` map ℝ ↔ (0, ∞) without overflow;
//!   `safe_logistic` is their derivative for chain-rule gradients.
//! - `safe_softmax` maps logits to `(alpha, beta)` with
//!   `alpha + beta + slack = 1 − STATIONARITY_MARGIN`;
//!   `safe_softmax_deriv` pushes simplex gradients back to logits.
//! - `EIGEN_EPS` is the eigenvalue cutoff used by `inference::hessian`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; shape agreement between weight and logit views is the
//!   caller's responsibility.
//! - Every output of `safe_softmax` is non-negative and the total mass is
//!   fixed, so any θ maps to a stationary GARCH(1,1).
//!
//! Conventions
//! -----------
//! - Pure functions over `f64` and `ndarray` views; no allocation in the
//!   vector helpers, no logging.
//!
//! Downstream usage
//! ----------------
//! - `volatility::core::params` for `(mu, omega, alpha, beta)` ↔ θ.
//! - `tails::student_t` for `(loc, scale, dof)` ↔ θ.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] check naïve-formula agreement, mass
//!   conservation, and the softmax Jacobian against finite differences.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, LOGIT_EPS, STATIONARITY_MARGIN, safe_logistic, safe_softmax, safe_softmax_deriv,
    safe_softplus, safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        STATIONARITY_MARGIN, safe_logistic, safe_softmax, safe_softplus, safe_softplus_inv,
    };
}
