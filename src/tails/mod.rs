//! tails — Student-t fit of the unconditional return distribution.
//!
//! Purpose
//! -------
//! Supply the fitted degrees of freedom that the risk layer uses for its
//! fat-tailed quantile multiplier.
//!
//! Key behaviors
//! -------------
//! - [`StudentTFitter`] implements the crate's `LogLikelihood` trait with an
//!   analytic gradient and runs the shared L-BFGS optimizer.
//! - Fits with `dof < min_dof` are rejected as [`TailError::DegenerateTail`]
//!   and logged with `tracing::warn!`.
//!
//! Conventions
//! -----------
//! - Location and scale are in scaled return units; `dof` is unitless.

pub mod errors;
pub mod student_t;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{TailError, TailResult};
pub use self::student_t::{
    DOF_CAP, DOF_FLOOR, StudentTFitter, TAIL_DIM, TDistParams, TailOptions,
};

pub mod prelude {
    pub use super::errors::{TailError, TailResult};
    pub use super::student_t::{StudentTFitter, TDistParams, TailOptions};
}
