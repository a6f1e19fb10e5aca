//! Crate-level error taxonomy for risk estimation.
//!
//! [`RiskError`] is what callers of the pipeline and the risk formulas see.
//! Layer-specific errors ([`OptError`], [`GarchError`], [`ParamError`],
//! [`TailError`]) convert into it, and under `python-bindings` it converts
//! into a Python `ValueError`.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Prices must be **strictly positive and finite**.
//! - Solver failures, including parameters that violate stationarity after
//!   optimization, surface as [`RiskError::Convergence`] with the lower
//!   layer's message.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::{NormalError, StudentsTError};

use crate::{
    optimization::errors::OptError,
    tails::errors::TailError,
    volatility::errors::{GarchError, ParamError},
};

/// Crate-wide result alias.
pub type RiskResult<T> = Result<T, RiskError>;

/// Unified error type for returns processing, model fitting and risk
/// measures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RiskError {
    // ---- Input validation ----
    /// A price is non-positive or NaN/±inf.
    InvalidPrice { index: usize, value: f64 },

    /// Fewer observations than an operation requires.
    InsufficientData { required: usize, actual: usize, context: &'static str },

    /// A configuration or request value is outside its domain.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    // ---- Estimation ----
    /// An optimizer stopped without converging or produced unusable
    /// parameters.
    Convergence { reason: String },

    /// The fitted Student-t has too few degrees of freedom.
    DegenerateTail { dof: f64 },

    // ---- Risk measures ----
    /// No return lies at or below the expected-shortfall threshold.
    EmptyTail { threshold: f64 },

    /// A computation produced or received a non-finite value.
    Numerical { context: &'static str, value: f64 },
}

impl std::error::Error for RiskError {}

impl std::fmt::Display for RiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskError::InvalidPrice { index, value } => {
                write!(f, "Price at index {index} is {value}; prices must be finite and > 0")
            }
            RiskError::InsufficientData { required, actual, context } => {
                write!(f, "{context} needs at least {required} observations, got {actual}")
            }
            RiskError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid {name} = {value}: {reason}")
            }
            RiskError::Convergence { reason } => write!(f, "Estimation failed: {reason}"),
            RiskError::DegenerateTail { dof } => {
                write!(f, "Student-t fit is degenerate: dof = {dof} implies infinite variance")
            }
            RiskError::EmptyTail { threshold } => {
                write!(f, "No returns at or below the loss threshold {threshold}")
            }
            RiskError::Numerical { context, value } => {
                write!(f, "Non-finite or degenerate {context}: {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<RiskError> for PyErr {
    fn from(err: RiskError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<OptError> for RiskError {
    fn from(err: OptError) -> Self {
        match err {
            OptError::InvalidTolGrad { tol, reason } => {
                RiskError::InvalidParameter { name: "tol_grad", value: tol, reason }
            }
            OptError::InvalidTolCost { tol, reason } => {
                RiskError::InvalidParameter { name: "tol_cost", value: tol, reason }
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                RiskError::InvalidParameter { name: "max_iter", value: max_iter as f64, reason }
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                RiskError::InvalidParameter { name: "lbfgs_mem", value: mem as f64, reason }
            }
            OptError::InvalidLineSearch { reason, .. } => {
                RiskError::InvalidParameter { name: "line_searcher", value: f64::NAN, reason }
            }
            OptError::NonFiniteCost { value } => {
                RiskError::Numerical { context: "log-likelihood", value }
            }
            OptError::NonFiniteVariance { value, .. } => {
                RiskError::Numerical { context: "conditional variance", value }
            }
            other => RiskError::Convergence { reason: other.to_string() },
        }
    }
}

impl From<ParamError> for RiskError {
    fn from(err: ParamError) -> Self {
        RiskError::Convergence { reason: err.to_string() }
    }
}

impl From<GarchError> for RiskError {
    fn from(err: GarchError) -> Self {
        match err {
            GarchError::DegenerateVariance { value } => {
                RiskError::Numerical { context: "sample variance", value }
            }
            GarchError::NonFiniteVariance { value, .. } => {
                RiskError::Numerical { context: "conditional variance", value }
            }
            GarchError::NonFiniteInput { name, value } => {
                RiskError::Numerical { context: name, value }
            }
            GarchError::InvalidHorizon { horizon } => RiskError::InvalidParameter {
                name: "horizon",
                value: horizon as f64,
                reason: "forecast horizon must be at least 1",
            },
            GarchError::Optimization(opt_err) => opt_err.into(),
            GarchError::Param(param_err) => param_err.into(),
            other @ GarchError::NotConverged { .. } => {
                RiskError::Convergence { reason: other.to_string() }
            }
        }
    }
}

impl From<TailError> for RiskError {
    fn from(err: TailError) -> Self {
        match err {
            TailError::DegenerateTail { dof, .. } => RiskError::DegenerateTail { dof },
            TailError::DegenerateSample { value } => {
                RiskError::Numerical { context: "sample variance", value }
            }
            TailError::InvalidParam { name: "min_dof", value } => RiskError::InvalidParameter {
                name: "min_dof",
                value,
                reason: "minimum degrees of freedom must be finite and > 0",
            },
            TailError::Optimization(opt_err) => opt_err.into(),
            other => RiskError::Convergence { reason: other.to_string() },
        }
    }
}

impl From<NormalError> for RiskError {
    fn from(_: NormalError) -> Self {
        RiskError::InvalidParameter {
            name: "normal",
            value: f64::NAN,
            reason: "rejected by the normal distribution constructor",
        }
    }
}

impl From<StudentsTError> for RiskError {
    fn from(_: StudentsTError) -> Self {
        RiskError::InvalidParameter {
            name: "dof",
            value: f64::NAN,
            reason: "rejected by the Student-t distribution constructor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Mapping of each lower-layer error family onto the taxonomy.
    // - `Display` messages naming the offending value.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Estimation failures land in the right taxonomy bucket.
    //
    // Given
    // -----
    // - GARCH non-convergence, a stationarity violation, a degenerate tail,
    //   a zero sample variance and an invalid tolerance.
    //
    // Expect
    // ------
    // - `Convergence`, `Convergence`, `DegenerateTail`, `Numerical`,
    //   `InvalidParameter`.
    fn lower_layer_errors_map_onto_taxonomy() {
        // Act
        let not_converged: RiskError =
            GarchError::NotConverged { status: "max iterations".into(), iterations: 500 }.into();
        let stationarity: RiskError =
            GarchError::Param(ParamError::StationarityViolated { coeff_sum: 1.0 }).into();
        let tail: RiskError = TailError::DegenerateTail { dof: 1.5, min_dof: 2.0 }.into();
        let variance: RiskError = GarchError::DegenerateVariance { value: 0.0 }.into();
        let tol: RiskError =
            GarchError::Optimization(OptError::InvalidTolGrad { tol: -1.0, reason: "negative" })
                .into();

        // Assert
        assert!(matches!(not_converged, RiskError::Convergence { .. }));
        assert!(matches!(stationarity, RiskError::Convergence { .. }));
        assert_eq!(tail, RiskError::DegenerateTail { dof: 1.5 });
        assert_eq!(variance, RiskError::Numerical { context: "sample variance", value: 0.0 });
        assert!(matches!(tol, RiskError::InvalidParameter { name: "tol_grad", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Messages carry the offending index and value.
    //
    // Given
    // -----
    // - `InvalidPrice { index: 3, value: -1.0 }`.
    //
    // Expect
    // ------
    // - The message mentions both.
    fn display_names_offending_value() {
        // Act
        let msg = RiskError::InvalidPrice { index: 3, value: -1.0 }.to_string();

        // Assert
        assert!(msg.contains("index 3"));
        assert!(msg.contains("-1"));
    }
}
