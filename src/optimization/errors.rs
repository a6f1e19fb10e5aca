//! Error surface for the optimization layer.
//!
//! [`OptError`] normalizes three sources of failure into one enum:
//! configuration mistakes (tolerances, line search, L-BFGS memory), argmin
//! backend errors (downcast from `argmin::core::Error`), and model-evaluation
//! failures raised by a `LogLikelihood` implementation (parameter mapping,
//! variance recursion, distribution construction).
use argmin::core::{ArgminError, Error};

use crate::{
    tails::errors::TailError,
    volatility::errors::{GarchError, ParamError},
};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Signals the adapter to fall back to finite differences.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one stopping rule must be provided.
    NoTolerancesProvided,

    /// Unknown line searcher name.
    InvalidLineSearch { name: String, reason: &'static str },

    /// L-BFGS history must hold at least one pair.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost { value: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Solver finished without a best parameter vector.
    MissingThetaHat,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckpointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Any other error surfaced through argmin.
    BackendError { text: String },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    /// Hessian values need to be finite.
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Parameter mapping ----
    /// alpha + beta reached the stationarity boundary.
    StationarityViolated { coeff_sum: f64 },

    /// θ has the wrong number of coordinates.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ contains a non-finite coordinate.
    InvalidThetaInput { index: usize, value: f64 },

    /// A model-space parameter fell outside its domain.
    InvalidModelParam { name: &'static str, value: f64 },

    // ---- Model evaluation ----
    /// Conditional variance became non-positive or non-finite at `index`.
    NonFiniteVariance { index: usize, value: f64 },

    /// A distribution could not be built from the current parameters.
    InvalidDistribution { text: String },

    /// Any other model failure, carried as text.
    ModelEvaluation { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No stopping rule provided"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => write!(f, "Non-finite cost value: {value}"),

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver returned no parameter estimate"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Parameter mapping ----
            OptError::StationarityViolated { coeff_sum } => {
                write!(f, "Persistence alpha + beta = {coeff_sum} is not below one")
            }
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InvalidModelParam { name, value } => {
                write!(f, "Parameter {name} = {value} is outside its domain")
            }

            // ---- Model evaluation ----
            OptError::NonFiniteVariance { index, value } => {
                write!(
                    f,
                    "Conditional variance at index {index} is {value}, must be finite and > 0"
                )
            }
            OptError::InvalidDistribution { text } => {
                write!(f, "Invalid distribution parameters: {text}")
            }
            OptError::ModelEvaluation { text } => write!(f, "Model evaluation failed: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown optimizer error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Model errors travel through argmin boxed as `Error`; recover them first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                #[allow(unreachable_patterns)]
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ParamError> for OptError {
    fn from(err: ParamError) -> Self {
        match err {
            ParamError::StationarityViolated { coeff_sum } => {
                OptError::StationarityViolated { coeff_sum }
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            ParamError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            ParamError::InvalidMu { value } => OptError::InvalidModelParam { name: "mu", value },
            ParamError::InvalidOmega { value } => {
                OptError::InvalidModelParam { name: "omega", value }
            }
            ParamError::InvalidAlpha { value } => {
                OptError::InvalidModelParam { name: "alpha", value }
            }
            ParamError::InvalidBeta { value } => {
                OptError::InvalidModelParam { name: "beta", value }
            }
            ParamError::InvalidSlack { value } => {
                OptError::InvalidModelParam { name: "slack", value }
            }
        }
    }
}

impl From<GarchError> for OptError {
    fn from(err: GarchError) -> Self {
        match err {
            GarchError::NonFiniteVariance { index, value } => {
                OptError::NonFiniteVariance { index, value }
            }
            GarchError::Param(param_err) => param_err.into(),
            GarchError::Optimization(opt_err) => opt_err,
            other => OptError::ModelEvaluation { text: other.to_string() },
        }
    }
}

impl From<TailError> for OptError {
    fn from(err: TailError) -> Self {
        match err {
            TailError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            TailError::InvalidThetaInput { index, value } => {
                OptError::InvalidThetaInput { index, value }
            }
            TailError::InvalidParam { name, value } => OptError::InvalidModelParam { name, value },
            TailError::Distribution { text } => OptError::InvalidDistribution { text },
            TailError::Optimization(opt_err) => opt_err,
            other => OptError::ModelEvaluation { text: other.to_string() },
        }
    }
}
