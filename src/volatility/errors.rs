//! Errors for GARCH(1,1) estimation and forecasting.
//!
//! Two enums split the failure surface:
//! - [`ParamError`]: a parameter set or optimizer vector violates the model
//!   domain (`omega > 0`, `alpha, beta ≥ 0`, `alpha + beta < 1`, finite θ).
//! - [`GarchError`]: data, recursion, optimizer and forecasting failures.
//!
//! Both implement `Display`/`Error`; the crate-level `RiskError` and the
//! optimizer's `OptError` convert from them.
use crate::optimization::errors::OptError;

pub type GarchResult<T> = Result<T, GarchError>;

pub type ParamResult<T> = Result<T, ParamError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GarchError {
    // ---- Data ----
    /// Sample variance is zero or non-finite; the recursion cannot be seeded.
    DegenerateVariance { value: f64 },

    // ---- Recursion / forecasting ----
    /// Conditional variance left `(0, ∞)` at `index`.
    NonFiniteVariance { index: usize, value: f64 },

    /// A forecasting input is NaN/±inf (or a variance is non-positive).
    NonFiniteInput { name: &'static str, value: f64 },

    /// Forecast horizon must be at least one step.
    InvalidHorizon { horizon: usize },

    // ---- Estimation ----
    /// The optimizer itself failed.
    Optimization(OptError),

    /// The solver stopped without meeting a convergence tolerance.
    NotConverged { status: String, iterations: usize },

    /// Fitted or supplied parameters violate the model domain.
    Param(ParamError),
}

impl std::error::Error for GarchError {}

impl std::fmt::Display for GarchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GarchError::DegenerateVariance { value } => {
                write!(f, "Sample variance {value} cannot seed the GARCH recursion")
            }
            GarchError::NonFiniteVariance { index, value } => {
                write!(
                    f,
                    "Conditional variance at index {index} is {value}, must be finite and > 0"
                )
            }
            GarchError::NonFiniteInput { name, value } => {
                write!(f, "Forecast input {name} = {value} is not usable")
            }
            GarchError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon {horizon} must be at least 1")
            }
            GarchError::Optimization(err) => write!(f, "GARCH optimization failed: {err}"),
            GarchError::NotConverged { status, iterations } => {
                write!(f, "GARCH fit did not converge after {iterations} iterations ({status})")
            }
            GarchError::Param(err) => write!(f, "Invalid GARCH parameters: {err}"),
        }
    }
}

impl From<OptError> for GarchError {
    fn from(err: OptError) -> Self {
        GarchError::Optimization(err)
    }
}

impl From<ParamError> for GarchError {
    fn from(err: ParamError) -> Self {
        GarchError::Param(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// `alpha + beta` is not strictly below one, or the simplex mass is off.
    StationarityViolated { coeff_sum: f64 },

    /// θ must have exactly four coordinates.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ coordinates must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// Conditional mean must be finite.
    InvalidMu { value: f64 },

    /// Variance intercept must be finite and > 0.
    InvalidOmega { value: f64 },

    /// ARCH coefficient must be finite and ≥ 0.
    InvalidAlpha { value: f64 },

    /// GARCH coefficient must be finite and ≥ 0.
    InvalidBeta { value: f64 },

    /// Slack must be finite and ≥ 0.
    InvalidSlack { value: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::StationarityViolated { coeff_sum } => {
                write!(f, "Persistence alpha + beta = {coeff_sum} must be < 1")
            }
            ParamError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            ParamError::InvalidThetaInput { index, value } => {
                write!(f, "Theta[{index}] = {value}, must be finite")
            }
            ParamError::InvalidMu { value } => write!(f, "mu = {value}, must be finite"),
            ParamError::InvalidOmega { value } => {
                write!(f, "omega = {value}, must be finite and > 0")
            }
            ParamError::InvalidAlpha { value } => {
                write!(f, "alpha = {value}, must be finite and >= 0")
            }
            ParamError::InvalidBeta { value } => {
                write!(f, "beta = {value}, must be finite and >= 0")
            }
            ParamError::InvalidSlack { value } => {
                write!(f, "slack = {value}, must be finite and >= 0")
            }
        }
    }
}
