//! Errors for Student-t tail fitting.
//!
//! [`TailError`] covers the sample checks, the optimizer-space mapping of
//! `(loc, scale, dof)`, optimizer failures, and the degenerate-tail rule
//! (`dof` below the configured minimum means the fitted law has no finite
//! variance and is unusable for risk scaling).
use crate::optimization::errors::OptError;
use statrs::distribution::StudentsTError;

pub type TailResult<T> = Result<T, TailError>;

#[derive(Debug, Clone, PartialEq)]
pub enum TailError {
    // ---- Sample ----
    /// Sample variance is zero or non-finite; there is no scale to fit.
    DegenerateSample { value: f64 },

    // ---- Parameters ----
    /// θ must have exactly three coordinates.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// θ coordinates must be finite.
    InvalidThetaInput { index: usize, value: f64 },

    /// A decoded parameter left its domain (e.g. softplus underflow to 0).
    InvalidParam { name: &'static str, value: f64 },

    /// `statrs` rejected the distribution parameters.
    Distribution { text: String },

    // ---- Estimation ----
    /// The optimizer itself failed.
    Optimization(OptError),

    /// The solver stopped without meeting a convergence tolerance.
    NotConverged { status: String, iterations: usize },

    /// Fitted degrees of freedom are below the configured minimum.
    DegenerateTail { dof: f64, min_dof: f64 },
}

impl std::error::Error for TailError {}

impl std::fmt::Display for TailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TailError::DegenerateSample { value } => {
                write!(f, "Sample variance {value} leaves no scale to fit")
            }
            TailError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            TailError::InvalidThetaInput { index, value } => {
                write!(f, "Theta[{index}] = {value}, must be finite")
            }
            TailError::InvalidParam { name, value } => {
                write!(f, "Student-t {name} = {value} is outside its domain")
            }
            TailError::Distribution { text } => write!(f, "Student-t distribution error: {text}"),
            TailError::Optimization(err) => write!(f, "Student-t optimization failed: {err}"),
            TailError::NotConverged { status, iterations } => {
                write!(f, "Student-t fit did not converge after {iterations} iterations ({status})")
            }
            TailError::DegenerateTail { dof, min_dof } => {
                write!(f, "Fitted degrees of freedom {dof} below minimum {min_dof}")
            }
        }
    }
}

impl From<OptError> for TailError {
    fn from(err: OptError) -> Self {
        TailError::Optimization(err)
    }
}

impl From<StudentsTError> for TailError {
    fn from(err: StudentsTError) -> Self {
        TailError::Distribution { text: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::StudentsT;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Conversion of `statrs` constructor errors.
    // - The round trip through `OptError` used inside likelihood evaluation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A rejected `StudentsT` constructor surfaces as `Distribution`.
    //
    // Given
    // -----
    // - A negative scale.
    //
    // Expect
    // ------
    // - `TailError::Distribution` with a non-empty message.
    fn statrs_error_maps_to_distribution() {
        // Act
        let err: TailError = StudentsT::new(0.0, -1.0, 5.0).unwrap_err().into();

        // Assert
        match err {
            TailError::Distribution { text } => assert!(!text.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Parameter errors keep their payload through `OptError`.
    //
    // Given
    // -----
    // - `InvalidParam { name: "scale", value: 0.0 }`.
    //
    // Expect
    // ------
    // - `OptError::InvalidModelParam` with the same name and value.
    fn param_error_survives_opt_error_conversion() {
        // Act
        let err: OptError = TailError::InvalidParam { name: "scale", value: 0.0 }.into();

        // Assert
        assert_eq!(err, OptError::InvalidModelParam { name: "scale", value: 0.0 });
    }
}
