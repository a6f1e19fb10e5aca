//! models — user-facing GARCH(1,1) estimator.
//!
//! [`GarchModel`] implements the crate's `LogLikelihood` trait over [`GarchData`](crate::volatility::core::GarchData) and exposes `fit`,
//! which returns a self-contained [`GarchFit`] (parameters, variance path,
//! standardized residuals, information criteria, standard errors and
//! forecasting helpers).

pub mod garch;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::garch::{GarchFit, GarchModel};

pub mod prelude {
    pub use super::garch::{GarchFit, GarchModel};
}
