//! risk — VaR and expected shortfall under several methodologies.
//!
//! Purpose
//! -------
//! Turn fitted volatility and tail models (plus an optional implied
//! volatility) into money-denominated VaR and ES figures, and orchestrate a
//! full run through [`RiskPipeline`].
//!
//! Key behaviors
//! -------------
//! - [`quantiles`]: normal / Student-t multipliers and the linear-interpolation
//!   empirical quantile.
//! - [`parametric`]: `collateral · multiplier · vol` with `√days`
//!   annualization, for GARCH and implied volatility.
//! - [`historical`]: rolling historical-simulation VaR and its mean.
//! - [`shortfall`]: empirical ES beyond a VaR threshold.
//! - [`config`] / [`estimate`]: run configuration, request and result record.
//! - [`pipeline`]: the orchestration with per-methodology partial results.
//!
//! Conventions
//! -----------
//! - VaR and ES are reported as positive losses.
//! - The risk level is the lower-tail probability (`0.01` → 99% VaR).

pub mod config;
pub mod estimate;
pub mod historical;
pub mod parametric;
pub mod pipeline;
pub mod quantiles;
pub mod shortfall;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{RiskConfig, RiskRequest};
pub use self::estimate::{Methodology, RiskEstimate};
pub use self::historical::{historical_var, mean_var};
pub use self::parametric::{
    DEFAULT_TRADING_DAYS, VarFigure, annualize, garch_var, implied_vol_var, parametric_var,
};
pub use self::pipeline::RiskPipeline;
pub use self::quantiles::{TailModel, empirical_quantile, quantile_multiplier};
pub use self::shortfall::expected_shortfall;

// ---- Prelude (convenience imports for downstream crates) -------------------

pub mod prelude {
    pub use super::config::{RiskConfig, RiskRequest};
    pub use super::estimate::{Methodology, RiskEstimate};
    pub use super::parametric::VarFigure;
    pub use super::pipeline::RiskPipeline;
    pub use super::quantiles::TailModel;
}
