//! Parametric VaR: multiplier × volatility × collateral.
//!
//! Two volatility sources feed the same formula:
//! - a GARCH one-step forecast, a **daily** fraction that is annualized with
//!   the square-root-of-time rule, and
//! - an implied volatility quote, an **annual** percentage that is
//!   de-annualized for the daily figure and used as-is for the annual one.
//!
//! The square-root rule assumes i.i.d. daily returns; crypto trades every
//! calendar day, hence the default of 365 days.
use crate::errors::{RiskError, RiskResult};

/// Calendar days per year for a market that never closes.
pub const DEFAULT_TRADING_DAYS: f64 = 365.0;

/// Daily and annual VaR in money units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VarFigure {
    pub daily: f64,
    pub annual: f64,
}

impl VarFigure {
    /// Pair a daily figure with its square-root-of-time annualization.
    pub fn from_daily(daily: f64, days: f64) -> RiskResult<Self> {
        Ok(Self { daily, annual: annualize(daily, days)? })
    }
}

/// `collateral · multiplier · daily_vol`.
///
/// # Errors
/// - [`RiskError::InvalidParameter`] for a non-positive collateral or a
///   negative multiplier.
/// - [`RiskError::Numerical`] for a non-finite or negative volatility.
pub fn parametric_var(collateral: f64, multiplier: f64, daily_vol: f64) -> RiskResult<f64> {
    validate_collateral(collateral)?;
    validate_multiplier(multiplier)?;
    if !(daily_vol.is_finite() && daily_vol >= 0.0) {
        return Err(RiskError::Numerical { context: "daily volatility", value: daily_vol });
    }
    Ok(collateral * multiplier * daily_vol)
}

/// `daily · sqrt(days)`.
///
/// # Errors
/// [`RiskError::InvalidParameter`] unless `days` is finite and `> 0`.
pub fn annualize(daily: f64, days: f64) -> RiskResult<f64> {
    validate_days(days)?;
    Ok(daily * days.sqrt())
}

/// Normal or Student-t VaR from a GARCH daily volatility (as a fraction).
pub fn garch_var(
    collateral: f64, multiplier: f64, daily_vol: f64, days: f64,
) -> RiskResult<VarFigure> {
    VarFigure::from_daily(parametric_var(collateral, multiplier, daily_vol)?, days)
}

/// VaR from an annualized implied volatility quoted in percent.
///
/// `daily = collateral · multiplier · (iv/100) / sqrt(days)` and
/// `annual = collateral · multiplier · (iv/100)`.
///
/// # Errors
/// [`RiskError::InvalidParameter`] for a negative or non-finite
/// `implied_vol_percent`, plus the checks of [`parametric_var`].
pub fn implied_vol_var(
    collateral: f64, multiplier: f64, implied_vol_percent: f64, days: f64,
) -> RiskResult<VarFigure> {
    validate_implied_vol(implied_vol_percent)?;
    validate_days(days)?;
    let annual = parametric_var(collateral, multiplier, implied_vol_percent / 100.0)?;
    Ok(VarFigure { daily: annual / days.sqrt(), annual })
}

pub fn validate_collateral(collateral: f64) -> RiskResult<()> {
    if !(collateral.is_finite() && collateral > 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "collateral_value",
            value: collateral,
            reason: "collateral must be finite and > 0",
        });
    }
    Ok(())
}

pub fn validate_implied_vol(implied_vol_percent: f64) -> RiskResult<()> {
    if !(implied_vol_percent.is_finite() && implied_vol_percent >= 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "implied_vol_percent",
            value: implied_vol_percent,
            reason: "implied volatility must be finite and >= 0",
        });
    }
    Ok(())
}

pub fn validate_days(days: f64) -> RiskResult<()> {
    if !(days.is_finite() && days > 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "trading_days",
            value: days,
            reason: "days per year must be finite and > 0",
        });
    }
    Ok(())
}

// ---- Helper methods ----

fn validate_multiplier(multiplier: f64) -> RiskResult<()> {
    if !(multiplier.is_finite() && multiplier >= 0.0) {
        return Err(RiskError::InvalidParameter {
            name: "multiplier",
            value: multiplier,
            reason: "quantile multiplier must be finite and >= 0",
        });
    }
    Ok(())
}
