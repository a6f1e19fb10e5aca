//! Pipeline configuration and per-run requests.
//!
//! [`RiskConfig`] is fixed for the lifetime of a pipeline (return scale,
//! minimum sample, calendar, estimator options). [`RiskRequest`] carries
//! the per-call inputs and is validated eagerly, so a bad request fails
//! before any model is fitted.
use crate::{
    errors::RiskResult,
    returns::ReturnsProcessor,
    risk::{
        historical::validate_window,
        parametric::{
            DEFAULT_TRADING_DAYS, validate_collateral, validate_days, validate_implied_vol,
        },
        quantiles::validate_risk_level,
    },
    tails::TailOptions,
    volatility::GarchOptions,
};

/// Static pipeline configuration.
///
/// Default: scale 100, 30 observations, 365 days, default GARCH and tail
/// options.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub processor: ReturnsProcessor,
    pub trading_days: f64,
    pub garch: GarchOptions,
    pub tail: TailOptions,
}

impl RiskConfig {
    /// # Errors
    /// [`RiskError::InvalidParameter`] for a bad scale, minimum sample or
    /// day count.
    pub fn new(
        scale: f64, min_observations: usize, trading_days: f64, garch: GarchOptions,
        tail: TailOptions,
    ) -> RiskResult<Self> {
        let processor = ReturnsProcessor::new(scale, min_observations)?;
        validate_days(trading_days)?;
        Ok(Self { processor, trading_days, garch, tail })
    }

    pub fn scale(&self) -> f64 {
        self.processor.scale()
    }

    pub fn min_observations(&self) -> usize {
        self.processor.min_observations()
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            processor: ReturnsProcessor::default(),
            trading_days: DEFAULT_TRADING_DAYS,
            garch: GarchOptions::default(),
            tail: TailOptions::default(),
        }
    }
}

/// Inputs of a single risk run.
///
/// - `risk_level`: lower-tail probability in `(0, 0.5)`, e.g. `0.01`.
/// - `collateral_value`: position size in money units, `> 0`.
/// - `historical_window`: trailing window for historical simulation, `> 0`.
/// - `implied_vol_percent`: optional annualized implied volatility in
///   percent, `≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskRequest {
    pub risk_level: f64,
    pub collateral_value: f64,
    pub historical_window: usize,
    pub implied_vol_percent: Option<f64>,
}

impl RiskRequest {
    /// # Errors
    /// [`RiskError::InvalidParameter`] naming the first invalid field.
    pub fn new(
        risk_level: f64, collateral_value: f64, historical_window: usize,
        implied_vol_percent: Option<f64>,
    ) -> RiskResult<Self> {
        validate_risk_level(risk_level)?;
        validate_collateral(collateral_value)?;
        validate_window(historical_window)?;
        if let Some(iv) = implied_vol_percent {
            validate_implied_vol(iv)?;
        }
        Ok(Self { risk_level, collateral_value, historical_window, implied_vol_percent })
    }
}
