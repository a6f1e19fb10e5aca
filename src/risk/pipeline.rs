//! risk::pipeline — prices → returns → models → VaR / ES bundle.
//!
//! Purpose
//! -------
//! Orchestrate one risk run: validate the request, build returns, fit the
//! GARCH(1,1) and Student-t models, and evaluate every methodology
//! independently into a [`RiskEstimate`].
//!
//! Key behaviors
//! -------------
//! - Request validation and returns-level failures (invalid prices, a
//!   sample below the global minimum) abort the run with an error.
//! - Model and methodology failures do **not** abort: each figure in the
//!   estimate is its own `RiskResult`, and a failure is logged with
//!   `tracing::warn!`.
//! - Methodologies:
//!   - normal / Student-t × GARCH volatility,
//!   - normal / Student-t × implied volatility (when supplied),
//!   - historical simulation (mean of the rolling VaR series),
//!   - ES under Student-t (threshold = t multiplier × GARCH sigma) and
//!     under historical simulation (threshold = mean historical VaR).
//!
//! Conventions
//! -----------
//! - Models run on scaled returns. Parametric VaR uses
//!   `daily_vol = sigma / scale`; historical and ES figures convert scaled
//!   returns to money with `collateral · x / scale`.
//! - The pipeline holds only immutable configuration and is `Send + Sync`;
//!   concurrent runs share nothing.
use crate::{
    errors::{RiskError, RiskResult},
    returns::{PriceSeries, ReturnSeries},
    risk::{
        config::{RiskConfig, RiskRequest},
        estimate::RiskEstimate,
        historical::{historical_var, mean_var},
        parametric::{VarFigure, garch_var, implied_vol_var, validate_days},
        quantiles::{TailModel, quantile_multiplier},
        shortfall::expected_shortfall,
    },
    tails::{StudentTFitter, TDistParams},
    volatility::GarchModel,
};

/// Return standard deviations outside this band suggest the scale is off
/// (e.g. raw fractions passed with `scale = 1`).
const WELL_SCALED_SD: (f64, f64) = (0.1, 1_000.0);

/// Stateless risk engine over a fixed [`RiskConfig`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskPipeline {
    config: RiskConfig,
}

impl RiskPipeline {
    /// # Errors
    /// [`RiskError::InvalidParameter`] for an invalid day count.
    pub fn new(config: RiskConfig) -> RiskResult<Self> {
        validate_days(config.trading_days)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Run every methodology on a price series.
    ///
    /// # Errors
    /// - Request validation errors ([`RiskError::InvalidParameter`]).
    /// - [`RiskError::InvalidPrice`] / [`RiskError::InsufficientData`] from
    ///   the returns processor.
    pub fn run(&self, prices: &PriceSeries, request: &RiskRequest) -> RiskResult<RiskEstimate> {
        validate_request(request)?;
        let returns = self.config.processor.compute(prices)?;
        self.run_returns(&returns, request)
    }

    /// Run every methodology on pre-computed scaled returns. Money figures
    /// use the scale carried by `returns`.
    ///
    /// # Errors
    /// - Request validation errors.
    /// - [`RiskError::InsufficientData`] below the configured minimum.
    pub fn run_returns(
        &self, returns: &ReturnSeries, request: &RiskRequest,
    ) -> RiskResult<RiskEstimate> {
        validate_request(request)?;
        let min_obs = self.config.min_observations();
        if returns.len() < min_obs {
            return Err(RiskError::InsufficientData {
                required: min_obs,
                actual: returns.len(),
                context: "return series",
            });
        }
        let sd = returns.std_dev();
        if !(sd > WELL_SCALED_SD.0 && sd < WELL_SCALED_SD.1) {
            tracing::warn!(std_dev = sd, scale = returns.scale(), "returns look poorly scaled");
        }

        let scale = returns.scale();
        let days = self.config.trading_days;
        let collateral = request.collateral_value;
        let risk_level = request.risk_level;
        let to_money = |x: f64| collateral * x / scale;

        // ---- Models ----
        let sigma = self.garch_sigma(returns);
        let daily_vol = sigma.clone().map(|s| s / scale);
        let t_params = self.student_t(returns);

        // ---- Multipliers ----
        let z = quantile_multiplier(TailModel::Normal, risk_level);
        let t_mult = t_params
            .clone()
            .and_then(|p| quantile_multiplier(TailModel::StudentT { dof: p.dof }, risk_level));

        // ---- Parametric VaR ----
        let normal_garch =
            both(&z, &daily_vol).and_then(|(m, v)| garch_var(collateral, m, v, days));
        let student_t_garch =
            both(&t_mult, &daily_vol).and_then(|(m, v)| garch_var(collateral, m, v, days));
        let implied = |mult: &RiskResult<f64>| {
            request.implied_vol_percent.map(|iv| {
                mult.clone().and_then(|m| implied_vol_var(collateral, m, iv, days))
            })
        };
        let normal_implied = implied(&z);
        let student_t_implied = implied(&t_mult);

        // ---- Historical simulation ----
        let hist_mean = historical_var(returns.values(), request.historical_window, risk_level)
            .and_then(|series| mean_var(series.view()));
        let historical =
            hist_mean.clone().and_then(|v| VarFigure::from_daily(to_money(v), days));

        // ---- Expected shortfall ----
        let es_student_t = both(&t_mult, &sigma)
            .and_then(|(m, s)| expected_shortfall(returns.values(), m * s))
            .map(to_money);
        let es_historical = hist_mean
            .and_then(|v| expected_shortfall(returns.values(), v))
            .map(to_money);

        let estimate = RiskEstimate {
            risk_level,
            collateral_value: collateral,
            garch_daily_vol: daily_vol.ok(),
            student_t_dof: t_params.ok().map(|p| p.dof),
            implied_vol_percent: request.implied_vol_percent,
            normal_garch,
            student_t_garch,
            normal_implied,
            student_t_implied,
            historical,
            es_student_t,
            es_historical,
        };
        for (methodology, err) in estimate.failures() {
            tracing::warn!(%methodology, error = %err, "risk methodology failed");
        }
        tracing::debug!(
            n = returns.len(),
            risk_level,
            garch_daily_vol = ?estimate.garch_daily_vol,
            student_t_dof = ?estimate.student_t_dof,
            failures = estimate.failures().len(),
            "risk run complete"
        );
        Ok(estimate)
    }

    // ---- Helper methods ----

    /// One-step GARCH volatility in scaled units.
    fn garch_sigma(&self, returns: &ReturnSeries) -> RiskResult<f64> {
        let fit = GarchModel::new(self.config.garch.clone()).fit(returns)?;
        let sigma = fit.forecast_one_step()?;
        tracing::debug!(
            sigma,
            persistence = fit.persistence(),
            loglik = fit.loglik,
            "GARCH(1,1) volatility forecast"
        );
        Ok(sigma)
    }

    fn student_t(&self, returns: &ReturnSeries) -> RiskResult<TDistParams> {
        Ok(StudentTFitter::new(self.config.tail.clone()).fit(returns)?)
    }
}

// ---- Free helpers ----

/// Re-check a request whose fields may have been set directly.
fn validate_request(request: &RiskRequest) -> RiskResult<()> {
    RiskRequest::new(
        request.risk_level,
        request.collateral_value,
        request.historical_window,
        request.implied_vol_percent,
    )
    .map(|_| ())
}

fn both(a: &RiskResult<f64>, b: &RiskResult<f64>) -> RiskResult<(f64, f64)> {
    Ok((a.clone()?, b.clone()?))
}
