//! crypto_risk — GARCH volatility and VaR / Expected Shortfall for crypto
//! positions, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the risk pipeline to Python via the `_crypto_risk` extension
//! module when the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Re-export the layers of the engine:
//!   - `returns`: price validation and scaled log returns,
//!   - `volatility`: GARCH(1,1) MLE and variance forecasts,
//!   - `tails`: Student-t MLE on returns,
//!   - `risk`: VaR / ES formulas and the [`RiskPipeline`] orchestration,
//!   - `optimization` / `inference`: the shared L-BFGS driver and standard
//!     errors.
//! - Define the `RiskEngine` `#[pyclass]` and the `#[pymodule]` initializer
//!   registering the `crypto_risk.risk` submodule.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion and error mapping.
//! - A pipeline run never panics on bad input: invalid requests and prices
//!   are [`RiskError`]s, and model failures are reported per methodology.
//!
//! Conventions
//! -----------
//! - Returns are scaled log returns (`scale = 100` → percent).
//! - VaR and ES are positive money losses; the risk level is the lower-tail
//!   probability, in `(0, 0.5)`.
//! - Errors cross the PyO3 boundary as `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Rust callers build a [`RiskPipeline`] from a [`RiskConfig`] and call
//!   `run` with a [`PriceSeries`] and a [`RiskRequest`].
//! - Python callers construct `crypto_risk.risk.RiskEngine` and call `run`,
//!   which returns a plain `dict`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/integration_risk_pipeline.rs`
//!   exercises the full pipeline on simulated GARCH-t prices.

pub mod errors;
pub mod inference;
pub mod optimization;
pub mod returns;
pub mod risk;
pub mod tails;
pub mod utils;
pub mod volatility;

// ---- Re-exports (primary public surface) ----------------------------------

pub use crate::errors::{RiskError, RiskResult};
pub use crate::returns::{PriceSeries, ReturnSeries, ReturnsProcessor};
pub use crate::risk::{
    Methodology, RiskConfig, RiskEstimate, RiskPipeline, RiskRequest, TailModel, VarFigure,
};
pub use crate::tails::{StudentTFitter, TDistParams, TailOptions};
pub use crate::volatility::{Covariance, GarchFit, GarchModel, GarchOptions, GarchParams};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::utils::{extract_mle_opts, extract_prices};

/// RiskEngine — Python-facing wrapper around [`RiskPipeline`].
///
/// Purpose
/// -------
/// Hold a configured pipeline so repeated runs from Python share one
/// validated configuration.
///
/// Parameters
/// ----------
/// Constructed from Python via `RiskEngine(scale=100.0, min_observations=30,
/// trading_days=365.0, covariance="robust", min_dof=2.0, tol_grad=None,
/// tol_cost=None, max_iter=None, line_searcher=None, lbfgs_mem=None)`:
/// - `scale`, `min_observations`, `trading_days`: see [`RiskConfig`].
/// - `covariance`: `"robust"`, `"classical"` or `"none"`; GARCH standard
///   errors (logged only).
/// - `min_dof`: smallest acceptable Student-t degrees of freedom.
/// - Optimizer keywords shared by the GARCH and Student-t fits.
///
/// Notes
/// -----
/// - The pipeline is immutable and `Send + Sync`; `run` releases the GIL
///   while fitting.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "crypto_risk.risk", frozen)]
pub struct RiskEngine {
    inner: RiskPipeline,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl RiskEngine {
    #[new]
    #[pyo3(
        signature = (
            scale = 100.0,
            min_observations = 30,
            trading_days = 365.0,
            covariance = "robust",
            min_dof = 2.0,
            tol_grad = None,
            tol_cost = None,
            max_iter = None,
            line_searcher = None,
            lbfgs_mem = None,
        ),
        text_signature = "(scale=100.0, min_observations=30, trading_days=365.0, \
                          covariance='robust', min_dof=2.0, tol_grad=None, tol_cost=None, \
                          max_iter=None, line_searcher=None, lbfgs_mem=None)"
    )]
    pub fn new(
        scale: f64, min_observations: usize, trading_days: f64, covariance: &str, min_dof: f64,
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
        line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    ) -> PyResult<Self> {
        let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
        let covariance = match covariance.to_lowercase().as_str() {
            "robust" => Covariance::Robust,
            "classical" => Covariance::Classical,
            "none" => Covariance::None,
            other => {
                return Err(PyValueError::new_err(format!(
                    "invalid covariance {other:?} (expected 'robust', 'classical', or 'none')"
                )));
            }
        };
        let garch = GarchOptions::new(mle_opts.clone(), covariance);
        let tail = TailOptions::new(mle_opts, min_dof).map_err(RiskError::from)?;
        let config = RiskConfig::new(scale, min_observations, trading_days, garch, tail)?;
        Ok(RiskEngine { inner: RiskPipeline::new(config)? })
    }

    /// Run every methodology on a price series and return a `dict` of
    /// figures. Failed methodologies map to `None`, with their messages
    /// under `"errors"`.
    #[pyo3(
        signature = (
            prices,
            risk_level,
            collateral_value,
            historical_window,
            implied_vol_percent = None,
        ),
        text_signature = "(self, prices, risk_level, collateral_value, historical_window, /, \
                          implied_vol_percent=None)"
    )]
    pub fn run<'py>(
        &self, py: Python<'py>, prices: &Bound<'py, PyAny>, risk_level: f64,
        collateral_value: f64, historical_window: usize, implied_vol_percent: Option<f64>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let prices = PriceSeries::from(extract_prices(py, prices)?);
        let request =
            RiskRequest::new(risk_level, collateral_value, historical_window, implied_vol_percent)?;
        let estimate = py.allow_threads(|| self.inner.run(&prices, &request))?;
        estimate_to_dict(py, &estimate)
    }

    #[getter]
    pub fn scale(&self) -> f64 {
        self.inner.config().scale()
    }

    #[getter]
    pub fn min_observations(&self) -> usize {
        self.inner.config().min_observations()
    }

    #[getter]
    pub fn trading_days(&self) -> f64 {
        self.inner.config().trading_days
    }
}

#[cfg(feature = "python-bindings")]
fn estimate_to_dict<'py>(
    py: Python<'py>, estimate: &RiskEstimate,
) -> PyResult<Bound<'py, PyDict>> {
    let figure = |result: &RiskResult<VarFigure>| -> PyResult<Option<Bound<'py, PyDict>>> {
        match result {
            Ok(fig) => {
                let d = PyDict::new(py);
                d.set_item("daily", fig.daily)?;
                d.set_item("annual", fig.annual)?;
                Ok(Some(d))
            }
            Err(_) => Ok(None),
        }
    };
    let out = PyDict::new(py);
    out.set_item("risk_level", estimate.risk_level)?;
    out.set_item("collateral_value", estimate.collateral_value)?;
    out.set_item("garch_daily_vol", estimate.garch_daily_vol)?;
    out.set_item("student_t_dof", estimate.student_t_dof)?;
    out.set_item("implied_vol_percent", estimate.implied_vol_percent)?;
    out.set_item(Methodology::NormalGarch.name(), figure(&estimate.normal_garch)?)?;
    out.set_item(Methodology::StudentTGarch.name(), figure(&estimate.student_t_garch)?)?;
    let normal_implied = estimate.normal_implied.as_ref().map(figure).transpose()?.flatten();
    let t_implied = estimate.student_t_implied.as_ref().map(figure).transpose()?.flatten();
    out.set_item(Methodology::NormalImplied.name(), normal_implied)?;
    out.set_item(Methodology::StudentTImplied.name(), t_implied)?;
    out.set_item(Methodology::Historical.name(), figure(&estimate.historical)?)?;
    out.set_item(Methodology::ShortfallStudentT.name(), estimate.es_student_t.clone().ok())?;
    out.set_item(Methodology::ShortfallHistorical.name(), estimate.es_historical.clone().ok())?;

    let errors = PyDict::new(py);
    for (methodology, err) in estimate.failures() {
        errors.set_item(methodology.name(), err.to_string())?;
    }
    out.set_item("errors", errors)?;
    Ok(out)
}

/// _crypto_risk — PyO3 module initializer.
///
/// Creates the `risk` submodule, registers [`RiskEngine`] in it and inserts
/// it into `sys.modules` as `crypto_risk.risk` so dot-notation imports work.
///
/// Errors
/// ------
/// - `PyErr` if creating the submodule or updating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _crypto_risk<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let risk_mod = PyModule::new(_py, "risk")?;
    risk(_py, m, &risk_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("crypto_risk.risk", risk_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn risk<'py>(
    _py: Python, crypto_risk: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<RiskEngine>()?;
    crypto_risk.add_submodule(m)?;
    Ok(())
}
