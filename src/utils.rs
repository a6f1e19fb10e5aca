//! utils — Python argument conversion for the PyO3 bindings.
//!
//! Everything here is gated on `python-bindings`. Conversions return
//! `PyResult` so binding code can use `?` throughout; domain failures are
//! routed through [`RiskError`] to keep one error vocabulary.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    errors::RiskError,
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Borrow a contiguous 1-D `float64` array from a numpy array, a pandas
/// Series (via `to_numpy`) or any sequence of floats, copying only in the
/// last case.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    let contiguous = |obj: &Bound<'py, PyAny>| {
        obj.extract::<PyReadonlyArray1<'py, f64>>().ok().filter(|arr| arr.as_slice().is_ok())
    };
    if let Some(arr) = contiguous(raw_data) {
        return Ok(arr);
    }
    // pandas.Series and friends
    if let Some(arr) =
        raw_data.call_method("to_numpy", (false,), None).ok().as_ref().and_then(contiguous)
    {
        return Ok(arr);
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Price vector for [`PriceSeries`](crate::returns::PriceSeries).
#[cfg(feature = "python-bindings")]
pub fn extract_prices<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyTypeError::new_err("prices must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(slice.to_vec())
}

/// Optimizer options from keyword arguments. Unset tolerances keep the
/// [`MLEOptions::default`] stopping rules.
#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let defaults = MLEOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter).map_err(RiskError::from)?
    };
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(RiskError::from)?,
        None => defaults.line_searcher,
    };
    let mem = lbfgs_mem.unwrap_or(defaults.lbfgs_mem);
    Ok(MLEOptions::new(tols, ls, mem).map_err(RiskError::from)?)
}
