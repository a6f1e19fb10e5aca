//! Numeric aliases and solver wiring shared by the optimizer modules.
//!
//! Keeping the `ndarray` and argmin generics here lets the rest of the
//! optimizer speak in terms of `Theta`, `Grad`, `Hessian` and `Cost` only.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient with the same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `k × k` matrix of second derivatives, `k = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// argmin's function-evaluation counters (`"cost_count"`, `"gradient_count"`, ...).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history length.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Gradient norm of the averaged objective under which a stop on the
/// iteration cap or a failed line search still counts as a fit.
pub const FLAT_GRAD_TOL: f64 = 1e-5;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
