//! Public configuration and extension points of the optimizer.
//!
//! - [`LogLikelihood`]: implemented by each estimator.
//! - [`Tolerances`] / [`MLEOptions`]: validated stopping rules and solver knobs.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized solver result.
//!
//! We maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`. An analytic gradient,
//! when provided, is `∇ℓ(θ)`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Log-likelihood interface consumed by [`maximize`](super::maximize).
///
/// - `value(θ, data)` returns `ℓ(θ)`; invalid states are `OptError`s.
/// - `check(θ, data)` runs once before optimization to reject a bad start
///   or malformed data.
/// - `grad(θ, data)` is optional. The default reports
///   [`OptError::GradientNotImplemented`], which switches the adapter to
///   finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used by L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` or `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols`: stopping rules, see [`Tolerances`].
/// - `line_searcher`: line search inside L-BFGS.
/// - `lbfgs_mem`: history length, `> 0`.
/// - `verbose`: attach the terminal observer (only with the `obs_slog` feature).
///
/// Default: `tol_grad = 1e-6`, `tol_cost = 1e-11`, `max_iter = 500`,
/// More–Thuente, memory [`DEFAULT_LBFGS_MEM`], not verbose.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: usize,
    pub verbose: bool,
}

impl MLEOptions {
    /// Build options from validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == 0`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: usize,
    ) -> OptResult<Self> {
        if lbfgs_mem == 0 {
            return Err(OptError::InvalidLBFGSMem {
                mem: lbfgs_mem,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, lbfgs_mem, verbose: false })
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-11), max_iter: Some(500) },
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: DEFAULT_LBFGS_MEM,
            verbose: false,
        }
    }
}

/// Stopping rules for the solver.
///
/// Any field may be `None` but at least one must be set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Result returned by `maximize`.
///
/// - `theta_hat`: best θ found.
/// - `value`: `ℓ(θ̂)` (not the cost).
/// - `converged`: the solver stopped on a gradient or cost-change rule.
/// - `status`: termination status as text.
/// - `iterations`, `fn_evals`: argmin counters.
/// - `grad_norm`: norm of the last cost gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] for a
    ///   missing or non-finite θ̂.
    /// - [`OptError::NonFiniteCost`] for a non-finite value.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached
            )
        );
        let status = match &termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            TerminationStatus::Terminated(reason) => reason.text().to_string(),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }

    /// `true` when the solver stopped on its own rule, or stopped elsewhere
    /// with a last gradient norm at or below `flat_tol`.
    pub fn accepted(&self, flat_tol: f64) -> bool {
        self.converged || self.grad_norm.is_some_and(|g| g <= flat_tol)
    }
}
