//! Runs an argmin solver on an [`ArgMinAdapter`] and packages the final
//! state as an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Shared runner for both line-search variants.
///
/// Sets `theta0` as the initial parameter, applies `max_iter` when present,
/// attaches the slog observer when `obs_slog` is enabled and
/// `opts.verbose`, runs the solver, and converts the best state found.
/// The reported value is `ℓ(θ̂) = -c(θ̂)`.
///
/// # Errors
/// - argmin runtime errors, including model failures raised inside
///   `cost`/`gradient`, via `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match opts.tols.max_iter {
            Some(max_iter) => state.max_iters(max_iter as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let termination = state.get_termination_status().clone();
    tracing::trace!(
        iterations = state.get_iter(),
        best_cost = state.get_best_cost(),
        status = ?termination,
        "L-BFGS finished"
    );
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        state.get_iter(),
        state.get_func_counts().clone(),
        state.take_gradient(),
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::debug!(loglik = ll0, grad_norm = ?grad_norm, "starting L-BFGS");
    Ok(())
}
