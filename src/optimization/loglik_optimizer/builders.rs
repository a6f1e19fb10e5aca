//! L-BFGS solver construction.
//!
//! The builders only choose the line search, set the history length from
//! [`MLEOptions::lbfgs_mem`] and wire the gradient / cost-change tolerances.
//! The initial θ and the iteration cap are runtime concerns handled by
//! [`run_lbfgs`](super::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// argmin rejecting a tolerance, surfaced through `From<argmin::core::Error>`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), opts.lbfgs_mem);
    configure_lbfgs(lbfgs, opts)
}

/// L-BFGS with More–Thuente line search.
///
/// # Errors
/// argmin rejecting a tolerance, surfaced through `From<argmin::core::Error>`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), opts.lbfgs_mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply whichever of `tol_grad` / `tol_cost` is present; absent tolerances
/// keep argmin's defaults.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::{
        DEFAULT_LBFGS_MEM,
        traits::{LineSearcher, Tolerances},
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both L-BFGS variants from validated options.
    // - `configure_lbfgs` with and without tolerances.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior, which `api` tests exercise end to end.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both builders accept the default options and a custom history length.
    //
    // Given
    // -----
    // - `MLEOptions::default()` and options with `lbfgs_mem = 11`.
    //
    // Expect
    // ------
    // - Every builder call returns `Ok(_)`.
    fn builders_accept_default_and_custom_memory() {
        // Arrange
        let defaults = MLEOptions::default();
        let custom = MLEOptions::new(defaults.tols, LineSearcher::HagerZhang, 11).unwrap();

        // Act + Assert
        assert!(build_optimizer_more_thuente(&defaults).is_ok());
        assert!(build_optimizer_hager_zhang(&defaults).is_ok());
        assert!(build_optimizer_more_thuente(&custom).is_ok());
        assert!(build_optimizer_hager_zhang(&custom).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` works when only an iteration cap is configured.
    //
    // Given
    // -----
    // - Tolerances with `tol_grad = None`, `tol_cost = None`, `max_iter = 50`.
    //
    // Expect
    // ------
    // - `Ok(_)`, argmin defaults stay in effect.
    fn configure_lbfgs_respects_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, DEFAULT_LBFGS_MEM).unwrap();

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
