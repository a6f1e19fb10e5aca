//! Runtime options for GARCH estimation.
use crate::optimization::loglik_optimizer::MLEOptions;

/// Parameter covariance estimator reported with a fit.
///
/// - `Classical`: inverse observed information.
/// - `Robust`: Bollerslev–Wooldridge sandwich `J⁻¹ (Σ s_t s_tᵀ) J⁻¹`, valid
///   under non-Gaussian innovations (the usual case for crypto returns).
/// - `None`: skip standard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Covariance {
    None,
    Classical,
    #[default]
    Robust,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GarchOptions {
    pub mle_opts: MLEOptions,
    pub covariance: Covariance,
}

impl GarchOptions {
    pub fn new(mle_opts: MLEOptions, covariance: Covariance) -> Self {
        Self { mle_opts, covariance }
    }
}
