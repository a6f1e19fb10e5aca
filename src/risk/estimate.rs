//! Result record of a risk run.
//!
//! Every methodology is evaluated on its own, so each figure is a
//! `RiskResult`: a failed GARCH fit leaves the historical figures intact
//! and vice versa. Optional methodologies (implied volatility) are `None`
//! when their input was not supplied.
use crate::{
    errors::{RiskError, RiskResult},
    risk::parametric::VarFigure,
};

/// Methodology label used when reporting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Methodology {
    NormalGarch,
    StudentTGarch,
    NormalImplied,
    StudentTImplied,
    Historical,
    ShortfallStudentT,
    ShortfallHistorical,
}

impl Methodology {
    pub const fn name(&self) -> &'static str {
        match self {
            Methodology::NormalGarch => "normal_garch",
            Methodology::StudentTGarch => "student_t_garch",
            Methodology::NormalImplied => "normal_implied",
            Methodology::StudentTImplied => "student_t_implied",
            Methodology::Historical => "historical",
            Methodology::ShortfallStudentT => "es_student_t",
            Methodology::ShortfallHistorical => "es_historical",
        }
    }
}

impl std::fmt::Display for Methodology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// VaR and ES figures in money units, one entry per methodology.
///
/// Context fields:
/// - `garch_daily_vol`: one-step GARCH volatility as a fraction, when the
///   fit succeeded.
/// - `student_t_dof`: fitted degrees of freedom, when the tail fit succeeded.
/// - `implied_vol_percent`: the implied volatility consumed, if any.
///
/// ES figures are daily losses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskEstimate {
    pub risk_level: f64,
    pub collateral_value: f64,
    pub garch_daily_vol: Option<f64>,
    pub student_t_dof: Option<f64>,
    pub implied_vol_percent: Option<f64>,
    pub normal_garch: RiskResult<VarFigure>,
    pub student_t_garch: RiskResult<VarFigure>,
    pub normal_implied: Option<RiskResult<VarFigure>>,
    pub student_t_implied: Option<RiskResult<VarFigure>>,
    pub historical: RiskResult<VarFigure>,
    pub es_student_t: RiskResult<f64>,
    pub es_historical: RiskResult<f64>,
}

impl RiskEstimate {
    /// Methodologies that failed, with their errors, in field order.
    pub fn failures(&self) -> Vec<(Methodology, &RiskError)> {
        let var_figures = [
            (Methodology::NormalGarch, Some(&self.normal_garch)),
            (Methodology::StudentTGarch, Some(&self.student_t_garch)),
            (Methodology::NormalImplied, self.normal_implied.as_ref()),
            (Methodology::StudentTImplied, self.student_t_implied.as_ref()),
            (Methodology::Historical, Some(&self.historical)),
        ];
        let shortfalls = [
            (Methodology::ShortfallStudentT, &self.es_student_t),
            (Methodology::ShortfallHistorical, &self.es_historical),
        ];
        var_figures
            .into_iter()
            .filter_map(|(m, r)| r.and_then(|r| r.as_ref().err()).map(|e| (m, e)))
            .chain(shortfalls.into_iter().filter_map(|(m, r)| r.as_ref().err().map(|e| (m, e))))
            .collect()
    }

    /// `true` when no methodology failed.
    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `failures` ordering and the skipping of absent optional methodologies.
    // -------------------------------------------------------------------------

    fn figure() -> RiskResult<VarFigure> {
        Ok(VarFigure { daily: 1.0, annual: 365_f64.sqrt() })
    }

    #[test]
    // Purpose
    // -------
    // Only failed methodologies are listed, in field order.
    //
    // Given
    // -----
    // - Historical and historical-ES failed; implied volatility absent.
    //
    // Expect
    // ------
    // - `[Historical, ShortfallHistorical]` with their errors.
    fn failures_lists_failed_methodologies_in_order() {
        // Arrange
        let short = RiskError::InsufficientData {
            required: 120,
            actual: 60,
            context: "historical simulation window",
        };
        let estimate = RiskEstimate {
            risk_level: 0.01,
            collateral_value: 1_000.0,
            garch_daily_vol: Some(0.03),
            student_t_dof: Some(4.0),
            implied_vol_percent: None,
            normal_garch: figure(),
            student_t_garch: figure(),
            normal_implied: None,
            student_t_implied: None,
            historical: Err(short.clone()),
            es_student_t: Ok(80.0),
            es_historical: Err(short.clone()),
        };

        // Act
        let failures = estimate.failures();

        // Assert
        assert_eq!(
            failures,
            vec![(Methodology::Historical, &short), (Methodology::ShortfallHistorical, &short)]
        );
        assert!(!estimate.is_complete());
    }
}
