//! Analysis types and options

use serde::{Deserialize, Serialize};

use crate::math::PivotTolerance;

/// How far a run proceeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolutionMode {
    /// Number equations and size the profile only; nothing is assembled or solved
    DataCheck,
    /// Assemble, factorize and solve every load case
    #[default]
    Execution,
}

/// Options for a linear static run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Data check or full execution
    pub mode: SolutionMode,
    /// Pivot acceptance rule for the LDLt factorization
    pub pivot_tolerance: PivotTolerance,
    /// Compute element stresses for each load case
    pub recover_stresses: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mode: SolutionMode::Execution,
            pivot_tolerance: PivotTolerance::default(),
            recover_stresses: true,
        }
    }
}

impl AnalysisOptions {
    /// Options for a data check run
    pub fn data_check() -> Self {
        Self::default().with_mode(SolutionMode::DataCheck)
    }

    pub fn with_mode(mut self, mode: SolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_pivot_tolerance(mut self, tolerance: PivotTolerance) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    pub fn with_stress_recovery(mut self, recover: bool) -> Self {
        self.recover_stresses = recover;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AnalysisOptions::default();
        assert_eq!(options.mode, SolutionMode::Execution);
        assert_eq!(
            options.pivot_tolerance,
            PivotTolerance::Absolute(f32::MIN_POSITIVE as f64)
        );
        assert!(options.recover_stresses);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: AnalysisOptions = serde_json::from_str(r#"{"mode": "DataCheck"}"#).unwrap();
        assert_eq!(options.mode, SolutionMode::DataCheck);
        assert!(options.recover_stresses);
    }
}
