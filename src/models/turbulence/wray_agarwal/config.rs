use crate::support::constraint::{Constrained, UnitIntervalLowerOpen};

/// Configuration of the per-step transport-equation solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectConfig {
    /// Implicit under-relaxation factor of the `R` equation.
    ///
    /// One disables relaxation. Smaller values slow the update of `R`
    /// between outer iterations without changing the converged solution.
    pub relaxation: Constrained<f64, UnitIntervalLowerOpen>,
}

impl Default for CorrectConfig {
    fn default() -> Self {
        Self {
            relaxation: UnitIntervalLowerOpen::one(),
        }
    }
}
