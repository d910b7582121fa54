use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::support::{constraint::ConstraintError, units::SourceRate};

/// Errors that can occur while initializing `R` at local equilibrium.
#[derive(Debug, Error)]
pub enum EquilibriumError {
    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("cell {cell} hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Cell that failed to converge.
        cell: usize,

        /// Net source at the best `R` found.
        residual: SourceRate,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// A cell's flow conditions violate their constraints.
    #[error("invalid conditions in cell {cell}")]
    InvalidConditions {
        cell: usize,
        #[source]
        source: ConstraintError,
    },
}
