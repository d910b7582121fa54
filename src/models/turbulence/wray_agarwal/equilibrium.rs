//! Local-equilibrium initialization of `R`.
//!
//! In each cell, bisection finds the `R` at which production balances
//! destruction for the current strain rate and wall distance. The result
//! scales like the mixing-length estimate `kappa² y² S`, which gives a
//! physically scaled starting field for the transport equation.

mod config;
mod error;
mod problem;

pub use config::EquilibriumConfig;
pub use error::EquilibriumError;

use twine_solvers::equation::bisection;
use uom::si::{available_energy::joule_per_kilogram, diffusion_coefficient::square_meter_per_second};

use crate::support::units::SourceRate;

use super::{
    Coefficients,
    local::{CellConditions, LocalBalance},
};

use problem::EquilibriumProblem;

/// Bracket widening applied beyond the analytic bounds of the root.
const BRACKET_MARGIN: f64 = 2.0;

/// Solves for the equilibrium `R` of one cell.
///
/// `eta` is the rate driving production for the active variant. A cell with
/// no driving rate has the trivial equilibrium `R = 0`.
///
/// # Errors
///
/// Returns [`EquilibriumError`] if bisection fails or does not converge.
pub(super) fn equilibrium_r(
    balance: &LocalBalance<'_>,
    coefficients: &Coefficients,
    conditions: CellConditions,
    eta: f64,
    cell: usize,
    config: &EquilibriumConfig,
) -> Result<f64, EquilibriumError> {
    let y = conditions.wall_distance.as_ref().value;
    if eta <= 0.0 {
        return Ok(0.0);
    }

    // With P = C1 eta R and D = C2 R²/y², the root is R = (C1/C2) eta y².
    // C1/C2 is monotone in F1, so the extreme set ratios bound it.
    let (inner, outer) = (coefficients.inner(), coefficients.outer());
    let ratio_min = inner.c1.min(outer.c1) / inner.c2.max(outer.c2);
    let ratio_max = inner.c1.max(outer.c1) / inner.c2.min(outer.c2);
    let scale = eta * y * y;
    let bracket = [
        ratio_min * scale / BRACKET_MARGIN,
        ratio_max * scale * BRACKET_MARGIN,
    ];

    let problem = EquilibriumProblem::new(conditions);

    let solution = bisection::solve(
        balance,
        &problem,
        bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A non-finite evaluation lies beyond the root, where destruction
            // dominates. Guide bisection back by assuming positive residual.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(EquilibriumError::MaxIters {
            cell,
            residual: SourceRate::new::<joule_per_kilogram>(-solution.residual),
            iters: solution.iters,
        });
    }

    Ok(solution.snapshot.output.r.get::<square_meter_per_second>())
}
