use twine_solvers::equation::bisection;
use uom::si::{available_energy::joule_per_kilogram, diffusion_coefficient::square_meter_per_second};

use crate::support::units::{KinematicViscosity, SourceRate};

/// Solver configuration for equilibrium initialization.
#[derive(Debug, Clone, Copy)]
pub struct EquilibriumConfig {
    /// Maximum iteration count for each per-cell bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on `R`.
    pub r_tol: KinematicViscosity,

    /// Tolerance on `R` relative to its magnitude.
    pub r_rel_tol: f64,

    /// Absolute tolerance on the net source residual.
    pub residual_tol: SourceRate,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            r_tol: KinematicViscosity::new::<square_meter_per_second>(1e-20),
            r_rel_tol: 1e-12,
            residual_tol: SourceRate::new::<joule_per_kilogram>(1e-20),
        }
    }
}

impl EquilibriumConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.r_tol.get::<square_meter_per_second>(),
            x_rel_tol: self.r_rel_tol,
            residual_tol: self.residual_tol.get::<joule_per_kilogram>(),
        }
    }
}
