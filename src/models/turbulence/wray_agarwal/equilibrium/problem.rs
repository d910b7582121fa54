//! Problem formulation for local equilibrium of `R`.

use twine_core::EquationProblem;
use uom::si::{available_energy::joule_per_kilogram, diffusion_coefficient::square_meter_per_second};

use crate::{
    models::turbulence::wray_agarwal::local::{CellConditions, CellSources},
    support::{
        constraint::{ConstraintError, NonNegative},
        units::KinematicViscosity,
    },
};

/// Equation problem for the `R` that zeroes the local net source.
///
/// The search variable is `R` in m²/s. All other conditions are fixed.
/// The residual is `destruction - production`, which increases with `R`
/// through the root.
pub(super) struct EquilibriumProblem {
    conditions: CellConditions,
}

impl EquilibriumProblem {
    pub(super) fn new(conditions: CellConditions) -> Self {
        Self { conditions }
    }
}

impl EquationProblem<1> for EquilibriumProblem {
    type Input = CellConditions;
    type Output = CellSources;
    type Error = ConstraintError;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        let r = NonNegative::new(KinematicViscosity::new::<square_meter_per_second>(x[0]))?;
        Ok(self.conditions.with_r(r))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([-output.net.get::<joule_per_kilogram>()])
    }
}
