//! Single-cell source balance as a [`twine_core::Model`].

use thiserror::Error;
use twine_core::Model;
use uom::si::{
    available_energy::joule_per_kilogram,
    diffusion_coefficient::square_meter_per_second,
    f64::{Frequency, Length, Ratio},
    frequency::hertz,
    length::meter,
    ratio::ratio,
};

use crate::support::{
    constraint::{Constrained, NonNegative, StrictlyPositive, UnitInterval},
    units::{DissipationRate, KinematicViscosity, SourceRate, SpecificTurbulentKineticEnergy},
};

use super::{
    Coefficients, VariantConfig,
    core::{
        source::{self, Cell},
        viscosity,
    },
};

/// Local conditions of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellConditions {
    /// Transported variable `R`.
    pub r: Constrained<KinematicViscosity, NonNegative>,

    /// Molecular kinematic viscosity.
    pub nu: Constrained<KinematicViscosity, StrictlyPositive>,

    /// Distance from the cell centre to the nearest wall.
    pub wall_distance: Constrained<Length, StrictlyPositive>,

    /// Strain rate magnitude `S`.
    pub strain_rate: Constrained<Frequency, NonNegative>,

    /// Rotation rate magnitude `W`.
    pub rotation_rate: Constrained<Frequency, NonNegative>,
}

impl CellConditions {
    /// Returns the same conditions with a different `R`.
    #[must_use]
    pub fn with_r(self, r: Constrained<KinematicViscosity, NonNegative>) -> Self {
        Self { r, ..self }
    }

    fn cell(&self) -> Cell {
        Cell {
            r: self.r.as_ref().get::<square_meter_per_second>(),
            nu: self.nu.as_ref().get::<square_meter_per_second>(),
            y: self.wall_distance.as_ref().get::<meter>(),
            strain_rate: self.strain_rate.as_ref().get::<hertz>(),
            rotation_rate: self.rotation_rate.as_ref().get::<hertz>(),
        }
    }
}

/// Sources and derived quantities of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSources {
    /// The `R` these sources were evaluated at.
    pub r: KinematicViscosity,

    /// Viscosity ratio `R / nu`.
    pub chi: Ratio,

    /// Inner/outer blending factor.
    pub f1: Constrained<Ratio, UnitInterval>,

    pub production: SourceRate,
    pub destruction: SourceRate,

    /// `production - destruction`.
    pub net: SourceRate,

    /// Eddy viscosity.
    pub nut: KinematicViscosity,

    /// Diagnostic turbulent kinetic energy.
    pub k: SpecificTurbulentKineticEnergy,

    /// Diagnostic dissipation rate.
    pub epsilon: DissipationRate,
}

/// Errors evaluating a [`LocalBalance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocalBalanceError {
    /// An evaluated quantity is NaN or infinite.
    #[error("non-finite {quantity}")]
    NonFinite { quantity: &'static str },
}

/// Evaluates the Wray-Agarwal sources of a single cell.
///
/// The gradient limiter depends on neighbouring cells and is not part of
/// the local balance.
#[derive(Debug, Clone, Copy)]
pub struct LocalBalance<'c> {
    coefficients: &'c Coefficients,
    variant: VariantConfig,
}

impl<'c> LocalBalance<'c> {
    #[must_use]
    pub fn new(coefficients: &'c Coefficients, variant: VariantConfig) -> Self {
        Self {
            coefficients,
            variant,
        }
    }
}

impl Model for LocalBalance<'_> {
    type Input = CellConditions;
    type Output = CellSources;
    type Error = LocalBalanceError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let cell = input.cell();
        let sources = source::evaluate(self.coefficients, &self.variant, &cell, None);
        let nut = viscosity::nut(cell.r, cell.nu, self.coefficients.cw());

        let finite = |quantity, value: f64| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(LocalBalanceError::NonFinite { quantity })
            }
        };

        let production = finite("production", sources.production)?;
        let destruction = finite("destruction", sources.destruction)?;
        let f1 = UnitInterval::new(Ratio::new::<ratio>(finite("F1", sources.f1)?))
            .map_err(|_| LocalBalanceError::NonFinite { quantity: "F1" })?;

        let nu_t = KinematicViscosity::new::<square_meter_per_second>(finite("nut", nut)?);
        let s = input.strain_rate.into_inner();
        let sqrt_cmu = self.coefficients.cmu().sqrt();

        Ok(CellSources {
            r: input.r.into_inner(),
            chi: Ratio::new::<ratio>(sources.chi),
            f1,
            production: rate(production),
            destruction: rate(destruction),
            net: rate(production - destruction),
            nut: nu_t,
            k: nu_t * s / sqrt_cmu,
            epsilon: nu_t * s * s,
        })
    }
}

fn rate(value: f64) -> SourceRate {
    SourceRate::new::<joule_per_kilogram>(value)
}
