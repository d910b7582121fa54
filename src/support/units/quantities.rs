use uom::{
    si::{ISQ, Quantity, SI, f64::DiffusionCoefficient},
    typenum::{N2, N3, P2, Z0},
};

/// Kinematic viscosity, m²/s in SI.
///
/// Shares its dimension with [`DiffusionCoefficient`]; construct values with
/// the `uom::si::diffusion_coefficient` units.
pub type KinematicViscosity = DiffusionCoefficient;

/// Source term of the `R` transport equation per unit mass, m²/s² in SI.
///
/// Production, destruction, and their difference all carry this dimension.
pub type SourceRate = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Turbulent kinetic energy per unit mass, m²/s² (J/kg) in SI.
pub type SpecificTurbulentKineticEnergy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Dissipation rate of turbulent kinetic energy, m²/s³ (W/kg) in SI.
pub type DissipationRate = Quantity<ISQ<P2, Z0, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        diffusion_coefficient::{square_centimeter_per_second, square_meter_per_second},
        f64::Frequency,
        frequency::hertz,
    };

    #[test]
    fn kinematic_viscosity_is_square_meters_per_second() {
        let nu = KinematicViscosity::new::<square_centimeter_per_second>(0.15);
        assert_relative_eq!(nu.get::<square_meter_per_second>(), 1.5e-5, max_relative = 1e-12);

        let production: SourceRate = nu * Frequency::new::<hertz>(10.0);
        assert_relative_eq!(production.value, 1.5e-4, max_relative = 1e-12);
    }
}
