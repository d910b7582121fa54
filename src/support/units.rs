//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for single-cell inputs, outputs, and configuration
//! (viscosities, wall distances, strain rates, time steps). Whole-field data
//! is carried as plain `f64` slices in SI base units so that per-cell passes
//! stay simple to vectorize.
//!
//! This module provides the dimensioned quantities that turbulence modeling
//! needs but [`uom`] does not name:
//!
//! ```
//! use twine_turbulence::support::units::{
//!     KinematicViscosity, SourceRate, SpecificTurbulentKineticEnergy,
//! };
//! use uom::si::{
//!     available_energy::joule_per_kilogram, diffusion_coefficient::square_meter_per_second,
//!     f64::Frequency, frequency::hertz,
//! };
//!
//! // A production term `C1·S·R` has units of m²/s².
//! let s = Frequency::new::<hertz>(10.0);
//! let r = KinematicViscosity::new::<square_meter_per_second>(1e-3);
//! let production: SourceRate = 0.1 * s * r;
//! assert!((production.get::<joule_per_kilogram>() - 1e-3).abs() < 1e-15);
//!
//! let k = SpecificTurbulentKineticEnergy::new::<joule_per_kilogram>(0.5);
//! assert_eq!(k.value, 0.5);
//! ```

mod quantities;

pub use quantities::{
    DissipationRate, KinematicViscosity, SourceRate, SpecificTurbulentKineticEnergy,
};
