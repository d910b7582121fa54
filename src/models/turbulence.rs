//! Reynolds-averaged turbulence closures.
//!
//! A flow solver drives every closure through the object-safe [`RasModel`]
//! contract, typically after selecting it by name from a
//! [`registry::Registry`]:
//!
//! 1. [`RasModel::validate`] once the flow fields exist, before the first
//!    momentum solve, so `nut` is consistent with the initial state.
//! 2. [`RasModel::correct`] once per outer iteration or time step, after the
//!    momentum and pressure corrections.
//! 3. [`RasModel::nut`] and [`RasModel::effective_viscosity`] wherever the
//!    momentum equation needs the turbulent stress.
//!
//! The closures implemented here are the Wray-Agarwal one-equation models in
//! [`wray_agarwal`].

mod error;
pub mod registry;
pub mod wray_agarwal;

pub use error::{CoefficientError, ModelError};

use crate::support::{dictionary::Dictionary, flow::FlowContext, linear::SolverPerformance};

/// Contract between a flow solver and a RANS closure.
pub trait RasModel {
    /// The name the model is registered under.
    fn type_name(&self) -> &'static str;

    /// Re-reads the model coefficients.
    ///
    /// Every coefficient must be present and valid. On error the previous
    /// coefficients are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Coefficients`] if an entry is missing or invalid.
    fn read(&mut self, dictionary: &dyn Dictionary) -> Result<(), ModelError>;

    /// Checks the flow fields against the mesh and refreshes `nut`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldSize`] if a flow field does not match the
    /// mesh, or [`ModelError::FlowValue`] if it holds a non-physical value.
    fn validate(&mut self, flow: &dyn FlowContext) -> Result<(), ModelError>;

    /// Solves the transport equation once and refreshes `nut`.
    ///
    /// Linear-solver non-convergence is reported, not treated as an error.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`RasModel::validate`]. On error the model
    /// state is left unchanged.
    fn correct(&mut self, flow: &dyn FlowContext) -> Result<CorrectReport, ModelError>;

    /// Turbulent kinematic viscosity per cell, in m²/s.
    fn nut(&self) -> &[f64];

    /// Effective momentum viscosity `nut + nu` per cell, in m²/s.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`RasModel::validate`] for an invalid flow.
    fn effective_viscosity(&self, flow: &dyn FlowContext) -> Result<Vec<f64>, ModelError>;

    /// Diagnostic turbulent kinetic energy per cell, in m²/s².
    fn k(&self) -> Vec<f64>;

    /// Diagnostic dissipation rate per cell, in m²/s³.
    fn epsilon(&self) -> Vec<f64>;
}

/// Outcome of one [`RasModel::correct`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectReport {
    /// Performance of the transport-equation solve.
    pub solver: SolverPerformance,

    /// Number of cells whose solution was negative and clipped to zero.
    pub clipped: usize,
}
