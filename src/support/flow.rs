//! Flow-field seam between a host solver and turbulence models.
//!
//! A turbulence model does not own the flow. The host passes a
//! [`FlowContext`] into every call, so one model implementation serves
//! incompressible single-phase, compressible, and phase-fraction-weighted
//! flows alike. For incompressible flow the density is one and the mass flux
//! equals the volumetric flux, which keeps every equation in kinematic form.

mod velocity_gradient;

pub use velocity_gradient::VelocityGradient;

use uom::si::f64::Time;

use crate::support::mesh::Mesh;

/// Fluxes through internal and boundary faces, in kg/s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceFlux {
    /// One value per internal face, positive from owner to neighbour.
    pub internal: Vec<f64>,

    /// One value per boundary face, positive out of the domain.
    pub boundary: Vec<f64>,
}

impl FaceFlux {
    /// A zero flux on every face of `mesh`.
    #[must_use]
    pub fn zeros(mesh: &impl Mesh) -> Self {
        Self {
            internal: vec![0.0; mesh.n_internal_faces()],
            boundary: vec![0.0; mesh.boundary_faces().len()],
        }
    }

    /// The flux of a uniform velocity `u` (m/s) at unit density.
    #[must_use]
    pub fn uniform(mesh: &impl Mesh, u: [f64; 3]) -> Self {
        let dot = |a: &[f64; 3]| a[0] * u[0] + a[1] * u[1] + a[2] * u[2];
        Self {
            internal: mesh.face_areas().iter().map(dot).collect(),
            boundary: mesh.boundary_faces().iter().map(|f| dot(&f.area)).collect(),
        }
    }

    /// The same flux multiplied by `factor` on every face.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            internal: self.internal.iter().map(|f| f * factor).collect(),
            boundary: self.boundary.iter().map(|f| f * factor).collect(),
        }
    }
}

/// Flow quantities a turbulence model reads during a correction.
///
/// Per-cell slices have one entry per mesh cell.
pub trait FlowContext {
    /// Phase fraction `alpha`, one for single-phase flow.
    fn alpha(&self) -> &[f64];

    /// Density `rho`, in kg/m³.
    fn density(&self) -> &[f64];

    /// Face mass flux `alpha · rho · phi`, in kg/s.
    fn momentum_flux(&self) -> &FaceFlux;

    /// Molecular kinematic viscosity `nu`, in m²/s.
    fn diffusivity(&self) -> &[f64];

    /// Cell velocity gradients.
    fn velocity_gradient(&self) -> &[VelocityGradient];

    /// Time step of the current correction, `None` for steady iterations.
    fn time_step(&self) -> Option<Time>;
}

/// Owned flow fields implementing [`FlowContext`].
#[derive(Debug, Clone)]
pub struct FlowFields {
    alpha: Vec<f64>,
    density: Vec<f64>,
    flux: FaceFlux,
    nu: Vec<f64>,
    grad_u: Vec<VelocityGradient>,
    time_step: Option<Time>,
}

impl FlowFields {
    /// Incompressible single-phase flow with volumetric face flux `phi` (m³/s).
    #[must_use]
    pub fn incompressible(nu: Vec<f64>, phi: FaceFlux, grad_u: Vec<VelocityGradient>) -> Self {
        let n = nu.len();
        Self {
            alpha: vec![1.0; n],
            density: vec![1.0; n],
            flux: phi,
            nu,
            grad_u,
            time_step: None,
        }
    }

    /// Compressible flow with density `rho` and face mass flux `alpha_rho_phi`.
    #[must_use]
    pub fn compressible(
        rho: Vec<f64>,
        alpha_rho_phi: FaceFlux,
        nu: Vec<f64>,
        grad_u: Vec<VelocityGradient>,
    ) -> Self {
        Self {
            alpha: vec![1.0; rho.len()],
            density: rho,
            flux: alpha_rho_phi,
            nu,
            grad_u,
            time_step: None,
        }
    }

    /// Sets the phase fraction.
    ///
    /// The face flux is taken as given, so it must already include `alpha`.
    #[must_use]
    pub fn with_alpha(mut self, alpha: Vec<f64>) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the time step, making corrections transient.
    #[must_use]
    pub fn with_time_step(mut self, dt: Time) -> Self {
        self.time_step = Some(dt);
        self
    }
}

impl FlowContext for FlowFields {
    fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    fn density(&self) -> &[f64] {
        &self.density
    }

    fn momentum_flux(&self) -> &FaceFlux {
        &self.flux
    }

    fn diffusivity(&self) -> &[f64] {
        &self.nu
    }

    fn velocity_gradient(&self) -> &[VelocityGradient] {
        &self.grad_u
    }

    fn time_step(&self) -> Option<Time> {
        self.time_step
    }
}
