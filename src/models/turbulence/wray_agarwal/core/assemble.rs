//! Finite-volume assembly of the `R` transport equation.
//!
//! Discretizes, per cell volume `V`,
//!
//! ```text
//! ∂(αρR)/∂t + ∇·(αρφ R) - ∇·(αρ(ν + σ R)∇R) = αρ(su - sp R)
//! ```
//!
//! with an implicit Euler time derivative, first-order upwind convection,
//! linearly interpolated face diffusivity, and linearized sources.

use crate::support::{
    flow::FaceFlux,
    linear::ScalarEquation,
    mesh::{BoundaryCondition, Mesh, mag},
};

use super::viscosity;

/// Per-cell fields the assembly reads.
///
/// Every per-cell slice has one entry per mesh cell; `boundary` has one
/// condition per mesh patch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inputs<'f> {
    pub alpha: &'f [f64],
    pub density: &'f [f64],
    pub flux: &'f FaceFlux,
    pub nu: &'f [f64],
    pub time_step: Option<f64>,
    pub r_old: &'f [f64],
    pub boundary: &'f [BoundaryCondition],

    /// Effective diffusion coefficient `sigma` per cell.
    pub sigma: &'f [f64],

    /// Explicit source per unit mass, m²/s².
    pub su: &'f [f64],

    /// Implicit source coefficient per unit mass, 1/s.
    pub sp: &'f [f64],
}

/// Assembles the transport equation on `mesh`.
pub(crate) fn assemble<'m>(mesh: &'m impl Mesh, inputs: &Inputs<'_>) -> ScalarEquation<'m> {
    let mut eqn = ScalarEquation::zeros(mesh.addressing());

    let mass: Vec<f64> = mesh
        .cell_volumes()
        .iter()
        .enumerate()
        .map(|(c, volume)| inputs.alpha[c] * inputs.density[c] * volume)
        .collect();

    for (c, &m) in mass.iter().enumerate() {
        if let Some(dt) = inputs.time_step {
            let ddt = m / dt;
            eqn.diag[c] += ddt;
            eqn.source[c] += ddt * inputs.r_old[c];
        }
        eqn.source[c] += m * inputs.su[c];
        eqn.diag[c] += m * inputs.sp[c];
    }

    let gamma = |c: usize, r: f64| {
        inputs.alpha[c] * inputs.density[c] * viscosity::r_diffusivity(inputs.nu[c], inputs.sigma[c], r)
    };

    let owner = mesh.owner();
    let neighbour = mesh.neighbour();
    let weights = mesh.weights();
    let delta_coeffs = mesh.delta_coeffs();

    for (f, area) in mesh.face_areas().iter().enumerate() {
        let (o, n) = (owner[f], neighbour[f]);

        // Upwind convection with the continuity correction folded in: each
        // row keeps only the inflow through the face.
        let flux = inputs.flux.internal[f];
        let (outflow, inflow) = (flux.max(0.0), (-flux).max(0.0));
        eqn.diag[o] += inflow;
        eqn.upper[f] -= inflow;
        eqn.diag[n] += outflow;
        eqn.lower[f] -= outflow;

        let w = weights[f];
        let gamma_f = w * gamma(o, inputs.r_old[o]) + (1.0 - w) * gamma(n, inputs.r_old[n]);
        let d = gamma_f * mag(*area) * delta_coeffs[f];
        eqn.diag[o] += d;
        eqn.diag[n] += d;
        eqn.upper[f] -= d;
        eqn.lower[f] -= d;
    }

    for (face, &flux) in mesh.boundary_faces().iter().zip(&inputs.flux.boundary) {
        let condition = inputs
            .boundary
            .get(face.patch)
            .copied()
            .unwrap_or(BoundaryCondition::ZeroGradient);

        // Zero-gradient faces carry neither net convection nor diffusion.
        if let BoundaryCondition::FixedValue(r_b) = condition {
            let c = face.owner;
            let inflow = (-flux).max(0.0);
            let d = gamma(c, r_b) * mag(face.area) * face.delta_coeff;
            eqn.diag[c] += inflow + d;
            eqn.source[c] += (inflow + d) * r_b;
        }
    }

    eqn
}
