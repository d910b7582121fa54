use std::num::NonZeroUsize;

use uom::si::{
    f64::{Length, Time},
    length::meter,
    time::second,
};

use crate::support::{
    constraint::StrictlyPositive,
    flow::{FaceFlux, FlowFields, VelocityGradient},
    mesh::{BoundaryCondition, CartesianMesh, Mesh, Side},
};

/// Kinematic viscosity of air, m²/s.
pub(crate) const NU_AIR: f64 = 1.5e-5;

/// A structured `nx` by `ny` mesh of the given size in meters.
pub(crate) fn channel(nx: usize, ny: usize, width: f64, height: f64) -> CartesianMesh {
    CartesianMesh::new(
        NonZeroUsize::new(nx).unwrap(),
        NonZeroUsize::new(ny).unwrap(),
        StrictlyPositive::new(Length::new::<meter>(width)).unwrap(),
        StrictlyPositive::new(Length::new::<meter>(height)).unwrap(),
    )
}

/// Boundary conditions for `R` with a no-slip wall at the bottom.
///
/// The wall holds `R = 0`; every other side is zero-gradient.
pub(crate) fn wall_at_bottom() -> Vec<BoundaryCondition> {
    let mut bcs = vec![BoundaryCondition::ZeroGradient; Side::ALL.len()];
    bcs[Side::Bottom.patch()] = BoundaryCondition::FixedValue(0.0);
    bcs
}

/// Simple shear `u = rate · y` at viscosity `nu`, with no face flux.
pub(crate) fn shear_flow(mesh: &CartesianMesh, nu: f64, rate: f64) -> FlowFields {
    FlowFields::incompressible(
        vec![nu; mesh.n_cells()],
        FaceFlux::zeros(mesh),
        vec![VelocityGradient::simple_shear(rate); mesh.n_cells()],
    )
}

/// Transient version of [`shear_flow`].
pub(crate) fn transient_shear_flow(
    mesh: &CartesianMesh,
    nu: f64,
    rate: f64,
    dt: f64,
) -> FlowFields {
    shear_flow(mesh, nu, rate).with_time_step(Time::new::<second>(dt))
}
