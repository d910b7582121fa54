//! Green-Gauss cell gradients.

use super::{BoundaryCondition, Mesh};

/// Evaluates boundary face values of a cell field.
///
/// `conditions` holds one entry per patch. Patches without an entry are
/// treated as zero-gradient.
#[must_use]
pub fn boundary_values(
    mesh: &impl Mesh,
    values: &[f64],
    conditions: &[BoundaryCondition],
) -> Vec<f64> {
    mesh.boundary_faces()
        .iter()
        .map(|face| {
            conditions
                .get(face.patch)
                .copied()
                .unwrap_or(BoundaryCondition::ZeroGradient)
                .face_value(values[face.owner])
        })
        .collect()
}

/// Computes cell gradients with the Green-Gauss theorem and linear face
/// interpolation: `∇φ_c = (1/V_c) Σ_f φ_f S_f`.
///
/// `boundary` holds one face value per boundary face.
#[must_use]
pub fn green_gauss(mesh: &impl Mesh, values: &[f64], boundary: &[f64]) -> Vec<[f64; 3]> {
    let mut grad = vec![[0.0; 3]; mesh.n_cells()];

    let owner = mesh.owner();
    let neighbour = mesh.neighbour();
    let weights = mesh.weights();

    for (f, area) in mesh.face_areas().iter().enumerate() {
        let (o, n) = (owner[f], neighbour[f]);
        let w = weights[f];
        let phi_f = w * values[o] + (1.0 - w) * values[n];
        for d in 0..3 {
            grad[o][d] += phi_f * area[d];
            grad[n][d] -= phi_f * area[d];
        }
    }

    for (face, &phi_b) in mesh.boundary_faces().iter().zip(boundary) {
        for d in 0..3 {
            grad[face.owner][d] += phi_b * face.area[d];
        }
    }

    for (g, &volume) in grad.iter_mut().zip(mesh.cell_volumes()) {
        for component in g.iter_mut() {
            *component /= volume;
        }
    }

    grad
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use approx::assert_relative_eq;
    use uom::si::{f64::Length, length::meter};

    use crate::support::{
        constraint::StrictlyPositive,
        mesh::{CartesianMesh, Side, mag},
    };

    fn mesh() -> CartesianMesh {
        CartesianMesh::new(
            NonZeroUsize::new(5).unwrap(),
            NonZeroUsize::new(4).unwrap(),
            StrictlyPositive::new(Length::new::<meter>(1.0)).unwrap(),
            StrictlyPositive::new(Length::new::<meter>(2.0)).unwrap(),
        )
    }

    #[test]
    fn linear_field_has_exact_gradient() {
        let mesh = mesh();
        let linear = |p: [f64; 3]| 3.0 * p[0] - 2.0 * p[1];
        let values: Vec<f64> = mesh.cell_centres().iter().map(|&c| linear(c)).collect();

        let boundary: Vec<f64> = mesh
            .boundary_faces()
            .iter()
            .map(|face| {
                let c = mesh.cell_centres()[face.owner];
                let scale = 1.0 / (face.delta_coeff * mag(face.area));
                linear([
                    c[0] + face.area[0] * scale,
                    c[1] + face.area[1] * scale,
                    c[2],
                ])
            })
            .collect();

        for g in green_gauss(&mesh, &values, &boundary) {
            assert_relative_eq!(g[0], 3.0, epsilon = 1e-10);
            assert_relative_eq!(g[1], -2.0, epsilon = 1e-10);
            assert_relative_eq!(g[2], 0.0);
        }
    }

    #[test]
    fn uniform_field_has_zero_gradient() {
        let mesh = mesh();
        let values = vec![7.0; mesh.n_cells()];
        let boundary = boundary_values(&mesh, &values, &[]);

        for g in green_gauss(&mesh, &values, &boundary) {
            assert_relative_eq!(g[0], 0.0, epsilon = 1e-12);
            assert_relative_eq!(g[1], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn fixed_value_patch_overrides_owner_value() {
        let mesh = mesh();
        let values = vec![1.0; mesh.n_cells()];
        let mut conditions = vec![BoundaryCondition::ZeroGradient; mesh.n_patches()];
        conditions[Side::Bottom.patch()] = BoundaryCondition::FixedValue(0.0);

        let boundary = boundary_values(&mesh, &values, &conditions);
        for (face, value) in mesh.boundary_faces().iter().zip(&boundary) {
            let expected = if face.patch == Side::Bottom.patch() { 0.0 } else { 1.0 };
            assert_relative_eq!(*value, expected);
        }
    }
}
