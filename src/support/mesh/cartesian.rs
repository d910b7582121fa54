use std::num::NonZeroUsize;

use uom::si::{f64::Length, length::meter};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{BoundaryFace, Mesh};

/// A side of a [`CartesianMesh`], each forming one boundary patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The `y = 0` side.
    Bottom,
    /// The `y = height` side.
    Top,
    /// The `x = 0` side.
    Left,
    /// The `x = width` side.
    Right,
}

impl Side {
    /// All sides, in patch order.
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Left, Side::Right];

    /// Returns the patch index of this side.
    #[must_use]
    pub fn patch(self) -> usize {
        match self {
            Side::Bottom => 0,
            Side::Top => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }
}

/// A uniform two-dimensional structured mesh of unit depth.
///
/// Cell `(i, j)` has index `i + j * nx`, with `i` counting along `x` and `j`
/// along `y`. Internal faces list all `x`-normal faces first, then all
/// `y`-normal faces.
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use twine_turbulence::support::{
///     constraint::StrictlyPositive,
///     mesh::{CartesianMesh, Mesh},
/// };
/// use uom::si::{f64::Length, length::meter};
///
/// let mesh = CartesianMesh::new(
///     NonZeroUsize::new(3).unwrap(),
///     NonZeroUsize::new(2).unwrap(),
///     StrictlyPositive::new(Length::new::<meter>(3.0)).unwrap(),
///     StrictlyPositive::new(Length::new::<meter>(1.0)).unwrap(),
/// );
///
/// assert_eq!(mesh.n_cells(), 6);
/// assert_eq!(mesh.n_internal_faces(), 7);
/// assert_eq!(mesh.boundary_faces().len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct CartesianMesh {
    nx: usize,
    ny: usize,
    spacing: [f64; 2],
    centres: Vec<[f64; 3]>,
    volumes: Vec<f64>,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
    areas: Vec<[f64; 3]>,
    weights: Vec<f64>,
    delta_coeffs: Vec<f64>,
    boundary: Vec<BoundaryFace>,
}

impl CartesianMesh {
    /// Creates an `nx` by `ny` mesh covering `[0, width] × [0, height]`.
    #[must_use]
    pub fn new(
        nx: NonZeroUsize,
        ny: NonZeroUsize,
        width: Constrained<Length, StrictlyPositive>,
        height: Constrained<Length, StrictlyPositive>,
    ) -> Self {
        let (nx, ny) = (nx.get(), ny.get());
        let dx = width.into_inner().get::<meter>() / nx as f64;
        let dy = height.into_inner().get::<meter>() / ny as f64;
        let id = |i: usize, j: usize| i + j * nx;

        let centres = (0..ny)
            .flat_map(|j| (0..nx).map(move |i| [(i as f64 + 0.5) * dx, (j as f64 + 0.5) * dy, 0.5]))
            .collect();

        let n_internal = (nx - 1) * ny + nx * (ny - 1);
        let mut owner = Vec::with_capacity(n_internal);
        let mut neighbour = Vec::with_capacity(n_internal);
        let mut areas = Vec::with_capacity(n_internal);
        let mut delta_coeffs = Vec::with_capacity(n_internal);

        for j in 0..ny {
            for i in 0..nx - 1 {
                owner.push(id(i, j));
                neighbour.push(id(i + 1, j));
                areas.push([dy, 0.0, 0.0]);
                delta_coeffs.push(1.0 / dx);
            }
        }
        for j in 0..ny - 1 {
            for i in 0..nx {
                owner.push(id(i, j));
                neighbour.push(id(i, j + 1));
                areas.push([0.0, dx, 0.0]);
                delta_coeffs.push(1.0 / dy);
            }
        }

        let face = |owner, side: Side, area, delta_coeff| BoundaryFace {
            owner,
            patch: side.patch(),
            area,
            delta_coeff,
        };
        let mut boundary = Vec::with_capacity(2 * (nx + ny));
        boundary.extend((0..nx).map(|i| face(id(i, 0), Side::Bottom, [0.0, -dx, 0.0], 2.0 / dy)));
        boundary.extend((0..nx).map(|i| face(id(i, ny - 1), Side::Top, [0.0, dx, 0.0], 2.0 / dy)));
        boundary.extend((0..ny).map(|j| face(id(0, j), Side::Left, [-dy, 0.0, 0.0], 2.0 / dx)));
        boundary.extend((0..ny).map(|j| face(id(nx - 1, j), Side::Right, [dy, 0.0, 0.0], 2.0 / dx)));

        Self {
            nx,
            ny,
            spacing: [dx, dy],
            centres,
            volumes: vec![dx * dy; nx * ny],
            owner,
            neighbour,
            areas,
            weights: vec![0.5; n_internal],
            delta_coeffs,
            boundary,
        }
    }

    /// Number of cells along `x` and `y`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Cell size along `x` and `y`, in meters.
    #[must_use]
    pub fn spacing(&self) -> [f64; 2] {
        self.spacing
    }

    /// Cell centre coordinates, in meters.
    #[must_use]
    pub fn cell_centres(&self) -> &[[f64; 3]] {
        &self.centres
    }

    /// Distance from each cell centre to the nearest of `walls`.
    ///
    /// Returns infinite distances if `walls` is empty.
    #[must_use]
    pub fn wall_distance(&self, walls: &[Side]) -> Vec<f64> {
        let width = self.spacing[0] * self.nx as f64;
        let height = self.spacing[1] * self.ny as f64;

        self.centres
            .iter()
            .map(|&[x, y, _]| {
                walls
                    .iter()
                    .map(|side| match side {
                        Side::Bottom => y,
                        Side::Top => height - y,
                        Side::Left => x,
                        Side::Right => width - x,
                    })
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    }
}

impl Mesh for CartesianMesh {
    fn n_cells(&self) -> usize {
        self.volumes.len()
    }

    fn cell_volumes(&self) -> &[f64] {
        &self.volumes
    }

    fn owner(&self) -> &[usize] {
        &self.owner
    }

    fn neighbour(&self) -> &[usize] {
        &self.neighbour
    }

    fn face_areas(&self) -> &[[f64; 3]] {
        &self.areas
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }

    fn delta_coeffs(&self) -> &[f64] {
        &self.delta_coeffs
    }

    fn boundary_faces(&self) -> &[BoundaryFace] {
        &self.boundary
    }

    fn n_patches(&self) -> usize {
        Side::ALL.len()
    }
}
