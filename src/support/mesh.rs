//! Finite-volume mesh seam.
//!
//! A [`Mesh`] exposes cell volumes and face geometry in the owner/neighbour
//! (LDU) addressing used by collocated finite-volume solvers:
//!
//! - Internal face `f` separates cells `owner()[f] < neighbour()[f]`, and its
//!   area vector points from owner to neighbour.
//! - Boundary faces belong to exactly one cell and point out of the domain.
//!   Each one carries the index of the patch it belongs to, so fields can
//!   attach one [`BoundaryCondition`] per patch.
//!
//! [`CartesianMesh`] is a small structured reference implementation.

mod cartesian;
mod gradient;

pub use cartesian::{CartesianMesh, Side};
pub use gradient::{boundary_values, green_gauss};

use crate::support::linear::LduAddressing;

/// Geometry and addressing required by turbulence models.
///
/// All lengths are in meters, areas in square meters, volumes in cubic meters.
pub trait Mesh {
    /// Number of cells.
    fn n_cells(&self) -> usize;

    /// Cell volumes, indexed by cell.
    fn cell_volumes(&self) -> &[f64];

    /// Owner cell of each internal face.
    fn owner(&self) -> &[usize];

    /// Neighbour cell of each internal face.
    fn neighbour(&self) -> &[usize];

    /// Area vector of each internal face, pointing from owner to neighbour.
    fn face_areas(&self) -> &[[f64; 3]];

    /// Linear interpolation weight of the owner value at each internal face.
    fn weights(&self) -> &[f64];

    /// Inverse owner-to-neighbour distance of each internal face.
    fn delta_coeffs(&self) -> &[f64];

    /// Boundary faces.
    fn boundary_faces(&self) -> &[BoundaryFace];

    /// Number of patches that boundary faces refer to.
    fn n_patches(&self) -> usize;

    /// Number of internal faces.
    fn n_internal_faces(&self) -> usize {
        self.owner().len()
    }

    /// Returns the LDU addressing view of the internal faces.
    fn addressing(&self) -> LduAddressing<'_> {
        LduAddressing::new(self.n_cells(), self.owner(), self.neighbour())
    }
}

/// A face on the domain boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryFace {
    /// Cell the face belongs to.
    pub owner: usize,

    /// Patch the face belongs to.
    pub patch: usize,

    /// Outward area vector.
    pub area: [f64; 3],

    /// Inverse distance from the owner centre to the face centre.
    pub delta_coeff: f64,
}

/// Boundary condition of a transported scalar on one patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// The face value is prescribed.
    FixedValue(f64),

    /// The face value equals the owner cell value.
    ZeroGradient,
}

impl BoundaryCondition {
    /// Returns the face value given the owner cell value.
    #[must_use]
    pub fn face_value(self, owner_value: f64) -> f64 {
        match self {
            Self::FixedValue(value) => value,
            Self::ZeroGradient => owner_value,
        }
    }
}

/// Returns the magnitude of a vector.
#[inline]
#[must_use]
pub fn mag(v: [f64; 3]) -> f64 {
    mag_sqr(v).sqrt()
}

/// Returns the squared magnitude of a vector.
#[inline]
#[must_use]
pub fn mag_sqr(v: [f64; 3]) -> f64 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}
