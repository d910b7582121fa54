//! Sparse scalar equations in LDU form and the solver seam.
//!
//! A [`ScalarEquation`] stores one diagonal coefficient per cell and one
//! upper and one lower coefficient per internal face, addressed through the
//! mesh's owner/neighbour lists. For internal face `f` with owner `o` and
//! neighbour `n`:
//!
//! - `upper[f]` multiplies `x[n]` in row `o`;
//! - `lower[f]` multiplies `x[o]` in row `n`.
//!
//! Solvers implement [`LinearSolver`]. [`GaussSeidel`] is provided.

mod equation;
mod gauss_seidel;

pub use equation::ScalarEquation;
pub use gauss_seidel::{GaussSeidel, GaussSeidelConfig};

/// Borrowed owner/neighbour addressing of a mesh's internal faces.
#[derive(Debug, Clone, Copy)]
pub struct LduAddressing<'a> {
    n_cells: usize,
    owner: &'a [usize],
    neighbour: &'a [usize],
}

impl<'a> LduAddressing<'a> {
    /// Creates an addressing view.
    ///
    /// # Panics
    ///
    /// Panics if `owner` and `neighbour` differ in length.
    #[must_use]
    pub fn new(n_cells: usize, owner: &'a [usize], neighbour: &'a [usize]) -> Self {
        assert_eq!(
            owner.len(),
            neighbour.len(),
            "owner and neighbour lists must have one entry per internal face"
        );
        Self {
            n_cells,
            owner,
            neighbour,
        }
    }

    /// Number of cells (matrix rows).
    #[must_use]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// Number of internal faces (off-diagonal pairs).
    #[must_use]
    pub fn n_faces(&self) -> usize {
        self.owner.len()
    }

    /// Owner cell of each internal face.
    #[must_use]
    pub fn owner(&self) -> &'a [usize] {
        self.owner
    }

    /// Neighbour cell of each internal face.
    #[must_use]
    pub fn neighbour(&self) -> &'a [usize] {
        self.neighbour
    }
}

/// Convergence summary of one linear solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverPerformance {
    /// Normalized residual before the first iteration.
    pub initial_residual: f64,

    /// Normalized residual after the last iteration.
    pub final_residual: f64,

    /// Number of sweeps performed.
    pub iterations: usize,

    /// Whether the tolerance was met.
    pub converged: bool,
}

/// Solves a [`ScalarEquation`] in place.
///
/// `x` holds the initial guess on entry and the solution on return.
/// Implementations report non-convergence through
/// [`SolverPerformance::converged`] rather than failing; a partially
/// converged `x` is still returned.
pub trait LinearSolver {
    fn solve(&self, equation: &ScalarEquation<'_>, x: &mut [f64]) -> SolverPerformance;
}

impl<S: LinearSolver + ?Sized> LinearSolver for Box<S> {
    fn solve(&self, equation: &ScalarEquation<'_>, x: &mut [f64]) -> SolverPerformance {
        (**self).solve(equation, x)
    }
}
