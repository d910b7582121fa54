use super::LduAddressing;

/// A scalar finite-volume equation `A x = b` in LDU storage.
#[derive(Debug, Clone)]
pub struct ScalarEquation<'a> {
    pub addressing: LduAddressing<'a>,

    /// Diagonal coefficient of each cell.
    pub diag: Vec<f64>,

    /// Coefficient of the neighbour value in the owner row, per face.
    pub upper: Vec<f64>,

    /// Coefficient of the owner value in the neighbour row, per face.
    pub lower: Vec<f64>,

    /// Right-hand side of each cell.
    pub source: Vec<f64>,
}

impl<'a> ScalarEquation<'a> {
    /// Creates an equation with every coefficient set to zero.
    #[must_use]
    pub fn zeros(addressing: LduAddressing<'a>) -> Self {
        let (n_cells, n_faces) = (addressing.n_cells(), addressing.n_faces());
        Self {
            addressing,
            diag: vec![0.0; n_cells],
            upper: vec![0.0; n_faces],
            lower: vec![0.0; n_faces],
            source: vec![0.0; n_cells],
        }
    }

    /// Computes `A x`.
    #[must_use]
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let mut ax: Vec<f64> = self.diag.iter().zip(x).map(|(d, x)| d * x).collect();
        let owner = self.addressing.owner();
        let neighbour = self.addressing.neighbour();
        for f in 0..self.addressing.n_faces() {
            let (o, n) = (owner[f], neighbour[f]);
            ax[o] += self.upper[f] * x[n];
            ax[n] += self.lower[f] * x[o];
        }
        ax
    }

    /// Computes the row sums of `A`.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        let mut sums = self.diag.clone();
        let owner = self.addressing.owner();
        let neighbour = self.addressing.neighbour();
        for f in 0..self.addressing.n_faces() {
            sums[owner[f]] += self.upper[f];
            sums[neighbour[f]] += self.lower[f];
        }
        sums
    }

    /// Applies implicit under-relaxation with factor `alpha` around `x_old`.
    ///
    /// The diagonal is first raised to the sum of the off-diagonal magnitudes
    /// where it falls short, then divided by `alpha`. The source gains the
    /// matching `(D_new - D_old) x_old` contribution, so a converged solution
    /// of the relaxed equation is also a solution of the original one.
    pub fn relax(&mut self, alpha: f64, x_old: &[f64]) {
        let mut off_diag = vec![0.0; self.diag.len()];
        let owner = self.addressing.owner();
        let neighbour = self.addressing.neighbour();
        for f in 0..self.addressing.n_faces() {
            off_diag[owner[f]] += self.upper[f].abs();
            off_diag[neighbour[f]] += self.lower[f].abs();
        }

        for ((d, b), (&sum_off, &x)) in self
            .diag
            .iter_mut()
            .zip(self.source.iter_mut())
            .zip(off_diag.iter().zip(x_old))
        {
            let d_old = *d;
            *d = d_old.abs().max(sum_off) / alpha;
            *b += (*d - d_old) * x;
        }
    }
}
