use super::{LinearSolver, ScalarEquation, SolverPerformance};

/// Offsets the residual normalization factor away from zero.
const SMALL: f64 = 1e-20;

/// Diagonal magnitudes below this leave the row untouched.
const DIAG_FLOOR: f64 = 1e-300;

/// Configuration for [`GaussSeidel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussSeidelConfig {
    /// Absolute tolerance on the normalized residual.
    pub tolerance: f64,

    /// Tolerance relative to the initial residual; zero disables it.
    pub rel_tol: f64,

    /// Maximum number of sweeps.
    pub max_iters: usize,
}

impl Default for GaussSeidelConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            rel_tol: 0.0,
            max_iters: 1000,
        }
    }
}

/// Point Gauss-Seidel iteration.
///
/// Residuals use the scaled L1 norm common to finite-volume codes:
/// `Σ|b - Ax| / (Σ(|Ax - A x̄| + |b - A x̄|) + SMALL)`, where `x̄` is the
/// mean of `x`. The norm is independent of the equation scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussSeidel {
    config: GaussSeidelConfig,
}

impl GaussSeidel {
    #[must_use]
    pub fn new(config: GaussSeidelConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GaussSeidelConfig {
        &self.config
    }

    fn is_converged(&self, initial: f64, current: f64) -> bool {
        current < self.config.tolerance
            || (self.config.rel_tol > 0.0 && current < self.config.rel_tol * initial)
    }
}

impl LinearSolver for GaussSeidel {
    fn solve(&self, equation: &ScalarEquation<'_>, x: &mut [f64]) -> SolverPerformance {
        let rows = Rows::from_equation(equation);
        let norm = normalization(equation, x);

        let initial_residual = residual(equation, x) / norm;
        let mut performance = SolverPerformance {
            initial_residual,
            final_residual: initial_residual,
            iterations: 0,
            converged: self.is_converged(initial_residual, initial_residual),
        };

        while !performance.converged && performance.iterations < self.config.max_iters {
            rows.sweep(equation, x);
            performance.iterations += 1;
            performance.final_residual = residual(equation, x) / norm;
            performance.converged = self.is_converged(initial_residual, performance.final_residual);
        }

        performance
    }
}

/// Off-diagonal entries grouped by row.
struct Rows {
    start: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<f64>,
}

impl Rows {
    fn from_equation(equation: &ScalarEquation<'_>) -> Self {
        let n_cells = equation.addressing.n_cells();
        let owner = equation.addressing.owner();
        let neighbour = equation.addressing.neighbour();

        let mut start = vec![0; n_cells + 1];
        for (&o, &n) in owner.iter().zip(neighbour) {
            start[o + 1] += 1;
            start[n + 1] += 1;
        }
        for c in 0..n_cells {
            start[c + 1] += start[c];
        }

        let mut fill = start.clone();
        let mut columns = vec![0; start[n_cells]];
        let mut values = vec![0.0; start[n_cells]];
        for f in 0..equation.addressing.n_faces() {
            let (o, n) = (owner[f], neighbour[f]);
            columns[fill[o]] = n;
            values[fill[o]] = equation.upper[f];
            fill[o] += 1;
            columns[fill[n]] = o;
            values[fill[n]] = equation.lower[f];
            fill[n] += 1;
        }

        Self {
            start,
            columns,
            values,
        }
    }

    fn sweep(&self, equation: &ScalarEquation<'_>, x: &mut [f64]) {
        for (c, &diag) in equation.diag.iter().enumerate() {
            if diag.abs() < DIAG_FLOOR {
                continue;
            }
            let range = self.start[c]..self.start[c + 1];
            let off: f64 = self.columns[range.clone()]
                .iter()
                .zip(&self.values[range])
                .map(|(&col, &a)| a * x[col])
                .sum();
            x[c] = (equation.source[c] - off) / diag;
        }
    }
}

fn residual(equation: &ScalarEquation<'_>, x: &[f64]) -> f64 {
    equation
        .apply(x)
        .iter()
        .zip(&equation.source)
        .map(|(ax, b)| (b - ax).abs())
        .sum()
}

fn normalization(equation: &ScalarEquation<'_>, x: &[f64]) -> f64 {
    let n = x.len().max(1) as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let ax = equation.apply(x);

    equation
        .row_sums()
        .iter()
        .zip(ax.iter().zip(&equation.source))
        .map(|(row_sum, (ax, b))| {
            let a_mean = row_sum * x_mean;
            (ax - a_mean).abs() + (b - a_mean).abs()
        })
        .sum::<f64>()
        + SMALL
}
