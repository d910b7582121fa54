//! Source terms of the `R` transport equation.

use crate::models::turbulence::wray_agarwal::VariantConfig;

use super::{
    Coefficients,
    blending::{self, Blended},
};

/// Lower bound applied to the strain rate in the limiter denominator, 1/s.
const STRAIN_FLOOR: f64 = 1e-30;

/// Values of `R` at or below this contribute no implicit limiter coefficient.
const R_TINY: f64 = 1e-30;

/// Local state of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cell {
    pub r: f64,
    pub nu: f64,
    pub y: f64,
    pub strain_rate: f64,
    pub rotation_rate: f64,
}

/// Squared gradient magnitudes used by the 2018 gradient limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gradients {
    pub strain_rate_sqr: f64,
    pub r_sqr: f64,
}

/// Evaluated sources of one cell, per unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sources {
    pub chi: f64,
    pub eta: f64,
    pub f1: f64,
    pub blended: Blended,
    pub production: f64,
    pub destruction: f64,
    pub limiter: f64,
}

impl Sources {
    /// Net source `P - D - L`.
    pub(crate) fn net(&self) -> f64 {
        self.production - self.destruction - self.limiter
    }

    /// Splits the sources into an explicit part and an implicit coefficient.
    ///
    /// Production stays explicit. Destruction and the limiter are linearized
    /// on the current `R`, so `net ≈ su - sp · R_new` with `sp ≥ 0`.
    pub(crate) fn linearize(&self, cell: &Cell) -> (f64, f64) {
        let mut sp = self.blended.c2 * cell.r / (cell.y * cell.y);
        if cell.r > R_TINY {
            sp += self.limiter / cell.r;
        }
        (self.production, sp)
    }
}

/// Evaluates the sources of one cell.
///
/// The limiter is included only when the variant enables it and `gradients`
/// are supplied.
pub(crate) fn evaluate(
    coefficients: &Coefficients,
    variant: &VariantConfig,
    cell: &Cell,
    gradients: Option<Gradients>,
) -> Sources {
    let chi = blending::chi(cell.r, cell.nu);
    let eta = blending::eta(cell.strain_rate, cell.rotation_rate, variant.rotation_term);
    let f1 = blending::f1(cell.r, cell.nu, cell.y, eta);
    let blended = Blended::new(coefficients, f1);

    let limiter = match (variant.cm, gradients) {
        (Some(cm), Some(gradients)) => limiter(
            f1,
            coefficients.outer().c2,
            cm,
            cell.r,
            cell.strain_rate,
            gradients,
        ),
        _ => 0.0,
    };

    Sources {
        chi,
        eta,
        f1,
        blended,
        production: production(&blended, eta, cell.r),
        destruction: destruction(&blended, cell.r, cell.y),
        limiter,
    }
}

/// Production `P = C1 · eta · R`.
#[inline]
pub(crate) fn production(blended: &Blended, eta: f64, r: f64) -> f64 {
    blended.c1 * eta * r
}

/// Destruction `D = C2 · (R / y)²`.
#[inline]
pub(crate) fn destruction(blended: &Blended, r: f64, y: f64) -> f64 {
    let ratio = r / y;
    blended.c2 * ratio * ratio
}

/// Gradient limiter `L = (1 - F1) · min(C2kEps R² |∇S|² / S², Cm |∇R|²)`.
#[inline]
pub(crate) fn limiter(
    f1: f64,
    c2_keps: f64,
    cm: f64,
    r: f64,
    strain_rate: f64,
    gradients: Gradients,
) -> f64 {
    let s = strain_rate.max(STRAIN_FLOOR);
    let strain_term = c2_keps * r * r * gradients.strain_rate_sqr / (s * s);
    let r_term = cm * gradients.r_sqr;
    (1.0 - f1) * strain_term.min(r_term)
}
