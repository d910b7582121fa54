//! Damping and blending functions.
//!
//! All functions are pure and evaluate one cell in SI base units.

use super::Coefficients;

/// Lower bound applied to the molecular viscosity in denominators, m²/s.
pub(crate) const NU_FLOOR: f64 = 1e-30;

/// Upper bound of the inner/outer blending factor.
pub(crate) const F1_MAX: f64 = 0.9;

/// Viscosity ratio `chi = R / nu`.
#[inline]
pub(crate) fn chi(r: f64, nu: f64) -> f64 {
    r / nu.max(NU_FLOOR)
}

/// Near-wall damping `fv1 = chi³ / (chi³ + Cw³)`.
///
/// Zero for non-positive `chi` and approaching one as `chi` grows.
#[inline]
pub(crate) fn fmi(chi: f64, cw: f64) -> f64 {
    if chi <= 0.0 {
        return 0.0;
    }
    let ratio = cw / chi;
    1.0 / (1.0 + ratio * ratio * ratio)
}

/// Rate driving production and blending.
///
/// With the rotation term the larger of strain and rotation rate is used.
#[inline]
pub(crate) fn eta(strain_rate: f64, rotation_rate: f64, rotation_term: bool) -> f64 {
    if rotation_term {
        strain_rate.max(rotation_rate)
    } else {
        strain_rate
    }
}

/// Inner/outer blending factor, large near walls and decaying to `0` in the far field.
///
/// `F1 = min(tanh(arg1⁴), 0.9)` with
/// `arg1 = (1 + a) / (1 + (max(a, 1.5 R/nu) / 20)²)` and `a = y sqrt(R eta) / nu`.
#[inline]
pub(crate) fn f1(r: f64, nu: f64, y: f64, eta: f64) -> f64 {
    let nu = nu.max(NU_FLOOR);
    let a = y * (r * eta).max(0.0).sqrt() / nu;
    let b = a.max(1.5 * r / nu) / 20.0;
    let arg1 = (1.0 + a) / (1.0 + b * b);
    let arg1_4 = arg1 * arg1 * arg1 * arg1;
    arg1_4.tanh().min(F1_MAX)
}

/// Effective coefficients of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Blended {
    pub c1: f64,
    pub c2: f64,
    pub sigma: f64,
}

impl Blended {
    /// Blends the inner and outer sets: `X = F1 X_inner + (1 - F1) X_outer`.
    #[inline]
    pub(crate) fn new(coefficients: &Coefficients, f1: f64) -> Self {
        let inner = coefficients.inner();
        let outer = coefficients.outer();
        let blend = |x_inner: f64, x_outer: f64| f1 * x_inner + (1.0 - f1) * x_outer;
        Self {
            c1: blend(inner.c1, outer.c1),
            c2: blend(inner.c2, outer.c2),
            sigma: blend(inner.sigma, outer.sigma),
        }
    }
}
