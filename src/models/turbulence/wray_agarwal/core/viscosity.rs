//! Eddy viscosity and diagnostic turbulence quantities.

use super::blending;

/// Eddy viscosity `nut = fv1(chi) · R`.
#[inline]
pub(crate) fn nut(r: f64, nu: f64, cw: f64) -> f64 {
    blending::fmi(blending::chi(r, nu), cw) * r
}

/// Effective diffusivity of `R`, `nu + sigma · R`.
#[inline]
pub(crate) fn r_diffusivity(nu: f64, sigma: f64, r: f64) -> f64 {
    nu + sigma * r
}

/// Turbulent kinetic energy `k = nut · omega` with `omega = S / sqrt(Cmu)`.
#[inline]
pub(crate) fn k(nut: f64, strain_rate: f64, cmu: f64) -> f64 {
    nut * strain_rate / cmu.sqrt()
}

/// Dissipation rate `epsilon = Cmu · k · omega = nut · S²`.
#[inline]
pub(crate) fn epsilon(nut: f64, strain_rate: f64) -> f64 {
    nut * strain_rate * strain_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::turbulence::wray_agarwal::Coefficients;

    #[test]
    fn nut_vanishes_with_r_and_tends_to_r() {
        let cw = Coefficients::default().cw();
        assert_eq!(nut(0.0, 1e-5, cw), 0.0);

        let r = 1.0;
        assert_relative_eq!(nut(r, 1e-5, cw), r, max_relative = 1e-12);
        assert!(nut(1e-5, 1e-5, cw) < 1e-5 * 0.01);
    }

    #[test]
    fn epsilon_is_consistent_with_k() {
        let cmu = Coefficients::default().cmu();
        let (nut, s) = (2e-4, 15.0);
        let tke = k(nut, s, cmu);
        let omega = s / cmu.sqrt();

        assert_relative_eq!(epsilon(nut, s), cmu * tke * omega, max_relative = 1e-12);
        assert_relative_eq!(nut, tke / omega, max_relative = 1e-12);
    }

    #[test]
    fn diffusivity_adds_turbulent_part() {
        assert_relative_eq!(r_diffusivity(1e-5, 0.72, 1e-3), 1e-5 + 7.2e-4);
    }
}
