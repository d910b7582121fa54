/// Cell velocity gradient tensor `∇u`, with `g[i][j] = ∂u_j/∂x_i`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityGradient(pub [[f64; 3]; 3]);

impl VelocityGradient {
    /// Creates a planar gradient from its four in-plane components.
    #[must_use]
    pub fn planar(du_dx: f64, du_dy: f64, dv_dx: f64, dv_dy: f64) -> Self {
        Self([[du_dx, dv_dx, 0.0], [du_dy, dv_dy, 0.0], [0.0, 0.0, 0.0]])
    }

    /// Gradient of the simple shear flow `u = (rate · y, 0, 0)`.
    #[must_use]
    pub fn simple_shear(rate: f64) -> Self {
        Self::planar(0.0, rate, 0.0, 0.0)
    }

    /// Returns the strain rate magnitude `S = sqrt(2 S_ij S_ij)`, in 1/s.
    #[must_use]
    pub fn strain_rate(&self) -> f64 {
        let g = &self.0;
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                let s = 0.5 * (g[i][j] + g[j][i]);
                sum += s * s;
            }
        }
        (2.0 * sum).sqrt()
    }

    /// Returns the rotation rate magnitude `W = sqrt(2 W_ij W_ij)`, in 1/s.
    #[must_use]
    pub fn rotation_rate(&self) -> f64 {
        let g = &self.0;
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                let w = 0.5 * (g[i][j] - g[j][i]);
                sum += w * w;
            }
        }
        (2.0 * sum).sqrt()
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|c| c.is_finite())
    }
}
