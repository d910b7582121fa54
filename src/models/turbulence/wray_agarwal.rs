//! Wray-Agarwal one-equation turbulence models.
//!
//! Both variants transport the undamped eddy viscosity `R`,
//!
//! ```text
//! ∂(αρR)/∂t + ∇·(αρφR) = ∇·(αρ(ν + σR)∇R) + αρ(P - D - L)
//! ```
//!
//! with production `P = C1 η R`, destruction `D = C2 (R/y)²`, and the 2018
//! gradient limiter `L`. The coefficients are blended per cell between an
//! inner (k-omega) and an outer (k-epsilon) set by the wall-distance based
//! factor `F1`. The eddy viscosity is `nut = fmu R` with
//! `fmu = chi³ / (chi³ + Cw³)`.
//!
//! [`WrayAgarwal`] and [`WrayAgarwal2018`] are the two registered models.
//! The single-cell physics is also exposed as a [`twine_core::Model`]
//! through [`LocalBalance`], which drives the bisection in
//! [`WrayAgarwalModel::initialize_equilibrium`].
//!
//! The computational core is in the internal `core` module.

pub(crate) mod core;

mod config;
mod equilibrium;
mod local;
mod variant;

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::{debug, debug_span, warn};
use uom::si::{
    diffusion_coefficient::square_meter_per_second,
    f64::{Frequency, Length},
    frequency::hertz,
    length::meter,
    time::second,
};

use crate::support::{
    constraint::{Constrained, ConstraintError, NonNegative, StrictlyPositive},
    dictionary::Dictionary,
    flow::{FlowContext, VelocityGradient},
    linear::{GaussSeidel, LinearSolver},
    mesh::{BoundaryCondition, Mesh, boundary_values, green_gauss, mag_sqr},
    units::KinematicViscosity,
};

use super::{CorrectReport, ModelError, RasModel};

pub use self::core::{CoefficientSet, Coefficients};
pub use config::CorrectConfig;
pub use equilibrium::{EquilibriumConfig, EquilibriumError};
pub use local::{CellConditions, CellSources, LocalBalance, LocalBalanceError};
pub use variant::{Original, Revised2018, Variant, VariantConfig};

use self::core::{
    Lookup,
    assemble::{Inputs, assemble},
    blending::{self, Blended, NU_FLOOR},
    source::{self, Cell, Gradients},
    viscosity,
};

/// The original Wray-Agarwal model, registered as `"WrayAgarwal"`.
pub type WrayAgarwal<'a, M> = WrayAgarwalModel<'a, M, Original>;

/// The 2018 revision, registered as `"WrayAgarwal2018"`.
pub type WrayAgarwal2018<'a, M> = WrayAgarwalModel<'a, M, Revised2018>;

/// Initial state of `R`.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialR {
    /// The same value in every cell.
    Uniform(Constrained<KinematicViscosity, NonNegative>),

    /// One value per cell, in m²/s.
    Field(Vec<f64>),
}

impl InitialR {
    fn into_values(self, n_cells: usize) -> Result<Vec<f64>, ModelError> {
        let values = match self {
            Self::Uniform(r) => vec![r.into_inner().get::<square_meter_per_second>(); n_cells],
            Self::Field(values) => {
                ModelError::check_size("initial R", n_cells, values.len())?;
                values
            }
        };

        match values
            .iter()
            .enumerate()
            .find(|&(_, &r)| !(r.is_finite() && r >= 0.0))
        {
            Some((cell, &value)) => Err(ModelError::InitialValue { cell, value }),
            None => Ok(values),
        }
    }
}

/// The transported variable `R` and its boundary conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportedField {
    values: Vec<f64>,
    boundary: Vec<BoundaryCondition>,
}

impl TransportedField {
    /// Cell values in m²/s. Never negative.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// One condition per mesh patch.
    #[must_use]
    pub fn boundary(&self) -> &[BoundaryCondition] {
        &self.boundary
    }
}

/// Arguments for constructing a model on a mesh.
pub struct ModelArgs<'a, M> {
    /// Mesh the model is solved on, borrowed for the model's lifetime.
    pub mesh: &'a M,

    /// Distance from each cell centre to the nearest wall, in meters.
    pub wall_distance: &'a [f64],

    /// Boundary condition of `R` on each mesh patch.
    pub r_boundary: Vec<BoundaryCondition>,

    /// Starting value of `R` in every cell.
    pub initial: InitialR,

    /// Entries of the model's coefficients dictionary.
    ///
    /// Absent entries take their documented defaults.
    pub dictionary: &'a dyn Dictionary,
}

/// A Wray-Agarwal model of variant `V` on mesh `M`.
///
/// The model owns `R`, its coefficients, and the derived `nut`. It borrows
/// the mesh and the wall distance for `'a`. `nut` is zero until the first
/// call to [`RasModel::validate`] or [`RasModel::correct`], since it depends
/// on the molecular viscosity of the flow.
pub struct WrayAgarwalModel<'a, M, V> {
    mesh: &'a M,
    wall_distance: &'a [f64],
    r: TransportedField,
    nut: Vec<f64>,
    strain_rate: Vec<f64>,
    coefficients: Coefficients,
    variant: VariantConfig,
    config: CorrectConfig,
    solver: Box<dyn LinearSolver + 'a>,
    _variant: PhantomData<V>,
}

impl<'a, M: Mesh, V: Variant> WrayAgarwalModel<'a, M, V> {
    /// Constructs a model, reading coefficients with defaults.
    ///
    /// The transport equation is solved with a default [`GaussSeidel`]
    /// solver unless replaced with [`Self::with_solver`].
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if a field does not match the mesh, a wall
    /// distance is not strictly positive, an initial or fixed boundary value
    /// of `R` is negative, or a dictionary entry is invalid.
    pub fn new(args: ModelArgs<'a, M>) -> Result<Self, ModelError> {
        let ModelArgs {
            mesh,
            wall_distance,
            r_boundary,
            initial,
            dictionary,
        } = args;
        let n_cells = mesh.n_cells();

        ModelError::check_size("wall distance", n_cells, wall_distance.len())?;
        if let Some((cell, &value)) = wall_distance
            .iter()
            .enumerate()
            .find(|&(_, &y)| !(y.is_finite() && y > 0.0))
        {
            return Err(ModelError::WallDistance { cell, value });
        }

        ModelError::check_size("R boundary", mesh.n_patches(), r_boundary.len())?;
        for (patch, condition) in r_boundary.iter().enumerate() {
            if let BoundaryCondition::FixedValue(value) = *condition {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(ModelError::BoundaryValue { patch, value });
                }
            }
        }

        let values = initial.into_values(n_cells)?;
        let coefficients =
            Coefficients::from_dictionary(dictionary, V::COEFFS_DICT, Lookup::WithDefaults)?;
        let variant = variant::read_config(
            V::config(),
            dictionary,
            V::COEFFS_DICT,
            Lookup::WithDefaults,
        )?;

        debug!(model = V::TYPE_NAME, cells = n_cells, "constructed");

        Ok(Self {
            mesh,
            wall_distance,
            r: TransportedField {
                values,
                boundary: r_boundary,
            },
            nut: vec![0.0; n_cells],
            strain_rate: vec![0.0; n_cells],
            coefficients,
            variant,
            config: CorrectConfig::default(),
            solver: Box::new(GaussSeidel::default()),
            _variant: PhantomData,
        })
    }

    /// Replaces the linear solver of the transport equation.
    #[must_use]
    pub fn with_solver(mut self, solver: impl LinearSolver + 'a) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Replaces the configuration of [`RasModel::correct`].
    #[must_use]
    pub fn with_config(mut self, config: CorrectConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the variant switches.
    ///
    /// `VariantConfig { rotation_term: false, cm: Some(0.0) }` reduces the
    /// 2018 model to the original one.
    #[must_use]
    pub fn with_variant(mut self, variant: VariantConfig) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    #[must_use]
    pub fn variant(&self) -> VariantConfig {
        self.variant
    }

    #[must_use]
    pub fn config(&self) -> &CorrectConfig {
        &self.config
    }

    /// The transported field `R`.
    #[must_use]
    pub fn r(&self) -> &TransportedField {
        &self.r
    }

    #[must_use]
    pub fn wall_distance(&self) -> &[f64] {
        self.wall_distance
    }

    /// The single-cell source balance under the current coefficients.
    #[must_use]
    pub fn local_balance(&self) -> LocalBalance<'_> {
        LocalBalance::new(&self.coefficients, self.variant)
    }

    /// Viscosity ratio `chi = R / nu` per cell.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldSize`] or [`ModelError::FlowValue`] for an
    /// invalid flow.
    pub fn chi(&self, flow: &dyn FlowContext) -> Result<Vec<f64>, ModelError> {
        self.check_flow(flow)?;
        Ok(self
            .r
            .values
            .par_iter()
            .zip(flow.diffusivity().par_iter())
            .map(|(&r, &nu)| blending::chi(r, nu))
            .collect())
    }

    /// Blending factor `F1` per cell for the current `R` and flow.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldSize`] or [`ModelError::FlowValue`] for an
    /// invalid flow.
    pub fn f1(&self, flow: &dyn FlowContext) -> Result<Vec<f64>, ModelError> {
        self.check_flow(flow)?;
        let (strain, rotation) = rates(flow.velocity_gradient());
        let cells = self.cells(flow.diffusivity(), &strain, &rotation);
        let rotation_term = self.variant.rotation_term;

        Ok(cells
            .par_iter()
            .map(|cell| {
                let eta = blending::eta(cell.strain_rate, cell.rotation_rate, rotation_term);
                blending::f1(cell.r, cell.nu, cell.y, eta)
            })
            .collect())
    }

    /// Effective diffusivity `nu + sigma(F1) R` of `R` per cell.
    ///
    /// With `f1` from [`Self::f1`] this is the diffusivity the transport
    /// equation is assembled with.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldSize`] or [`ModelError::FlowValue`] for an
    /// invalid flow, or [`ModelError::FieldSize`] if `f1` does not match the
    /// mesh.
    pub fn nu_eff(&self, flow: &dyn FlowContext, f1: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_flow(flow)?;
        ModelError::check_size("F1", self.mesh.n_cells(), f1.len())?;
        let coefficients = &self.coefficients;

        Ok(self
            .r
            .values
            .par_iter()
            .zip(flow.diffusivity().par_iter())
            .zip(f1.par_iter())
            .map(|((&r, &nu), &f1)| {
                let sigma = Blended::new(coefficients, f1).sigma;
                viscosity::r_diffusivity(nu, sigma, r)
            })
            .collect())
    }

    /// Replaces `R` by the local equilibrium of production and destruction.
    ///
    /// On error `R` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FieldSize`] or [`ModelError::FlowValue`] for an
    /// invalid flow, or [`ModelError::Equilibrium`] if a cell fails to
    /// converge.
    pub fn initialize_equilibrium(
        &mut self,
        flow: &dyn FlowContext,
        config: &EquilibriumConfig,
    ) -> Result<(), ModelError> {
        self.check_flow(flow)?;
        let (strain, rotation) = rates(flow.velocity_gradient());

        let values = {
            let balance = self.local_balance();
            let nu = flow.diffusivity();
            let mut values = Vec::with_capacity(nu.len());

            for (cell, &y) in self.wall_distance.iter().enumerate() {
                let conditions = cell_conditions(nu[cell], y, strain[cell], rotation[cell])
                    .map_err(|source| EquilibriumError::InvalidConditions { cell, source })?;
                let eta = blending::eta(strain[cell], rotation[cell], self.variant.rotation_term);
                values.push(equilibrium::equilibrium_r(
                    &balance,
                    &self.coefficients,
                    conditions,
                    eta,
                    cell,
                    config,
                )?);
            }
            values
        };

        debug!(model = V::TYPE_NAME, "R initialized at local equilibrium");

        self.r.values = values;
        self.strain_rate = strain;
        self.update_nut(flow.diffusivity());
        Ok(())
    }

    fn check_flow(&self, flow: &dyn FlowContext) -> Result<(), ModelError> {
        let n_cells = self.mesh.n_cells();
        ModelError::check_size("alpha", n_cells, flow.alpha().len())?;
        ModelError::check_size("density", n_cells, flow.density().len())?;
        ModelError::check_size("nu", n_cells, flow.diffusivity().len())?;
        ModelError::check_size("velocity gradient", n_cells, flow.velocity_gradient().len())?;

        let flux = flow.momentum_flux();
        ModelError::check_size(
            "internal face flux",
            self.mesh.n_internal_faces(),
            flux.internal.len(),
        )?;
        ModelError::check_size(
            "boundary face flux",
            self.mesh.boundary_faces().len(),
            flux.boundary.len(),
        )?;

        ModelError::check_values("alpha", flow.alpha(), |a| a.is_finite() && a >= 0.0)?;
        ModelError::check_values("density", flow.density(), |rho| rho.is_finite() && rho > 0.0)?;
        ModelError::check_values("nu", flow.diffusivity(), |nu| nu.is_finite() && nu > 0.0)?;

        let bad_gradient = flow
            .velocity_gradient()
            .iter()
            .enumerate()
            .find(|(_, g)| !g.is_finite());
        match bad_gradient {
            Some((cell, g)) => Err(ModelError::FlowValue {
                field: "velocity gradient",
                cell,
                value: g
                    .0
                    .iter()
                    .flatten()
                    .copied()
                    .find(|c| !c.is_finite())
                    .unwrap_or(f64::NAN),
            }),
            None => Ok(()),
        }
    }

    fn cells(&self, nu: &[f64], strain: &[f64], rotation: &[f64]) -> Vec<Cell> {
        self.r
            .values
            .par_iter()
            .zip(nu.par_iter())
            .zip(self.wall_distance.par_iter())
            .zip(strain.par_iter().zip(rotation.par_iter()))
            .map(|(((&r, &nu), &y), (&strain_rate, &rotation_rate))| Cell {
                r,
                nu,
                y,
                strain_rate,
                rotation_rate,
            })
            .collect()
    }

    /// Squared gradient magnitudes of `S` and `R` for the limiter.
    fn limiter_gradients(&self, strain: &[f64]) -> Vec<Gradients> {
        let mesh = self.mesh;
        let values = &self.r.values;

        let grad_s = green_gauss(mesh, strain, &boundary_values(mesh, strain, &[]));
        let grad_r = green_gauss(
            mesh,
            values,
            &boundary_values(mesh, values, &self.r.boundary),
        );

        grad_s
            .into_par_iter()
            .zip(grad_r.into_par_iter())
            .map(|(s, r)| Gradients {
                strain_rate_sqr: mag_sqr(s),
                r_sqr: mag_sqr(r),
            })
            .collect()
    }

    fn update_nut(&mut self, nu: &[f64]) {
        let cw = self.coefficients.cw();
        self.nut = self
            .r
            .values
            .par_iter()
            .zip(nu.par_iter())
            .map(|(&r, &nu)| viscosity::nut(r, nu, cw))
            .collect();
    }
}

impl<M: Mesh, V: Variant> RasModel for WrayAgarwalModel<'_, M, V> {
    fn type_name(&self) -> &'static str {
        V::TYPE_NAME
    }

    fn read(&mut self, dictionary: &dyn Dictionary) -> Result<(), ModelError> {
        let coefficients =
            Coefficients::from_dictionary(dictionary, V::COEFFS_DICT, Lookup::Strict)?;
        let variant =
            variant::read_config(self.variant, dictionary, V::COEFFS_DICT, Lookup::Strict)?;

        self.coefficients = coefficients;
        self.variant = variant;

        debug!(model = V::TYPE_NAME, ?coefficients, ?variant, "coefficients read");
        Ok(())
    }

    fn validate(&mut self, flow: &dyn FlowContext) -> Result<(), ModelError> {
        self.check_flow(flow)?;
        let (strain, _) = rates(flow.velocity_gradient());
        self.strain_rate = strain;
        self.update_nut(flow.diffusivity());
        debug!(model = V::TYPE_NAME, "validated");
        Ok(())
    }

    fn correct(&mut self, flow: &dyn FlowContext) -> Result<CorrectReport, ModelError> {
        let _span = debug_span!("correct", model = V::TYPE_NAME).entered();
        self.check_flow(flow)?;

        let nu = flow.diffusivity();
        let (strain, rotation) = rates(flow.velocity_gradient());
        let cells = self.cells(nu, &strain, &rotation);
        let gradients = self
            .variant
            .cm
            .is_some()
            .then(|| self.limiter_gradients(&strain));

        let coefficients = &self.coefficients;
        let variant = &self.variant;
        let sources: Vec<_> = cells
            .par_iter()
            .enumerate()
            .map(|(c, cell)| {
                let gradients = gradients.as_ref().map(|g| g[c]);
                source::evaluate(coefficients, variant, cell, gradients)
            })
            .collect();
        debug!("coefficients updated");

        let (su, sp): (Vec<f64>, Vec<f64>) = sources
            .par_iter()
            .zip(cells.par_iter())
            .map(|(sources, cell)| sources.linearize(cell))
            .unzip();
        let sigma: Vec<f64> = sources.par_iter().map(|s| s.blended.sigma).collect();
        let time_step = flow
            .time_step()
            .map(|dt| dt.get::<second>())
            .filter(|&dt| dt.is_finite() && dt > 0.0);

        let mut equation = assemble(
            self.mesh,
            &Inputs {
                alpha: flow.alpha(),
                density: flow.density(),
                flux: flow.momentum_flux(),
                nu,
                time_step,
                r_old: &self.r.values,
                boundary: &self.r.boundary,
                sigma: &sigma,
                su: &su,
                sp: &sp,
            },
        );
        equation.relax(self.config.relaxation.into_inner(), &self.r.values);
        debug!(steady = time_step.is_none(), "equation assembled");

        let mut values = self.r.values.clone();
        let solver = self.solver.solve(&equation, &mut values);
        if solver.converged {
            debug!(
                initial_residual = solver.initial_residual,
                final_residual = solver.final_residual,
                iterations = solver.iterations,
                "solved"
            );
        } else {
            warn!(
                initial_residual = solver.initial_residual,
                final_residual = solver.final_residual,
                iterations = solver.iterations,
                "linear solver did not converge"
            );
        }

        let clipped = clip_negative(&mut values);
        if clipped > 0 {
            warn!(clipped, "negative R clipped to zero");
        }
        self.r.values = values;

        self.strain_rate = strain;
        self.update_nut(nu);
        debug!("viscosity updated");

        Ok(CorrectReport { solver, clipped })
    }

    fn nut(&self) -> &[f64] {
        &self.nut
    }

    fn effective_viscosity(&self, flow: &dyn FlowContext) -> Result<Vec<f64>, ModelError> {
        self.check_flow(flow)?;
        Ok(self
            .nut
            .par_iter()
            .zip(flow.diffusivity().par_iter())
            .map(|(&nut, &nu)| nut + nu)
            .collect())
    }

    fn k(&self) -> Vec<f64> {
        let cmu = self.coefficients.cmu();
        self.nut
            .par_iter()
            .zip(self.strain_rate.par_iter())
            .map(|(&nut, &s)| viscosity::k(nut, s, cmu))
            .collect()
    }

    fn epsilon(&self) -> Vec<f64> {
        self.nut
            .par_iter()
            .zip(self.strain_rate.par_iter())
            .map(|(&nut, &s)| viscosity::epsilon(nut, s))
            .collect()
    }
}

/// Strain and rotation rate magnitudes per cell.
fn rates(gradients: &[VelocityGradient]) -> (Vec<f64>, Vec<f64>) {
    gradients
        .par_iter()
        .map(|g| (g.strain_rate(), g.rotation_rate()))
        .unzip()
}

/// Sets negative or non-finite values to zero, returning how many changed.
fn clip_negative(values: &mut [f64]) -> usize {
    values
        .par_iter_mut()
        .map(|r| {
            if *r >= 0.0 && r.is_finite() {
                0
            } else {
                *r = 0.0;
                1
            }
        })
        .sum()
}

fn cell_conditions(
    nu: f64,
    y: f64,
    strain_rate: f64,
    rotation_rate: f64,
) -> Result<CellConditions, ConstraintError> {
    Ok(CellConditions {
        r: NonNegative::zero(),
        nu: StrictlyPositive::new(KinematicViscosity::new::<square_meter_per_second>(
            nu.max(NU_FLOOR),
        ))?,
        wall_distance: StrictlyPositive::new(Length::new::<meter>(y))?,
        strain_rate: NonNegative::new(Frequency::new::<hertz>(strain_rate))?,
        rotation_rate: NonNegative::new(Frequency::new::<hertz>(rotation_rate))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use approx::assert_relative_eq;
    use twine_core::Model;
    use uom::si::f64::Time;

    use crate::{
        models::turbulence::CoefficientError,
        support::{
            constraint::UnitIntervalLowerOpen,
            flow::{FaceFlux, FlowFields},
            linear::GaussSeidelConfig,
            mesh::{CartesianMesh, Side},
        },
    };

    use super::core::test_support::{
        NU_AIR, channel, shear_flow, transient_shear_flow, wall_at_bottom,
    };

    fn uniform(r: f64) -> InitialR {
        InitialR::Uniform(
            NonNegative::new(KinematicViscosity::new::<square_meter_per_second>(r)).unwrap(),
        )
    }

    fn model<'a, V: Variant>(
        mesh: &'a CartesianMesh,
        wall_distance: &'a [f64],
        initial: InitialR,
    ) -> WrayAgarwalModel<'a, CartesianMesh, V> {
        WrayAgarwalModel::new(ModelArgs {
            mesh,
            wall_distance,
            r_boundary: wall_at_bottom(),
            initial,
            dictionary: &(),
        })
        .unwrap()
    }

    fn build<'a>(
        mesh: &'a CartesianMesh,
        wall_distance: &'a [f64],
        r_boundary: Vec<BoundaryCondition>,
        initial: InitialR,
    ) -> Result<WrayAgarwal<'a, CartesianMesh>, ModelError> {
        WrayAgarwal::new(ModelArgs {
            mesh,
            wall_distance,
            r_boundary,
            initial,
            dictionary: &(),
        })
    }

    fn full_dictionary(kappa: f64) -> BTreeMap<String, f64> {
        [
            ("C1kOm", 0.0829),
            ("C1kEps", 0.1127),
            ("sigmakW", 0.72),
            ("sigmakEps", 1.0),
            ("kappa", kappa),
            ("Cmu", 0.09),
            ("Cw", 8.54),
            ("Cm", 8.0),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    #[test]
    fn construction_validates_inputs() {
        let mesh = channel(2, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let short = build(&mesh, &y[..3], wall_at_bottom(), uniform(0.0));
        assert!(matches!(
            short,
            Err(ModelError::FieldSize {
                field: "wall distance",
                expected: 4,
                found: 3
            })
        ));

        let bad_y = [0.25, 0.0, 0.75, 0.75];
        let err = build(&mesh, &bad_y, wall_at_bottom(), uniform(0.0));
        assert!(matches!(err, Err(ModelError::WallDistance { cell: 1, .. })));

        let field = InitialR::Field(vec![0.0, 1e-5, -1e-6, 0.0]);
        let err = build(&mesh, &y, wall_at_bottom(), field);
        assert!(matches!(err, Err(ModelError::InitialValue { cell: 2, .. })));

        let mut bcs = wall_at_bottom();
        bcs[Side::Top.patch()] = BoundaryCondition::FixedValue(f64::NAN);
        let err = build(&mesh, &y, bcs, uniform(0.0));
        assert!(matches!(err, Err(ModelError::BoundaryValue { patch: 1, .. })));

        let err = build(&mesh, &y, vec![BoundaryCondition::ZeroGradient], uniform(0.0));
        assert!(matches!(
            err,
            Err(ModelError::FieldSize {
                field: "R boundary",
                ..
            })
        ));
    }

    #[test]
    fn construction_takes_dictionary_defaults() {
        let mesh = channel(2, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let dict = BTreeMap::from([("Cm".to_string(), 5.0), ("kappa".to_string(), 0.4)]);

        let model = WrayAgarwal2018::new(ModelArgs {
            mesh: &mesh,
            wall_distance: &y,
            r_boundary: wall_at_bottom(),
            initial: uniform(1e-5),
            dictionary: &dict,
        })
        .unwrap();

        assert_eq!(model.type_name(), "WrayAgarwal2018");
        assert_eq!(model.variant().cm, Some(5.0));
        assert_relative_eq!(model.coefficients().kappa(), 0.4);
        assert_relative_eq!(model.coefficients().cw(), Coefficients::DEFAULT_CW);
        assert!(model.nut().iter().all(|&nut| nut == 0.0));
        assert_eq!(model.r().values(), &[1e-5; 4]);
    }

    #[test]
    fn read_is_strict_and_atomic() {
        let mesh = channel(1, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let mut model = model::<Revised2018>(&mesh, &y, uniform(0.0));

        let mut incomplete = full_dictionary(0.38);
        incomplete.remove("Cm");
        let err = model.read(&incomplete).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Coefficients(CoefficientError::Missing { key: "Cm", .. })
        ));
        assert_relative_eq!(model.coefficients().kappa(), Coefficients::DEFAULT_KAPPA);

        let mut invalid = full_dictionary(0.38);
        invalid.insert("Cw".to_string(), -1.0);
        assert!(model.read(&invalid).is_err());
        assert_relative_eq!(model.coefficients().kappa(), Coefficients::DEFAULT_KAPPA);

        model.read(&full_dictionary(0.38)).unwrap();
        assert_relative_eq!(model.coefficients().kappa(), 0.38);
    }

    #[test]
    fn zero_field_stays_zero() {
        let mesh = channel(3, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = transient_shear_flow(&mesh, NU_AIR, 25.0, 0.01);

        for variant in [Original::config(), Revised2018::config()] {
            let mut model = model::<Revised2018>(&mesh, &y, uniform(0.0)).with_variant(variant);
            let report = model.correct(&flow).unwrap();

            assert!(report.solver.converged);
            assert_eq!(report.clipped, 0);
            assert!(model.r().values().iter().all(|&r| r == 0.0));
            assert!(model.nut().iter().all(|&nut| nut == 0.0));
        }
    }

    #[test]
    fn sheared_channel_grows_r_away_from_the_wall() {
        let mesh = channel(4, 8, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = transient_shear_flow(&mesh, NU_AIR, 10.0, 0.01);
        let r0 = 1e-4;
        let mut model = model::<Original>(&mesh, &y, uniform(r0));

        for _ in 0..2 {
            let report = model.correct(&flow).unwrap();
            assert!(report.solver.converged);
            assert_eq!(report.clipped, 0);
        }

        let r = model.r().values();
        let (bottom, top) = (r[0], r[r.len() - 1]);
        assert!(r.iter().all(|&value| value > r0));
        assert!(top > bottom);

        let nut = model.nut();
        assert!(nut[nut.len() - 1] > 0.0);
        assert!(nut.iter().zip(r).all(|(&nut, &r)| nut <= r));
    }

    #[test]
    fn r_is_never_negative() {
        let mesh = channel(4, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let field: Vec<f64> = (0_u8..16).map(|c| 1e-3 * f64::from(c % 3)).collect();

        // Strong cross flow into a wall held at R = 0, in steady mode.
        let flow = FlowFields::incompressible(
            vec![NU_AIR; 16],
            FaceFlux::uniform(&mesh, [0.0, -5.0, 0.0]),
            vec![VelocityGradient::planar(0.0, 50.0, 0.0, 0.0); 16],
        );

        let mut model = model::<Revised2018>(&mesh, &y, InitialR::Field(field));
        for _ in 0..3 {
            model.correct(&flow).unwrap();
            assert!(model.r().values().iter().all(|&r| r >= 0.0));
            assert!(model.nut().iter().all(|&nut| nut >= 0.0));
        }
    }

    #[test]
    fn reduced_revision_matches_original() {
        let mesh = channel(3, 6, 1.0, 0.5);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = transient_shear_flow(&mesh, NU_AIR, 40.0, 0.005);
        let initial: Vec<f64> = (0_u8..18).map(|c| 1e-5 * f64::from(c + 1)).collect();

        let mut original = model::<Original>(&mesh, &y, InitialR::Field(initial.clone()));
        let mut revised = model::<Revised2018>(&mesh, &y, InitialR::Field(initial)).with_variant(
            VariantConfig {
                rotation_term: false,
                cm: Some(0.0),
            },
        );

        for _ in 0..3 {
            original.correct(&flow).unwrap();
            revised.correct(&flow).unwrap();
        }

        for (a, b) in original.r().values().iter().zip(revised.r().values()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn relaxation_slows_the_update() {
        let mesh = channel(2, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = transient_shear_flow(&mesh, NU_AIR, 10.0, 0.01);
        let r0 = 1e-4;

        let mut full = model::<Original>(&mesh, &y, uniform(r0));
        let mut relaxed = model::<Original>(&mesh, &y, uniform(r0)).with_config(CorrectConfig {
            relaxation: UnitIntervalLowerOpen::new(0.5).unwrap(),
        });
        full.correct(&flow).unwrap();
        relaxed.correct(&flow).unwrap();

        for (a, b) in full.r().values().iter().zip(relaxed.r().values()) {
            assert!((b - r0).abs() < (a - r0).abs());
        }
    }

    #[test]
    fn reports_solver_non_convergence() {
        let mesh = channel(4, 8, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = transient_shear_flow(&mesh, NU_AIR, 10.0, 0.01);

        let mut model = model::<Original>(&mesh, &y, uniform(1e-4)).with_solver(GaussSeidel::new(
            GaussSeidelConfig {
                tolerance: 1e-30,
                rel_tol: 0.0,
                max_iters: 1,
            },
        ));

        let report = model.correct(&flow).unwrap();
        assert!(!report.solver.converged);
        assert_eq!(report.solver.iterations, 1);
        assert!(model.r().values().iter().all(|&r| r > 0.0));
    }

    #[test]
    fn mismatched_flow_leaves_state_untouched() {
        let mesh = channel(2, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let mut model = model::<Original>(&mesh, &y, uniform(1e-4));

        let other = channel(3, 2, 1.0, 1.0);
        let flow = shear_flow(&other, NU_AIR, 10.0);

        assert!(matches!(
            model.validate(&flow),
            Err(ModelError::FieldSize { field: "alpha", .. })
        ));
        assert!(matches!(
            model.correct(&flow),
            Err(ModelError::FieldSize { .. })
        ));
        assert!(matches!(
            model.effective_viscosity(&flow),
            Err(ModelError::FieldSize { field: "alpha", .. })
        ));
        assert_eq!(model.r().values(), &[1e-4; 4]);
        assert!(model.nut().iter().all(|&nut| nut == 0.0));
    }

    #[test]
    fn non_physical_flow_values_are_rejected() {
        let mesh = channel(3, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let mut model = model::<Revised2018>(&mesh, &y, uniform(1e-4));
        let shear = vec![VelocityGradient::simple_shear(10.0); 12];

        let mut grad_u = shear.clone();
        grad_u[5] = VelocityGradient::planar(0.0, f64::NAN, 0.0, 0.0);
        let nan_gradient =
            FlowFields::incompressible(vec![NU_AIR; 12], FaceFlux::zeros(&mesh), grad_u);
        assert!(matches!(
            model.correct(&nan_gradient),
            Err(ModelError::FlowValue {
                field: "velocity gradient",
                cell: 5,
                value,
            }) if value.is_nan()
        ));

        let mut nu = vec![NU_AIR; 12];
        nu[2] = -1e-5;
        let negative_nu = FlowFields::incompressible(nu, FaceFlux::zeros(&mesh), shear.clone());
        assert!(matches!(
            model.validate(&negative_nu),
            Err(ModelError::FlowValue { field: "nu", cell: 2, .. })
        ));
        assert!(matches!(
            model.correct(&negative_nu),
            Err(ModelError::FlowValue { field: "nu", cell: 2, .. })
        ));
        assert!(model.effective_viscosity(&negative_nu).is_err());

        let mut rho = vec![1.2; 12];
        rho[7] = 0.0;
        let zero_density =
            FlowFields::compressible(rho, FaceFlux::zeros(&mesh), vec![NU_AIR; 12], shear.clone());
        assert!(matches!(
            model.correct(&zero_density),
            Err(ModelError::FlowValue { field: "density", cell: 7, .. })
        ));

        let mut alpha = vec![1.0; 12];
        alpha[0] = 0.0;
        let empty_cell = shear_flow(&mesh, NU_AIR, 10.0).with_alpha(alpha.clone());
        model.validate(&empty_cell).unwrap();

        alpha[0] = -0.1;
        let negative_alpha = shear_flow(&mesh, NU_AIR, 10.0).with_alpha(alpha);
        assert!(matches!(
            model.correct(&negative_alpha),
            Err(ModelError::FlowValue { field: "alpha", cell: 0, .. })
        ));

        assert_eq!(model.r().values(), &[1e-4; 12]);
    }

    #[test]
    fn uniform_phase_density_weighting_cancels() {
        let mesh = channel(3, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let phi = FaceFlux::uniform(&mesh, [0.5, 0.0, 0.0]);
        let grad_u = vec![VelocityGradient::simple_shear(10.0); 12];
        let dt = Time::new::<second>(0.01);
        let (alpha, rho) = (0.5, 1.2);

        let incompressible =
            FlowFields::incompressible(vec![NU_AIR; 12], phi.clone(), grad_u.clone())
                .with_time_step(dt);
        let weighted = FlowFields::compressible(
            vec![rho; 12],
            phi.scaled(alpha * rho),
            vec![NU_AIR; 12],
            grad_u,
        )
        .with_alpha(vec![alpha; 12])
        .with_time_step(dt);

        let mut reference = model::<Revised2018>(&mesh, &y, uniform(1e-4));
        let mut compressible = model::<Revised2018>(&mesh, &y, uniform(1e-4));
        for _ in 0..2 {
            reference.correct(&incompressible).unwrap();
            compressible.correct(&weighted).unwrap();
        }

        for (a, b) in reference.r().values().iter().zip(compressible.r().values()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9);
        }
    }

    #[test]
    fn density_variation_weights_diffusion() {
        // Two stacked cells over a wall, with diffusion comparable to the
        // mass per time step.
        let mesh = channel(1, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let initial = || InitialR::Field(vec![1e-2, 3e-2]);
        let dt = Time::new::<second>(1.0);
        let grad_u = vec![VelocityGradient::simple_shear(10.0); 2];

        let uniform_rho = transient_shear_flow(&mesh, NU_AIR, 10.0, 1.0);
        let layered = FlowFields::compressible(
            vec![1.0, 4.0],
            FaceFlux::zeros(&mesh),
            vec![NU_AIR; 2],
            grad_u,
        )
        .with_time_step(dt);

        let mut reference = model::<Original>(&mesh, &y, initial());
        reference.correct(&uniform_rho).unwrap();
        let mut weighted = model::<Original>(&mesh, &y, initial());
        weighted.correct(&layered).unwrap();

        let (r, w) = (reference.r().values(), weighted.r().values());
        assert_relative_eq!(r[0], 0.019_105_880_732_243, max_relative = 1e-6);
        assert_relative_eq!(r[1], 0.055_886_441_409_920, max_relative = 1e-6);
        assert_relative_eq!(w[0], 0.023_566_492_274_339, max_relative = 1e-6);
        assert_relative_eq!(w[1], 0.056_616_549_493_860, max_relative = 1e-6);
    }

    #[test]
    fn validate_refreshes_viscosity_and_diagnostics() {
        let mesh = channel(2, 2, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = shear_flow(&mesh, NU_AIR, 10.0);
        let mut model = model::<Original>(&mesh, &y, uniform(1e-3));
        model.validate(&flow).unwrap();

        let expected_nut = viscosity::nut(1e-3, NU_AIR, Coefficients::DEFAULT_CW);
        for &nut in model.nut() {
            assert_relative_eq!(nut, expected_nut, max_relative = 1e-12);
        }
        let nu_eff = model.effective_viscosity(&flow).unwrap();
        for (nu_eff, nut) in nu_eff.iter().zip(model.nut()) {
            assert_relative_eq!(*nu_eff, nut + NU_AIR, max_relative = 1e-12);
        }

        let k = model.k();
        let epsilon = model.epsilon();
        assert_eq!(k, model.k());
        assert_eq!(epsilon, model.epsilon());
        assert_relative_eq!(k[0], expected_nut * 10.0 / 0.3, max_relative = 1e-12);
        assert_relative_eq!(epsilon[0], expected_nut * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn blending_diagnostics() {
        let mesh = channel(1, 8, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = shear_flow(&mesh, NU_AIR, 10.0);
        let model = model::<Original>(&mesh, &y, uniform(1e-4));

        let f1 = model.f1(&flow).unwrap();
        assert_relative_eq!(f1[0], 0.9);
        assert!(f1.windows(2).all(|pair| pair[1] <= pair[0]));

        let chi = model.chi(&flow).unwrap();
        assert_relative_eq!(chi[3], 1e-4 / NU_AIR, max_relative = 1e-12);

        let nu_eff = model.nu_eff(&flow, &f1).unwrap();
        let coefficients = model.coefficients();
        let sigma_wall = 0.9 * coefficients.inner().sigma + 0.1 * coefficients.outer().sigma;
        assert_relative_eq!(nu_eff[0], NU_AIR + sigma_wall * 1e-4, max_relative = 1e-12);

        let far = model.nu_eff(&flow, &[0.0; 8]).unwrap();
        let sigma_far = coefficients.outer().sigma;
        assert_relative_eq!(far[7], NU_AIR + sigma_far * 1e-4, max_relative = 1e-12);

        assert!(matches!(
            model.nu_eff(&flow, &[0.0; 3]),
            Err(ModelError::FieldSize { field: "F1", .. })
        ));
    }

    #[test]
    fn equilibrium_initialization_balances_sources() {
        let mesh = channel(1, 4, 1.0, 1.0);
        let y = mesh.wall_distance(&[Side::Bottom]);
        let flow = shear_flow(&mesh, NU_AIR, 10.0);
        let mut model = model::<Original>(&mesh, &y, uniform(0.0));

        model
            .initialize_equilibrium(&flow, &EquilibriumConfig::default())
            .unwrap();

        let r = model.r().values().to_vec();
        assert!(r.windows(2).all(|pair| pair[1] > pair[0]));

        let balance = model.local_balance();
        for (cell, (&r, &y)) in r.iter().zip(&y).enumerate() {
            let r = NonNegative::new(KinematicViscosity::new::<square_meter_per_second>(r)).unwrap();
            let conditions = cell_conditions(NU_AIR, y, 10.0, 10.0).unwrap().with_r(r);
            let out = balance.call(&conditions).unwrap();
            let p = out.production.value;
            assert!(out.net.value.abs() <= 1e-9 * p, "cell {cell}: net={}", out.net.value);
            assert_relative_eq!(
                out.nut.get::<square_meter_per_second>(),
                model.nut()[cell],
                max_relative = 1e-12
            );
        }
    }
}
