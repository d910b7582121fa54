//! Selection of turbulence models by name.
//!
//! ```
//! use twine_turbulence::{
//!     models::turbulence::{
//!         registry::Registry,
//!         wray_agarwal::{InitialR, ModelArgs},
//!     },
//!     support::{
//!         constraint::NonNegative,
//!         mesh::{BoundaryCondition, CartesianMesh, Side},
//!     },
//! };
//! # use std::num::NonZeroUsize;
//! # use twine_turbulence::support::constraint::StrictlyPositive;
//! # use uom::si::{f64::Length, length::meter};
//! # let length = |l| StrictlyPositive::new(Length::new::<meter>(l)).unwrap();
//! # let n = |n| NonZeroUsize::new(n).unwrap();
//! let mesh = CartesianMesh::new(n(4), n(4), length(1.0), length(1.0));
//! let wall_distance = mesh.wall_distance(&[Side::Bottom]);
//!
//! let registry = Registry::with_builtin();
//! let model = registry
//!     .build(
//!         "WrayAgarwal2018",
//!         ModelArgs {
//!             mesh: &mesh,
//!             wall_distance: &wall_distance,
//!             r_boundary: vec![BoundaryCondition::ZeroGradient; 4],
//!             initial: InitialR::Uniform(NonNegative::zero()),
//!             dictionary: &(),
//!         },
//!     )
//!     .unwrap();
//!
//! assert_eq!(model.type_name(), "WrayAgarwal2018");
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::support::mesh::Mesh;

use super::{
    ModelError, RasModel,
    wray_agarwal::{ModelArgs, Original, Revised2018, Variant, WrayAgarwalModel},
};

/// Constructs a boxed model from its arguments.
pub type Factory<M> = for<'a> fn(ModelArgs<'a, M>) -> Result<Box<dyn RasModel + 'a>, ModelError>;

/// Name to factory table for models on meshes of type `M`.
pub struct Registry<M: Mesh + 'static> {
    factories: BTreeMap<&'static str, Factory<M>>,
}

impl<M: Mesh + 'static> Registry<M> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with `"WrayAgarwal"` and `"WrayAgarwal2018"`.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Original::TYPE_NAME, build::<M, Original>);
        registry.register(Revised2018::TYPE_NAME, build::<M, Revised2018>);
        registry
    }

    /// Registers `factory` under `name`, returning the factory it replaces.
    pub fn register(&mut self, name: &'static str, factory: Factory<M>) -> Option<Factory<M>> {
        self.factories.insert(name, factory)
    }

    /// Constructs the model registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownModel`] if nothing is registered under
    /// `name`, or the factory's error if construction fails.
    pub fn build<'a>(
        &self,
        name: &str,
        args: ModelArgs<'a, M>,
    ) -> Result<Box<dyn RasModel + 'a>, ModelError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ModelError::UnknownModel {
                name: name.to_string(),
            })?;
        debug!(model = name, "selected");
        factory(args)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl<M: Mesh + 'static> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

fn build<M: Mesh + 'static, V: Variant + 'static>(
    args: ModelArgs<'_, M>,
) -> Result<Box<dyn RasModel + '_>, ModelError> {
    Ok(Box::new(WrayAgarwalModel::<M, V>::new(args)?))
}
