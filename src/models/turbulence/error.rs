use thiserror::Error;

use crate::support::constraint::ConstraintError;

use super::wray_agarwal::EquilibriumError;

/// Errors reading model coefficients from a dictionary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoefficientError {
    /// A required entry is absent.
    #[error("missing entry `{key}` in dictionary `{dictionary}`")]
    Missing {
        /// Dictionary that was searched.
        dictionary: &'static str,

        /// Entry that was not found.
        key: &'static str,
    },

    /// An entry is present but violates its constraint.
    #[error("invalid entry `{key}` = {value}")]
    Invalid {
        key: &'static str,
        value: f64,
        #[source]
        source: ConstraintError,
    },
}

/// Errors constructing, configuring, or driving a turbulence model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Coefficients could not be read.
    #[error("coefficient error")]
    Coefficients(#[from] CoefficientError),

    /// A field has the wrong number of entries for the mesh.
    #[error("field `{field}` has {found} entries, expected {expected}")]
    FieldSize {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A wall distance is not finite and strictly positive.
    #[error("invalid wall distance {value} in cell {cell}")]
    WallDistance { cell: usize, value: f64 },

    /// An initial value of the transported field is negative or not finite.
    #[error("invalid initial value {value} in cell {cell}")]
    InitialValue { cell: usize, value: f64 },

    /// A fixed boundary value of the transported field is negative or not finite.
    #[error("invalid boundary value {value} on patch {patch}")]
    BoundaryValue { patch: usize, value: f64 },

    /// A flow field holds a value outside its physical range.
    #[error("invalid {field} value {value} in cell {cell}")]
    FlowValue {
        field: &'static str,
        cell: usize,
        value: f64,
    },

    /// Equilibrium initialization failed.
    #[error("equilibrium initialization failed")]
    Equilibrium(#[from] EquilibriumError),

    /// No model is registered under the requested name.
    #[error("unknown turbulence model `{name}`")]
    UnknownModel { name: String },
}

impl ModelError {
    /// Checks that `found` matches `expected` for the named field.
    pub(crate) fn check_size(
        field: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), ModelError> {
        if found == expected {
            Ok(())
        } else {
            Err(ModelError::FieldSize {
                field,
                expected,
                found,
            })
        }
    }

    /// Checks that every entry of the named field satisfies `valid`.
    pub(crate) fn check_values(
        field: &'static str,
        values: &[f64],
        valid: impl Fn(f64) -> bool,
    ) -> Result<(), ModelError> {
        match values.iter().enumerate().find(|&(_, &value)| !valid(value)) {
            Some((cell, &value)) => Err(ModelError::FlowValue { field, cell, value }),
            None => Ok(()),
        }
    }
}
