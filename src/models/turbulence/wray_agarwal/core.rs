//! The Wray-Agarwal closure engine.
//!
//! Everything here works on plain `f64` values in SI base units, one cell at
//! a time or one field at a time. The model type owns state and sequencing;
//! this module owns the math.

pub(crate) mod assemble;
pub(crate) mod blending;
mod coefficients;
pub(crate) mod source;
pub(crate) mod viscosity;

#[cfg(test)]
pub(crate) mod test_support;

pub use coefficients::{CoefficientSet, Coefficients};

pub(crate) use coefficients::{Lookup, positive_entry};
