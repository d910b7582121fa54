//! Supporting utilities used by models.
//!
//! These modules define the seams between a turbulence model and its host
//! solver, plus small reference implementations of each seam.
//! Their APIs are public but not yet stable.

pub mod constraint;
pub mod dictionary;
pub mod flow;
pub mod linear;
pub mod mesh;
pub mod units;
