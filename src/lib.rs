//! # Twine Turbulence
//!
//! One-equation RANS turbulence closures for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Turbulence models and the contract solvers drive them through.
//! - [`support`]: Mesh, field, linear-solver, and configuration seams used by models.
//!
//! ## Host collaborators
//!
//! Models never own the mesh, the flow fields, or the linear solver.
//! They consume them through the traits in [`support`]:
//!
//! - [`support::mesh::Mesh`] for finite-volume geometry and face addressing
//! - [`support::flow::FlowContext`] for density, fluxes, and viscosity
//! - [`support::linear::LinearSolver`] for the assembled transport equation
//! - [`support::dictionary::Dictionary`] for coefficient overrides
//!
//! Each trait ships with a small reference implementation
//! ([`support::mesh::CartesianMesh`], [`support::flow::FlowFields`],
//! [`support::linear::GaussSeidel`], and the map-backed dictionaries) so a
//! model can be exercised without a full CFD host.
//!
//! Note: Only utilities at the crate-level (in [`support`]) are part of the public API.
//! Model-specific utility code remains private.

pub mod models;
pub mod support;
