//! Public turbulence models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are organized into domain-specific submodules. RANS closures live in
//! [`turbulence`], alongside the [`turbulence::RasModel`] contract a flow
//! solver uses to drive them and the [`turbulence::registry`] that selects
//! them by name.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the closure's math lives. The `core` module is an implementation
//! detail and is **not** re-exported as part of the public API.
//!
//! The public model type is a thin owner of state (the transported field and
//! its coefficients) that delegates every per-cell evaluation to `core`.
//! The same `core` also backs a [`twine_core::Model`] adapter for single-cell
//! evaluation with units.

pub mod turbulence;
