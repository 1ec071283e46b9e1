//! Core abstractions for fieldscope-rs.
//!
//! This crate provides the fundamental traits and types used throughout fieldscope-rs:
//! - [`Structure`] trait for named scene objects (volume grids)
//! - [`Quantity`] trait for data attached to structures or floating in screen space
//! - [`Sampler`] for buffer- or callable-backed field sources
//! - [`shape`] validators that canonicalize user arrays
//! - Global state management, structure registry and configuration options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod options;
pub mod quantity;
pub mod registry;
pub mod sampler;
pub mod shape;
pub mod slice_plane;
pub mod state;
pub mod structure;

pub use error::{FieldscopeError, Result};
pub use options::{DataType, Options, VectorType};
pub use quantity::{Quantity, QuantityKind};
pub use registry::Registry;
pub use sampler::{Sampler, SamplerKind};
pub use slice_plane::SlicePlane;
pub use state::{with_context, with_context_mut, Context};
pub use structure::{HasQuantities, Structure};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec3, Vec3};
