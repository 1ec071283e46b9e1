//! Scene store objects for fieldscope-rs.
//!
//! This crate provides the concrete objects held by the scene store:
//! - Volume grids and the scalar fields sampled on them
//! - Floating scalar and color images

// Grid code intentionally uses casts between index types and floats
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod floating;
pub mod volume_grid;

pub use floating::{FloatingColorImage, FloatingScalarImage};
pub use volume_grid::{VolumeGrid, VolumeGridScalarQuantity};
