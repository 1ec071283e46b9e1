//! Floating quantities: screen-space data not attached to any structure.
//!
//! Floating quantities are images (scalar or color) that are displayed as
//! standalone overlays or fullscreen.

mod color_image;
mod scalar_image;

pub use color_image::*;
pub use scalar_image::*;
