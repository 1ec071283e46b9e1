//! Floating color image quantity.

use fieldscope_core::quantity::{Quantity, QuantityKind};
use glam::Vec3;

/// A floating color image quantity (not attached to any structure).
///
/// Displays a 2D grid of RGB colors directly.
pub struct FloatingColorImage {
    name: String,
    width: u32,
    height: u32,
    colors: Vec<Vec3>, // RGB per pixel, row-major
    enabled: bool,
    show_fullscreen: bool,
}

impl FloatingColorImage {
    /// Creates a new floating color image.
    ///
    /// `colors` must already hold `width * height` entries.
    pub fn new(name: impl Into<String>, width: u32, height: u32, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            colors,
            enabled: true,
            show_fullscreen: false,
        }
    }

    /// Returns the image width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel colors.
    #[must_use]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Gets whether the image covers the whole viewport.
    #[must_use]
    pub fn show_fullscreen(&self) -> bool {
        self.show_fullscreen
    }

    /// Sets whether the image covers the whole viewport.
    pub fn set_show_fullscreen(&mut self, fullscreen: bool) -> &mut Self {
        self.show_fullscreen = fullscreen;
        self
    }
}

impl Quantity for FloatingColorImage {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
    fn name(&self) -> &str {
        &self.name
    }
    #[allow(clippy::unnecessary_literal_bound)]
    fn structure_name(&self) -> &str {
        "" // No parent structure
    }
    fn kind(&self) -> QuantityKind {
        QuantityKind::Color
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    fn data_size(&self) -> usize {
        self.colors.len()
    }
}
