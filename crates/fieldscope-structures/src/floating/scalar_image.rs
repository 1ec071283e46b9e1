//! Floating scalar image quantity.

use fieldscope_core::options::DataType;
use fieldscope_core::quantity::{Quantity, QuantityKind};

/// A floating scalar image quantity (not attached to any structure).
///
/// Displays a 2D grid of scalar values using a colormap. Values are stored
/// flat, row-major.
pub struct FloatingScalarImage {
    name: String,
    width: u32,
    height: u32,
    values: Vec<f32>,
    data_type: DataType,
    enabled: bool,
    show_fullscreen: bool,
    colormap_name: String,
    data_min: f32,
    data_max: f32,
}

impl FloatingScalarImage {
    /// Creates a new floating scalar image.
    ///
    /// `values` must already hold `width * height` entries.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        values: Vec<f32>,
        data_type: DataType,
    ) -> Self {
        let (data_min, data_max) = data_type.default_range(&values);

        Self {
            name: name.into(),
            width,
            height,
            values,
            data_type,
            enabled: true,
            show_fullscreen: false,
            colormap_name: data_type.default_color_map().to_string(),
            data_min,
            data_max,
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

    /// Returns the scalar values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the data type the image was registered with.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Gets the colormap name.
    #[must_use]
    pub fn colormap_name(&self) -> &str {
        &self.colormap_name
    }

    /// Sets the colormap name.
    pub fn set_colormap(&mut self, name: impl Into<String>) -> &mut Self {
        self.colormap_name = name.into();
        self
    }

    /// Gets the data range.
    #[must_use]
    pub fn data_range(&self) -> (f32, f32) {
        (self.data_min, self.data_max)
    }

    /// Sets the data range.
    pub fn set_data_range(&mut self, min: f32, max: f32) -> &mut Self {
        self.data_min = min;
        self.data_max = max;
        self
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

impl Quantity for FloatingScalarImage {
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
        QuantityKind::Scalar
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    fn data_size(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_image_creation() {
        let values = vec![0.0, 0.5, 1.0, 1.5];
        let img = FloatingScalarImage::new("test", 2, 2, values, DataType::Standard);

        assert_eq!(img.name(), "test");
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.data_size(), 4);
        assert_eq!(img.data_range(), (0.0, 1.5));
        assert_eq!(img.kind(), QuantityKind::Scalar);
        assert_eq!(img.colormap_name(), "viridis");
        assert!(img.is_enabled());
        assert!(!img.show_fullscreen());
    }

    #[test]
    fn test_scalar_image_data_type_defaults() {
        let img = FloatingScalarImage::new("test", 2, 1, vec![-0.5, 2.0], DataType::Symmetric);
        assert_eq!(img.data_type(), DataType::Symmetric);
        assert_eq!(img.colormap_name(), "coolwarm");
        assert_eq!(img.data_range(), (-2.0, 2.0));
    }

    #[test]
    fn test_scalar_image_setters() {
        let mut img = FloatingScalarImage::new("test", 2, 2, vec![0.0; 4], DataType::Standard);

        img.set_colormap("blues");
        assert_eq!(img.colormap_name(), "blues");

        img.set_data_range(-1.0, 1.0);
        assert_eq!(img.data_range(), (-1.0, 1.0));

        img.set_show_fullscreen(true);
        assert!(img.show_fullscreen());
    }
}
