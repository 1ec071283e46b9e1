//! Structure trait and related types.
//!
//! A [`Structure`] represents a named object in the scene, such as a volume grid.

use std::any::Any;

use glam::{Mat4, Vec3};

use crate::options::DEFAULT_MATERIAL;
use crate::quantity::Quantity;

/// A named object that can be placed in the scene.
///
/// Each structure has:
/// - A unique name within its type
/// - A transform matrix for positioning in the scene
/// - Visibility, material and transparency state
pub trait Structure: Any + Send + Sync {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the unique name of this structure.
    fn name(&self) -> &str;

    /// Returns the type name of this structure (e.g., "`VolumeGrid`").
    fn type_name(&self) -> &'static str;

    /// Returns the axis-aligned bounding box in world coordinates.
    ///
    /// Returns `None` if the structure has no spatial extent.
    fn bounding_box(&self) -> Option<(Vec3, Vec3)>;

    /// Returns a characteristic length scale for this structure.
    fn length_scale(&self) -> f32;

    /// Returns the current model transform matrix.
    fn transform(&self) -> Mat4;

    /// Sets the model transform matrix.
    fn set_transform(&mut self, transform: Mat4);

    /// Returns whether this structure is currently visible.
    fn is_enabled(&self) -> bool;

    /// Sets the visibility of this structure.
    fn set_enabled(&mut self, enabled: bool);

    /// Recomputes derived data for the structure and its quantities.
    fn refresh(&mut self);

    /// Moves the structure so its world-space bounding box is centered at the origin.
    fn center_bounding_box(&mut self) {
        if let Some((min, max)) = self.bounding_box() {
            let center = (min + max) * 0.5;
            self.set_transform(Mat4::from_translation(-center) * self.transform());
        }
    }

    /// Uniformly rescales the structure so its length scale becomes 1.
    fn rescale_to_unit(&mut self) {
        let scale = self.length_scale();
        if scale > 0.0 && scale.is_finite() {
            self.set_transform(Mat4::from_scale(Vec3::splat(1.0 / scale)) * self.transform());
        }
    }

    /// Resets the transform to identity.
    fn reset_transform(&mut self) {
        self.set_transform(Mat4::IDENTITY);
    }

    /// Returns the translation part of the transform.
    fn position(&self) -> Vec3 {
        self.transform().w_axis.truncate()
    }

    /// Replaces the translation part of the transform.
    fn set_position(&mut self, position: Vec3) {
        let mut transform = self.transform();
        transform.w_axis = position.extend(1.0);
        self.set_transform(transform);
    }

    /// Applies a world-space translation on top of the current transform.
    fn translate(&mut self, delta: Vec3) {
        self.set_transform(Mat4::from_translation(delta) * self.transform());
    }

    /// Returns the material name for this structure (e.g., "clay", "wax").
    fn material(&self) -> &str {
        DEFAULT_MATERIAL
    }

    /// Sets the material for this structure by name.
    fn set_material(&mut self, _material: &str) {
        // Default no-op; structures that support materials override this
    }

    /// Returns the structure transparency (0 = invisible, 1 = opaque).
    fn transparency(&self) -> f32 {
        1.0
    }

    /// Sets the structure transparency.
    fn set_transparency(&mut self, _transparency: f32) {}

    /// Returns whether the named slice plane is ignored by this structure.
    fn ignores_slice_plane(&self, _plane: &str) -> bool {
        false
    }

    /// Sets whether the named slice plane is ignored by this structure.
    fn set_ignore_slice_plane(&mut self, _plane: &str, _ignore: bool) {}
}

/// A structure that can have quantities attached to it.
pub trait HasQuantities: Structure {
    /// Gets a quantity by name.
    fn get_quantity(&self, name: &str) -> Option<&dyn Quantity>;

    /// Gets a mutable quantity by name.
    fn get_quantity_mut(&mut self, name: &str) -> Option<&mut Box<dyn Quantity>>;

    /// Removes a quantity by name.
    fn remove_quantity(&mut self, name: &str) -> Option<Box<dyn Quantity>>;

    /// Removes every quantity.
    fn remove_all_quantities(&mut self);

    /// Returns all quantities attached to this structure.
    fn quantities(&self) -> &[Box<dyn Quantity>];

    /// Returns the number of quantities attached.
    fn num_quantities(&self) -> usize {
        self.quantities().len()
    }
}
