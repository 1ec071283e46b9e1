//! Global state management for fieldscope.

use std::sync::{OnceLock, PoisonError, RwLock, RwLockWriteGuard};

use glam::Vec3;

use crate::error::{FieldscopeError, Result};
use crate::options::{Options, BUILTIN_COLOR_MAPS, BUILTIN_MATERIALS};
use crate::quantity::Quantity;
use crate::registry::Registry;
use crate::slice_plane::SlicePlane;

/// Global context singleton.
static CONTEXT: OnceLock<RwLock<Context>> = OnceLock::new();

/// The global context containing all fieldscope state.
pub struct Context {
    /// Whether fieldscope has been initialized.
    pub initialized: bool,

    /// The structure registry.
    pub registry: Registry,

    /// Quantities not attached to any structure (e.g. images), unique by name.
    pub floating_quantities: Vec<Box<dyn Quantity>>,

    /// Slice planes, unique by name.
    pub slice_planes: Vec<SlicePlane>,

    /// Global options.
    pub options: Options,

    /// Known material names.
    pub materials: Vec<String>,

    /// Known color map names.
    pub color_maps: Vec<String>,

    /// Representative length scale for all registered structures.
    pub length_scale: f32,

    /// Axis-aligned bounding box for all registered structures.
    pub bounding_box: (Vec3, Vec3),
}

impl Default for Context {
    fn default() -> Self {
        Self {
            initialized: false,
            registry: Registry::new(),
            floating_quantities: Vec::new(),
            slice_planes: Vec::new(),
            options: Options::default(),
            materials: BUILTIN_MATERIALS.iter().map(ToString::to_string).collect(),
            color_maps: BUILTIN_COLOR_MAPS.iter().map(ToString::to_string).collect(),
            length_scale: 1.0,
            bounding_box: (Vec3::ZERO, Vec3::ONE),
        }
    }
}

impl Context {
    /// Computes the center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.bounding_box.0 + self.bounding_box.1) * 0.5
    }

    /// Updates the global bounding box and length scale from all structures.
    ///
    /// Does nothing when [`Options::auto_compute_scene_extents`] is off.
    pub fn update_extents(&mut self) {
        if !self.options.auto_compute_scene_extents {
            return;
        }

        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut has_extent = false;

        for structure in self.registry.iter() {
            if let Some((bb_min, bb_max)) = structure.bounding_box() {
                min = min.min(bb_min);
                max = max.max(bb_max);
                has_extent = true;
            }
        }

        if has_extent {
            self.bounding_box = (min, max);
            self.length_scale = (max - min).length();
        } else {
            self.bounding_box = (Vec3::ZERO, Vec3::ONE);
            self.length_scale = 1.0;
        }
    }

    /// Returns whether `name` is a known material.
    pub fn has_material(&self, name: &str) -> bool {
        self.materials.iter().any(|m| m == name)
    }

    /// Returns whether `name` is a known color map.
    pub fn has_color_map(&self, name: &str) -> bool {
        self.color_maps.iter().any(|m| m == name)
    }

    /// Adds a floating quantity.
    ///
    /// Returns an error if a floating quantity with the same name exists.
    pub fn add_floating_quantity(&mut self, quantity: Box<dyn Quantity>) -> Result<()> {
        if self.has_floating_quantity(quantity.name()) {
            return Err(FieldscopeError::StructureExists(quantity.name().to_string()));
        }
        self.floating_quantities.push(quantity);
        Ok(())
    }

    /// Returns whether a floating quantity with the given name exists.
    pub fn has_floating_quantity(&self, name: &str) -> bool {
        self.floating_quantities.iter().any(|q| q.name() == name)
    }

    /// Gets a floating quantity by name.
    pub fn floating_quantity(&self, name: &str) -> Option<&dyn Quantity> {
        self.floating_quantities
            .iter()
            .find(|q| q.name() == name)
            .map(AsRef::as_ref)
    }

    /// Gets a mutable floating quantity by name.
    pub fn floating_quantity_mut(&mut self, name: &str) -> Option<&mut Box<dyn Quantity>> {
        self.floating_quantities.iter_mut().find(|q| q.name() == name)
    }

    /// Removes a floating quantity by name.
    pub fn remove_floating_quantity(&mut self, name: &str) -> Option<Box<dyn Quantity>> {
        let idx = self
            .floating_quantities
            .iter()
            .position(|q| q.name() == name)?;
        Some(self.floating_quantities.remove(idx))
    }

    /// Adds a slice plane.
    ///
    /// Returns an error if a plane with the same name exists.
    pub fn add_slice_plane(&mut self, plane: SlicePlane) -> Result<&mut SlicePlane> {
        if self.has_slice_plane(plane.name()) {
            return Err(FieldscopeError::StructureExists(plane.name().to_string()));
        }
        self.slice_planes.push(plane);
        let idx = self.slice_planes.len() - 1;
        Ok(&mut self.slice_planes[idx])
    }

    /// Returns whether a slice plane with the given name exists.
    pub fn has_slice_plane(&self, name: &str) -> bool {
        self.slice_planes.iter().any(|p| p.name() == name)
    }

    /// Gets a slice plane by name.
    pub fn slice_plane(&self, name: &str) -> Option<&SlicePlane> {
        self.slice_planes.iter().find(|p| p.name() == name)
    }

    /// Gets a mutable slice plane by name.
    pub fn slice_plane_mut(&mut self, name: &str) -> Option<&mut SlicePlane> {
        self.slice_planes.iter_mut().find(|p| p.name() == name)
    }

    /// Removes a slice plane by name, returning whether it existed.
    pub fn remove_slice_plane(&mut self, name: &str) -> bool {
        let before = self.slice_planes.len();
        self.slice_planes.retain(|p| p.name() != name);
        self.slice_planes.len() != before
    }
}

/// Initializes the global context with the given options.
///
/// Calling this again after [`shutdown_context`] starts over with a fresh context.
///
/// A context poisoned by a panicking writer is discarded and replaced.
pub fn init_context(options: Options) -> Result<()> {
    let lock = CONTEXT.get_or_init(|| RwLock::new(Context::default()));
    let mut ctx = write_recovering(lock);
    if ctx.initialized {
        return Err(FieldscopeError::AlreadyInitialized);
    }
    *ctx = Context {
        initialized: true,
        options,
        ..Context::default()
    };
    Ok(())
}

/// Returns whether the context has been initialized.
pub fn is_initialized() -> bool {
    CONTEXT
        .get()
        .and_then(|lock| lock.read().ok())
        .is_some_and(|ctx| ctx.initialized)
}

/// Access the global context for reading.
///
/// Fails with [`FieldscopeError::NotInitialized`] before [`init_context`] or
/// after [`shutdown_context`].
pub fn with_context<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&Context) -> Result<R>,
{
    let lock = CONTEXT.get().ok_or(FieldscopeError::NotInitialized)?;
    let guard = lock.read().map_err(|_| FieldscopeError::ContextPoisoned)?;
    if !guard.initialized {
        return Err(FieldscopeError::NotInitialized);
    }
    f(&guard)
}

/// Access the global context for writing.
///
/// Fails with [`FieldscopeError::NotInitialized`] before [`init_context`] or
/// after [`shutdown_context`].
pub fn with_context_mut<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut Context) -> Result<R>,
{
    let lock = CONTEXT.get().ok_or(FieldscopeError::NotInitialized)?;
    let mut guard = lock.write().map_err(|_| FieldscopeError::ContextPoisoned)?;
    if !guard.initialized {
        return Err(FieldscopeError::NotInitialized);
    }
    f(&mut guard)
}

/// Shuts down the global context, dropping every structure and quantity.
///
/// This also clears a poisoned lock, so [`init_context`] can start over.
pub fn shutdown_context() {
    if let Some(lock) = CONTEXT.get() {
        *write_recovering(lock) = Context::default();
    }
}

/// Takes the write lock even if a previous writer panicked.
///
/// A poisoned context is reset to its default, uninitialized state.
fn write_recovering(lock: &RwLock<Context>) -> RwLockWriteGuard<'_, Context> {
    let mut guard = lock.write().unwrap_or_else(PoisonError::into_inner);
    if lock.is_poisoned() {
        log::warn!("fieldscope context was poisoned by a panic, resetting it");
        *guard = Context::default();
        lock.clear_poison();
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_knows_builtins() {
        let ctx = Context::default();
        assert!(!ctx.initialized);
        assert!(ctx.has_material("clay"));
        assert!(ctx.has_material("wax"));
        assert!(!ctx.has_material("velvet"));
        assert!(ctx.has_color_map("viridis"));
        assert!(!ctx.has_color_map("magma"));
    }

    #[test]
    fn test_slice_plane_bookkeeping() {
        let mut ctx = Context::default();
        ctx.add_slice_plane(SlicePlane::new("p")).unwrap();
        assert!(ctx.has_slice_plane("p"));
        assert!(matches!(
            ctx.add_slice_plane(SlicePlane::new("p")),
            Err(FieldscopeError::StructureExists(_))
        ));
        assert!(ctx.remove_slice_plane("p"));
        assert!(!ctx.remove_slice_plane("p"));
        assert!(ctx.slice_plane("p").is_none());
    }

    #[test]
    fn test_update_extents_without_structures() {
        let mut ctx = Context::default();
        ctx.bounding_box = (Vec3::splat(-5.0), Vec3::splat(5.0));
        ctx.update_extents();
        assert_eq!(ctx.bounding_box, (Vec3::ZERO, Vec3::ONE));
        assert!((ctx.length_scale - 1.0).abs() < 1e-6);
        assert_eq!(ctx.center(), Vec3::splat(0.5));
    }

    #[test]
    fn test_write_recovering_resets_poisoned_context() {
        let lock = RwLock::new(Context {
            initialized: true,
            ..Context::default()
        });
        let result = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = lock.write().unwrap();
                    panic!("writer panicked");
                })
                .join()
        });
        assert!(result.is_err());
        assert!(lock.is_poisoned());

        let ctx = write_recovering(&lock);
        assert!(!ctx.initialized);
        drop(ctx);
        assert!(!lock.is_poisoned());
        assert!(lock.read().is_ok());
    }
}
