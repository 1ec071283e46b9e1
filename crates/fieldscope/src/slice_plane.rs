//! Slice plane management.
//!
//! Slice planes cut through structures to reveal their interior. Structures
//! can opt out of individual planes, see
//! [`VolumeGridHandle::set_ignore_slice_plane`](crate::VolumeGridHandle::set_ignore_slice_plane).
//!
//! # Example
//!
//! ```no_run
//! use fieldscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let grid = register_volume_grid("grid", 8, Vec3::ZERO, Vec3::ONE, &Default::default())?;
//!
//!     let plane = add_slice_plane_with_pose("my slice", Vec3::splat(0.5), Vec3::X)?;
//!     grid.set_ignore_slice_plane(&plane, true)?;
//!     assert!(grid.ignores_slice_plane("my slice")?);
//!     Ok(())
//! }
//! ```

use crate::{with_context, with_context_mut, FieldscopeError, Result, SlicePlane, Vec3};

/// A slice plane given either by name or by handle.
#[derive(Debug, Clone, Copy)]
pub enum SlicePlaneRef<'a> {
    Name(&'a str),
    Plane(&'a SlicePlaneHandle),
}

impl SlicePlaneRef<'_> {
    /// Returns the plane's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Plane(plane) => plane.name(),
        }
    }
}

impl<'a> From<&'a str> for SlicePlaneRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for SlicePlaneRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a SlicePlaneHandle> for SlicePlaneRef<'a> {
    fn from(plane: &'a SlicePlaneHandle) -> Self {
        Self::Plane(plane)
    }
}

/// Adds a slice plane through the center of the scene with a +Y normal.
pub fn add_slice_plane(name: impl Into<String>) -> Result<SlicePlaneHandle> {
    let name = name.into();
    with_context_mut(|ctx| {
        let center = ctx.center();
        ctx.add_slice_plane(SlicePlane::with_pose(name.clone(), center, Vec3::Y))?;
        Ok(())
    })?;
    log::debug!("added slice plane '{name}'");
    Ok(SlicePlaneHandle { name })
}

/// Adds a slice plane with a specific pose.
///
/// `normal` points toward the kept side; it is normalized, and a zero normal
/// falls back to +Y.
pub fn add_slice_plane_with_pose(
    name: impl Into<String>,
    origin: Vec3,
    normal: Vec3,
) -> Result<SlicePlaneHandle> {
    let name = name.into();
    with_context_mut(|ctx| {
        ctx.add_slice_plane(SlicePlane::with_pose(name.clone(), origin, normal))?;
        Ok(())
    })?;
    log::debug!("added slice plane '{name}'");
    Ok(SlicePlaneHandle { name })
}

/// Gets an existing slice plane by name.
pub fn get_slice_plane(name: &str) -> Result<SlicePlaneHandle> {
    if has_slice_plane(name)? {
        Ok(SlicePlaneHandle {
            name: name.to_string(),
        })
    } else {
        Err(FieldscopeError::StructureNotFound(name.to_string()))
    }
}

/// Returns whether a slice plane with the given name exists.
pub fn has_slice_plane(name: &str) -> Result<bool> {
    with_context(|ctx| Ok(ctx.has_slice_plane(name)))
}

/// Removes a slice plane by name.
///
/// Structures that ignored the plane keep its name in their ignore list.
pub fn remove_slice_plane(name: &str, error_if_absent: bool) -> Result<()> {
    with_context_mut(|ctx| {
        if ctx.remove_slice_plane(name) {
            log::debug!("removed slice plane '{name}'");
            Ok(())
        } else if error_if_absent {
            Err(FieldscopeError::StructureNotFound(name.to_string()))
        } else {
            log::warn!("no slice plane named '{name}' to remove");
            Ok(())
        }
    })
}

/// Removes all slice planes.
pub fn remove_all_slice_planes() -> Result<()> {
    with_context_mut(|ctx| {
        ctx.slice_planes.clear();
        Ok(())
    })
}

/// Returns all slice plane names, in creation order.
pub fn slice_plane_names() -> Result<Vec<String>> {
    with_context(|ctx| {
        Ok(ctx
            .slice_planes
            .iter()
            .map(|p| p.name().to_string())
            .collect())
    })
}

/// Handle for a slice plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicePlaneHandle {
    name: String,
}

impl SlicePlaneHandle {
    /// Returns the name of this slice plane.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn stale(&self) -> FieldscopeError {
        FieldscopeError::StaleHandle {
            kind: "slice plane",
            name: self.name.clone(),
        }
    }

    fn with_plane<R>(&self, f: impl FnOnce(&mut SlicePlane) -> R) -> Result<R> {
        with_context_mut(|ctx| {
            let plane = ctx.slice_plane_mut(&self.name).ok_or_else(|| self.stale())?;
            Ok(f(plane))
        })
    }

    fn with_plane_ref<R>(&self, f: impl FnOnce(&SlicePlane) -> R) -> Result<R> {
        with_context(|ctx| {
            let plane = ctx.slice_plane(&self.name).ok_or_else(|| self.stale())?;
            Ok(f(plane))
        })
    }

    /// Sets the origin and normal of the plane.
    ///
    /// A zero normal leaves the current normal unchanged.
    pub fn set_pose(&self, origin: Vec3, normal: Vec3) -> Result<&Self> {
        self.with_plane(|plane| plane.set_pose(origin, normal))?;
        Ok(self)
    }

    /// Returns the origin point of the plane.
    pub fn origin(&self) -> Result<Vec3> {
        self.with_plane_ref(SlicePlane::origin)
    }

    /// Returns the unit normal of the plane.
    pub fn normal(&self) -> Result<Vec3> {
        self.with_plane_ref(SlicePlane::normal)
    }

    /// Sets whether the slice plane cuts anything.
    pub fn set_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_plane(|plane| plane.set_enabled(enabled))?;
        Ok(self)
    }

    /// Returns whether the slice plane is enabled.
    pub fn is_enabled(&self) -> Result<bool> {
        self.with_plane_ref(SlicePlane::is_enabled)
    }

    /// Returns whether `point` lies on the kept side of the plane.
    ///
    /// Every point is kept while the plane is disabled.
    pub fn is_kept(&self, point: Vec3) -> Result<bool> {
        self.with_plane_ref(|plane| plane.is_kept(point))
    }

    /// Removes the slice plane.
    pub fn remove(&self) -> Result<()> {
        with_context_mut(|ctx| {
            if ctx.remove_slice_plane(&self.name) {
                Ok(())
            } else {
                Err(self.stale())
            }
        })
    }
}
