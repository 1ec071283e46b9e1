//! Slice planes that cut through structures.
//!
//! Structures can opt out of individual planes by name; see
//! [`Structure::set_ignore_slice_plane`](crate::Structure::set_ignore_slice_plane).

use glam::Vec3;

/// A slice plane that can cut through geometry.
///
/// The plane is defined by a point (origin) and a normal direction.
/// Geometry on the negative side of the plane (opposite to normal) is discarded.
#[derive(Debug, Clone)]
pub struct SlicePlane {
    /// Unique name of the slice plane.
    name: String,
    /// A point on the plane (the origin).
    origin: Vec3,
    /// The normal direction of the plane (points toward kept geometry).
    normal: Vec3,
    /// Whether the slice plane is active.
    enabled: bool,
}

impl SlicePlane {
    /// Creates a new slice plane with default settings.
    ///
    /// By default, the plane is at the origin with +Y normal.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_pose(name, Vec3::ZERO, Vec3::Y)
    }

    /// Creates a slice plane with specific pose.
    pub fn with_pose(name: impl Into<String>, origin: Vec3, normal: Vec3) -> Self {
        Self {
            name: name.into(),
            origin,
            normal: normal.normalize_or(Vec3::Y),
            enabled: true,
        }
    }

    /// Returns the name of this slice plane.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the origin point of the plane.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Returns the normal direction of the plane.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Sets both origin and normal at once.
    ///
    /// A zero normal leaves the current normal unchanged.
    pub fn set_pose(&mut self, origin: Vec3, normal: Vec3) {
        self.origin = origin;
        self.normal = normal.normalize_or(self.normal);
    }

    /// Returns whether the slice plane is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the slice plane is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether a point is on the kept side of the plane.
    pub fn is_kept(&self, point: Vec3) -> bool {
        !self.enabled || (point - self.origin).dot(self.normal) >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_plane_creation() {
        let plane = SlicePlane::new("test");
        assert_eq!(plane.name(), "test");
        assert_eq!(plane.origin(), Vec3::ZERO);
        assert_eq!(plane.normal(), Vec3::Y);
        assert!(plane.is_enabled());
    }

    #[test]
    fn test_slice_plane_pose() {
        let mut plane = SlicePlane::new("test");
        plane.set_pose(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(plane.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(plane.normal(), Vec3::X);

        plane.set_pose(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(plane.normal(), Vec3::X);
    }

    #[test]
    fn test_is_kept() {
        let plane = SlicePlane::with_pose("test", Vec3::ZERO, Vec3::Y);
        assert!(plane.is_kept(Vec3::new(0.0, 1.0, 0.0)));
        assert!(!plane.is_kept(Vec3::new(0.0, -1.0, 0.0)));

        let mut disabled_plane = plane.clone();
        disabled_plane.set_enabled(false);
        assert!(disabled_plane.is_kept(Vec3::new(0.0, -1.0, 0.0)));
    }
}
