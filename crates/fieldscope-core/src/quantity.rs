//! Quantity trait and related types.
//!
//! A [`Quantity`] represents data associated with a structure (or floating in
//! screen space), such as scalar values or colors.

use crate::error::Result;

/// The kind of quantity (for categorization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    /// Scalar values (single float per element).
    Scalar,
    /// Color values (RGB per element).
    Color,
}

/// Data that can be visualized, either attached to a structure or floating.
pub trait Quantity: Send + Sync {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// Returns the name of this quantity.
    fn name(&self) -> &str;

    /// Returns the name of the parent structure, or `""` for floating quantities.
    fn structure_name(&self) -> &str;

    /// Returns the kind of this quantity.
    fn kind(&self) -> QuantityKind;

    /// Returns whether this quantity is currently enabled/visible.
    fn is_enabled(&self) -> bool;

    /// Sets the enabled state of this quantity.
    fn set_enabled(&mut self, enabled: bool);

    /// Recomputes derived data after the source changed.
    ///
    /// Quantities backed by a callable re-evaluate it here.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// Returns the number of data elements.
    fn data_size(&self) -> usize;
}
