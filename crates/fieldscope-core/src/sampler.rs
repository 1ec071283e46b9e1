//! Field sources for per-vertex scalar data.
//!
//! A [`Sampler`] describes where the values of a field come from without
//! evaluating anything. The store that owns the target structure decides
//! when and how to evaluate it.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use ndarray::ArrayViewD;

use crate::error::Result;
use crate::shape;

/// A function producing one value from one vertex position.
pub type PerVertexFn = dyn Fn(Vec3) -> f32 + Send + Sync;

/// A function producing one value per position, in order, for a batch of positions.
pub type BatchFn = dyn Fn(&[Vec3]) -> Vec<f32> + Send + Sync;

/// Discriminant of a [`Sampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    /// Materialized values.
    Buffer,
    /// One call per vertex.
    PerVertex,
    /// One call for all vertices.
    Batch,
}

/// Source of a scalar field's values.
#[derive(Clone)]
pub enum Sampler {
    /// Precomputed values, one per element.
    Buffer(Arc<[f32]>),
    /// Evaluated once per vertex position.
    PerVertex(Arc<PerVertexFn>),
    /// Evaluated once with every vertex position.
    Batch(Arc<BatchFn>),
}

impl Sampler {
    /// Creates a buffer sampler. `values` must be one-dimensional.
    pub fn from_buffer(name: &str, values: &ArrayViewD<'_, f32>) -> Result<Self> {
        let values = shape::one_dimensional(name, values)?;
        Ok(Self::Buffer(values.into()))
    }

    /// Creates a buffer sampler from already-flat values.
    pub fn from_vec(values: Vec<f32>) -> Self {
        Self::Buffer(values.into())
    }

    /// Creates a sampler that calls `f` once per vertex position.
    pub fn from_per_vertex_fn(f: impl Fn(Vec3) -> f32 + Send + Sync + 'static) -> Self {
        Self::PerVertex(Arc::new(f))
    }

    /// Creates a sampler that calls `f` once with all vertex positions.
    pub fn from_batch_fn(f: impl Fn(&[Vec3]) -> Vec<f32> + Send + Sync + 'static) -> Self {
        Self::Batch(Arc::new(f))
    }

    /// Returns which kind of source this is.
    #[must_use]
    pub fn kind(&self) -> SamplerKind {
        match self {
            Self::Buffer(_) => SamplerKind::Buffer,
            Self::PerVertex(_) => SamplerKind::PerVertex,
            Self::Batch(_) => SamplerKind::Batch,
        }
    }

    /// Number of values held by a buffer sampler; `None` for callables.
    #[must_use]
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Self::Buffer(values) => Some(values.len()),
            Self::PerVertex(_) | Self::Batch(_) => None,
        }
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffer(values) => f.debug_tuple("Buffer").field(&values.len()).finish(),
            Self::PerVertex(_) => f.write_str("PerVertex(..)"),
            Self::Batch(_) => f.write_str("Batch(..)"),
        }
    }
}
