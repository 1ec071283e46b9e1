//! Scalar quantities for volume grids.

use fieldscope_core::error::{FieldscopeError, Result};
use fieldscope_core::options::DataType;
use fieldscope_core::quantity::{Quantity, QuantityKind};
use fieldscope_core::sampler::{Sampler, SamplerKind};
use glam::{UVec3, Vec3};

use super::node_positions;

/// Evaluates `sampler` at `positions`, checking the value count.
///
/// `name` and `structure` identify the field in the error.
pub fn evaluate_sampler(
    name: &str,
    structure: &str,
    sampler: &Sampler,
    positions: &[Vec3],
) -> Result<Vec<f32>> {
    let values = match sampler {
        Sampler::Buffer(values) => values.to_vec(),
        Sampler::PerVertex(f) => positions.iter().map(|&p| f(p)).collect(),
        Sampler::Batch(f) => f(positions),
    };
    check_value_count(name, structure, positions.len(), values.len())?;
    Ok(values)
}

fn check_value_count(name: &str, structure: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FieldscopeError::SizeMismatch {
            name: name.to_string(),
            structure: structure.to_string(),
            expected,
            actual,
        })
    }
}

/// A scalar quantity defined at grid nodes.
#[derive(Debug)]
pub struct VolumeGridScalarQuantity {
    name: String,
    structure_name: String,
    values: Vec<f32>,
    sampler: Sampler,
    data_type: DataType,
    enabled: bool,

    // Visualization parameters
    color_map: String,
    data_min: f32,
    data_max: f32,
    point_viz_enabled: bool,

    // Isosurface state
    isosurface_viz_enabled: bool,
    isosurface_level: f32,
    isosurface_color: Vec3,

    // Grid geometry (needed to re-evaluate callables)
    node_dim: UVec3,
    bound_min: Vec3,
    bound_max: Vec3,
}

impl VolumeGridScalarQuantity {
    /// Creates a new node scalar quantity by evaluating `sampler` on the grid nodes.
    pub fn new(
        name: impl Into<String>,
        structure_name: impl Into<String>,
        sampler: Sampler,
        data_type: DataType,
        node_dim: UVec3,
        bound_min: Vec3,
        bound_max: Vec3,
    ) -> Result<Self> {
        let name = name.into();
        let structure_name = structure_name.into();
        let positions = node_positions(node_dim, bound_min, bound_max);
        let values = evaluate_sampler(&name, &structure_name, &sampler, &positions)?;
        Self::from_values(
            name,
            structure_name,
            sampler,
            values,
            data_type,
            node_dim,
            bound_min,
            bound_max,
        )
    }

    /// Creates a node scalar quantity from values already sampled from `sampler`.
    ///
    /// Fails with [`FieldscopeError::SizeMismatch`] unless there is exactly
    /// one value per node.
    #[allow(clippy::too_many_arguments)]
    pub fn from_values(
        name: impl Into<String>,
        structure_name: impl Into<String>,
        sampler: Sampler,
        values: Vec<f32>,
        data_type: DataType,
        node_dim: UVec3,
        bound_min: Vec3,
        bound_max: Vec3,
    ) -> Result<Self> {
        let name = name.into();
        let structure_name = structure_name.into();
        let n_nodes = node_dim.x as usize * node_dim.y as usize * node_dim.z as usize;
        check_value_count(&name, &structure_name, n_nodes, values.len())?;
        let (data_min, data_max) = data_type.default_range(&values);
        Ok(Self {
            name,
            structure_name,
            values,
            sampler,
            data_type,
            enabled: false,
            color_map: data_type.default_color_map().to_string(),
            data_min,
            data_max,
            point_viz_enabled: true,
            isosurface_viz_enabled: false,
            isosurface_level: (data_min + data_max) * 0.5,
            isosurface_color: Vec3::new(0.047, 0.451, 0.690), // default blue
            node_dim,
            bound_min,
            bound_max,
        })
    }

    /// Returns the values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the grid node dimensions.
    #[must_use]
    pub fn node_dim(&self) -> UVec3 {
        self.node_dim
    }

    /// Replaces the values with a fresh evaluation of the source.
    ///
    /// The previous values are kept if the count does not match.
    pub fn set_values(&mut self, values: Vec<f32>) -> Result<()> {
        check_value_count(&self.name, &self.structure_name, self.values.len(), values.len())?;
        self.values = values;
        Ok(())
    }

    /// Returns the source the values were sampled from.
    #[must_use]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Returns the object-space node positions the source is evaluated at.
    #[must_use]
    pub fn node_positions(&self) -> Vec<Vec3> {
        node_positions(self.node_dim, self.bound_min, self.bound_max)
    }

    /// Returns the data type the values were registered with.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns which kind of source backs this quantity.
    #[must_use]
    pub fn sampler_kind(&self) -> SamplerKind {
        self.sampler.kind()
    }

    /// Gets the color map name.
    #[must_use]
    pub fn color_map(&self) -> &str {
        &self.color_map
    }

    /// Sets the color map name.
    pub fn set_color_map(&mut self, name: impl Into<String>) -> &mut Self {
        self.color_map = name.into();
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

    /// Gets whether per-node point glyphs are drawn.
    #[must_use]
    pub fn point_viz_enabled(&self) -> bool {
        self.point_viz_enabled
    }

    /// Sets whether per-node point glyphs are drawn.
    pub fn set_point_viz_enabled(&mut self, enabled: bool) -> &mut Self {
        self.point_viz_enabled = enabled;
        self
    }

    // --- Isosurface ---

    /// Gets whether the isosurface is drawn.
    #[must_use]
    pub fn isosurface_viz_enabled(&self) -> bool {
        self.isosurface_viz_enabled
    }

    /// Sets whether the isosurface is drawn.
    pub fn set_isosurface_viz_enabled(&mut self, enabled: bool) -> &mut Self {
        self.isosurface_viz_enabled = enabled;
        self
    }

    /// Gets the isosurface level.
    #[must_use]
    pub fn isosurface_level(&self) -> f32 {
        self.isosurface_level
    }

    /// Sets the isosurface level.
    pub fn set_isosurface_level(&mut self, level: f32) -> &mut Self {
        self.isosurface_level = level;
        self
    }

    /// Gets the isosurface color.
    #[must_use]
    pub fn isosurface_color(&self) -> Vec3 {
        self.isosurface_color
    }

    /// Sets the isosurface color.
    pub fn set_isosurface_color(&mut self, color: Vec3) -> &mut Self {
        self.isosurface_color = color;
        self
    }
}

impl Quantity for VolumeGridScalarQuantity {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn structure_name(&self) -> &str {
        &self.structure_name
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

    /// Re-evaluates the source. Buffer-backed values are unchanged; on failure
    /// the previous values are kept.
    fn refresh(&mut self) -> Result<()> {
        if self.sampler.kind() == SamplerKind::Buffer {
            return Ok(());
        }
        let values = evaluate_sampler(
            &self.name,
            &self.structure_name,
            &self.sampler,
            &self.node_positions(),
        )?;
        self.set_values(values)
    }

    fn data_size(&self) -> usize {
        self.values.len()
    }
}
