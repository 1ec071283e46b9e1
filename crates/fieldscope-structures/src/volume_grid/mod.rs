//! Volume grid structure for sampling fields on regular 3D lattices.

mod scalar_quantity;

pub use scalar_quantity::*;

use std::collections::BTreeSet;

use fieldscope_core::error::{FieldscopeError, Result};
use fieldscope_core::options::{DataType, DEFAULT_MATERIAL};
use fieldscope_core::quantity::Quantity;
use fieldscope_core::sampler::Sampler;
use fieldscope_core::structure::{HasQuantities, Structure};
use glam::{Mat4, UVec3, Vec3};

/// A regular 3D grid structure.
///
/// `VolumeGrid` represents a regular axis-aligned 3D grid defined by:
/// - Grid resolution (number of cells in X, Y, Z)
/// - Bounding box (min and max corners in object space)
///
/// Values live at grid nodes, so a resolution of `n` cells has `n + 1` nodes
/// along that axis. Nodes are indexed x-fastest.
pub struct VolumeGrid {
    name: String,

    // Grid parameters
    node_dim: UVec3, // Number of nodes in each dimension
    bound_min: Vec3, // Minimum corner of the grid
    bound_max: Vec3, // Maximum corner of the grid

    // Common structure fields
    enabled: bool,
    transform: Mat4,
    material: String,
    transparency: f32,
    ignored_slice_planes: BTreeSet<String>,
    quantities: Vec<Box<dyn Quantity>>,
}

impl VolumeGrid {
    /// Creates a new volume grid.
    ///
    /// # Arguments
    /// * `name` - The name of the grid
    /// * `resolution` - Number of cells in each dimension (X, Y, Z); all must be positive
    /// * `bound_min` - Minimum corner of the grid bounding box
    /// * `bound_max` - Maximum corner of the grid bounding box; must differ from `bound_min`
    ///
    /// The node count must fit in a `usize`.
    pub fn new(
        name: impl Into<String>,
        resolution: UVec3,
        bound_min: Vec3,
        bound_max: Vec3,
    ) -> Result<Self> {
        let name = name.into();
        if resolution.min_element() == 0 {
            return Err(FieldscopeError::InvalidGeometry {
                name,
                reason: format!("resolution components must be positive, got {resolution}"),
            });
        }
        if bound_min == bound_max {
            return Err(FieldscopeError::InvalidGeometry {
                name,
                reason: format!("bound_min and bound_max must differ, both are {bound_min}"),
            });
        }
        if !(bound_min.is_finite() && bound_max.is_finite()) {
            return Err(FieldscopeError::InvalidGeometry {
                name,
                reason: "bounds must be finite".to_string(),
            });
        }

        let node_dim = match (
            resolution.x.checked_add(1),
            resolution.y.checked_add(1),
            resolution.z.checked_add(1),
        ) {
            (Some(x), Some(y), Some(z)) => UVec3::new(x, y, z),
            _ => {
                return Err(FieldscopeError::InvalidGeometry {
                    name,
                    reason: format!("resolution {resolution} has too many nodes"),
                })
            }
        };
        let n_values = (node_dim.x as usize)
            .checked_mul(node_dim.y as usize)
            .and_then(|n| n.checked_mul(node_dim.z as usize));
        if n_values.is_none() {
            return Err(FieldscopeError::InvalidGeometry {
                name,
                reason: format!("resolution {resolution} has too many nodes"),
            });
        }

        Ok(Self {
            name,
            node_dim,
            bound_min,
            bound_max,
            enabled: true,
            transform: Mat4::IDENTITY,
            material: DEFAULT_MATERIAL.to_string(),
            transparency: 1.0,
            ignored_slice_planes: BTreeSet::new(),
            quantities: Vec::new(),
        })
    }

    /// Returns the number of cells in each dimension.
    #[must_use]
    pub fn resolution(&self) -> UVec3 {
        self.node_dim - UVec3::ONE
    }

    /// Returns the number of nodes in each dimension.
    #[must_use]
    pub fn node_dim(&self) -> UVec3 {
        self.node_dim
    }

    /// Returns the total number of nodes, i.e. the number of values a field needs.
    #[must_use]
    pub fn n_values(&self) -> usize {
        self.node_dim.x as usize * self.node_dim.y as usize * self.node_dim.z as usize
    }

    /// Returns the minimum bound.
    #[must_use]
    pub fn bound_min(&self) -> Vec3 {
        self.bound_min
    }

    /// Returns the maximum bound.
    #[must_use]
    pub fn bound_max(&self) -> Vec3 {
        self.bound_max
    }

    /// Returns the grid spacing (distance between adjacent nodes) per axis.
    #[must_use]
    pub fn grid_spacing(&self) -> Vec3 {
        (self.bound_max - self.bound_min).abs() / self.resolution().as_vec3()
    }

    /// Returns the smallest spacing across the three axes.
    #[must_use]
    pub fn min_grid_spacing(&self) -> f32 {
        self.grid_spacing().min_element()
    }

    /// Flattens a 3D node index to a linear index.
    #[must_use]
    pub fn flatten_node_index(&self, i: u32, j: u32, k: u32) -> usize {
        let (nx, ny) = (self.node_dim.x as usize, self.node_dim.y as usize);
        i as usize + j as usize * nx + k as usize * nx * ny
    }

    /// Unflattens a linear node index to a 3D index.
    #[must_use]
    pub fn unflatten_node_index(&self, idx: usize) -> UVec3 {
        let (nx, ny) = (self.node_dim.x as usize, self.node_dim.y as usize);
        let x = idx % nx;
        let y = (idx / nx) % ny;
        let z = idx / (nx * ny);
        UVec3::new(x as u32, y as u32, z as u32)
    }

    /// Returns the object-space position of a node at the given 3D index.
    #[must_use]
    pub fn position_of_node(&self, i: u32, j: u32, k: u32) -> Vec3 {
        node_position(self.node_dim, self.bound_min, self.bound_max, UVec3::new(i, j, k))
    }

    /// Returns the object-space position of a node at the given linear index.
    #[must_use]
    pub fn position_of_index(&self, idx: usize) -> Vec3 {
        let ijk = self.unflatten_node_index(idx);
        self.position_of_node(ijk.x, ijk.y, ijk.z)
    }

    /// Returns the object-space positions of all nodes, in index order.
    #[must_use]
    pub fn node_positions(&self) -> Vec<Vec3> {
        node_positions(self.node_dim, self.bound_min, self.bound_max)
    }

    /// Evaluates `sampler` for the field `name` at every node, in index order.
    ///
    /// Fails with [`FieldscopeError::SizeMismatch`] if the sampler yields a
    /// value count other than [`VolumeGrid::n_values`].
    pub fn sample(&self, name: &str, sampler: &Sampler) -> Result<Vec<f32>> {
        evaluate_sampler(name, &self.name, sampler, &self.node_positions())
    }

    /// Checks that a field called `name` could be added from `sampler`.
    ///
    /// Fails if the name is taken, or with [`FieldscopeError::Shape`] if
    /// `sampler` is a buffer whose length differs from [`VolumeGrid::n_values`].
    /// Callables are only checked once evaluated.
    pub fn check_new_scalar_quantity(&self, name: &str, sampler: &Sampler) -> Result<()> {
        if self.get_quantity(name).is_some() {
            return Err(FieldscopeError::QuantityExists(
                name.to_string(),
                self.name.clone(),
            ));
        }
        match sampler.len_hint() {
            Some(len) if len != self.n_values() => Err(FieldscopeError::Shape {
                name: name.to_string(),
                expected: format!("a 1d [{}] array", self.n_values()),
                actual: vec![len],
            }),
            _ => Ok(()),
        }
    }

    /// Adds a scalar field sampled from `sampler`.
    ///
    /// The sampler is evaluated immediately. Fails if a quantity with the same
    /// name exists, or if the sampler yields a value count other than
    /// [`VolumeGrid::n_values`]; in both cases the grid is left unchanged.
    pub fn add_scalar_quantity(
        &mut self,
        name: impl Into<String>,
        sampler: Sampler,
        data_type: DataType,
    ) -> Result<&mut VolumeGridScalarQuantity> {
        let name = name.into();
        self.check_new_scalar_quantity(&name, &sampler)?;
        let values = self.sample(&name, &sampler)?;
        self.insert_scalar_quantity(name, sampler, values, data_type)
    }

    /// Adds a scalar field whose `values` were already sampled from `sampler`.
    ///
    /// Fails if a quantity with the same name exists or if there is not
    /// exactly one value per node; in both cases the grid is left unchanged.
    pub fn insert_scalar_quantity(
        &mut self,
        name: impl Into<String>,
        sampler: Sampler,
        values: Vec<f32>,
        data_type: DataType,
    ) -> Result<&mut VolumeGridScalarQuantity> {
        let name = name.into();
        if self.get_quantity(&name).is_some() {
            return Err(FieldscopeError::QuantityExists(name, self.name.clone()));
        }

        let quantity = VolumeGridScalarQuantity::from_values(
            name.clone(),
            self.name.clone(),
            sampler,
            values,
            data_type,
            self.node_dim,
            self.bound_min,
            self.bound_max,
        )?;
        log::debug!(
            "added scalar quantity '{}' ({:?}) to volume grid '{}'",
            name,
            quantity.sampler_kind(),
            self.name
        );
        self.quantities.push(Box::new(quantity));

        let structure_name = self.name.clone();
        self.scalar_quantity_mut(&name)
            .ok_or(FieldscopeError::QuantityNotFound(name, structure_name))
    }

    /// Gets a scalar quantity by name.
    #[must_use]
    pub fn scalar_quantity(&self, name: &str) -> Option<&VolumeGridScalarQuantity> {
        self.get_quantity(name)?
            .as_any()
            .downcast_ref::<VolumeGridScalarQuantity>()
    }

    /// Gets a mutable scalar quantity by name.
    pub fn scalar_quantity_mut(&mut self, name: &str) -> Option<&mut VolumeGridScalarQuantity> {
        self.get_quantity_mut(name)?
            .as_any_mut()
            .downcast_mut::<VolumeGridScalarQuantity>()
    }

    /// Iterates over the attached scalar fields, in insertion order.
    pub fn scalar_quantities(&self) -> impl Iterator<Item = &VolumeGridScalarQuantity> {
        self.quantities
            .iter()
            .filter_map(|q| q.as_any().downcast_ref::<VolumeGridScalarQuantity>())
    }

    /// Returns the names of all attached quantities, in insertion order.
    #[must_use]
    pub fn quantity_names(&self) -> Vec<String> {
        self.quantities.iter().map(|q| q.name().to_string()).collect()
    }
}

/// Position of node `ijk` on a grid with `node_dim` nodes spanning `[min, max]`.
fn node_position(node_dim: UVec3, min: Vec3, max: Vec3, ijk: UVec3) -> Vec3 {
    let cell_dim = (node_dim - UVec3::ONE).as_vec3().max(Vec3::ONE);
    let t = ijk.as_vec3() / cell_dim;
    min + t * (max - min)
}

/// Positions of every node, x-fastest.
pub(crate) fn node_positions(node_dim: UVec3, min: Vec3, max: Vec3) -> Vec<Vec3> {
    let mut positions =
        Vec::with_capacity(node_dim.x as usize * node_dim.y as usize * node_dim.z as usize);
    for k in 0..node_dim.z {
        for j in 0..node_dim.y {
            for i in 0..node_dim.x {
                positions.push(node_position(node_dim, min, max, UVec3::new(i, j, k)));
            }
        }
    }
    positions
}

impl Structure for VolumeGrid {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "VolumeGrid"
    }

    fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let (lo, hi) = (self.bound_min, self.bound_max);
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for corner in 0..8u32 {
            let local = Vec3::new(
                if corner & 1 == 0 { lo.x } else { hi.x },
                if corner & 2 == 0 { lo.y } else { hi.y },
                if corner & 4 == 0 { lo.z } else { hi.z },
            );
            let world = self.transform.transform_point3(local);
            min = min.min(world);
            max = max.max(world);
        }
        Some((min, max))
    }

    fn length_scale(&self) -> f32 {
        self.bounding_box()
            .map_or(0.0, |(min, max)| (max - min).length())
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }

    fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn refresh(&mut self) {
        for quantity in &mut self.quantities {
            if let Err(err) = quantity.refresh() {
                log::warn!("failed to refresh '{}': {err}", quantity.name());
            }
        }
    }

    fn material(&self) -> &str {
        &self.material
    }

    fn set_material(&mut self, material: &str) {
        self.material = material.to_string();
    }

    fn transparency(&self) -> f32 {
        self.transparency
    }

    fn set_transparency(&mut self, transparency: f32) {
        self.transparency = transparency;
    }

    fn ignores_slice_plane(&self, plane: &str) -> bool {
        self.ignored_slice_planes.contains(plane)
    }

    fn set_ignore_slice_plane(&mut self, plane: &str, ignore: bool) {
        if ignore {
            self.ignored_slice_planes.insert(plane.to_string());
        } else {
            self.ignored_slice_planes.remove(plane);
        }
    }
}

impl HasQuantities for VolumeGrid {
    fn get_quantity(&self, name: &str) -> Option<&dyn Quantity> {
        self.quantities
            .iter()
            .find(|q| q.name() == name)
            .map(std::convert::AsRef::as_ref)
    }

    fn get_quantity_mut(&mut self, name: &str) -> Option<&mut Box<dyn Quantity>> {
        self.quantities.iter_mut().find(|q| q.name() == name)
    }

    fn remove_quantity(&mut self, name: &str) -> Option<Box<dyn Quantity>> {
        let idx = self.quantities.iter().position(|q| q.name() == name)?;
        Some(self.quantities.remove(idx))
    }

    fn remove_all_quantities(&mut self) {
        self.quantities.clear();
    }

    fn quantities(&self) -> &[Box<dyn Quantity>] {
        &self.quantities
    }
}
