//! Volume grid registration and manipulation.
//!
//! Volume grids are regular 3D lattices holding scalar fields at their nodes.
//! A field can come from a dense buffer, a per-vertex callable or a batch
//! callable; callables are evaluated on the grid's node positions while the
//! scene is unlocked, and the field is inserted afterwards.
//!
//! # Example
//!
//! ```no_run
//! use fieldscope_rs::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     // 10 cells per axis, 11 nodes per axis
//!     let grid = register_volume_grid(
//!         "my grid",
//!         10,
//!         Vec3::splat(-1.0),
//!         Vec3::splat(1.0),
//!         &VolumeGridOptions::default(),
//!     )?;
//!
//!     // Signed distance to a sphere
//!     let sdf = grid.add_scalar_quantity_from_callable(
//!         "sdf",
//!         |p| p.length() - 0.5,
//!         &ScalarQuantityOptions {
//!             enabled: Some(true),
//!             datatype: Some("symmetric".into()),
//!             ..Default::default()
//!         },
//!     )?;
//!     sdf.set_isosurface_viz_enabled(true)?;
//!
//!     Ok(())
//! }
//! ```

use ndarray::{ArrayView, Dimension};

use crate::options::{
    check_color, check_color_map, check_isosurface_level, check_map_range, check_material,
    check_transparency, ScalarQuantityOptions, VolumeGridOptions,
};
use crate::slice_plane::SlicePlaneRef;
use crate::{
    with_context, with_context_mut, Context, DataType, FieldscopeError, Mat4, Result, Sampler,
    SamplerKind, UVec3, Vec3, VolumeGrid, VolumeGridScalarQuantity,
};
use fieldscope_core::quantity::Quantity;
use fieldscope_core::shape;
use fieldscope_core::structure::{HasQuantities, Structure};
use fieldscope_structures::volume_grid::evaluate_sampler;

const VOLUME_GRID: &str = "VolumeGrid";

/// Number of cells along each axis of a volume grid.
///
/// Converts from a single count applied to every axis, or from a per-axis
/// triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResolution(pub UVec3);

impl From<u32> for GridResolution {
    fn from(n: u32) -> Self {
        Self(UVec3::splat(n))
    }
}

impl From<[u32; 3]> for GridResolution {
    fn from(res: [u32; 3]) -> Self {
        Self(UVec3::from_array(res))
    }
}

impl From<(u32, u32, u32)> for GridResolution {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self(UVec3::new(x, y, z))
    }
}

impl From<UVec3> for GridResolution {
    fn from(res: UVec3) -> Self {
        Self(res)
    }
}

/// Registers a volume grid.
///
/// `resolution` counts cells, so the grid has `resolution + 1` nodes per axis.
/// The geometry and every option are checked before the grid is created;
/// a name already in use fails with [`FieldscopeError::StructureExists`].
pub fn register_volume_grid(
    name: impl Into<String>,
    resolution: impl Into<GridResolution>,
    bound_min: Vec3,
    bound_max: Vec3,
    options: &VolumeGridOptions,
) -> Result<VolumeGridHandle> {
    let name = name.into();
    let mut grid = VolumeGrid::new(name.clone(), resolution.into().0, bound_min, bound_max)?;

    with_context_mut(|ctx| {
        options.validate(ctx, &name)?;
        if ctx.options.autocenter_structures {
            grid.center_bounding_box();
        }
        if ctx.options.autoscale_structures {
            grid.rescale_to_unit();
        }
        log::debug!(
            "registering volume grid '{}' with {} nodes",
            name,
            grid.n_values()
        );
        ctx.registry.register(Box::new(grid))?;
        ctx.update_extents();
        Ok(())
    })?;

    let handle = VolumeGridHandle { name };
    options.apply(&handle)?;
    Ok(handle)
}

/// Returns the grid called `name`, registering it first if it does not exist.
///
/// When the grid already exists its geometry is left alone and `options` are
/// not applied.
pub fn get_or_register_volume_grid(
    name: impl Into<String>,
    resolution: impl Into<GridResolution>,
    bound_min: Vec3,
    bound_max: Vec3,
    options: &VolumeGridOptions,
) -> Result<VolumeGridHandle> {
    let name = name.into();
    if has_volume_grid(&name)? {
        log::warn!("volume grid '{name}' already exists, returning it unchanged");
        return Ok(VolumeGridHandle { name });
    }
    register_volume_grid(name, resolution, bound_min, bound_max, options)
}

/// Gets a registered volume grid by name.
pub fn get_volume_grid(name: &str) -> Result<VolumeGridHandle> {
    if has_volume_grid(name)? {
        Ok(VolumeGridHandle {
            name: name.to_string(),
        })
    } else {
        Err(FieldscopeError::StructureNotFound(name.to_string()))
    }
}

/// Returns whether a volume grid with the given name exists.
pub fn has_volume_grid(name: &str) -> Result<bool> {
    with_context(|ctx| Ok(ctx.registry.contains(VOLUME_GRID, name)))
}

/// Removes a volume grid by name.
///
/// A missing grid is an error only when `error_if_absent` is set.
pub fn remove_volume_grid(name: &str, error_if_absent: bool) -> Result<()> {
    with_context_mut(|ctx| {
        if ctx.registry.remove(VOLUME_GRID, name).is_some() {
            log::debug!("removed volume grid '{name}'");
            ctx.update_extents();
            Ok(())
        } else if error_if_absent {
            Err(FieldscopeError::StructureNotFound(name.to_string()))
        } else {
            log::warn!("no volume grid named '{name}' to remove");
            Ok(())
        }
    })
}

/// Removes every volume grid.
pub fn remove_all_volume_grids() -> Result<()> {
    with_context_mut(|ctx| {
        ctx.registry.remove_all_of_type(VOLUME_GRID);
        ctx.update_extents();
        Ok(())
    })
}

/// Returns the names of all registered volume grids, sorted.
pub fn volume_grid_names() -> Result<Vec<String>> {
    with_context(|ctx| Ok(ctx.registry.names_of_type(VOLUME_GRID)))
}

fn stale_grid(name: &str) -> FieldscopeError {
    FieldscopeError::StaleHandle {
        kind: "volume grid",
        name: name.to_string(),
    }
}

fn volume_grid_ref<'a>(ctx: &'a Context, name: &str) -> Result<&'a VolumeGrid> {
    ctx.registry
        .get(VOLUME_GRID, name)
        .and_then(|s| s.as_any().downcast_ref::<VolumeGrid>())
        .ok_or_else(|| stale_grid(name))
}

fn volume_grid_mut<'a>(ctx: &'a mut Context, name: &str) -> Result<&'a mut VolumeGrid> {
    ctx.registry
        .get_mut(VOLUME_GRID, name)
        .and_then(|s| s.as_any_mut().downcast_mut::<VolumeGrid>())
        .ok_or_else(|| stale_grid(name))
}

fn with_volume_grid<R>(name: &str, f: impl FnOnce(&mut VolumeGrid) -> Result<R>) -> Result<R> {
    with_context_mut(|ctx| f(volume_grid_mut(ctx, name)?))
}

fn with_volume_grid_ref<R>(name: &str, f: impl FnOnce(&VolumeGrid) -> Result<R>) -> Result<R> {
    with_context(|ctx| f(volume_grid_ref(ctx, name)?))
}

/// Like [`with_volume_grid`], refreshing the scene extents afterwards.
fn with_volume_grid_moved<R>(name: &str, f: impl FnOnce(&mut VolumeGrid) -> R) -> Result<R> {
    with_context_mut(|ctx| {
        let out = f(volume_grid_mut(ctx, name)?);
        ctx.update_extents();
        Ok(out)
    })
}

/// A callable-backed field captured for re-evaluation.
struct PendingRefresh {
    grid: String,
    name: String,
    sampler: Sampler,
    positions: Vec<Vec3>,
}

fn pending_refreshes(vg: &VolumeGrid) -> impl Iterator<Item = PendingRefresh> + '_ {
    vg.scalar_quantities()
        .filter(|q| q.sampler_kind() != SamplerKind::Buffer)
        .map(move |q| PendingRefresh {
            grid: vg.name().to_string(),
            name: q.name().to_string(),
            sampler: q.sampler().clone(),
            positions: q.node_positions(),
        })
}

/// Evaluates `pending` with the scene unlocked, then stores the new values.
///
/// Fields that fail to evaluate keep their previous values.
fn run_refreshes(pending: Vec<PendingRefresh>) -> Result<()> {
    let fresh: Vec<_> = pending
        .into_iter()
        .filter_map(|p| {
            match evaluate_sampler(&p.name, &p.grid, &p.sampler, &p.positions) {
                Ok(values) => Some((p.grid, p.name, values)),
                Err(err) => {
                    log::warn!("failed to refresh '{}': {err}", p.name);
                    None
                }
            }
        })
        .collect();

    with_context_mut(|ctx| {
        for (grid, name, values) in fresh {
            // Skip fields removed while their callable ran
            let Some(q) = volume_grid_mut(ctx, &grid)
                .ok()
                .and_then(|vg| vg.scalar_quantity_mut(&name))
            else {
                continue;
            };
            if let Err(err) = q.set_values(values) {
                log::warn!("failed to refresh '{name}': {err}");
            }
        }
        Ok(())
    })
}

/// Re-evaluates every callable-backed field on every volume grid.
pub(crate) fn refresh_all_volume_grids() -> Result<()> {
    let pending: Vec<_> = with_context(|ctx| {
        Ok(ctx
            .registry
            .iter()
            .filter_map(|s| s.as_any().downcast_ref::<VolumeGrid>())
            .flat_map(pending_refreshes)
            .collect())
    })?;
    run_refreshes(pending)
}

/// Handle for a registered volume grid.
///
/// The handle only stores the grid's name. Every call looks the grid up again
/// and fails with [`FieldscopeError::StaleHandle`] once it has been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeGridHandle {
    name: String,
}

impl VolumeGridHandle {
    /// Returns the name of this volume grid.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the grid still exists.
    pub fn exists(&self) -> Result<bool> {
        has_volume_grid(&self.name)
    }

    // --- Structure state ---

    /// Shows or hides the grid.
    pub fn set_enabled(&self, enabled: bool) -> Result<&Self> {
        with_volume_grid(&self.name, |vg| {
            vg.set_enabled(enabled);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns whether the grid is shown.
    pub fn is_enabled(&self) -> Result<bool> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.is_enabled()))
    }

    /// Sets the transparency, which must lie in `[0, 1]` (1 is opaque).
    pub fn set_transparency(&self, transparency: f32) -> Result<&Self> {
        check_transparency(&self.name, transparency)?;
        with_volume_grid(&self.name, |vg| {
            vg.set_transparency(transparency);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the transparency.
    pub fn transparency(&self) -> Result<f32> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.transparency()))
    }

    /// Sets the material by name. Unknown materials are rejected.
    pub fn set_material(&self, material: &str) -> Result<&Self> {
        with_context_mut(|ctx| {
            check_material(ctx, &self.name, material)?;
            volume_grid_mut(ctx, &self.name)?.set_material(material);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the material name.
    pub fn material(&self) -> Result<String> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.material().to_string()))
    }

    // --- Transform ---

    /// Sets the model transform.
    pub fn set_transform(&self, transform: Mat4) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.set_transform(transform))?;
        Ok(self)
    }

    /// Returns the model transform.
    pub fn transform(&self) -> Result<Mat4> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.transform()))
    }

    /// Sets the world-space position, keeping rotation and scale.
    pub fn set_position(&self, position: Vec3) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.set_position(position))?;
        Ok(self)
    }

    /// Returns the world-space position.
    pub fn position(&self) -> Result<Vec3> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.position()))
    }

    /// Moves the grid by `delta` in world space.
    pub fn translate(&self, delta: Vec3) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.translate(delta))?;
        Ok(self)
    }

    /// Moves the grid so its world-space bounding box is centered at the origin.
    pub fn center_bounding_box(&self) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.center_bounding_box())?;
        Ok(self)
    }

    /// Scales the grid uniformly so its length scale becomes 1.
    pub fn rescale_to_unit(&self) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.rescale_to_unit())?;
        Ok(self)
    }

    /// Resets the model transform to the identity.
    pub fn reset_transform(&self) -> Result<&Self> {
        with_volume_grid_moved(&self.name, |vg| vg.reset_transform())?;
        Ok(self)
    }

    /// Returns the world-space bounding box.
    pub fn bounding_box(&self) -> Result<(Vec3, Vec3)> {
        with_volume_grid_ref(&self.name, |vg| {
            Ok(vg
                .bounding_box()
                .unwrap_or((vg.bound_min(), vg.bound_max())))
        })
    }

    // --- Slice planes ---

    /// Excludes the grid from (or re-includes it in) the given slice plane.
    pub fn set_ignore_slice_plane<'a>(
        &self,
        plane: impl Into<SlicePlaneRef<'a>>,
        ignore: bool,
    ) -> Result<&Self> {
        let plane = plane.into();
        with_volume_grid(&self.name, |vg| {
            vg.set_ignore_slice_plane(plane.name(), ignore);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns whether the grid ignores the given slice plane.
    pub fn ignores_slice_plane<'a>(&self, plane: impl Into<SlicePlaneRef<'a>>) -> Result<bool> {
        let plane = plane.into();
        with_volume_grid_ref(&self.name, |vg| Ok(vg.ignores_slice_plane(plane.name())))
    }

    // --- Geometry ---

    /// Returns the number of nodes, which is the value count every field needs.
    pub fn n_values(&self) -> Result<usize> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.n_values()))
    }

    /// Returns the number of cells along each axis.
    pub fn resolution(&self) -> Result<UVec3> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.resolution()))
    }

    /// Returns the object-space minimum corner.
    pub fn bound_min(&self) -> Result<Vec3> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.bound_min()))
    }

    /// Returns the object-space maximum corner.
    pub fn bound_max(&self) -> Result<Vec3> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.bound_max()))
    }

    /// Returns the smallest node spacing across the three axes.
    pub fn min_grid_spacing(&self) -> Result<f32> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.min_grid_spacing()))
    }

    /// Returns the object-space position of the node with flat index `index`.
    pub fn position_of_index(&self, index: usize) -> Result<Vec3> {
        with_volume_grid_ref(&self.name, |vg| {
            let n = vg.n_values();
            if index >= n {
                return Err(FieldscopeError::invalid_option(
                    &self.name,
                    "node index",
                    index,
                    format!("must be below {n}"),
                ));
            }
            Ok(vg.position_of_index(index))
        })
    }

    /// Returns the object-space position of node `[i, j, k]`.
    pub fn position_of_index3(&self, [i, j, k]: [u32; 3]) -> Result<Vec3> {
        with_volume_grid_ref(&self.name, |vg| {
            let node_dim = vg.node_dim();
            if UVec3::new(i, j, k).cmpge(node_dim).any() {
                return Err(FieldscopeError::invalid_option(
                    &self.name,
                    "node index",
                    [i, j, k],
                    format!("must be below {node_dim}"),
                ));
            }
            Ok(vg.position_of_node(i, j, k))
        })
    }

    // --- Quantities ---

    /// Adds a scalar field from a dense 1d buffer of [`n_values`](Self::n_values) values.
    pub fn add_scalar_quantity<D: Dimension>(
        &self,
        name: &str,
        values: ArrayView<'_, f32, D>,
        options: &ScalarQuantityOptions,
    ) -> Result<VolumeGridScalarQuantityHandle> {
        let values = values.into_dyn();
        let values = with_volume_grid_ref(&self.name, |vg| {
            shape::grid_values(name, vg.n_values(), &values)
        })?;
        self.add_scalar_quantity_from_sampler(name, Sampler::from_vec(values), options)
    }

    /// Adds a scalar field computed by calling `f` once per node position.
    ///
    /// `f` runs before the field is inserted, with the scene unlocked.
    pub fn add_scalar_quantity_from_callable(
        &self,
        name: &str,
        f: impl Fn(Vec3) -> f32 + Send + Sync + 'static,
        options: &ScalarQuantityOptions,
    ) -> Result<VolumeGridScalarQuantityHandle> {
        self.add_scalar_quantity_from_sampler(name, Sampler::from_per_vertex_fn(f), options)
    }

    /// Adds a scalar field computed by calling `f` once with all node positions.
    ///
    /// `f` must return exactly one value per position, in order. It runs before
    /// the field is inserted, with the scene unlocked.
    pub fn add_scalar_quantity_from_batch_callable(
        &self,
        name: &str,
        f: impl Fn(&[Vec3]) -> Vec<f32> + Send + Sync + 'static,
        options: &ScalarQuantityOptions,
    ) -> Result<VolumeGridScalarQuantityHandle> {
        self.add_scalar_quantity_from_sampler(name, Sampler::from_batch_fn(f), options)
    }

    /// Adds a scalar field from any [`Sampler`].
    ///
    /// Options and the name are validated before the field is created. A
    /// buffer of the wrong length fails with [`FieldscopeError::Shape`]; a
    /// callable yielding the wrong number of values fails with
    /// [`FieldscopeError::SizeMismatch`]. Nothing is added on failure.
    pub fn add_scalar_quantity_from_sampler(
        &self,
        name: &str,
        sampler: Sampler,
        options: &ScalarQuantityOptions,
    ) -> Result<VolumeGridScalarQuantityHandle> {
        let data_type = options.data_type()?;
        let positions = with_context(|ctx| {
            options.validate(ctx, name)?;
            let vg = volume_grid_ref(ctx, &self.name)?;
            vg.check_new_scalar_quantity(name, &sampler)?;
            Ok(vg.node_positions())
        })?;

        let values = evaluate_sampler(name, &self.name, &sampler, &positions)?;

        with_context_mut(|ctx| {
            volume_grid_mut(ctx, &self.name)?
                .insert_scalar_quantity(name, sampler, values, data_type)?;
            Ok(())
        })?;

        let handle = VolumeGridScalarQuantityHandle {
            grid: self.name.clone(),
            name: name.to_string(),
        };
        options.apply(&handle)?;
        Ok(handle)
    }

    /// Gets a scalar field by name.
    pub fn get_scalar_quantity(&self, name: &str) -> Result<VolumeGridScalarQuantityHandle> {
        with_volume_grid_ref(&self.name, |vg| {
            if vg.scalar_quantity(name).is_some() {
                Ok(VolumeGridScalarQuantityHandle {
                    grid: self.name.clone(),
                    name: name.to_string(),
                })
            } else {
                Err(FieldscopeError::QuantityNotFound(
                    name.to_string(),
                    self.name.clone(),
                ))
            }
        })
    }

    /// Returns whether a quantity with the given name is attached.
    pub fn has_quantity(&self, name: &str) -> Result<bool> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.get_quantity(name).is_some()))
    }

    /// Returns the names of all attached quantities, in insertion order.
    pub fn quantity_names(&self) -> Result<Vec<String>> {
        with_volume_grid_ref(&self.name, |vg| Ok(vg.quantity_names()))
    }

    /// Removes a quantity by name.
    ///
    /// A missing quantity is an error only when `error_if_absent` is set.
    pub fn remove_quantity(&self, name: &str, error_if_absent: bool) -> Result<&Self> {
        with_volume_grid(&self.name, |vg| {
            if vg.remove_quantity(name).is_some() {
                log::debug!("removed quantity '{}' from volume grid '{}'", name, self.name);
            } else if error_if_absent {
                return Err(FieldscopeError::QuantityNotFound(
                    name.to_string(),
                    self.name.clone(),
                ));
            } else {
                log::warn!("no quantity '{}' on volume grid '{}' to remove", name, self.name);
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Removes every quantity attached to the grid.
    pub fn remove_all_quantities(&self) -> Result<&Self> {
        with_volume_grid(&self.name, |vg| {
            vg.remove_all_quantities();
            Ok(())
        })?;
        Ok(self)
    }

    /// Re-evaluates every callable-backed field on the grid.
    ///
    /// Fields whose callable now fails keep their previous values.
    pub fn refresh(&self) -> Result<&Self> {
        let pending: Vec<_> =
            with_volume_grid_ref(&self.name, |vg| Ok(pending_refreshes(vg).collect()))?;
        run_refreshes(pending)?;
        Ok(self)
    }

    /// Removes the grid from the scene.
    pub fn remove(&self) -> Result<()> {
        with_context_mut(|ctx| {
            ctx.registry
                .remove(VOLUME_GRID, &self.name)
                .ok_or_else(|| stale_grid(&self.name))?;
            log::debug!("removed volume grid '{}'", self.name);
            ctx.update_extents();
            Ok(())
        })
    }
}

/// Handle for a scalar field on a volume grid.
///
/// Like [`VolumeGridHandle`], it refers to the field by name and re-checks
/// that both the grid and the field exist on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeGridScalarQuantityHandle {
    grid: String,
    name: String,
}

impl VolumeGridScalarQuantityHandle {
    /// Returns the name of this field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the grid the field lives on.
    #[must_use]
    pub fn grid_name(&self) -> &str {
        &self.grid
    }

    /// Returns a handle to the grid the field lives on.
    #[must_use]
    pub fn grid(&self) -> VolumeGridHandle {
        VolumeGridHandle {
            name: self.grid.clone(),
        }
    }

    fn stale(&self) -> FieldscopeError {
        FieldscopeError::StaleHandle {
            kind: "scalar quantity",
            name: format!("{}/{}", self.grid, self.name),
        }
    }

    fn with_quantity<R>(
        &self,
        f: impl FnOnce(&mut VolumeGridScalarQuantity) -> Result<R>,
    ) -> Result<R> {
        with_context_mut(|ctx| {
            let q = volume_grid_mut(ctx, &self.grid)?
                .scalar_quantity_mut(&self.name)
                .ok_or_else(|| self.stale())?;
            f(q)
        })
    }

    fn with_quantity_ref<R>(
        &self,
        f: impl FnOnce(&VolumeGridScalarQuantity) -> Result<R>,
    ) -> Result<R> {
        with_context(|ctx| {
            let q = volume_grid_ref(ctx, &self.grid)?
                .scalar_quantity(&self.name)
                .ok_or_else(|| self.stale())?;
            f(q)
        })
    }

    /// Shows or hides the field.
    pub fn set_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_quantity(|q| {
            q.set_enabled(enabled);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns whether the field is shown.
    pub fn is_enabled(&self) -> Result<bool> {
        self.with_quantity_ref(|q| Ok(q.is_enabled()))
    }

    /// Sets the value range mapped onto the color map.
    pub fn set_map_range(&self, range: (f32, f32)) -> Result<&Self> {
        check_map_range(&self.name, range)?;
        self.with_quantity(|q| {
            q.set_data_range(range.0, range.1);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the value range mapped onto the color map.
    pub fn map_range(&self) -> Result<(f32, f32)> {
        self.with_quantity_ref(|q| Ok(q.data_range()))
    }

    /// Sets the color map by name. Unknown color maps are rejected.
    pub fn set_color_map(&self, cmap: &str) -> Result<&Self> {
        with_context_mut(|ctx| {
            check_color_map(ctx, &self.name, cmap)?;
            volume_grid_mut(ctx, &self.grid)?
                .scalar_quantity_mut(&self.name)
                .ok_or_else(|| self.stale())?
                .set_color_map(cmap);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the color map name.
    pub fn color_map(&self) -> Result<String> {
        self.with_quantity_ref(|q| Ok(q.color_map().to_string()))
    }

    /// Shows or hides the per-node point glyphs.
    pub fn set_point_viz_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_quantity(|q| {
            q.set_point_viz_enabled(enabled);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns whether the per-node point glyphs are shown.
    pub fn point_viz_enabled(&self) -> Result<bool> {
        self.with_quantity_ref(|q| Ok(q.point_viz_enabled()))
    }

    /// Shows or hides the isosurface.
    pub fn set_isosurface_viz_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_quantity(|q| {
            q.set_isosurface_viz_enabled(enabled);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns whether the isosurface is shown.
    pub fn isosurface_viz_enabled(&self) -> Result<bool> {
        self.with_quantity_ref(|q| Ok(q.isosurface_viz_enabled()))
    }

    /// Sets the isosurface level.
    pub fn set_isosurface_level(&self, level: f32) -> Result<&Self> {
        check_isosurface_level(&self.name, level)?;
        self.with_quantity(|q| {
            q.set_isosurface_level(level);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the isosurface level.
    pub fn isosurface_level(&self) -> Result<f32> {
        self.with_quantity_ref(|q| Ok(q.isosurface_level()))
    }

    /// Sets the isosurface color.
    pub fn set_isosurface_color(&self, color: Vec3) -> Result<&Self> {
        check_color(&self.name, "isosurface color", color)?;
        self.with_quantity(|q| {
            q.set_isosurface_color(color);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the isosurface color.
    pub fn isosurface_color(&self) -> Result<Vec3> {
        self.with_quantity_ref(|q| Ok(q.isosurface_color()))
    }

    /// Returns a copy of the node values, x-fastest.
    pub fn values(&self) -> Result<Vec<f32>> {
        self.with_quantity_ref(|q| Ok(q.values().to_vec()))
    }

    /// Returns the data type the field was registered with.
    pub fn data_type(&self) -> Result<DataType> {
        self.with_quantity_ref(|q| Ok(q.data_type()))
    }

    /// Returns which kind of source backs the field.
    pub fn sampler_kind(&self) -> Result<SamplerKind> {
        self.with_quantity_ref(|q| Ok(q.sampler_kind()))
    }

    /// Re-evaluates a callable-backed field. Buffer-backed fields are unchanged.
    ///
    /// On failure the previous values are kept.
    pub fn refresh(&self) -> Result<&Self> {
        let (sampler, positions) =
            self.with_quantity_ref(|q| Ok((q.sampler().clone(), q.node_positions())))?;
        if sampler.kind() == SamplerKind::Buffer {
            return Ok(self);
        }
        let values = evaluate_sampler(&self.name, &self.grid, &sampler, &positions)?;
        self.with_quantity(|q| q.set_values(values))?;
        Ok(self)
    }

    /// Detaches the field from its grid.
    pub fn remove(&self) -> Result<()> {
        with_volume_grid(&self.grid, |vg| {
            vg.remove_quantity(&self.name)
                .map(|_| ())
                .ok_or_else(|| self.stale())
        })
    }
}
