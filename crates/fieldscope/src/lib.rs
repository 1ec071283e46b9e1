//! fieldscope-rs: register, validate and manage sampled fields in a scene.
//!
//! fieldscope keeps a process-wide scene of named objects: volume grids that
//! carry scalar fields at their nodes, and floating scalar or color images that
//! belong to no structure. User data is checked and canonicalized before it is
//! stored, so a registration either succeeds completely or leaves the scene
//! untouched.
//!
//! # Quick Start
//!
//! ```no_run
//! use fieldscope_rs::*;
//! use ndarray::Array2;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     // A 2x2x2-cell grid has 27 nodes
//!     let grid = register_volume_grid(
//!         "grid",
//!         2,
//!         Vec3::ZERO,
//!         Vec3::ONE,
//!         &VolumeGridOptions::default(),
//!     )?;
//!     grid.add_scalar_quantity_from_callable("x", |p| p.x, &Default::default())?;
//!
//!     // A 4x3 scalar image given as a [width, height] array
//!     let pixels = Array2::<f32>::zeros((4, 3));
//!     register_floating_scalar_image("img", 4, 3, pixels.view(), &Default::default())?;
//!
//!     shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! fieldscope uses a paradigm of **structures** and **quantities**:
//!
//! - A **structure** is a named object in the scene ([`VolumeGrid`])
//! - A **quantity** is data attached to a structure, or floating on its own
//!
//! Functions return lightweight handles that refer to objects by name. Each
//! handle call looks the object up again, so a handle to a removed object
//! reports [`FieldscopeError::StaleHandle`] instead of touching freed data.

// Grid and image sizes cross between u32 and usize
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
// Documentation lints - every fallible call returns the same error enum
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

mod floating;
mod options;
mod slice_plane;
mod volume_grid;

// Re-export core types
pub use fieldscope_core::{
    error::{FieldscopeError, Result},
    options::{DataType, Options, VectorType, BUILTIN_COLOR_MAPS, BUILTIN_MATERIALS},
    quantity::{Quantity, QuantityKind},
    registry::Registry,
    sampler::{Sampler, SamplerKind},
    slice_plane::SlicePlane,
    state::{with_context, with_context_mut, Context},
    structure::{HasQuantities, Structure},
    Mat4, UVec3, Vec3,
};

// Re-export structures
pub use fieldscope_structures::{
    FloatingColorImage, FloatingScalarImage, VolumeGrid, VolumeGridScalarQuantity,
};

pub use ndarray;

pub use floating::*;
pub use options::{
    FloatingColorImageOptions, FloatingScalarImageOptions, ScalarQuantityOptions,
    VolumeGridOptions,
};
pub use slice_plane::*;
pub use volume_grid::*;

/// Initializes fieldscope with default options.
///
/// This must be called before any other fieldscope function. It also installs
/// an `env_logger` logger unless one is already set; `RUST_LOG` overrides the
/// level derived from [`Options::verbosity`].
///
/// # Errors
///
/// Returns an error if fieldscope has already been initialized.
pub fn init() -> Result<()> {
    init_with_options(Options::default())
}

/// Initializes fieldscope with the given options.
///
/// After [`shutdown`] this can be called again to start over.
pub fn init_with_options(options: Options) -> Result<()> {
    // Another logger may already be installed by the host application
    let _ = env_logger::Builder::new()
        .filter_level(options.log_level())
        .parse_default_env()
        .try_init();

    let program_name = options.program_name.clone();
    fieldscope_core::state::init_context(options)?;
    log::info!("{program_name} initialized");
    Ok(())
}

/// Returns whether fieldscope has been initialized.
pub fn is_initialized() -> bool {
    fieldscope_core::state::is_initialized()
}

/// Shuts down fieldscope, dropping every structure, image and slice plane.
///
/// This is mainly useful for tests or when the scene needs a full reset.
pub fn shutdown() {
    fieldscope_core::state::shutdown_context();
    log::info!("fieldscope shut down");
}

/// Returns a copy of the active options.
pub fn options() -> Result<Options> {
    with_context(|ctx| Ok(ctx.options.clone()))
}

/// Sets whether newly registered structures are moved so their bounding box
/// is centered at the origin.
pub fn set_autocenter_structures(enabled: bool) -> Result<()> {
    with_context_mut(|ctx| {
        ctx.options.autocenter_structures = enabled;
        Ok(())
    })
}

/// Sets whether newly registered structures are scaled to unit length scale.
pub fn set_autoscale_structures(enabled: bool) -> Result<()> {
    with_context_mut(|ctx| {
        ctx.options.autoscale_structures = enabled;
        Ok(())
    })
}

/// Sets whether the scene extents follow the registered structures.
pub fn set_auto_compute_scene_extents(enabled: bool) -> Result<()> {
    with_context_mut(|ctx| {
        ctx.options.auto_compute_scene_extents = enabled;
        ctx.update_extents();
        Ok(())
    })
}

/// Returns the representative length scale of the scene.
pub fn length_scale() -> Result<f32> {
    with_context(|ctx| Ok(ctx.length_scale))
}

/// Returns the axis-aligned bounding box of the scene.
pub fn bounding_box() -> Result<(Vec3, Vec3)> {
    with_context(|ctx| Ok(ctx.bounding_box))
}

/// Re-evaluates every callable-backed field in the scene.
///
/// Callables run without the scene locked. Fields whose callable fails keep
/// their previous values.
pub fn refresh() -> Result<()> {
    volume_grid::refresh_all_volume_grids()
}

/// Removes every structure and every floating quantity.
///
/// Slice planes are kept.
pub fn remove_all_structures() -> Result<()> {
    with_context_mut(|ctx| {
        ctx.registry.clear();
        ctx.floating_quantities.clear();
        ctx.update_extents();
        log::debug!("removed all structures");
        Ok(())
    })
}
