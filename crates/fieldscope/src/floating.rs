//! Floating images: scalar and color images attached to no structure.
//!
//! Scalar and color images share one name space, so a scalar image and a color
//! image can never have the same name.

use ndarray::{ArrayView, Dimension};

use crate::options::{
    check_color_map, check_map_range, FloatingColorImageOptions, FloatingScalarImageOptions,
};
use crate::{
    with_context, with_context_mut, Context, DataType, FieldscopeError, FloatingColorImage,
    FloatingScalarImage, Result, Vec3,
};
use fieldscope_core::quantity::Quantity;
use fieldscope_core::shape;

fn check_image_dims(name: &str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FieldscopeError::InvalidGeometry {
            name: name.to_string(),
            reason: format!("image dimensions must be positive, got {width}x{height}"),
        });
    }
    Ok(())
}

/// Registers a floating scalar image.
///
/// `values` is either 1d `[width * height]` or 2d `[width, height]`, read in
/// row-major order.
pub fn register_floating_scalar_image<D: Dimension>(
    name: impl Into<String>,
    width: u32,
    height: u32,
    values: ArrayView<'_, f32, D>,
    options: &FloatingScalarImageOptions,
) -> Result<FloatingScalarImageHandle> {
    let name = name.into();
    check_image_dims(&name, width, height)?;
    let values = shape::scalar_image_values(
        &name,
        width as usize,
        height as usize,
        &values.into_dyn(),
    )?;
    let data_type = options.data_type()?;

    with_context_mut(|ctx| {
        options.validate(ctx, &name)?;
        let img = FloatingScalarImage::new(name.clone(), width, height, values, data_type);
        ctx.add_floating_quantity(Box::new(img))
    })?;
    log::debug!("registered floating scalar image '{name}' ({width}x{height})");

    let handle = FloatingScalarImageHandle { name };
    options.apply(&handle)?;
    Ok(handle)
}

/// Registers a floating color image.
///
/// `values` is either 2d `[width * height, 3]` or 3d `[width, height, 3]`,
/// read in row-major order as RGB triples.
pub fn register_floating_color_image<D: Dimension>(
    name: impl Into<String>,
    width: u32,
    height: u32,
    values: ArrayView<'_, f32, D>,
    options: &FloatingColorImageOptions,
) -> Result<FloatingColorImageHandle> {
    let name = name.into();
    check_image_dims(&name, width, height)?;
    let colors = shape::color_image_values(
        &name,
        width as usize,
        height as usize,
        &values.into_dyn(),
    )?;

    with_context_mut(|ctx| {
        let img = FloatingColorImage::new(name.clone(), width, height, colors);
        ctx.add_floating_quantity(Box::new(img))
    })?;
    log::debug!("registered floating color image '{name}' ({width}x{height})");

    let handle = FloatingColorImageHandle { name };
    options.apply(&handle)?;
    Ok(handle)
}

fn scalar_image_ref<'a>(ctx: &'a Context, name: &str) -> Option<&'a FloatingScalarImage> {
    ctx.floating_quantity(name)?
        .as_any()
        .downcast_ref::<FloatingScalarImage>()
}

fn scalar_image_mut<'a>(ctx: &'a mut Context, name: &str) -> Option<&'a mut FloatingScalarImage> {
    ctx.floating_quantity_mut(name)?
        .as_any_mut()
        .downcast_mut::<FloatingScalarImage>()
}

fn color_image_ref<'a>(ctx: &'a Context, name: &str) -> Option<&'a FloatingColorImage> {
    ctx.floating_quantity(name)?
        .as_any()
        .downcast_ref::<FloatingColorImage>()
}

fn color_image_mut<'a>(ctx: &'a mut Context, name: &str) -> Option<&'a mut FloatingColorImage> {
    ctx.floating_quantity_mut(name)?
        .as_any_mut()
        .downcast_mut::<FloatingColorImage>()
}

/// Gets a floating scalar image by name.
pub fn get_floating_scalar_image(name: &str) -> Result<FloatingScalarImageHandle> {
    if has_floating_scalar_image(name)? {
        Ok(FloatingScalarImageHandle {
            name: name.to_string(),
        })
    } else {
        Err(FieldscopeError::StructureNotFound(name.to_string()))
    }
}

/// Returns whether a floating scalar image with the given name exists.
pub fn has_floating_scalar_image(name: &str) -> Result<bool> {
    with_context(|ctx| Ok(scalar_image_ref(ctx, name).is_some()))
}

/// Removes a floating scalar image by name.
///
/// A missing image is an error only when `error_if_absent` is set. A color
/// image with the same name is left alone.
pub fn remove_floating_scalar_image(name: &str, error_if_absent: bool) -> Result<()> {
    remove_floating_where(name, error_if_absent, |ctx| scalar_image_ref(ctx, name).is_some())
}

/// Gets a floating color image by name.
pub fn get_floating_color_image(name: &str) -> Result<FloatingColorImageHandle> {
    if has_floating_color_image(name)? {
        Ok(FloatingColorImageHandle {
            name: name.to_string(),
        })
    } else {
        Err(FieldscopeError::StructureNotFound(name.to_string()))
    }
}

/// Returns whether a floating color image with the given name exists.
pub fn has_floating_color_image(name: &str) -> Result<bool> {
    with_context(|ctx| Ok(color_image_ref(ctx, name).is_some()))
}

/// Removes a floating color image by name.
///
/// A missing image is an error only when `error_if_absent` is set. A scalar
/// image with the same name is left alone.
pub fn remove_floating_color_image(name: &str, error_if_absent: bool) -> Result<()> {
    remove_floating_where(name, error_if_absent, |ctx| color_image_ref(ctx, name).is_some())
}

/// Removes a floating quantity of any kind by name.
pub fn remove_floating_quantity(name: &str, error_if_absent: bool) -> Result<()> {
    remove_floating_where(name, error_if_absent, |ctx| ctx.has_floating_quantity(name))
}

/// Removes all floating quantities.
pub fn remove_all_floating_quantities() -> Result<()> {
    with_context_mut(|ctx| {
        ctx.floating_quantities.clear();
        Ok(())
    })
}

/// Returns the names of all floating quantities, in registration order.
pub fn floating_quantity_names() -> Result<Vec<String>> {
    with_context(|ctx| {
        Ok(ctx
            .floating_quantities
            .iter()
            .map(|q| q.name().to_string())
            .collect())
    })
}

fn remove_floating_where(
    name: &str,
    error_if_absent: bool,
    matches: impl FnOnce(&Context) -> bool,
) -> Result<()> {
    with_context_mut(|ctx| {
        if matches(&*ctx) {
            ctx.remove_floating_quantity(name);
            log::debug!("removed floating quantity '{name}'");
            Ok(())
        } else if error_if_absent {
            Err(FieldscopeError::StructureNotFound(name.to_string()))
        } else {
            log::warn!("no floating quantity named '{name}' to remove");
            Ok(())
        }
    })
}

fn stale(kind: &'static str, name: &str) -> FieldscopeError {
    FieldscopeError::StaleHandle {
        kind,
        name: name.to_string(),
    }
}

/// Handle for a floating scalar image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingScalarImageHandle {
    name: String,
}

impl FloatingScalarImageHandle {
    /// Returns the name of this image.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn with_image<R>(&self, f: impl FnOnce(&mut FloatingScalarImage) -> R) -> Result<R> {
        with_context_mut(|ctx| {
            let img = scalar_image_mut(ctx, &self.name)
                .ok_or_else(|| stale("floating scalar image", &self.name))?;
            Ok(f(img))
        })
    }

    fn with_image_ref<R>(&self, f: impl FnOnce(&FloatingScalarImage) -> R) -> Result<R> {
        with_context(|ctx| {
            let img = scalar_image_ref(ctx, &self.name)
                .ok_or_else(|| stale("floating scalar image", &self.name))?;
            Ok(f(img))
        })
    }

    /// Shows or hides the image.
    pub fn set_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_image(|img| img.set_enabled(enabled))?;
        Ok(self)
    }

    /// Returns whether the image is shown.
    pub fn is_enabled(&self) -> Result<bool> {
        self.with_image_ref(|img| img.is_enabled())
    }

    /// Sets the value range mapped onto the color map.
    pub fn set_map_range(&self, range: (f32, f32)) -> Result<&Self> {
        check_map_range(&self.name, range)?;
        self.with_image(|img| {
            img.set_data_range(range.0, range.1);
        })?;
        Ok(self)
    }

    /// Returns the value range mapped onto the color map.
    pub fn map_range(&self) -> Result<(f32, f32)> {
        self.with_image_ref(FloatingScalarImage::data_range)
    }

    /// Sets the color map by name. Unknown color maps are rejected.
    pub fn set_color_map(&self, cmap: &str) -> Result<&Self> {
        with_context_mut(|ctx| {
            check_color_map(ctx, &self.name, cmap)?;
            scalar_image_mut(ctx, &self.name)
                .ok_or_else(|| stale("floating scalar image", &self.name))?
                .set_colormap(cmap);
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the color map name.
    pub fn color_map(&self) -> Result<String> {
        self.with_image_ref(|img| img.colormap_name().to_string())
    }

    /// Sets whether the image covers the whole viewport.
    pub fn set_show_fullscreen(&self, fullscreen: bool) -> Result<&Self> {
        self.with_image(|img| {
            img.set_show_fullscreen(fullscreen);
        })?;
        Ok(self)
    }

    /// Returns whether the image covers the whole viewport.
    pub fn show_fullscreen(&self) -> Result<bool> {
        self.with_image_ref(FloatingScalarImage::show_fullscreen)
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        self.with_image_ref(|img| (img.width(), img.height()))
    }

    /// Returns a copy of the pixel values, row-major.
    pub fn values(&self) -> Result<Vec<f32>> {
        self.with_image_ref(|img| img.values().to_vec())
    }

    /// Returns the data type the image was registered with.
    pub fn data_type(&self) -> Result<DataType> {
        self.with_image_ref(FloatingScalarImage::data_type)
    }

    /// Removes the image.
    pub fn remove(&self) -> Result<()> {
        with_context_mut(|ctx| {
            if scalar_image_ref(ctx, &self.name).is_none() {
                return Err(stale("floating scalar image", &self.name));
            }
            ctx.remove_floating_quantity(&self.name);
            Ok(())
        })
    }
}

/// Handle for a floating color image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingColorImageHandle {
    name: String,
}

impl FloatingColorImageHandle {
    /// Returns the name of this image.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn with_image<R>(&self, f: impl FnOnce(&mut FloatingColorImage) -> R) -> Result<R> {
        with_context_mut(|ctx| {
            let img = color_image_mut(ctx, &self.name)
                .ok_or_else(|| stale("floating color image", &self.name))?;
            Ok(f(img))
        })
    }

    fn with_image_ref<R>(&self, f: impl FnOnce(&FloatingColorImage) -> R) -> Result<R> {
        with_context(|ctx| {
            let img = color_image_ref(ctx, &self.name)
                .ok_or_else(|| stale("floating color image", &self.name))?;
            Ok(f(img))
        })
    }

    /// Shows or hides the image.
    pub fn set_enabled(&self, enabled: bool) -> Result<&Self> {
        self.with_image(|img| img.set_enabled(enabled))?;
        Ok(self)
    }

    /// Returns whether the image is shown.
    pub fn is_enabled(&self) -> Result<bool> {
        self.with_image_ref(|img| img.is_enabled())
    }

    /// Sets whether the image covers the whole viewport.
    pub fn set_show_fullscreen(&self, fullscreen: bool) -> Result<&Self> {
        self.with_image(|img| {
            img.set_show_fullscreen(fullscreen);
        })?;
        Ok(self)
    }

    /// Returns whether the image covers the whole viewport.
    pub fn show_fullscreen(&self) -> Result<bool> {
        self.with_image_ref(FloatingColorImage::show_fullscreen)
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        self.with_image_ref(|img| (img.width(), img.height()))
    }

    /// Returns a copy of the pixel colors, row-major.
    pub fn colors(&self) -> Result<Vec<Vec3>> {
        self.with_image_ref(|img| img.colors().to_vec())
    }

    /// Removes the image.
    pub fn remove(&self) -> Result<()> {
        with_context_mut(|ctx| {
            if color_image_ref(ctx, &self.name).is_none() {
                return Err(stale("floating color image", &self.name));
            }
            ctx.remove_floating_quantity(&self.name);
            Ok(())
        })
    }
}
