#![allow(clippy::cast_precision_loss)]
//! Demo showing floating images in fieldscope-rs.
//!
//! Demonstrates:
//! - Scalar images from 1d and 2d arrays
//! - Color images from `[w*h, 3]` and `[w, h, 3]` arrays
//! - Shape errors and the shared floating name space

use fieldscope_rs::ndarray::{Array2, Array3};
use fieldscope_rs::{
    self as fieldscope, FieldscopeError, FloatingColorImageOptions, FloatingScalarImageOptions,
};

fn main() -> fieldscope::Result<()> {
    fieldscope::init()?;

    let (w, h) = (64usize, 48usize);

    // A radial ramp as a [width, height] array
    let ramp = Array2::from_shape_fn((w, h), |(i, j)| {
        let x = i as f32 / w as f32 - 0.5;
        let y = j as f32 / h as f32 - 0.5;
        (x * x + y * y).sqrt()
    });
    let depth = fieldscope::register_floating_scalar_image(
        "depth",
        w as u32,
        h as u32,
        ramp.view(),
        &FloatingScalarImageOptions {
            datatype: Some("magnitude".into()),
            cmap: Some("blues".into()),
            ..Default::default()
        },
    )?;
    log::info!("'{}' range {:?}", depth.name(), depth.map_range()?);

    // Passing the array with width and height swapped is a shape error
    match fieldscope::register_floating_scalar_image(
        "transposed",
        w as u32,
        h as u32,
        ramp.t(),
        &FloatingScalarImageOptions::default(),
    ) {
        Err(err @ FieldscopeError::Shape { .. }) => log::info!("rejected: {err}"),
        other => log::warn!("unexpected result: {other:?}"),
    }

    // An RGB gradient as a [width, height, 3] array
    let gradient = Array3::from_shape_fn((w, h, 3), |(i, j, c)| match c {
        0 => i as f32 / w as f32,
        1 => j as f32 / h as f32,
        _ => 0.5,
    });
    let albedo = fieldscope::register_floating_color_image(
        "albedo",
        w as u32,
        h as u32,
        gradient.view(),
        &FloatingColorImageOptions {
            show_fullscreen: Some(true),
            ..Default::default()
        },
    )?;
    log::info!(
        "'{}' is {:?}, fullscreen {}",
        albedo.name(),
        albedo.dimensions()?,
        albedo.show_fullscreen()?
    );

    // Scalar and color images share one name space
    if let Err(err) = fieldscope::register_floating_color_image(
        "depth",
        w as u32,
        h as u32,
        gradient.view(),
        &FloatingColorImageOptions::default(),
    ) {
        log::info!("rejected: {err}");
    }

    for name in fieldscope::floating_quantity_names()? {
        log::info!("floating quantity: {name}");
    }
    fieldscope::remove_all_floating_quantities()?;
    fieldscope::shutdown();
    Ok(())
}
