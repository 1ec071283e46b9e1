#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Demo showing volume grid fields in fieldscope-rs.
//!
//! Demonstrates:
//! - Dense buffer fields laid out x-fastest
//! - Per-vertex and batch callables
//! - Display options and isosurface settings
//! - Re-evaluating callables with `refresh`

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use fieldscope_rs::ndarray::Array1;
use fieldscope_rs::{self as fieldscope, ScalarQuantityOptions, Vec3, VolumeGridOptions};

fn main() -> fieldscope::Result<()> {
    fieldscope::init()?;

    // --- Grid 1: Sphere SDF from a dense buffer ---
    let n = 30u32;
    let grid = fieldscope::register_volume_grid(
        "sphere SDF",
        n,
        Vec3::splat(-1.5),
        Vec3::splat(1.5),
        &VolumeGridOptions {
            material: Some("wax".into()),
            ..Default::default()
        },
    )?;

    // Nodes run x-fastest, n + 1 per axis
    let mut sdf_values = Vec::with_capacity(grid.n_values()?);
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                let p = Vec3::new(i as f32, j as f32, k as f32) / n as f32 * 3.0 - 1.5;
                sdf_values.push(p.length() - 1.0);
            }
        }
    }
    let sdf = grid.add_scalar_quantity(
        "SDF",
        Array1::from(sdf_values).view(),
        &ScalarQuantityOptions {
            enabled: Some(true),
            datatype: Some("symmetric".into()),
            isosurface_viz_enabled: Some(true),
            isosurface_level: Some(0.0),
            isosurface_color: Some(Vec3::new(0.047, 0.451, 0.690)),
            ..Default::default()
        },
    )?;
    log::info!(
        "'{}': range {:?}, cmap {}",
        sdf.name(),
        sdf.map_range()?,
        sdf.color_map()?
    );

    // --- Grid 2: The same kind of field from callables ---
    let grid2 = fieldscope::register_volume_grid(
        "torus",
        (40, 20, 40),
        Vec3::new(3.0, -0.5, -1.0),
        Vec3::new(5.0, 0.5, 1.0),
        &VolumeGridOptions::default(),
    )?;
    let torus = |p: Vec3| {
        let q = p - Vec3::new(4.0, 0.0, 0.0);
        let ring = (q.x * q.x + q.z * q.z).sqrt() - 0.6;
        (ring * ring + q.y * q.y).sqrt() - 0.25
    };
    grid2.add_scalar_quantity_from_callable("torus SDF", torus, &ScalarQuantityOptions::default())?;
    grid2.add_scalar_quantity_from_batch_callable(
        "height",
        |positions| positions.iter().map(|p| p.y).collect(),
        &ScalarQuantityOptions {
            cmap: Some("turbo".into()),
            point_viz_enabled: Some(false),
            ..Default::default()
        },
    )?;

    // --- Callable fields can be re-evaluated ---
    let frame = Arc::new(AtomicU32::new(0));
    let clock = Arc::clone(&frame);
    let pulse = grid2.add_scalar_quantity_from_callable(
        "pulse",
        move |p| (p.x * 4.0 + clock.load(Ordering::Relaxed) as f32 * 0.1).sin(),
        &ScalarQuantityOptions::default(),
    )?;
    for _ in 0..3 {
        frame.fetch_add(1, Ordering::Relaxed);
        pulse.refresh()?;
    }

    let (min, max) = fieldscope::bounding_box()?;
    log::info!(
        "{} grids, scene box {min} .. {max}, length scale {:.3}",
        fieldscope::volume_grid_names()?.len(),
        fieldscope::length_scale()?
    );
    for name in grid2.quantity_names()? {
        log::info!("torus grid field: {name}");
    }

    fieldscope::shutdown();
    Ok(())
}
