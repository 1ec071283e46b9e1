//! API coverage integration tests for fieldscope-rs.
//!
//! These tests exercise handles, display options, transforms, slice planes and
//! configuration, beyond what the basic tests cover.
//!
//! Note: fieldscope keeps its scene in process-global state (OnceLock), so all
//! checks run in sequence inside a single test function.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fieldscope_rs::ndarray::{Array1, Array2};
use fieldscope_rs::*;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

/// Main API coverage test that runs all subtests in sequence.
#[test]
fn api_coverage_tests() {
    let _ = init();

    // ========================================================================
    // VOLUME GRID OPTIONS
    // ========================================================================

    // --- Test: Grid options are applied after creation ---
    {
        remove_all_structures().unwrap();

        let grid = register_volume_grid(
            "styled",
            [4, 2, 1],
            Vec3::ZERO,
            Vec3::new(4.0, 2.0, 1.0),
            &VolumeGridOptions {
                enabled: Some(false),
                material: Some("wax".to_string()),
                transparency: Some(0.25),
            },
        )
        .unwrap();
        assert!(!grid.is_enabled().unwrap());
        assert_eq!(grid.material().unwrap(), "wax");
        assert!((grid.transparency().unwrap() - 0.25).abs() < 1e-6);
        assert_eq!(grid.n_values().unwrap(), 5 * 3 * 2);
        assert!((grid.min_grid_spacing().unwrap() - 1.0).abs() < 1e-6);
    }

    // --- Test: Bad options are rejected before anything is created ---
    {
        let err = register_volume_grid(
            "bad material",
            2,
            Vec3::ZERO,
            Vec3::ONE,
            &VolumeGridOptions {
                material: Some("velvet".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FieldscopeError::InvalidOption {
                option: "material",
                ..
            }
        ));
        assert!(!has_volume_grid("bad material").unwrap());

        let err = register_volume_grid(
            "bad transparency",
            2,
            Vec3::ZERO,
            Vec3::ONE,
            &VolumeGridOptions {
                transparency: Some(-0.1),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad transparency"));
        assert!(!has_volume_grid("bad transparency").unwrap());

        assert!(matches!(
            register_volume_grid("flat", 2, Vec3::ONE, Vec3::ONE, &VolumeGridOptions::default()),
            Err(FieldscopeError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            register_volume_grid(
                "empty",
                [2, 0, 2],
                Vec3::ZERO,
                Vec3::ONE,
                &VolumeGridOptions::default()
            ),
            Err(FieldscopeError::InvalidGeometry { .. })
        ));
    }

    // --- Test: Duplicate names and fetch-or-create ---
    {
        let err =
            register_volume_grid("styled", 1, Vec3::ZERO, Vec3::ONE, &VolumeGridOptions::default())
                .unwrap_err();
        assert!(matches!(err, FieldscopeError::StructureExists(ref n) if n == "styled"));

        let same = get_or_register_volume_grid(
            "styled",
            1,
            Vec3::ZERO,
            Vec3::ONE,
            &VolumeGridOptions::default(),
        )
        .unwrap();
        assert_eq!(same.resolution().unwrap(), UVec3::new(4, 2, 1));

        let fresh = get_or_register_volume_grid(
            "fresh",
            3,
            Vec3::ZERO,
            Vec3::ONE,
            &VolumeGridOptions::default(),
        )
        .unwrap();
        assert_eq!(fresh.n_values().unwrap(), 64);
        assert_eq!(volume_grid_names().unwrap(), vec!["fresh", "styled"]);
    }

    // ========================================================================
    // SCALAR QUANTITY OPTIONS
    // ========================================================================

    // --- Test: Defaults follow the data type ---
    {
        let grid = get_volume_grid("fresh").unwrap();

        let standard = grid
            .add_scalar_quantity_from_callable("x", |p| p.x, &ScalarQuantityOptions::default())
            .unwrap();
        assert!(!standard.is_enabled().unwrap());
        assert_eq!(standard.color_map().unwrap(), "viridis");
        assert_eq!(standard.data_type().unwrap(), DataType::Standard);
        assert_eq!(standard.map_range().unwrap(), (0.0, 1.0));
        assert!(standard.point_viz_enabled().unwrap());
        assert!(!standard.isosurface_viz_enabled().unwrap());
        assert!((standard.isosurface_level().unwrap() - 0.5).abs() < 1e-6);

        let symmetric = grid
            .add_scalar_quantity_from_callable(
                "centered",
                |p| p.x - 0.25,
                &ScalarQuantityOptions {
                    datatype: Some("symmetric".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(symmetric.color_map().unwrap(), "coolwarm");
        assert_eq!(symmetric.map_range().unwrap(), (-0.75, 0.75));
        assert!(symmetric.isosurface_level().unwrap().abs() < 1e-6);
    }

    // --- Test: Every scalar option is applied ---
    {
        let grid = get_volume_grid("fresh").unwrap();
        let field = grid
            .add_scalar_quantity_from_callable(
                "styled field",
                |p| p.length(),
                &ScalarQuantityOptions {
                    enabled: Some(true),
                    datatype: Some("magnitude".to_string()),
                    vminmax: Some((0.0, 2.0)),
                    cmap: Some("reds".to_string()),
                    point_viz_enabled: Some(false),
                    isosurface_viz_enabled: Some(true),
                    isosurface_level: Some(0.75),
                    isosurface_color: Some(Vec3::new(1.0, 0.5, 0.0)),
                },
            )
            .unwrap();
        assert!(field.is_enabled().unwrap());
        assert_eq!(field.data_type().unwrap(), DataType::Magnitude);
        assert_eq!(field.map_range().unwrap(), (0.0, 2.0));
        assert_eq!(field.color_map().unwrap(), "reds");
        assert!(!field.point_viz_enabled().unwrap());
        assert!(field.isosurface_viz_enabled().unwrap());
        assert!((field.isosurface_level().unwrap() - 0.75).abs() < 1e-6);
        assert!(approx(field.isosurface_color().unwrap(), Vec3::new(1.0, 0.5, 0.0)));

        field.set_color_map("turbo").unwrap().set_map_range((0.1, 0.2)).unwrap();
        assert_eq!(field.color_map().unwrap(), "turbo");
        assert!(matches!(
            field.set_color_map("magma"),
            Err(FieldscopeError::InvalidOption { option: "cmap", .. })
        ));
        assert!(field.set_map_range((1.0, -1.0)).is_err());
        assert!(field.set_isosurface_level(f32::INFINITY).is_err());
        assert_eq!(field.color_map().unwrap(), "turbo");
    }

    // --- Test: Bad scalar options leave the grid untouched ---
    {
        let grid = get_volume_grid("fresh").unwrap();
        let err = grid
            .add_scalar_quantity_from_callable(
                "bad type",
                |p| p.x,
                &ScalarQuantityOptions {
                    datatype: Some("diverging".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            FieldscopeError::UnrecognizedOption {
                kind: "data type",
                ..
            }
        ));
        assert!(err.to_string().contains("symmetric"));
        assert!(!grid.has_quantity("bad type").unwrap());

        let err = grid
            .add_scalar_quantity_from_callable(
                "bad cmap",
                |p| p.x,
                &ScalarQuantityOptions {
                    cmap: Some("magma".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, FieldscopeError::InvalidOption { .. }));
        assert!(!grid.has_quantity("bad cmap").unwrap());

        assert!(matches!(
            grid.add_scalar_quantity_from_callable("x", |p| p.y, &ScalarQuantityOptions::default()),
            Err(FieldscopeError::QuantityExists(_, _))
        ));
    }

    // --- Test: Options deserialize from JSON ---
    {
        let options: ScalarQuantityOptions = serde_json::from_str(
            r#"{ "enabled": true, "cmap": "blues", "isosurface_color": [0.0, 1.0, 0.0] }"#,
        )
        .unwrap();
        let grid = get_volume_grid("fresh").unwrap();
        let field = grid
            .add_scalar_quantity_from_callable("from json", |p| p.z, &options)
            .unwrap();
        assert!(field.is_enabled().unwrap());
        assert_eq!(field.color_map().unwrap(), "blues");
        assert!(approx(field.isosurface_color().unwrap(), Vec3::Y));
    }

    // --- Test: Refresh re-evaluates callables only ---
    {
        let grid = get_volume_grid("fresh").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let counted = grid
            .add_scalar_quantity_from_batch_callable(
                "counted",
                move |ps| {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    vec![n as f32; ps.len()]
                },
                &ScalarQuantityOptions::default(),
            )
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(counted.values().unwrap().iter().all(|&v| v == 0.0));

        counted.refresh().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(counted.values().unwrap().iter().all(|&v| v == 1.0));

        grid.refresh().unwrap();
        refresh().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        let buffered = Array1::from_elem(64, 7.0_f32);
        let fixed = grid
            .add_scalar_quantity("fixed", buffered.view(), &ScalarQuantityOptions::default())
            .unwrap();
        fixed.refresh().unwrap();
        assert!(fixed.values().unwrap().iter().all(|&v| v == 7.0));
    }

    // --- Test: Quantity removal ---
    {
        let grid = get_volume_grid("fresh").unwrap();
        let field = grid.get_scalar_quantity("fixed").unwrap();
        assert_eq!(field.grid_name(), "fresh");

        grid.remove_quantity("fixed", true).unwrap();
        assert!(!grid.has_quantity("fixed").unwrap());
        assert!(matches!(
            field.values(),
            Err(FieldscopeError::StaleHandle { .. })
        ));
        assert!(matches!(
            grid.remove_quantity("fixed", true),
            Err(FieldscopeError::QuantityNotFound(_, _))
        ));
        grid.remove_quantity("fixed", false).unwrap();
        assert!(matches!(
            grid.get_scalar_quantity("fixed"),
            Err(FieldscopeError::QuantityNotFound(_, _))
        ));

        grid.get_scalar_quantity("x").unwrap().remove().unwrap();
        assert!(!grid.has_quantity("x").unwrap());

        grid.remove_all_quantities().unwrap();
        assert!(grid.quantity_names().unwrap().is_empty());
    }

    // ========================================================================
    // GEOMETRY AND TRANSFORMS
    // ========================================================================

    // --- Test: Node positions ---
    {
        remove_all_structures().unwrap();
        let grid = register_volume_grid(
            "geom",
            2,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            &VolumeGridOptions::default(),
        )
        .unwrap();
        assert!(approx(grid.position_of_index(0).unwrap(), Vec3::splat(-1.0)));
        assert!(approx(grid.position_of_index(13).unwrap(), Vec3::ZERO));
        assert!(approx(grid.position_of_index3([2, 0, 1]).unwrap(), Vec3::new(1.0, -1.0, 0.0)));
        assert!(grid.position_of_index(27).is_err());
        assert!(grid.position_of_index3([0, 3, 0]).is_err());
        assert_eq!(grid.bound_min().unwrap(), Vec3::splat(-1.0));
        assert_eq!(grid.bound_max().unwrap(), Vec3::splat(1.0));
    }

    // --- Test: Transforms move the scene extents ---
    {
        let grid = get_volume_grid("geom").unwrap();
        let (min, max) = bounding_box().unwrap();
        assert!(approx(min, Vec3::splat(-1.0)) && approx(max, Vec3::splat(1.0)));

        grid.translate(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(approx(grid.position().unwrap(), Vec3::new(2.0, 0.0, 0.0)));
        let (min, _) = bounding_box().unwrap();
        assert!(approx(min, Vec3::new(1.0, -1.0, -1.0)));

        grid.center_bounding_box().unwrap();
        assert!(approx(grid.position().unwrap(), Vec3::ZERO));

        grid.rescale_to_unit().unwrap();
        assert!((length_scale().unwrap() - 1.0).abs() < 1e-5);

        grid.set_position(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert!(approx(grid.position().unwrap(), Vec3::new(0.0, 5.0, 0.0)));

        grid.reset_transform().unwrap();
        assert_eq!(grid.transform().unwrap(), Mat4::IDENTITY);

        grid.set_transform(Mat4::from_scale(Vec3::splat(2.0))).unwrap();
        let (min, max) = grid.bounding_box().unwrap();
        assert!(approx(min, Vec3::splat(-2.0)) && approx(max, Vec3::splat(2.0)));
        assert!((length_scale().unwrap() - 4.0 * 3.0_f32.sqrt()).abs() < 1e-4);
    }

    // --- Test: Autocenter and autoscale on registration ---
    {
        set_autocenter_structures(true).unwrap();
        set_autoscale_structures(true).unwrap();
        assert!(options().unwrap().autocenter_structures);

        let grid = register_volume_grid(
            "auto",
            4,
            Vec3::splat(1.0),
            Vec3::splat(3.0),
            &VolumeGridOptions::default(),
        )
        .unwrap();
        let (min, max) = grid.bounding_box().unwrap();
        assert!(approx((min + max) * 0.5, Vec3::ZERO));
        assert!(((max - min).length() - 1.0).abs() < 1e-5);

        set_autocenter_structures(false).unwrap();
        set_autoscale_structures(false).unwrap();
        grid.remove().unwrap();
    }

    // ========================================================================
    // SLICE PLANES
    // ========================================================================

    // --- Test: Slice plane creation and retrieval ---
    {
        remove_all_slice_planes().unwrap();

        let plane = add_slice_plane("test_plane").unwrap();
        assert_eq!(plane.name(), "test_plane");
        assert!(has_slice_plane("test_plane").unwrap());
        assert!(get_slice_plane("nonexistent").is_err());
        assert!(plane.is_enabled().unwrap());
        assert!(approx(plane.normal().unwrap(), Vec3::Y));
        assert!(matches!(
            add_slice_plane("test_plane"),
            Err(FieldscopeError::StructureExists(_))
        ));
        assert_eq!(slice_plane_names().unwrap(), vec!["test_plane"]);
    }

    // --- Test: Slice plane pose ---
    {
        let plane =
            add_slice_plane_with_pose("posed", Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 2.0))
                .unwrap();
        assert!(approx(plane.origin().unwrap(), Vec3::new(1.0, 2.0, 3.0)));
        assert!(approx(plane.normal().unwrap(), Vec3::Z));
        assert!(plane.is_kept(Vec3::new(0.0, 0.0, 4.0)).unwrap());
        assert!(!plane.is_kept(Vec3::ZERO).unwrap());

        plane.set_pose(Vec3::ZERO, Vec3::ZERO).unwrap();
        assert!(approx(plane.normal().unwrap(), Vec3::Z));

        plane.set_enabled(false).unwrap();
        assert!(plane.is_kept(Vec3::new(0.0, 0.0, -4.0)).unwrap());
    }

    // --- Test: Structures ignoring slice planes ---
    {
        let grid = get_volume_grid("geom").unwrap();
        let plane = get_slice_plane("posed").unwrap();

        assert!(!grid.ignores_slice_plane(&plane).unwrap());
        grid.set_ignore_slice_plane(&plane, true).unwrap();
        assert!(grid.ignores_slice_plane("posed").unwrap());
        assert!(!grid.ignores_slice_plane("test_plane").unwrap());
        grid.set_ignore_slice_plane("posed", false).unwrap();
        assert!(!grid.ignores_slice_plane(&plane).unwrap());
    }

    // --- Test: Slice plane removal ---
    {
        remove_slice_plane("test_plane", true).unwrap();
        assert!(!has_slice_plane("test_plane").unwrap());
        assert!(remove_slice_plane("test_plane", true).is_err());
        remove_slice_plane("test_plane", false).unwrap();

        let plane = get_slice_plane("posed").unwrap();
        plane.remove().unwrap();
        assert!(matches!(
            plane.origin(),
            Err(FieldscopeError::StaleHandle { kind: "slice plane", .. })
        ));
        remove_all_slice_planes().unwrap();
        assert!(slice_plane_names().unwrap().is_empty());
    }

    // ========================================================================
    // FLOATING IMAGES
    // ========================================================================

    // --- Test: Scalar image options ---
    {
        remove_all_floating_quantities().unwrap();
        let values = Array2::from_shape_fn((3, 2), |(i, j)| (i as f32) - (j as f32));
        let img = register_floating_scalar_image(
            "depth",
            3,
            2,
            values.view(),
            &FloatingScalarImageOptions {
                enabled: Some(false),
                datatype: Some("symmetric".to_string()),
                cmap: Some("pink-green".to_string()),
                show_fullscreen: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!img.is_enabled().unwrap());
        assert_eq!(img.data_type().unwrap(), DataType::Symmetric);
        assert_eq!(img.color_map().unwrap(), "pink-green");
        assert_eq!(img.map_range().unwrap(), (-2.0, 2.0));
        assert!(img.show_fullscreen().unwrap());
        assert_eq!(img.values().unwrap(), vec![0.0, -1.0, 1.0, 0.0, 2.0, 1.0]);
    }

    // --- Test: Floating images share one name space ---
    {
        let colors = Array2::<f32>::ones((6, 3));
        let err = register_floating_color_image(
            "depth",
            3,
            2,
            colors.view(),
            &FloatingColorImageOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FieldscopeError::StructureExists(_)));

        let img = register_floating_color_image(
            "albedo",
            3,
            2,
            colors.view(),
            &FloatingColorImageOptions {
                show_fullscreen: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(img.is_enabled().unwrap());
        assert!(img.show_fullscreen().unwrap());
        assert_eq!(img.dimensions().unwrap(), (3, 2));

        assert!(!has_floating_scalar_image("albedo").unwrap());
        assert!(get_floating_scalar_image("albedo").is_err());
        assert!(get_floating_color_image("albedo").is_ok());

        // Type-specific removal leaves the other kind alone
        remove_floating_scalar_image("albedo", false).unwrap();
        assert!(has_floating_color_image("albedo").unwrap());
        assert!(remove_floating_scalar_image("albedo", true).is_err());

        assert!(matches!(
            register_floating_color_image(
                "empty",
                0,
                2,
                Array2::<f32>::zeros((0, 3)).view(),
                &FloatingColorImageOptions::default()
            ),
            Err(FieldscopeError::InvalidGeometry { .. })
        ));
    }

    // --- Test: Floating removal ---
    {
        assert_eq!(floating_quantity_names().unwrap(), vec!["depth", "albedo"]);

        let img = get_floating_color_image("albedo").unwrap();
        remove_floating_quantity("albedo", true).unwrap();
        assert!(matches!(
            img.set_enabled(true),
            Err(FieldscopeError::StaleHandle { .. })
        ));
        assert!(remove_floating_quantity("albedo", true).is_err());
        remove_floating_quantity("albedo", false).unwrap();

        get_floating_scalar_image("depth").unwrap().remove().unwrap();
        assert!(floating_quantity_names().unwrap().is_empty());
    }

    // ========================================================================
    // STALE HANDLES
    // ========================================================================

    // --- Test: Handles outlive their objects safely ---
    {
        let grid = get_volume_grid("geom").unwrap();
        let field = grid
            .add_scalar_quantity_from_callable("f", |p| p.x, &ScalarQuantityOptions::default())
            .unwrap();
        remove_all_volume_grids().unwrap();

        assert!(matches!(
            grid.set_enabled(true),
            Err(FieldscopeError::StaleHandle {
                kind: "volume grid",
                ..
            })
        ));
        assert!(grid.n_values().is_err());
        assert!(field.is_enabled().is_err());
        assert!(grid.remove().is_err());

        // Registering again under the same name revives old handles
        register_volume_grid("geom", 1, Vec3::ZERO, Vec3::ONE, &VolumeGridOptions::default())
            .unwrap();
        assert_eq!(grid.n_values().unwrap(), 8);
        assert!(field.is_enabled().is_err());
    }

    shutdown();
}
