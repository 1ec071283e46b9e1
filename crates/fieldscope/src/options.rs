//! Optional display parameters accepted at registration time.
//!
//! Every field is optional; absent fields leave the store defaults in place.
//! Present fields are checked before anything is created and then applied in
//! a fixed order: enabled, range, color map, point viz, isosurface viz,
//! isosurface level, isosurface color, material, transparency, fullscreen.

use serde::{Deserialize, Serialize};

use fieldscope_core::error::{FieldscopeError, Result};
use fieldscope_core::options::DataType;
use fieldscope_core::{Context, Vec3};

/// Options for [`register_volume_grid`](crate::register_volume_grid).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeGridOptions {
    pub enabled: Option<bool>,
    pub material: Option<String>,
    pub transparency: Option<f32>,
}

impl VolumeGridOptions {
    pub(crate) fn validate(&self, ctx: &Context, name: &str) -> Result<()> {
        if let Some(material) = &self.material {
            check_material(ctx, name, material)?;
        }
        if let Some(transparency) = self.transparency {
            check_transparency(name, transparency)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, grid: &crate::VolumeGridHandle) -> Result<()> {
        if let Some(enabled) = self.enabled {
            grid.set_enabled(enabled)?;
        }
        if let Some(material) = &self.material {
            grid.set_material(material)?;
        }
        if let Some(transparency) = self.transparency {
            grid.set_transparency(transparency)?;
        }
        Ok(())
    }
}

/// Options for the `add_scalar_quantity*` family on
/// [`VolumeGridHandle`](crate::VolumeGridHandle).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalarQuantityOptions {
    pub enabled: Option<bool>,
    /// One of [`DataType::NAMES`]; `"standard"` when absent.
    pub datatype: Option<String>,
    pub vminmax: Option<(f32, f32)>,
    pub cmap: Option<String>,
    pub point_viz_enabled: Option<bool>,
    pub isosurface_viz_enabled: Option<bool>,
    pub isosurface_level: Option<f32>,
    pub isosurface_color: Option<Vec3>,
}

impl ScalarQuantityOptions {
    pub(crate) fn data_type(&self) -> Result<DataType> {
        self.datatype
            .as_deref()
            .map_or(Ok(DataType::Standard), str::parse)
    }

    pub(crate) fn validate(&self, ctx: &Context, name: &str) -> Result<()> {
        self.data_type()?;
        if let Some(range) = self.vminmax {
            check_map_range(name, range)?;
        }
        if let Some(cmap) = &self.cmap {
            check_color_map(ctx, name, cmap)?;
        }
        if let Some(level) = self.isosurface_level {
            check_isosurface_level(name, level)?;
        }
        if let Some(color) = self.isosurface_color {
            check_color(name, "isosurface color", color)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, q: &crate::VolumeGridScalarQuantityHandle) -> Result<()> {
        if let Some(enabled) = self.enabled {
            q.set_enabled(enabled)?;
        }
        if let Some(range) = self.vminmax {
            q.set_map_range(range)?;
        }
        if let Some(cmap) = &self.cmap {
            q.set_color_map(cmap)?;
        }
        if let Some(enabled) = self.point_viz_enabled {
            q.set_point_viz_enabled(enabled)?;
        }
        if let Some(enabled) = self.isosurface_viz_enabled {
            q.set_isosurface_viz_enabled(enabled)?;
        }
        if let Some(level) = self.isosurface_level {
            q.set_isosurface_level(level)?;
        }
        if let Some(color) = self.isosurface_color {
            q.set_isosurface_color(color)?;
        }
        Ok(())
    }
}

/// Options for [`register_floating_scalar_image`](crate::register_floating_scalar_image).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingScalarImageOptions {
    pub enabled: Option<bool>,
    /// One of [`DataType::NAMES`]; `"standard"` when absent.
    pub datatype: Option<String>,
    pub vminmax: Option<(f32, f32)>,
    pub cmap: Option<String>,
    pub show_fullscreen: Option<bool>,
}

impl FloatingScalarImageOptions {
    pub(crate) fn data_type(&self) -> Result<DataType> {
        self.datatype
            .as_deref()
            .map_or(Ok(DataType::Standard), str::parse)
    }

    pub(crate) fn validate(&self, ctx: &Context, name: &str) -> Result<()> {
        self.data_type()?;
        if let Some(range) = self.vminmax {
            check_map_range(name, range)?;
        }
        if let Some(cmap) = &self.cmap {
            check_color_map(ctx, name, cmap)?;
        }
        Ok(())
    }

    pub(crate) fn apply(&self, img: &crate::FloatingScalarImageHandle) -> Result<()> {
        if let Some(enabled) = self.enabled {
            img.set_enabled(enabled)?;
        }
        if let Some(range) = self.vminmax {
            img.set_map_range(range)?;
        }
        if let Some(cmap) = &self.cmap {
            img.set_color_map(cmap)?;
        }
        if let Some(fullscreen) = self.show_fullscreen {
            img.set_show_fullscreen(fullscreen)?;
        }
        Ok(())
    }
}

/// Options for [`register_floating_color_image`](crate::register_floating_color_image).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingColorImageOptions {
    pub enabled: Option<bool>,
    pub show_fullscreen: Option<bool>,
}

impl FloatingColorImageOptions {
    pub(crate) fn apply(&self, img: &crate::FloatingColorImageHandle) -> Result<()> {
        if let Some(enabled) = self.enabled {
            img.set_enabled(enabled)?;
        }
        if let Some(fullscreen) = self.show_fullscreen {
            img.set_show_fullscreen(fullscreen)?;
        }
        Ok(())
    }
}

pub(crate) fn check_transparency(name: &str, transparency: f32) -> Result<()> {
    if (0.0..=1.0).contains(&transparency) {
        Ok(())
    } else {
        Err(FieldscopeError::invalid_option(
            name,
            "transparency",
            transparency,
            "must lie in [0, 1]",
        ))
    }
}

pub(crate) fn check_map_range(name: &str, (min, max): (f32, f32)) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(FieldscopeError::invalid_option(
            name,
            "vminmax",
            (min, max),
            "bounds must be finite",
        ));
    }
    if min > max {
        return Err(FieldscopeError::invalid_option(
            name,
            "vminmax",
            (min, max),
            "min must not exceed max",
        ));
    }
    Ok(())
}

pub(crate) fn check_color_map(ctx: &Context, name: &str, cmap: &str) -> Result<()> {
    if ctx.has_color_map(cmap) {
        Ok(())
    } else {
        Err(FieldscopeError::invalid_option(
            name,
            "cmap",
            cmap,
            format!("known color maps: {}", ctx.color_maps.join(", ")),
        ))
    }
}

pub(crate) fn check_material(ctx: &Context, name: &str, material: &str) -> Result<()> {
    if ctx.has_material(material) {
        Ok(())
    } else {
        Err(FieldscopeError::invalid_option(
            name,
            "material",
            material,
            format!("known materials: {}", ctx.materials.join(", ")),
        ))
    }
}

pub(crate) fn check_isosurface_level(name: &str, level: f32) -> Result<()> {
    if level.is_finite() {
        Ok(())
    } else {
        Err(FieldscopeError::invalid_option(
            name,
            "isosurface level",
            level,
            "must be finite",
        ))
    }
}

pub(crate) fn check_color(name: &str, option: &'static str, color: Vec3) -> Result<()> {
    if color.is_finite() {
        Ok(())
    } else {
        Err(FieldscopeError::invalid_option(
            name,
            option,
            color,
            "components must be finite",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_options_from_json() {
        let json = r#"{
            "enabled": true,
            "datatype": "symmetric",
            "vminmax": [-1.0, 1.0],
            "cmap": "coolwarm"
        }"#;
        let opts: ScalarQuantityOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.enabled, Some(true));
        assert_eq!(opts.data_type().unwrap(), DataType::Symmetric);
        assert_eq!(opts.vminmax, Some((-1.0, 1.0)));
        assert_eq!(opts.isosurface_level, None);
    }

    #[test]
    fn test_data_type_defaults_to_standard() {
        assert_eq!(
            ScalarQuantityOptions::default().data_type().unwrap(),
            DataType::Standard
        );
        let opts = FloatingScalarImageOptions {
            datatype: Some("diverging".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            opts.data_type(),
            Err(FieldscopeError::UnrecognizedOption { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let ctx = Context::default();

        let opts = VolumeGridOptions {
            transparency: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(&ctx, "grid"),
            Err(FieldscopeError::InvalidOption { option: "transparency", .. })
        ));

        let opts = VolumeGridOptions {
            material: Some("velvet".to_string()),
            ..Default::default()
        };
        assert!(opts.validate(&ctx, "grid").is_err());

        let opts = ScalarQuantityOptions {
            vminmax: Some((1.0, 0.0)),
            ..Default::default()
        };
        assert!(opts.validate(&ctx, "q").is_err());

        let opts = ScalarQuantityOptions {
            isosurface_color: Some(Vec3::new(0.0, f32::NAN, 0.0)),
            ..Default::default()
        };
        assert!(opts.validate(&ctx, "q").is_err());

        let opts = FloatingScalarImageOptions {
            cmap: Some("magma".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(&ctx, "img"),
            Err(FieldscopeError::InvalidOption { option: "cmap", .. })
        ));
    }

    #[test]
    fn test_validation_accepts_good_values() {
        let ctx = Context::default();
        let opts = ScalarQuantityOptions {
            enabled: Some(true),
            datatype: Some("magnitude".to_string()),
            vminmax: Some((0.0, 0.0)),
            cmap: Some("blues".to_string()),
            point_viz_enabled: Some(false),
            isosurface_viz_enabled: Some(true),
            isosurface_level: Some(0.5),
            isosurface_color: Some(Vec3::X),
        };
        assert!(opts.validate(&ctx, "q").is_ok());
        assert!(check_transparency("g", 0.0).is_ok());
        assert!(check_transparency("g", 1.0).is_ok());
        assert!(check_transparency("g", f32::NAN).is_err());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ordered_finite_ranges_are_accepted(a in -1e6f32..1e6, b in -1e6f32..1e6) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(check_map_range("q", (lo, hi)).is_ok());
                if lo < hi {
                    prop_assert!(check_map_range("q", (hi, lo)).is_err());
                }
            }

            #[test]
            fn transparency_outside_unit_interval_is_rejected(t in 1.0001f32..100.0) {
                prop_assert!(check_transparency("g", t).is_err());
                prop_assert!(check_transparency("g", -t).is_err());
            }
        }
    }
}
