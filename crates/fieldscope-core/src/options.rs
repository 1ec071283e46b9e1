//! Configuration options and option-string enumerations for fieldscope.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FieldscopeError, Result};

/// Global configuration options for fieldscope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Name used as a prefix in log output.
    pub program_name: String,

    /// Log verbosity: 0 = warnings only, 1 = info, 2 = debug, 3+ = trace.
    pub verbosity: u32,

    /// Whether to recompute scene extents whenever structures change.
    pub auto_compute_scene_extents: bool,

    /// Whether newly registered structures are centered at the origin.
    pub autocenter_structures: bool,

    /// Whether newly registered structures are rescaled to unit size.
    pub autoscale_structures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            program_name: "fieldscope".to_string(),
            verbosity: 1,
            auto_compute_scene_extents: true,
            autocenter_structures: false,
            autoscale_structures: false,
        }
    }
}

impl Options {
    /// Parses options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to a pretty-printed JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Maps [`Options::verbosity`] onto a `log` level filter.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Materials every context knows about.
pub const BUILTIN_MATERIALS: &[&str] = &[
    "clay", "wax", "candy", "flat", "mud", "ceramic", "jade", "normal",
];

/// Material assigned to structures that never set one.
pub const DEFAULT_MATERIAL: &str = "clay";

/// Color maps every context knows about.
pub const BUILTIN_COLOR_MAPS: &[&str] = &[
    "viridis",
    "coolwarm",
    "blues",
    "reds",
    "pink-green",
    "phase",
    "spectral",
    "rainbow",
    "jet",
    "turbo",
    "hsv",
];

/// Semantic category of scalar data, which drives default color mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Arbitrary values.
    #[default]
    Standard,
    /// Values centered around zero.
    Symmetric,
    /// Non-negative magnitudes.
    Magnitude,
    /// Integer labels.
    Categorical,
}

impl DataType {
    /// All recognized option strings, in declaration order.
    pub const NAMES: &'static [&'static str] =
        &["standard", "symmetric", "magnitude", "categorical"];

    /// Returns the canonical option string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Symmetric => "symmetric",
            Self::Magnitude => "magnitude",
            Self::Categorical => "categorical",
        }
    }

    /// Color map used when the caller does not pick one.
    pub fn default_color_map(self) -> &'static str {
        match self {
            Self::Standard => "viridis",
            Self::Symmetric => "coolwarm",
            Self::Magnitude => "blues",
            Self::Categorical => "hsv",
        }
    }

    /// Computes the default color-mapping range for `values`.
    ///
    /// Non-finite values are ignored; with no finite value the range is `(0, 1)`.
    /// Symmetric data gets a range centered on zero.
    pub fn default_range(self, values: &[f32]) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &v in values.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            return (0.0, 1.0);
        }
        match self {
            Self::Symmetric => {
                let abs_max = min.abs().max(max.abs());
                (-abs_max, abs_max)
            }
            _ => (min, max),
        }
    }
}

impl FromStr for DataType {
    type Err = FieldscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "symmetric" => Ok(Self::Symmetric),
            "magnitude" => Ok(Self::Magnitude),
            "categorical" => Ok(Self::Categorical),
            _ => Err(FieldscopeError::UnrecognizedOption {
                kind: "data type",
                value: s.to_string(),
                valid: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How vector data should be scaled for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorType {
    /// Rescaled relative to the scene length scale.
    #[default]
    Standard,
    /// Drawn at their true world-space length.
    Ambient,
}

impl VectorType {
    /// All recognized option strings, in declaration order.
    pub const NAMES: &'static [&'static str] = &["standard", "ambient"];

    /// Returns the canonical option string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Ambient => "ambient",
        }
    }
}

impl FromStr for VectorType {
    type Err = FieldscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "standard" => Ok(Self::Standard),
            "ambient" => Ok(Self::Ambient),
            _ => Err(FieldscopeError::UnrecognizedOption {
                kind: "vector type",
                value: s.to_string(),
                valid: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
