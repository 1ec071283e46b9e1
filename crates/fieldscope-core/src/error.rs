//! Error types for fieldscope-rs.

use thiserror::Error;

/// The main error type for fieldscope-rs operations.
#[derive(Error, Debug)]
pub enum FieldscopeError {
    /// fieldscope has not been initialized.
    #[error("fieldscope not initialized - call fieldscope_rs::init() first")]
    NotInitialized,

    /// fieldscope has already been initialized.
    #[error("fieldscope already initialized")]
    AlreadyInitialized,

    /// The global context lock was poisoned by a panicking writer.
    #[error("fieldscope context lock poisoned")]
    ContextPoisoned,

    /// A structure with the given name already exists.
    #[error("structure '{0}' already exists")]
    StructureExists(String),

    /// A structure with the given name was not found.
    #[error("structure '{0}' not found")]
    StructureNotFound(String),

    /// A quantity with the given name already exists.
    #[error("quantity '{0}' already exists on structure '{1}'")]
    QuantityExists(String, String),

    /// A quantity with the given name was not found.
    #[error("quantity '{0}' not found on structure '{1}'")]
    QuantityNotFound(String, String),

    /// A handle refers to an object that has since been removed.
    #[error("{kind} '{name}' no longer exists")]
    StaleHandle { kind: &'static str, name: String },

    /// Input array has the wrong rank or extents.
    #[error("'{name}': `values` should be {expected}, got shape {actual:?}")]
    Shape {
        name: String,
        expected: String,
        actual: Vec<usize>,
    },

    /// An option string did not match any known value.
    #[error("unrecognized {kind} '{value}', expected one of: {}", valid.join(", "))]
    UnrecognizedOption {
        kind: &'static str,
        value: String,
        valid: &'static [&'static str],
    },

    /// An optional display parameter was rejected by its setter.
    #[error("'{name}': invalid {option} {value}: {reason}")]
    InvalidOption {
        name: String,
        option: &'static str,
        value: String,
        reason: String,
    },

    /// Geometry that defines a structure is degenerate.
    #[error("'{name}': {reason}")]
    InvalidGeometry { name: String, reason: String },

    /// A field source produced the wrong number of values.
    #[error("'{name}' on '{structure}': expected {expected} values, got {actual}")]
    SizeMismatch {
        name: String,
        structure: String,
        expected: usize,
        actual: usize,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FieldscopeError {
    /// Builds a [`FieldscopeError::InvalidOption`], rendering the value with `Debug`.
    pub fn invalid_option(
        name: impl Into<String>,
        option: &'static str,
        value: impl std::fmt::Debug,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            name: name.into(),
            option,
            value: format!("{value:?}"),
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for fieldscope-rs operations.
pub type Result<T> = std::result::Result<T, FieldscopeError>;
