//! Validation errors for profiles, formats and registries.

use thiserror::Error;

use crate::precision::BoundKind;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a stream layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Quaternion component width outside `2..=31`.
    #[error("invalid orientation bit width {bits}, expected 2..=31")]
    InvalidOrientationBits { bits: u8 },

    /// Fixed-point scale must be positive.
    #[error("invalid units per meter {units}, must be positive")]
    InvalidUnits { units: i32 },

    /// Motion bound must be finite and positive.
    #[error("invalid {kind} bound {value}")]
    InvalidBound { kind: BoundKind, value: f32 },

    /// Motion bound does not fit the quantized integer range at this scale.
    #[error("{kind} bound {value} at {units} units overflows the quantized range")]
    BoundOverflow {
        kind: BoundKind,
        value: f32,
        units: i32,
    },

    /// Registry must contain at least one entity.
    #[error("entity registry is empty")]
    EmptyRegistry,

    /// Registry exceeds what the change-set index field can address.
    #[error("entity registry holds {count} entities, maximum is {max}")]
    TooManyEntities { count: usize, max: usize },

    /// Visual scales must be finite and positive.
    #[error("invalid visual scale {scale}")]
    InvalidScale { scale: f32 },
}
