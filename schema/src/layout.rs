//! Stream layout: everything both ends must agree on.

use crate::error::SchemaResult;
use crate::hash::layout_hash;
use crate::precision::CubeFormat;
use crate::registry::EntityRegistry;

/// Cube format plus entity table for one snapshot stream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamLayout {
    pub format: CubeFormat,
    pub registry: EntityRegistry,
}

impl StreamLayout {
    /// Validates the format and pairs it with `registry`.
    pub fn new(format: CubeFormat, registry: EntityRegistry) -> SchemaResult<Self> {
        format.validate()?;
        Ok(Self { format, registry })
    }

    /// Number of cubes per snapshot.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Hash carried in packet headers to reject mismatched streams.
    #[must_use]
    pub fn hash(&self) -> u64 {
        layout_hash(self)
    }
}

impl Default for StreamLayout {
    fn default() -> Self {
        Self {
            format: CubeFormat::standard(),
            registry: EntityRegistry::default(),
        }
    }
}
