//! Reusable scratch buffers for codec operations.

/// Scratch buffers for delta encoding and decoding.
#[derive(Debug, Default)]
pub struct CodecScratch {
    changed: Vec<bool>,
    indices: Vec<usize>,
}

impl CodecScratch {
    /// Creates a new scratch buffer with no pre-allocated capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the buffers for `entities` objects.
    #[must_use]
    pub fn with_capacity(entities: usize) -> Self {
        Self {
            changed: Vec::with_capacity(entities),
            indices: Vec::with_capacity(entities),
        }
    }
}

impl CodecScratch {
    /// Cleared change mask of length `entities` and an empty index list.
    pub(crate) fn mask_and_indices_mut(
        &mut self,
        entities: usize,
    ) -> (&mut [bool], &mut Vec<usize>) {
        self.changed.clear();
        self.changed.resize(entities, false);
        self.indices.clear();
        (&mut self.changed, &mut self.indices)
    }
}
