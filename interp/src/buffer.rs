//! Fixed-capacity sequence-indexed ring buffer.

use codec::Sequence;

/// Slot count of the snapshot buffer. Divides 65536, so slot mapping stays
/// consistent across sequence wraparound.
pub const DEFAULT_CAPACITY: usize = 64;

/// Ring buffer mapping `sequence mod capacity` to a slot.
///
/// Each slot remembers which sequence it holds, so a lookup for a sequence
/// whose slot has since been reused reports "not present" instead of
/// returning the wrong entry.
#[derive(Debug, Clone)]
pub struct SequenceBuffer<T> {
    slots: Vec<Option<(Sequence, T)>>,
}

impl<T> SequenceBuffer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a buffer with `capacity` slots.
    ///
    /// `capacity` should divide 65536; other values break slot mapping at
    /// the wrap point.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "capacity must be non-zero");
        debug_assert!(65_536 % capacity == 0, "capacity must divide 65536");
        Self {
            slots: (0..capacity.max(1)).map(|_| None).collect(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` under `sequence`, overwriting the slot's occupant.
    ///
    /// There is no ordering check: an older sequence replaces a newer one
    /// that shares its slot. Returns the evicted sequence when it differs
    /// from `sequence`.
    pub fn insert(&mut self, sequence: Sequence, value: T) -> Option<Sequence> {
        let slot = self.slot(sequence);
        let evicted = self.slots[slot]
            .replace((sequence, value))
            .map(|(previous, _)| previous);
        evicted.filter(|&previous| previous != sequence)
    }

    /// Returns the entry for `sequence` if its slot still holds it.
    #[must_use]
    pub fn find(&self, sequence: Sequence) -> Option<&T> {
        match &self.slots[self.slot(sequence)] {
            Some((stored, value)) if *stored == sequence => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, sequence: Sequence) -> bool {
        self.find(sequence).is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Empties every slot.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    fn slot(&self, sequence: Sequence) -> usize {
        usize::from(sequence.raw()) % self.slots.len()
    }
}

impl<T> Default for SequenceBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_find() {
        let mut buffer = SequenceBuffer::new();
        assert_eq!(buffer.insert(Sequence::new(5), "five"), None);
        assert_eq!(buffer.find(Sequence::new(5)), Some(&"five"));
        assert!(!buffer.contains(Sequence::new(6)));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn collision_evicts_older_occupant() {
        let mut buffer = SequenceBuffer::new();
        buffer.insert(Sequence::new(3), 'a');
        let evicted = buffer.insert(Sequence::new(3 + 64), 'b');
        assert_eq!(evicted, Some(Sequence::new(3)));
        assert_eq!(buffer.find(Sequence::new(3)), None);
        assert_eq!(buffer.find(Sequence::new(67)), Some(&'b'));
    }

    #[test]
    fn stale_insert_overwrites_newer() {
        let mut buffer = SequenceBuffer::new();
        buffer.insert(Sequence::new(130), 1);
        buffer.insert(Sequence::new(2), 2);
        assert!(!buffer.contains(Sequence::new(130)));
        assert!(buffer.contains(Sequence::new(2)));
    }

    #[test]
    fn reinsert_same_sequence_is_not_an_eviction() {
        let mut buffer = SequenceBuffer::new();
        buffer.insert(Sequence::new(9), 1);
        assert_eq!(buffer.insert(Sequence::new(9), 2), None);
        assert_eq!(buffer.find(Sequence::new(9)), Some(&2));
    }

    #[test]
    fn slots_survive_wraparound() {
        let mut buffer = SequenceBuffer::new();
        buffer.insert(Sequence::new(65_535), 'x');
        buffer.insert(Sequence::new(65_535).next(), 'y');
        assert_eq!(buffer.find(Sequence::new(65_535)), Some(&'x'));
        assert_eq!(buffer.find(Sequence::new(0)), Some(&'y'));
    }

    #[test]
    fn reset_clears_everything() {
        let mut buffer = SequenceBuffer::new();
        for raw in 0..64u16 {
            buffer.insert(Sequence::new(raw), raw);
        }
        buffer.reset();
        assert!(buffer.is_empty());
        for raw in 0..64u16 {
            assert!(buffer.find(Sequence::new(raw)).is_none());
        }
    }
}
