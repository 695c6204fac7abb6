//! Playout counters.

/// Running counters kept by a [`SnapshotInterpolationBuffer`].
///
/// Counters survive [`reset`](crate::SnapshotInterpolationBuffer::reset);
/// use [`take`](Self::take) to read and clear them.
///
/// [`SnapshotInterpolationBuffer`]: crate::SnapshotInterpolationBuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationStats {
    /// Calls to `get_view_update` after the first snapshot arrived.
    pub samples: u64,
    /// Object updates written across all samples.
    pub updates: u64,
    /// Samples taken before the playout delay elapsed.
    pub too_early: u64,
    /// Samples whose seek target was not buffered.
    pub seek_misses: u64,
    /// Successful moves of the window to a later snapshot.
    pub window_advances: u64,
    /// Samples with no snapshot inside the playout window ahead.
    pub stalls: u64,
    /// Samples that advanced the window but still fell past its end.
    pub catch_up: u64,
    /// Windows dropped for being too far behind the playout time.
    pub resyncs: u64,
    /// Samples whose bracket was overwritten by a colliding insert.
    pub missing_brackets: u64,
    /// Inserts that replaced a different sequence in the same slot.
    pub evictions: u64,
}

impl InterpolationStats {
    /// Returns the current counters and zeroes them.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
