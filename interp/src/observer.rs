//! Push-style hooks for playout events.

use codec::Sequence;

/// The window found no snapshot within the playout frames ahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallEvent {
    /// Last snapshot the window reached.
    pub start_sequence: Sequence,
    /// Sequences scanned past `start_sequence`.
    pub window_frames: u16,
    /// Playout time of the sample, relative to the first snapshot.
    pub playout_time: f64,
}

/// The window fell too far behind and was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncEvent {
    pub stale_start: Sequence,
    /// Sequence the engine seeks next.
    pub target: Sequence,
}

/// Receives stall and resync events from a [`SnapshotInterpolationBuffer`].
///
/// [`SnapshotInterpolationBuffer`]: crate::SnapshotInterpolationBuffer
pub trait PlayoutObserver {
    fn on_stall(&mut self, event: StallEvent);
    fn on_resync(&mut self, event: ResyncEvent);
}
