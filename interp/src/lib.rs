//! Jitter buffering and interpolation of cube snapshots.
//!
//! [`SnapshotInterpolationBuffer`] stores decoded snapshots in a 64-slot
//! [`SequenceBuffer`] and, when sampled with a wall-clock time, plays them
//! back a fixed playout delay behind the first arrival, blending the two
//! snapshots that bracket the playout time.
//!
//! Missing data is never guessed at: a sample with no snapshot inside the
//! playout window ahead produces no updates.

mod buffer;
mod engine;
mod mode;
mod observer;
mod spline;
mod stats;
mod update;

pub use buffer::{SequenceBuffer, DEFAULT_CAPACITY};
pub use engine::{InterpolationWindow, PlaybackState, SnapshotInterpolationBuffer};
pub use mode::{InterpolationKind, PlayoutConfig};
pub use observer::{PlayoutObserver, ResyncEvent, StallEvent};
pub use spline::hermite_spline;
pub use stats::InterpolationStats;
pub use update::{ObjectUpdate, AUTHORITY_REMOTE};
