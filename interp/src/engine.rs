//! Snapshot interpolation state machine.
//!
//! Snapshots arrive tagged with a sequence number and are stored in a
//! [`SequenceBuffer`]. Sampling maps the playout time (wall time minus the
//! arrival time of the first snapshot and the playout delay) onto sequence
//! space and blends the two buffered snapshots that bracket it.

use codec::{Sequence, Snapshot};
use log::{debug, trace};
use schema::{EntityRegistry, ObjectId};

use crate::buffer::SequenceBuffer;
use crate::mode::{InterpolationKind, PlayoutConfig};
use crate::observer::{PlayoutObserver, ResyncEvent, StallEvent};
use crate::spline;
use crate::stats::InterpolationStats;
use crate::update::{ObjectUpdate, AUTHORITY_REMOTE};

/// Slack allowed past the window end before a sample counts as outside it.
const WINDOW_END_EPSILON: f64 = 1e-4;

/// Coarse playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// No snapshot received since creation or the last reset.
    Stopped,
    /// Waiting for a buffered snapshot to anchor the window.
    Seeking,
    /// A window is anchored. Samples may still yield nothing on a stall.
    Interpolating,
}

/// The bracket currently being played, times relative to the first snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationWindow {
    pub start_sequence: Sequence,
    pub end_sequence: Sequence,
    pub start_time: f64,
    pub end_time: f64,
    /// Seconds between the bracket snapshots, used to scale Hermite tangents.
    pub step_size: f64,
}

impl InterpolationWindow {
    const EMPTY: Self = Self {
        start_sequence: Sequence::new(0),
        end_sequence: Sequence::new(0),
        start_time: 0.0,
        end_time: 0.0,
        step_size: 0.0,
    };

    const fn anchored(sequence: Sequence, time: f64) -> Self {
        Self {
            start_sequence: sequence,
            end_sequence: sequence,
            start_time: time,
            end_time: time,
            step_size: 0.0,
        }
    }
}

/// Jitter buffer plus interpolation engine for one remote stream.
///
/// Time is supplied by the caller and must not decrease between calls.
pub struct SnapshotInterpolationBuffer {
    registry: EntityRegistry,
    snapshots: SequenceBuffer<Snapshot>,
    stopped: bool,
    interpolating: bool,
    start_time: f64,
    window: InterpolationWindow,
    stats: InterpolationStats,
    observer: Option<Box<dyn PlayoutObserver>>,
}

impl SnapshotInterpolationBuffer {
    #[must_use]
    pub fn new(registry: EntityRegistry) -> Self {
        Self {
            registry,
            snapshots: SequenceBuffer::new(),
            stopped: true,
            interpolating: false,
            start_time: 0.0,
            window: InterpolationWindow::EMPTY,
            stats: InterpolationStats::default(),
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn PlayoutObserver>) {
        self.observer = Some(observer);
    }

    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn snapshots(&self) -> &SequenceBuffer<Snapshot> {
        &self.snapshots
    }

    #[must_use]
    pub const fn stats(&self) -> &InterpolationStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut InterpolationStats {
        &mut self.stats
    }

    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        if self.stopped {
            PlaybackState::Stopped
        } else if self.interpolating {
            PlaybackState::Interpolating
        } else {
            PlaybackState::Seeking
        }
    }

    /// Arrival time of the first snapshot, once one has arrived.
    #[must_use]
    pub fn start_time(&self) -> Option<f64> {
        (!self.stopped).then_some(self.start_time)
    }

    /// The anchored window while interpolating.
    #[must_use]
    pub fn window(&self) -> Option<InterpolationWindow> {
        self.interpolating.then_some(self.window)
    }

    /// Buffers a fully decoded snapshot that arrived at `time`.
    ///
    /// The first snapshot after creation or [`reset`](Self::reset) fixes the
    /// playout clock origin.
    pub fn add_snapshot(&mut self, time: f64, sequence: Sequence, snapshot: Snapshot) {
        debug_assert_eq!(
            snapshot.len(),
            self.registry.len(),
            "snapshot length must match the entity registry"
        );

        if self.stopped {
            debug!(
                "playout clock started at {time:.4} by sequence {}",
                sequence.raw()
            );
            self.start_time = time;
            self.stopped = false;
        }

        if let Some(evicted) = self.snapshots.insert(sequence, snapshot) {
            self.stats.evictions += 1;
            trace!(
                "sequence {} evicted {} from its slot",
                sequence.raw(),
                evicted.raw()
            );
        }
    }

    /// Samples the buffer at wall time `time`, writing one update per object
    /// into `out`. `config` must pass [`PlayoutConfig::is_valid`].
    ///
    /// Returns the number of updates written: zero when stopped, too early,
    /// seeking without an anchor, or stalled; otherwise the entity count
    /// (bounded by `out.len()`).
    pub fn get_view_update(
        &mut self,
        config: &PlayoutConfig,
        time: f64,
        out: &mut [ObjectUpdate],
    ) -> usize {
        debug_assert!(config.is_valid(), "invalid playout config {config:?}");
        debug_assert!(out.len() >= self.registry.len());

        if self.stopped {
            return 0;
        }
        self.stats.samples += 1;

        let mut time = time - (self.start_time + config.playout_delay);
        if time <= 0.0 {
            self.stats.too_early += 1;
            return 0;
        }

        let frame_duration = config.frame_duration();
        let window_frames = config.playout_frames();
        let frames_since_start = time * config.send_rate;
        let target = Sequence::new(frames_since_start.floor() as u64 as u16);

        if self.interpolating
            && i32::from(target.distance(self.window.start_sequence)) > i32::from(window_frames)
        {
            self.interpolating = false;
            self.stats.resyncs += 1;
            let event = ResyncEvent {
                stale_start: self.window.start_sequence,
                target,
            };
            debug!(
                "window at sequence {} is stale, seeking {}",
                event.stale_start.raw(),
                event.target.raw()
            );
            if let Some(observer) = self.observer.as_mut() {
                observer.on_resync(event);
            }
        }

        if !self.interpolating {
            if !self.snapshots.contains(target) {
                self.stats.seek_misses += 1;
                return 0;
            }
            self.window =
                InterpolationWindow::anchored(target, frames_since_start * frame_duration);
            self.interpolating = true;
            trace!("window anchored at sequence {}", target.raw());
        }

        time = time.max(self.window.start_time);

        if time >= self.window.end_time && !self.advance_window(window_frames, frame_duration) {
            self.stats.stalls += 1;
            let event = StallEvent {
                start_sequence: self.window.start_sequence,
                window_frames,
                playout_time: time,
            };
            debug!(
                "playout stalled at sequence {}: nothing buffered in the next {} frames",
                event.start_sequence.raw(),
                window_frames
            );
            if let Some(observer) = self.observer.as_mut() {
                observer.on_stall(event);
            }
            return 0;
        }

        if time >= self.window.end_time + WINDOW_END_EPSILON {
            self.stats.catch_up += 1;
            return 0;
        }

        let window = self.window;
        let t = ((time - window.start_time) / (window.end_time - window.start_time)).clamp(0.0, 1.0)
            as f32;

        let (Some(from), Some(to)) = (
            self.snapshots.find(window.start_sequence),
            self.snapshots.find(window.end_sequence),
        ) else {
            self.stats.missing_brackets += 1;
            debug!(
                "bracket {}..{} was overwritten before sampling",
                window.start_sequence.raw(),
                window.end_sequence.raw()
            );
            return 0;
        };

        let step_size = window.step_size as f32;
        let extrapolation = config.extrapolation as f32;
        let scales = self.registry.scales();
        let authority_sentinel = self.registry.authority_sentinel();

        let mut written = 0;
        for (index, (((slot, a), b), role)) in out
            .iter_mut()
            .zip(&from.cubes)
            .zip(&to.cubes)
            .zip(self.registry.roles())
            .enumerate()
        {
            let Some(id) = ObjectId::from_index(index) else {
                break;
            };
            let (position, orientation) = match config.interpolation {
                InterpolationKind::Linear => spline::linear(t, a, b),
                InterpolationKind::Hermite => spline::hermite(t, step_size, 0.0, a, b),
                InterpolationKind::HermiteWithExtrapolation => {
                    spline::hermite(t, step_size, extrapolation, a, b)
                }
            };
            *slot = ObjectUpdate {
                id,
                position,
                orientation,
                scale: scales.for_role(*role),
                authority: if a.interacting {
                    AUTHORITY_REMOTE
                } else {
                    authority_sentinel
                },
                visible: true,
            };
            written += 1;
        }

        self.stats.updates += written as u64;
        written
    }

    /// Returns to the stopped state and empties the buffer.
    ///
    /// Counters in [`stats`](Self::stats) are kept.
    pub fn reset(&mut self) {
        self.snapshots.reset();
        self.stopped = true;
        self.interpolating = false;
        self.start_time = 0.0;
        self.window = InterpolationWindow::EMPTY;
    }

    /// Moves the window start to its end and scans up to `window_frames`
    /// sequences ahead for the next buffered snapshot.
    fn advance_window(&mut self, window_frames: u16, frame_duration: f64) -> bool {
        self.window.start_sequence = self.window.end_sequence;
        self.window.start_time = self.window.end_time;

        for skipped in 1..=window_frames {
            let candidate = self.window.start_sequence.wrapping_add(skipped);
            if self.snapshots.contains(candidate) {
                let step_size = frame_duration * f64::from(skipped);
                self.window.end_sequence = candidate;
                self.window.end_time = self.window.start_time + step_size;
                self.window.step_size = step_size;
                self.stats.window_advances += 1;
                trace!(
                    "window {}..{} ({skipped} frames)",
                    self.window.start_sequence.raw(),
                    candidate.raw()
                );
                return true;
            }
        }
        false
    }
}
