//! Playout configuration.

/// Tolerance applied before flooring the playout window length.
const FRAME_EPSILON: f64 = 1e-6;

/// How positions are blended between two bracketing snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationKind {
    /// Linear position, spherical-linear orientation.
    #[default]
    Linear,
    /// Cubic Hermite position with velocity tangents.
    Hermite,
    /// Hermite over positions pushed forward by `velocity * extrapolation`.
    HermiteWithExtrapolation,
}

/// Parameters for sampling a [`SnapshotInterpolationBuffer`].
///
/// [`SnapshotInterpolationBuffer`]: crate::SnapshotInterpolationBuffer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayoutConfig {
    /// Display lag in seconds.
    pub playout_delay: f64,
    /// Snapshots per second sent by the authority.
    pub send_rate: f64,
    pub interpolation: InterpolationKind,
    /// Seconds of velocity applied by [`InterpolationKind::HermiteWithExtrapolation`].
    pub extrapolation: f64,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            playout_delay: 0.3,
            send_rate: 60.0,
            interpolation: InterpolationKind::Linear,
            extrapolation: 0.2,
        }
    }
}

impl PlayoutConfig {
    #[must_use]
    pub const fn with_interpolation(mut self, interpolation: InterpolationKind) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Whether the timing fields can drive playout: a finite positive send
    /// rate, and a finite non-negative delay and extrapolation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.send_rate.is_finite()
            && self.send_rate > 0.0
            && self.playout_delay.is_finite()
            && self.playout_delay >= 0.0
            && self.extrapolation.is_finite()
            && self.extrapolation >= 0.0
    }

    /// Seconds between consecutive sequences.
    #[must_use]
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.send_rate
    }

    /// Number of sequences covered by the playout delay.
    ///
    /// Bounds both how far ahead the window looks for its next snapshot
    /// and how stale the window may become before it is reacquired.
    #[must_use]
    pub fn playout_frames(&self) -> u16 {
        let frames = (self.playout_delay * self.send_rate + FRAME_EPSILON).floor();
        frames.clamp(0.0, f64::from(i16::MAX)) as u16
    }
}
