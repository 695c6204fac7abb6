//! Core types for the codec.

use glam::{Quat, Vec3, Vec4};

/// Squared distance below which two states are considered equal.
const STATE_EPSILON_SQUARED: f32 = 0.000_001;

/// A 16-bit wrapping snapshot sequence number.
///
/// Ordering and distance are evaluated modulo 65536, never by raw subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence(u16);

impl Sequence {
    #[must_use]
    pub const fn new(sequence: u16) -> Self {
        Self(sequence)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub const fn wrapping_add(self, n: u16) -> Self {
        Self(self.0.wrapping_add(n))
    }

    /// Signed distance from `earlier` to `self`, in `[-32768, 32767]`.
    #[must_use]
    pub const fn distance(self, earlier: Self) -> i16 {
        self.0.wrapping_sub(earlier.0) as i16
    }

    #[must_use]
    pub const fn is_newer_than(self, other: Self) -> bool {
        self.distance(other) > 0
    }
}

impl From<u16> for Sequence {
    fn from(sequence: u16) -> Self {
        Self(sequence)
    }
}

impl From<Sequence> for u16 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

/// Simulation state of one cube.
///
/// Equality is tolerance based: positions and orientations within a squared
/// distance of `1e-6` compare equal, velocities are ignored.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeState {
    pub interacting: bool,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl CubeState {
    /// A cube at `position` with identity orientation and no motion.
    #[must_use]
    pub const fn at_rest(position: Vec3) -> Self {
        Self {
            interacting: false,
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

impl PartialEq for CubeState {
    fn eq(&self, other: &Self) -> bool {
        if self.interacting != other.interacting {
            return false;
        }
        if self.position.distance_squared(other.position) > STATE_EPSILON_SQUARED {
            return false;
        }
        let delta = Vec4::from(self.orientation) - Vec4::from(other.orientation);
        delta.length_squared() <= STATE_EPSILON_SQUARED
    }
}

/// One cube per entity, in dense index order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub cubes: Vec<CubeState>,
}

impl Snapshot {
    #[must_use]
    pub fn new(cubes: Vec<CubeState>) -> Self {
        Self { cubes }
    }

    /// A snapshot of `count` identical cubes.
    #[must_use]
    pub fn filled(count: usize, state: CubeState) -> Self {
        Self {
            cubes: vec![state; count],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}
