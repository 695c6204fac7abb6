//! Precision profiles, motion bounds and cube formats.

use std::fmt;

use crate::error::{SchemaError, SchemaResult};

/// Largest quantized magnitude any bound may reach.
///
/// Keeps `2 * bound + 1` representable in an `i32` with headroom.
const MAX_QUANTIZED_BOUND: f64 = (1u32 << 30) as f64;

/// Bit width of each of the three smallest quaternion components.
///
/// Valid widths are `2..=31`; the record occupies `2 + 3 * bits` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct OrientationBits(u8);

impl OrientationBits {
    /// Width used by the standard profile.
    pub const STANDARD: Self = Self(9);

    /// Width used by the high precision profile.
    pub const HIGH: Self = Self(15);

    /// Validates a component width.
    pub const fn new(bits: u8) -> SchemaResult<Self> {
        if bits < 2 || bits > 31 {
            return Err(SchemaError::InvalidOrientationBits { bits });
        }
        Ok(Self(bits))
    }

    /// Returns the raw width.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Largest integer a component can take, `2^bits - 1`.
    #[must_use]
    pub const fn max_value(self) -> u32 {
        (1u32 << self.0) - 1
    }

    /// Total encoded size of one quaternion record.
    #[must_use]
    pub const fn record_bits(self) -> usize {
        2 + 3 * self.0 as usize
    }
}

impl TryFrom<u8> for OrientationBits {
    type Error = SchemaError;

    fn try_from(bits: u8) -> SchemaResult<Self> {
        Self::new(bits)
    }
}

impl From<OrientationBits> for u8 {
    fn from(bits: OrientationBits) -> Self {
        bits.0
    }
}

/// Scales and quaternion width for one precision level.
///
/// Two profiles ship with the codec; a stream uses exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "PrecisionProfileFields", into = "PrecisionProfileFields")
)]
pub struct PrecisionProfile {
    position_units: i32,
    velocity_units: i32,
    orientation_bits: OrientationBits,
}

impl PrecisionProfile {
    /// 512 units per meter for position and velocity, 9-bit quaternion components.
    pub const STANDARD: Self = Self {
        position_units: 512,
        velocity_units: 512,
        orientation_bits: OrientationBits::STANDARD,
    };

    /// 4096 units per meter for position and velocity, 15-bit quaternion components.
    pub const HIGH: Self = Self {
        position_units: 4096,
        velocity_units: 4096,
        orientation_bits: OrientationBits::HIGH,
    };

    /// Builds a profile with custom scales, e.g. for adaptive streams.
    pub const fn custom(
        position_units: i32,
        velocity_units: i32,
        orientation_bits: u8,
    ) -> SchemaResult<Self> {
        if position_units <= 0 {
            return Err(SchemaError::InvalidUnits {
                units: position_units,
            });
        }
        if velocity_units <= 0 {
            return Err(SchemaError::InvalidUnits {
                units: velocity_units,
            });
        }
        let orientation_bits = match OrientationBits::new(orientation_bits) {
            Ok(bits) => bits,
            Err(err) => return Err(err),
        };
        Ok(Self {
            position_units,
            velocity_units,
            orientation_bits,
        })
    }

    /// Fixed-point units per meter for positions.
    #[must_use]
    pub const fn position_units(&self) -> i32 {
        self.position_units
    }

    /// Fixed-point units per meter (per second) for velocities.
    #[must_use]
    pub const fn velocity_units(&self) -> i32 {
        self.velocity_units
    }

    /// Quaternion component width.
    #[must_use]
    pub const fn orientation_bits(&self) -> OrientationBits {
        self.orientation_bits
    }

    fn validate(&self) -> SchemaResult<()> {
        Self::custom(
            self.position_units,
            self.velocity_units,
            self.orientation_bits.get(),
        )
        .map(|_| ())
    }
}

impl Default for PrecisionProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Identifies one of the motion bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    PositionXy,
    PositionZ,
    LinearSpeed,
    AngularSpeed,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PositionXy => "position xy",
            Self::PositionZ => "position z",
            Self::LinearSpeed => "linear speed",
            Self::AngularSpeed => "angular speed",
        };
        write!(f, "{name}")
    }
}

/// Symmetric world-space limits used to size quantized integer fields.
///
/// Positions are in meters, speeds in meters (radians) per second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionBounds {
    pub position_xy: f32,
    pub position_z: f32,
    pub linear_speed: f32,
    pub angular_speed: f32,
}

impl Default for MotionBounds {
    fn default() -> Self {
        Self {
            position_xy: 256.0,
            position_z: 32.0,
            linear_speed: 32.0,
            angular_speed: 10.0,
        }
    }
}

impl MotionBounds {
    fn entries(&self) -> [(BoundKind, f32); 4] {
        [
            (BoundKind::PositionXy, self.position_xy),
            (BoundKind::PositionZ, self.position_z),
            (BoundKind::LinearSpeed, self.linear_speed),
            (BoundKind::AngularSpeed, self.angular_speed),
        ]
    }
}

/// Quantized (integer) form of [`MotionBounds`] for a given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizedBounds {
    pub position_xy: i32,
    pub position_z: i32,
    pub linear_speed: i32,
    pub angular_speed: i32,
}

/// Complete description of how one cube record is encoded.
///
/// Position and orientation are always present; velocity is carried only
/// when `with_velocity` is set (required for Hermite playback).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "CubeFormatFields", into = "CubeFormatFields")
)]
pub struct CubeFormat {
    profile: PrecisionProfile,
    bounds: MotionBounds,
    with_velocity: bool,
}

impl CubeFormat {
    /// Creates and validates a format.
    pub fn new(
        profile: PrecisionProfile,
        bounds: MotionBounds,
        with_velocity: bool,
    ) -> SchemaResult<Self> {
        let format = Self {
            profile,
            bounds,
            with_velocity,
        };
        format.validate()?;
        Ok(format)
    }

    /// Standard profile, position + orientation only.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            profile: PrecisionProfile::STANDARD,
            bounds: MotionBounds::default(),
            with_velocity: false,
        }
    }

    /// Standard profile carrying linear and angular velocity.
    #[must_use]
    pub fn standard_with_velocity() -> Self {
        Self {
            with_velocity: true,
            ..Self::standard()
        }
    }

    /// High precision profile; always carries velocity.
    #[must_use]
    pub fn high_precision() -> Self {
        Self {
            profile: PrecisionProfile::HIGH,
            bounds: MotionBounds::default(),
            with_velocity: true,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &PrecisionProfile {
        &self.profile
    }

    #[must_use]
    pub const fn bounds(&self) -> &MotionBounds {
        &self.bounds
    }

    #[must_use]
    pub const fn with_velocity(&self) -> bool {
        self.with_velocity
    }

    /// Integer limits for each quantized field.
    #[must_use]
    pub fn quantized_bounds(&self) -> QuantizedBounds {
        let pos = self.profile.position_units;
        let vel = self.profile.velocity_units;
        QuantizedBounds {
            position_xy: quantize_bound(self.bounds.position_xy, pos),
            position_z: quantize_bound(self.bounds.position_z, pos),
            linear_speed: quantize_bound(self.bounds.linear_speed, vel),
            angular_speed: quantize_bound(self.bounds.angular_speed, vel),
        }
    }

    /// Validates profile and bounds.
    pub fn validate(&self) -> SchemaResult<()> {
        self.profile.validate()?;
        for (kind, value) in self.bounds.entries() {
            if !value.is_finite() || value <= 0.0 {
                return Err(SchemaError::InvalidBound { kind, value });
            }
            let units = match kind {
                BoundKind::PositionXy | BoundKind::PositionZ => self.profile.position_units,
                BoundKind::LinearSpeed | BoundKind::AngularSpeed => self.profile.velocity_units,
            };
            if (f64::from(value) * f64::from(units)).ceil() > MAX_QUANTIZED_BOUND {
                return Err(SchemaError::BoundOverflow { kind, value, units });
            }
        }
        Ok(())
    }
}

impl Default for CubeFormat {
    fn default() -> Self {
        Self::standard()
    }
}

/// Serialized form of [`PrecisionProfile`]; deserializing goes through
/// [`PrecisionProfile::custom`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PrecisionProfileFields {
    position_units: i32,
    velocity_units: i32,
    orientation_bits: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<PrecisionProfileFields> for PrecisionProfile {
    type Error = SchemaError;

    fn try_from(fields: PrecisionProfileFields) -> SchemaResult<Self> {
        Self::custom(
            fields.position_units,
            fields.velocity_units,
            fields.orientation_bits,
        )
    }
}

#[cfg(feature = "serde")]
impl From<PrecisionProfile> for PrecisionProfileFields {
    fn from(profile: PrecisionProfile) -> Self {
        Self {
            position_units: profile.position_units,
            velocity_units: profile.velocity_units,
            orientation_bits: profile.orientation_bits.get(),
        }
    }
}

/// Serialized form of [`CubeFormat`]; deserializing goes through
/// [`CubeFormat::new`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CubeFormatFields {
    profile: PrecisionProfile,
    bounds: MotionBounds,
    with_velocity: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<CubeFormatFields> for CubeFormat {
    type Error = SchemaError;

    fn try_from(fields: CubeFormatFields) -> SchemaResult<Self> {
        Self::new(fields.profile, fields.bounds, fields.with_velocity)
    }
}

#[cfg(feature = "serde")]
impl From<CubeFormat> for CubeFormatFields {
    fn from(format: CubeFormat) -> Self {
        Self {
            profile: format.profile,
            bounds: format.bounds,
            with_velocity: format.with_velocity,
        }
    }
}

fn quantize_bound(bound: f32, units: i32) -> i32 {
    (f64::from(bound) * f64::from(units)).ceil() as i32
}
