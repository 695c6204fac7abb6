//! Quantized cube records.
//!
//! Field order on the wire is interacting, position, orientation, then the
//! optional velocity block. Positions and velocities are ranged integers
//! sized by the format's motion bounds.

use bitstream::{bits_required, BitReader, BitWriter};
use schema::CubeFormat;

use crate::error::CodecResult;
use crate::fixed::{dequantize_vec3, quantize_vec3};
use crate::quaternion::CompressedQuaternion;
use crate::types::CubeState;

/// Quantized linear and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedVelocity {
    pub linear: [i32; 3],
    pub angular: [i32; 3],
}

impl QuantizedVelocity {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.linear == [0; 3] && self.angular == [0; 3]
    }
}

/// One cube quantized under a [`CubeFormat`].
///
/// `velocity` is present exactly when the format carries velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedCubeState {
    pub interacting: bool,
    pub position: [i32; 3],
    pub orientation: CompressedQuaternion,
    pub velocity: Option<QuantizedVelocity>,
}

impl QuantizedCubeState {
    /// Quantizes `state`, clamping every field into the format's bounds.
    #[must_use]
    pub fn quantize(state: &CubeState, format: &CubeFormat) -> Self {
        let profile = format.profile();
        let bounds = format.quantized_bounds();
        let position = quantize_vec3(
            state.position,
            profile.position_units(),
            [bounds.position_xy, bounds.position_xy, bounds.position_z],
        );
        let orientation =
            CompressedQuaternion::compress(state.orientation, profile.orientation_bits());
        let velocity = format.with_velocity().then(|| QuantizedVelocity {
            linear: quantize_vec3(
                state.linear_velocity,
                profile.velocity_units(),
                [bounds.linear_speed; 3],
            ),
            angular: quantize_vec3(
                state.angular_velocity,
                profile.velocity_units(),
                [bounds.angular_speed; 3],
            ),
        });
        Self {
            interacting: state.interacting,
            position,
            orientation,
            velocity,
        }
    }

    /// Converts back to floating point. Velocity is zero when not carried.
    #[must_use]
    pub fn dequantize(&self, format: &CubeFormat) -> CubeState {
        let profile = format.profile();
        let velocity = self.velocity.unwrap_or_default();
        CubeState {
            interacting: self.interacting,
            position: dequantize_vec3(self.position, profile.position_units()),
            orientation: self.orientation.decompress(profile.orientation_bits()),
            linear_velocity: dequantize_vec3(velocity.linear, profile.velocity_units()),
            angular_velocity: dequantize_vec3(velocity.angular, profile.velocity_units()),
        }
    }

    /// `true` when every quantized velocity component is exactly zero.
    ///
    /// Records without velocity are always at rest.
    #[must_use]
    pub fn at_rest(&self) -> bool {
        self.velocity.map_or(true, |velocity| velocity.is_zero())
    }

    /// Encoded size of one record under `format`.
    #[must_use]
    pub fn bit_cost(format: &CubeFormat) -> usize {
        let bounds = format.quantized_bounds();
        let symmetric = |bound: i32| usize::from(bits_required(-i64::from(bound), i64::from(bound)));
        let mut bits = 1
            + 2 * symmetric(bounds.position_xy)
            + symmetric(bounds.position_z)
            + format.profile().orientation_bits().record_bits();
        if format.with_velocity() {
            bits += 3 * symmetric(bounds.linear_speed) + 3 * symmetric(bounds.angular_speed);
        }
        bits
    }

    pub fn write(&self, writer: &mut BitWriter, format: &CubeFormat) -> CodecResult<()> {
        debug_assert_eq!(self.velocity.is_some(), format.with_velocity());
        let bounds = format.quantized_bounds();

        writer.write_bool(self.interacting);
        write_vec3(
            writer,
            self.position,
            [bounds.position_xy, bounds.position_xy, bounds.position_z],
        )?;
        self.orientation
            .write(writer, format.profile().orientation_bits())?;
        if format.with_velocity() {
            let velocity = self.velocity.unwrap_or_default();
            write_vec3(writer, velocity.linear, [bounds.linear_speed; 3])?;
            write_vec3(writer, velocity.angular, [bounds.angular_speed; 3])?;
        }
        Ok(())
    }

    pub fn read(reader: &mut BitReader<'_>, format: &CubeFormat) -> CodecResult<Self> {
        let bounds = format.quantized_bounds();

        let interacting = reader.read_bool()?;
        let position = read_vec3(
            reader,
            [bounds.position_xy, bounds.position_xy, bounds.position_z],
        )?;
        let orientation =
            CompressedQuaternion::read(reader, format.profile().orientation_bits())?;
        let velocity = if format.with_velocity() {
            Some(QuantizedVelocity {
                linear: read_vec3(reader, [bounds.linear_speed; 3])?,
                angular: read_vec3(reader, [bounds.angular_speed; 3])?,
            })
        } else {
            None
        };
        Ok(Self {
            interacting,
            position,
            orientation,
            velocity,
        })
    }
}

fn write_vec3(writer: &mut BitWriter, value: [i32; 3], bounds: [i32; 3]) -> CodecResult<()> {
    for (component, bound) in value.into_iter().zip(bounds) {
        let bound = i64::from(bound);
        writer.write_int_in_range(i64::from(component), -bound, bound)?;
    }
    Ok(())
}

fn read_vec3(reader: &mut BitReader<'_>, bounds: [i32; 3]) -> CodecResult<[i32; 3]> {
    let mut out = [0i32; 3];
    for (slot, bound) in out.iter_mut().zip(bounds) {
        let bound = i64::from(bound);
        // Range check bounds the value to an i32.
        *slot = reader.read_int_in_range(-bound, bound)? as i32;
    }
    Ok(out)
}
