//! Vectors packed as three compressed floats.
//!
//! Unlike the fixed-point cube fields, these take an arbitrary float range
//! and resolution, for values whose bounds are not powers of the unit scale.

use bitstream::{compressed_float_bits, BitReader, BitWriter};
use glam::Vec3;

use crate::error::CodecResult;

/// Writes each axis of `value` within `[-maximum, maximum]` at `resolution`.
pub fn write_compressed_vec3(
    writer: &mut BitWriter,
    value: Vec3,
    maximum: f32,
    resolution: f32,
) -> CodecResult<()> {
    write_compressed_vec3_in(
        writer,
        value,
        Vec3::splat(-maximum),
        Vec3::splat(maximum),
        resolution,
    )
}

/// Reads a vector written by [`write_compressed_vec3`].
pub fn read_compressed_vec3(
    reader: &mut BitReader<'_>,
    maximum: f32,
    resolution: f32,
) -> CodecResult<Vec3> {
    read_compressed_vec3_in(
        reader,
        Vec3::splat(-maximum),
        Vec3::splat(maximum),
        resolution,
    )
}

/// Writes each axis of `value` within its own `[min, max]` at `resolution`.
///
/// Axes outside their range are clamped. Fails before writing anything if
/// any axis range is degenerate.
pub fn write_compressed_vec3_in(
    writer: &mut BitWriter,
    value: Vec3,
    min: Vec3,
    max: Vec3,
    resolution: f32,
) -> CodecResult<()> {
    compressed_vec3_bits(min, max, resolution)?;
    for axis in 0..3 {
        writer.write_compressed_float(value[axis], min[axis], max[axis], resolution)?;
    }
    Ok(())
}

/// Bits one vector takes over the per-axis `[min, max]` at `resolution`.
pub fn compressed_vec3_bits(min: Vec3, max: Vec3, resolution: f32) -> CodecResult<usize> {
    let mut bits = 0;
    for axis in 0..3 {
        bits += usize::from(compressed_float_bits(min[axis], max[axis], resolution)?);
    }
    Ok(bits)
}

/// Reads a vector written by [`write_compressed_vec3_in`].
pub fn read_compressed_vec3_in(
    reader: &mut BitReader<'_>,
    min: Vec3,
    max: Vec3,
    resolution: f32,
) -> CodecResult<Vec3> {
    let x = reader.read_compressed_float(min.x, max.x, resolution)?;
    let y = reader.read_compressed_float(min.y, max.y, resolution)?;
    let z = reader.read_compressed_float(min.z, max.z, resolution)?;
    Ok(Vec3::new(x, y, z))
}
