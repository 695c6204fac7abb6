//! Fixed-point conversion for positions and velocities.

use glam::Vec3;

/// Converts `value` to fixed point at `scale` units per meter, rounding to nearest.
#[must_use]
pub fn quantize(value: f32, scale: i32) -> i32 {
    (f64::from(value) * f64::from(scale) + 0.5).floor() as i32
}

/// Inverse of [`quantize`].
#[must_use]
pub fn dequantize(value: i32, scale: i32) -> f32 {
    (f64::from(value) / f64::from(scale)) as f32
}

/// Quantizes and clamps into `[-bound, bound]`.
#[must_use]
pub fn quantize_clamped(value: f32, scale: i32, bound: i32) -> i32 {
    quantize(value, scale).clamp(-bound, bound)
}

pub(crate) fn quantize_vec3(value: Vec3, scale: i32, bounds: [i32; 3]) -> [i32; 3] {
    [
        quantize_clamped(value.x, scale, bounds[0]),
        quantize_clamped(value.y, scale, bounds[1]),
        quantize_clamped(value.z, scale, bounds[2]),
    ]
}

pub(crate) fn dequantize_vec3(value: [i32; 3], scale: i32) -> Vec3 {
    Vec3::new(
        dequantize(value[0], scale),
        dequantize(value[1], scale),
        dequantize(value[2], scale),
    )
}
