//! Floats quantized to a fixed resolution within a declared range.
//!
//! `[min, max]` is split into `ceil((max - min) / resolution)` equal steps
//! and the nearest step index is stored as a ranged integer, so a round
//! trip lands within `resolution / 2` of any in-range value.

use crate::error::{BitError, BitResult};
use crate::range::bits_required;
use crate::reader::BitReader;
use crate::writer::BitWriter;

/// Step counts above this lose exactness in `f64`.
const MAX_STEPS: f64 = (1u64 << 53) as f64;

/// Number of steps `[min, max]` is divided into at `resolution`.
pub(crate) fn float_steps(min: f32, max: f32, resolution: f32) -> BitResult<i64> {
    let invalid = BitError::InvalidFloatRange {
        min,
        max,
        resolution,
    };
    if !(min.is_finite() && max.is_finite() && resolution.is_finite())
        || min >= max
        || resolution <= 0.0
    {
        return Err(invalid);
    }
    let steps = ((f64::from(max) - f64::from(min)) / f64::from(resolution)).ceil();
    if steps > MAX_STEPS {
        return Err(invalid);
    }
    Ok(steps as i64)
}

/// Width of one compressed float over `[min, max]` at `resolution`.
///
/// # Errors
///
/// [`BitError::InvalidFloatRange`] for the same parameters
/// [`BitWriter::write_compressed_float`] rejects.
pub fn compressed_float_bits(min: f32, max: f32, resolution: f32) -> BitResult<u8> {
    Ok(bits_required(0, float_steps(min, max, resolution)?))
}

impl BitWriter {
    /// Writes `value` quantized to `resolution` within `[min, max]`.
    ///
    /// Out-of-range values are clamped to the nearest end; NaN is written
    /// as `min`.
    ///
    /// # Errors
    ///
    /// [`BitError::InvalidFloatRange`] unless `min < max` and
    /// `resolution > 0`, all finite.
    pub fn write_compressed_float(
        &mut self,
        value: f32,
        min: f32,
        max: f32,
        resolution: f32,
    ) -> BitResult<()> {
        let steps = float_steps(min, max, resolution)?;
        let delta = f64::from(max) - f64::from(min);
        let normalized = ((f64::from(value) - f64::from(min)) / delta).clamp(0.0, 1.0);
        let step = if normalized.is_nan() {
            0
        } else {
            (normalized * steps as f64 + 0.5).floor() as i64
        };
        self.write_int_in_range(step, 0, steps)
    }
}

impl BitReader<'_> {
    /// Reads a value written by
    /// [`BitWriter::write_compressed_float`] with the same parameters.
    pub fn read_compressed_float(&mut self, min: f32, max: f32, resolution: f32) -> BitResult<f32> {
        let steps = float_steps(min, max, resolution)?;
        let step = self.read_int_in_range(0, steps)?;
        let delta = f64::from(max) - f64::from(min);
        Ok((f64::from(min) + step as f64 / steps as f64 * delta) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_and_width() {
        assert_eq!(float_steps(-1.0, 1.0, 0.007_812_5).unwrap(), 256);
        assert_eq!(float_steps(0.0, 1.0, 0.3).unwrap(), 4);

        let mut writer = BitWriter::new();
        writer.write_compressed_float(0.25, -1.0, 1.0, 0.007_812_5).unwrap();
        // 257 values need 9 bits.
        assert_eq!(writer.bits_written(), 9);
        assert_eq!(compressed_float_bits(-1.0, 1.0, 0.007_812_5).unwrap(), 9);
        assert_eq!(compressed_float_bits(0.0, 1.0, 0.3).unwrap(), 3);
    }

    #[test]
    fn endpoints_are_exact() {
        let mut writer = BitWriter::new();
        for value in [-32.0, 32.0] {
            writer.write_compressed_float(value, -32.0, 32.0, 0.001).unwrap();
        }
        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_compressed_float(-32.0, 32.0, 0.001).unwrap(), -32.0);
        assert_eq!(reader.read_compressed_float(-32.0, 32.0, 0.001).unwrap(), 32.0);
    }

    #[test]
    fn out_of_range_and_nan_saturate() {
        let mut writer = BitWriter::new();
        writer.write_compressed_float(99.0, 0.0, 10.0, 0.5).unwrap();
        writer.write_compressed_float(-99.0, 0.0, 10.0, 0.5).unwrap();
        writer.write_compressed_float(f32::NAN, 0.0, 10.0, 0.5).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_compressed_float(0.0, 10.0, 0.5).unwrap(), 10.0);
        assert_eq!(reader.read_compressed_float(0.0, 10.0, 0.5).unwrap(), 0.0);
        assert_eq!(reader.read_compressed_float(0.0, 10.0, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut writer = BitWriter::new();
        for (min, max, resolution) in [
            (1.0, 1.0, 0.1),
            (2.0, 1.0, 0.1),
            (0.0, 1.0, 0.0),
            (0.0, 1.0, -0.5),
            (0.0, f32::INFINITY, 0.1),
            (0.0, f32::MAX, f32::MIN_POSITIVE),
        ] {
            assert!(matches!(
                writer.write_compressed_float(0.5, min, max, resolution),
                Err(BitError::InvalidFloatRange { .. })
            ));
        }
        assert_eq!(writer.bits_written(), 0);
    }
}
