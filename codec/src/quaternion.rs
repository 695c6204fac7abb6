//! Smallest-three quaternion compression.
//!
//! A unit quaternion is sent as the index of its largest-magnitude component
//! (2 bits) plus the other three components, each remapped from
//! `[-1/sqrt(2), 1/sqrt(2)]` to a `B`-bit unsigned integer. The dropped
//! component is rebuilt from the unit-norm constraint on decode.
//!
//! The input must already be normalized. A non-unit quaternion is not an
//! error; it only degrades the reconstructed orientation.

use std::f32::consts::FRAC_1_SQRT_2;

use bitstream::{BitReader, BitResult, BitWriter};
use glam::Quat;
use schema::OrientationBits;

const COMPONENT_MIN: f32 = -FRAC_1_SQRT_2;
const COMPONENT_MAX: f32 = FRAC_1_SQRT_2;

/// Which component was dropped, in `x, y, z, w` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LargestComponent {
    X,
    Y,
    Z,
    #[default]
    W,
}

impl LargestComponent {
    const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::W];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::W => 3,
        }
    }

    /// Decodes the 2-bit tag; higher bits are ignored.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self::ALL[(bits & 0b11) as usize]
    }
}

/// A quaternion packed with the smallest-three method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedQuaternion {
    pub largest: LargestComponent,
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl CompressedQuaternion {
    /// Compresses `q` with `bits` per remaining component.
    #[must_use]
    pub fn compress(q: Quat, bits: OrientationBits) -> Self {
        let values = q.to_array();

        // First maximum wins on ties.
        let mut largest = 0;
        for i in 1..4 {
            if values[i].abs() > values[largest].abs() {
                largest = i;
            }
        }

        // Canonicalize so the dropped component is non-negative.
        let sign = if values[largest] >= 0.0 { 1.0 } else { -1.0 };
        let mut rest = [0.0f32; 3];
        let mut slot = 0;
        for (i, value) in values.iter().enumerate() {
            if i != largest {
                rest[slot] = value * sign;
                slot += 1;
            }
        }

        let max = bits.max_value();
        let scale = max as f32;
        let pack = |value: f32| -> u32 {
            let normal = (value - COMPONENT_MIN) / (COMPONENT_MAX - COMPONENT_MIN);
            let integer = (normal * scale + 0.5).floor();
            (integer.max(0.0) as u32).min(max)
        };

        Self {
            largest: LargestComponent::ALL[largest],
            a: pack(rest[0]),
            b: pack(rest[1]),
            c: pack(rest[2]),
        }
    }

    /// Rebuilds a unit quaternion from a record packed at `bits`.
    #[must_use]
    pub fn decompress(&self, bits: OrientationBits) -> Quat {
        let inverse_scale = 1.0 / bits.max_value() as f32;
        let unpack =
            |integer: u32| integer as f32 * inverse_scale * (COMPONENT_MAX - COMPONENT_MIN) + COMPONENT_MIN;

        let a = unpack(self.a);
        let b = unpack(self.b);
        let c = unpack(self.c);
        let dropped = (1.0 - a * a - b * b - c * c).max(0.0).sqrt();

        let values = match self.largest {
            LargestComponent::X => [dropped, a, b, c],
            LargestComponent::Y => [a, dropped, b, c],
            LargestComponent::Z => [a, b, dropped, c],
            LargestComponent::W => [a, b, c, dropped],
        };
        Quat::from_array(values).normalize()
    }

    /// Writes `{largest(2), a(B), b(B), c(B)}`.
    pub fn write(&self, writer: &mut BitWriter, bits: OrientationBits) -> BitResult<()> {
        writer.write_bits(self.largest.index() as u64, 2)?;
        writer.write_bits(u64::from(self.a), bits.get())?;
        writer.write_bits(u64::from(self.b), bits.get())?;
        writer.write_bits(u64::from(self.c), bits.get())?;
        Ok(())
    }

    pub fn read(reader: &mut BitReader<'_>, bits: OrientationBits) -> BitResult<Self> {
        let largest = LargestComponent::from_bits(reader.read_bits(2)?);
        let a = reader.read_bits(bits.get())? as u32;
        let b = reader.read_bits(bits.get())? as u32;
        let c = reader.read_bits(bits.get())? as u32;
        Ok(Self { largest, a, b, c })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(n: u8) -> OrientationBits {
        OrientationBits::new(n).unwrap()
    }

    fn same_rotation(a: Quat, b: Quat, tolerance: f32) -> bool {
        a.dot(b).abs() >= 1.0 - tolerance
    }

    #[test]
    fn identity_drops_w() {
        let packed = CompressedQuaternion::compress(Quat::IDENTITY, OrientationBits::STANDARD);
        assert_eq!(packed.largest, LargestComponent::W);
        // Zero components land mid-range.
        assert_eq!(packed.a, 256);
        assert_eq!(packed.b, 256);
        assert_eq!(packed.c, 256);

        let decoded = packed.decompress(OrientationBits::STANDARD);
        assert!(same_rotation(decoded, Quat::IDENTITY, 1e-5));
    }

    #[test]
    fn negative_largest_is_canonicalized() {
        let q = Quat::from_xyzw(0.1, -0.9, 0.3, 0.2).normalize();
        let packed = CompressedQuaternion::compress(q, OrientationBits::HIGH);
        assert_eq!(packed.largest, LargestComponent::Y);

        let decoded = packed.decompress(OrientationBits::HIGH);
        assert!(decoded.y > 0.0);
        assert!(same_rotation(decoded, q, 1e-6));
        assert!(same_rotation(decoded, -q, 1e-6));
    }

    #[test]
    fn tie_picks_first_component() {
        let q = Quat::from_xyzw(0.5, 0.5, 0.5, 0.5);
        let packed = CompressedQuaternion::compress(q, OrientationBits::STANDARD);
        assert_eq!(packed.largest, LargestComponent::X);
    }

    #[test]
    fn components_stay_in_range_for_non_unit_input() {
        let q = Quat::from_xyzw(3.0, -2.0, 2.5, 0.1);
        let packed = CompressedQuaternion::compress(q, bits(4));
        for value in [packed.a, packed.b, packed.c] {
            assert!(value <= 15);
        }
        let decoded = packed.decompress(bits(4));
        assert!(decoded.is_normalized());
    }

    #[test]
    fn record_layout_and_roundtrip() {
        let q = Quat::from_rotation_y(1.2);
        let packed = CompressedQuaternion::compress(q, OrientationBits::STANDARD);

        let mut writer = BitWriter::new();
        packed.write(&mut writer, OrientationBits::STANDARD).unwrap();
        assert_eq!(writer.bits_written(), 29);
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let read = CompressedQuaternion::read(&mut reader, OrientationBits::STANDARD).unwrap();
        assert_eq!(read, packed);
    }

    #[test]
    fn truncated_record_fails() {
        let mut reader = BitReader::new(&[0xFF, 0xFF]);
        assert!(CompressedQuaternion::read(&mut reader, OrientationBits::HIGH).is_err());
    }

    #[test]
    fn error_shrinks_with_width() {
        let mean_error = |n: u8| {
            let mut total = 0.0f64;
            for i in 0..64 {
                let t = i as f32 * 0.37;
                let q = Quat::from_euler(glam::EulerRot::XYZ, t, -1.1 * t, 2.0 + t);
                let decoded = CompressedQuaternion::compress(q, bits(n)).decompress(bits(n));
                total += f64::from((decoded - q).length().min((decoded + q).length()));
            }
            total / 64.0
        };
        assert!(mean_error(15) < mean_error(9));
        assert!(mean_error(9) < mean_error(4));
    }
}
