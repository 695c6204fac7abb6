use bitstream::{BitReader, BitWriter};
use codec::{
    changed_indices, decode_change_set, dequantize, encode_change_set, estimate_change_set_bits,
    quantize, read_compressed_vec3, read_compressed_vec3_in, write_compressed_vec3,
    write_compressed_vec3_in, CompressedQuaternion,
};
use glam::{Quat, Vec3};
use proptest::prelude::*;
use schema::OrientationBits;

fn unit_quat() -> impl Strategy<Value = Quat> {
    (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0)
        .prop_filter("non-degenerate", |(x, y, z, w)| {
            x * x + y * y + z * z + w * w > 0.01
        })
        .prop_map(|(x, y, z, w)| Quat::from_xyzw(x, y, z, w).normalize())
}

/// Moves the largest component of `q` into slot `target`.
fn with_largest_at(q: Quat, target: usize) -> Quat {
    let mut values = q.to_array();
    let mut largest = 0;
    for i in 1..4 {
        if values[i].abs() > values[largest].abs() {
            largest = i;
        }
    }
    values.swap(largest, target);
    Quat::from_array(values)
}

fn chord_error(a: Quat, b: Quat) -> f32 {
    (a - b).length().min((a + b).length())
}

proptest! {
    #[test]
    fn quaternion_error_is_bounded(
        q in unit_quat(),
        target in 0usize..4,
        width in 4u8..=20,
    ) {
        let q = with_largest_at(q, target);
        let bits = OrientationBits::new(width).unwrap();
        let packed = CompressedQuaternion::compress(q, bits);

        // Ties resolve to an earlier slot of the same magnitude.
        let values = q.to_array();
        prop_assert!(packed.largest.index() <= target);
        prop_assert_eq!(values[packed.largest.index()].abs(), values[target].abs());

        let decoded = packed.decompress(bits);
        prop_assert!(decoded.is_normalized());
        let step = std::f32::consts::FRAC_1_SQRT_2 / bits.max_value() as f32;
        let error = chord_error(decoded, q);
        prop_assert!(error <= 12.0 * step + 1e-5, "error {} step {}", error, step);
    }

    #[test]
    fn quaternion_record_roundtrip(q in unit_quat(), width in 2u8..=31) {
        let bits = OrientationBits::new(width).unwrap();
        let packed = CompressedQuaternion::compress(q, bits);
        let mut writer = BitWriter::new();
        packed.write(&mut writer, bits).unwrap();
        prop_assert_eq!(writer.bits_written(), bits.record_bits());

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        prop_assert_eq!(CompressedQuaternion::read(&mut reader, bits).unwrap(), packed);
    }

    #[test]
    fn dropped_component_is_never_negative(q in unit_quat()) {
        let packed = CompressedQuaternion::compress(q, OrientationBits::HIGH);
        let decoded = packed.decompress(OrientationBits::HIGH).to_array();
        prop_assert!(decoded[packed.largest.index()] >= 0.0);
    }

    #[test]
    fn fixed_point_error_is_bounded(value in -256.0f32..256.0, scale in 1i32..=4096) {
        let restored = dequantize(quantize(value, scale), scale);
        let bound = 0.5 / scale as f32 + 1e-4;
        prop_assert!((restored - value).abs() <= bound, "{} -> {}", value, restored);
    }

    #[test]
    fn compressed_vec3_error_is_bounded(
        (x, y, z) in (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0),
        resolution in 0.001f32..1.0,
    ) {
        let value = Vec3::new(x, y, z);
        let mut writer = BitWriter::new();
        write_compressed_vec3(&mut writer, value, 100.0, resolution).unwrap();
        let bytes = writer.finish();
        let decoded = read_compressed_vec3(&mut BitReader::new(&bytes), 100.0, resolution).unwrap();
        let bound = resolution / 2.0 + 100.0 * f32::EPSILON;
        prop_assert!(decoded.abs_diff_eq(value, bound), "{} -> {}", value, decoded);
    }

    #[test]
    fn compressed_vec3_in_error_is_bounded(
        (min, max, value) in (
            prop::array::uniform3(-50.0f32..50.0),
            prop::array::uniform3(0.5f32..50.0),
        )
            .prop_flat_map(|(min, span)| {
                let max = [min[0] + span[0], min[1] + span[1], min[2] + span[2]];
                (
                    Just(min),
                    Just(max),
                    (min[0]..=max[0], min[1]..=max[1], min[2]..=max[2]),
                )
            }),
        resolution in 0.001f32..0.5,
    ) {
        let (min, max) = (Vec3::from(min), Vec3::from(max));
        let value = Vec3::new(value.0, value.1, value.2);
        let mut writer = BitWriter::new();
        write_compressed_vec3_in(&mut writer, value, min, max, resolution).unwrap();
        let bytes = writer.finish();
        let decoded =
            read_compressed_vec3_in(&mut BitReader::new(&bytes), min, max, resolution).unwrap();
        let bound = resolution / 2.0 + 100.0 * f32::EPSILON;
        prop_assert!(decoded.abs_diff_eq(value, bound), "{} -> {}", value, decoded);
    }

    #[test]
    fn change_set_roundtrip_matches_estimate(
        mask in proptest::collection::vec(any::<bool>(), 1..=1024),
    ) {
        let indices: Vec<usize> = changed_indices(&mask).collect();
        let mut writer = BitWriter::new();
        encode_change_set(&mut writer, &indices, mask.len()).unwrap();
        prop_assert_eq!(writer.bits_written(), estimate_change_set_bits(&mask));

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        let mut decoded = Vec::new();
        decode_change_set(&mut reader, mask.len(), &mut decoded).unwrap();
        prop_assert_eq!(decoded, indices);
    }

    #[test]
    fn sparse_change_set_matches_estimate(
        indices in proptest::collection::btree_set(0usize..1024, 0..40),
    ) {
        let indices: Vec<usize> = indices.into_iter().collect();
        let mut mask = vec![false; 1024];
        for &index in &indices {
            mask[index] = true;
        }
        let mut writer = BitWriter::new();
        encode_change_set(&mut writer, &indices, 1024).unwrap();
        prop_assert_eq!(writer.bits_written(), estimate_change_set_bits(&mask));
    }

    #[test]
    fn change_set_decode_never_panics(
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
        entity_count in 1usize..=1024,
    ) {
        let mut reader = BitReader::new(&bytes);
        let mut out = Vec::new();
        if decode_change_set(&mut reader, entity_count, &mut out).is_ok() {
            prop_assert!(out.iter().all(|&index| index < entity_count));
            prop_assert!(out.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
