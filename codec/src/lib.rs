//! Cube state quantization and snapshot encoding for cubesnap.
//!
//! This crate ties together bitstream, wire, and schema to turn a
//! [`Snapshot`] of cube states into full or delta packets and back.
//!
//! # Features
//!
//! - Fixed-point position/velocity quantization with clamped motion bounds
//! - Smallest-three quaternion compression
//! - Tiered relative-index change sets for sparse deltas
//! - Ranged float vectors at a chosen resolution
//! - Full and delta snapshot packets guarded by a layout hash
//!
//! # Design Principles
//!
//! - **Correctness first** - Every decode path is bounds checked.
//! - **Deterministic** - Same inputs produce same outputs.
//! - **Budgetable** - Bit costs can be estimated without encoding.

mod changeset;
mod cube;
mod delta;
mod error;
mod fixed;
mod quaternion;
mod scratch;
mod snapshot;
mod types;
mod vector;

pub use changeset::{
    changed_indices, count_bits, decode_change_set, encode_change_set, estimate_change_set_bits,
    relative_index_bits, ABSOLUTE_INDEX_BITS,
};
pub use cube::{QuantizedCubeState, QuantizedVelocity};
pub use delta::{
    apply_delta_snapshot, apply_delta_snapshot_from_packet, decode_delta_packet,
    encode_delta_snapshot, encode_delta_snapshot_with_scratch, estimate_delta_bits, DeltaDecoded,
};
pub use error::{CodecError, CodecResult};
pub use fixed::{dequantize, quantize, quantize_clamped};
pub use quaternion::{CompressedQuaternion, LargestComponent};
pub use scratch::CodecScratch;
pub use snapshot::{
    decode_full_snapshot, decode_full_snapshot_from_packet, encode_full_snapshot,
    DecodedSnapshot, QuantizedSnapshot,
};
pub use types::{CubeState, Sequence, Snapshot};
pub use vector::{
    compressed_vec3_bits, read_compressed_vec3, read_compressed_vec3_in, write_compressed_vec3,
    write_compressed_vec3_in,
};
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Sequence::new(0);
        let _ = WireLimits::default();
        let _ = CodecScratch::new();
        let _ = CubeState::default();

        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn sequence_wraps() {
        let sequence = Sequence::new(u16::MAX);
        assert_eq!(sequence.next(), Sequence::new(0));
        assert!(sequence.next().is_newer_than(sequence));
        assert_eq!(Sequence::new(3).distance(Sequence::new(65_533)), 6);
    }
}
