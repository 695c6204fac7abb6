//! Delta snapshot encoding/decoding.
//!
//! A delta payload is a change set followed by the records of the changed
//! cubes in ascending index order. A cube is changed when its quantized
//! record differs from the baseline's.

use bitstream::{BitReader, BitWriter};
use log::trace;
use schema::{CubeFormat, StreamLayout};
use wire::{decode_packet, PacketHeader, WirePacket};

use crate::changeset::{decode_change_set, encode_change_set, estimate_change_set_bits};
use crate::cube::QuantizedCubeState;
use crate::error::{CodecError, CodecResult};
use crate::scratch::CodecScratch;
use crate::snapshot::{
    check_entity_count, check_layout_hash, check_trailing, write_packet, QuantizedSnapshot,
};
use crate::types::Sequence;

/// The changed records of a delta packet, before a baseline is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaDecoded {
    pub sequence: Sequence,
    pub baseline_sequence: Sequence,
    /// `(index, record)` pairs in ascending index order.
    pub changes: Vec<(usize, QuantizedCubeState)>,
}

/// Encodes `current` relative to `baseline` into `out`.
///
/// Returns the number of bytes written (header included).
pub fn encode_delta_snapshot(
    layout: &StreamLayout,
    sequence: Sequence,
    baseline_sequence: Sequence,
    baseline: &QuantizedSnapshot,
    current: &QuantizedSnapshot,
    out: &mut [u8],
) -> CodecResult<usize> {
    let mut scratch = CodecScratch::default();
    encode_delta_snapshot_with_scratch(
        layout,
        sequence,
        baseline_sequence,
        baseline,
        current,
        &mut scratch,
        out,
    )
}

/// Encodes a delta snapshot using reusable scratch buffers.
pub fn encode_delta_snapshot_with_scratch(
    layout: &StreamLayout,
    sequence: Sequence,
    baseline_sequence: Sequence,
    baseline: &QuantizedSnapshot,
    current: &QuantizedSnapshot,
    scratch: &mut CodecScratch,
    out: &mut [u8],
) -> CodecResult<usize> {
    check_entity_count(layout, baseline)?;
    check_entity_count(layout, current)?;

    let entity_count = layout.entity_count();
    let (mask, indices) = scratch.mask_and_indices_mut(entity_count);
    for (index, (before, after)) in baseline.cubes.iter().zip(&current.cubes).enumerate() {
        if before != after {
            mask[index] = true;
            indices.push(index);
        }
    }

    let record_bits = QuantizedCubeState::bit_cost(&layout.format);
    let estimate = estimate_change_set_bits(mask) + indices.len() * record_bits;
    let mut writer = BitWriter::with_capacity(estimate.div_ceil(8));
    encode_change_set(&mut writer, indices, entity_count)?;
    for &index in indices.iter() {
        current.cubes[index].write(&mut writer, &layout.format)?;
    }
    debug_assert_eq!(writer.bits_written(), estimate);
    trace!(
        "delta {} -> {}: {} of {} cubes changed, {} bits",
        baseline_sequence.raw(),
        sequence.raw(),
        indices.len(),
        entity_count,
        estimate
    );
    let payload = writer.finish();

    let header =
        PacketHeader::delta_snapshot(layout.hash(), sequence.raw(), baseline_sequence.raw(), 0);
    write_packet(header, &payload, out)
}

/// Decodes the changed records of a delta packet without applying them.
pub fn decode_delta_packet(
    layout: &StreamLayout,
    packet: &WirePacket<'_>,
) -> CodecResult<DeltaDecoded> {
    let header = packet.header;
    if !header.flags.is_delta_snapshot() {
        return Err(CodecError::UnexpectedPacketKind {
            flags: header.flags.raw(),
        });
    }
    check_layout_hash(layout, &header)?;

    let mut reader = BitReader::new(packet.payload);
    let mut indices = Vec::new();
    decode_change_set(&mut reader, layout.entity_count(), &mut indices)?;
    let mut changes = Vec::with_capacity(indices.len());
    for index in indices {
        changes.push((index, QuantizedCubeState::read(&mut reader, &layout.format)?));
    }
    check_trailing(&reader)?;

    Ok(DeltaDecoded {
        sequence: Sequence::new(header.sequence),
        baseline_sequence: Sequence::new(header.baseline_sequence),
        changes,
    })
}

/// Decodes a delta packet from raw bytes and applies it to `baseline`.
///
/// `baseline_sequence` is the sequence the caller holds `baseline` under; a
/// packet built against any other baseline is rejected.
pub fn apply_delta_snapshot(
    layout: &StreamLayout,
    baseline_sequence: Sequence,
    baseline: &QuantizedSnapshot,
    bytes: &[u8],
    limits: &wire::Limits,
) -> CodecResult<(Sequence, QuantizedSnapshot)> {
    let packet = decode_packet(bytes, limits)?;
    let snapshot = apply_delta_snapshot_from_packet(layout, baseline_sequence, baseline, &packet)?;
    Ok((Sequence::new(packet.header.sequence), snapshot))
}

/// Applies a parsed delta packet to `baseline`.
pub fn apply_delta_snapshot_from_packet(
    layout: &StreamLayout,
    baseline_sequence: Sequence,
    baseline: &QuantizedSnapshot,
    packet: &WirePacket<'_>,
) -> CodecResult<QuantizedSnapshot> {
    check_entity_count(layout, baseline)?;
    let decoded = decode_delta_packet(layout, packet)?;
    if decoded.baseline_sequence != baseline_sequence {
        return Err(CodecError::BaselineMismatch {
            expected: baseline_sequence.raw(),
            found: decoded.baseline_sequence.raw(),
        });
    }

    let mut snapshot = baseline.clone();
    for (index, record) in decoded.changes {
        snapshot.cubes[index] = record;
    }
    Ok(snapshot)
}

/// Payload bits of the delta from `baseline` to `current`, without encoding.
///
/// Both snapshots must hold the same number of cubes.
#[must_use]
pub fn estimate_delta_bits(
    format: &CubeFormat,
    baseline: &QuantizedSnapshot,
    current: &QuantizedSnapshot,
) -> usize {
    debug_assert_eq!(baseline.len(), current.len());
    let changed: Vec<bool> = baseline
        .cubes
        .iter()
        .zip(&current.cubes)
        .map(|(before, after)| before != after)
        .collect();
    let changed_count = changed.iter().filter(|&&is_changed| is_changed).count();
    estimate_change_set_bits(&changed) + changed_count * QuantizedCubeState::bit_cost(format)
}
