//! Quantized snapshots and full snapshot packets.

use bitstream::{BitReader, BitWriter};
use schema::{CubeFormat, StreamLayout};
use wire::{decode_packet, encode_header, PacketHeader, WirePacket};

use crate::cube::QuantizedCubeState;
use crate::error::{CodecError, CodecResult};
use crate::types::{Sequence, Snapshot};

/// Every cube of a [`Snapshot`] quantized under one format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedSnapshot {
    pub cubes: Vec<QuantizedCubeState>,
}

impl QuantizedSnapshot {
    #[must_use]
    pub fn quantize(snapshot: &Snapshot, format: &CubeFormat) -> Self {
        Self {
            cubes: snapshot
                .cubes
                .iter()
                .map(|cube| QuantizedCubeState::quantize(cube, format))
                .collect(),
        }
    }

    #[must_use]
    pub fn dequantize(&self, format: &CubeFormat) -> Snapshot {
        Snapshot::new(
            self.cubes
                .iter()
                .map(|cube| cube.dequantize(format))
                .collect(),
        )
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

/// A snapshot recovered from a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub sequence: Sequence,
    pub snapshot: QuantizedSnapshot,
}

/// Encodes every cube of `snapshot`, in index order, into `out`.
///
/// Returns the number of bytes written (header included).
pub fn encode_full_snapshot(
    layout: &StreamLayout,
    sequence: Sequence,
    snapshot: &QuantizedSnapshot,
    out: &mut [u8],
) -> CodecResult<usize> {
    check_entity_count(layout, snapshot)?;

    let record_bits = QuantizedCubeState::bit_cost(&layout.format);
    let mut writer = BitWriter::with_capacity((record_bits * snapshot.len()).div_ceil(8));
    for cube in &snapshot.cubes {
        cube.write(&mut writer, &layout.format)?;
    }
    let payload = writer.finish();

    let header = PacketHeader::full_snapshot(layout.hash(), sequence.raw(), 0);
    write_packet(header, &payload, out)
}

/// Decodes a full snapshot from raw packet bytes.
pub fn decode_full_snapshot(
    layout: &StreamLayout,
    bytes: &[u8],
    limits: &wire::Limits,
) -> CodecResult<DecodedSnapshot> {
    let packet = decode_packet(bytes, limits)?;
    let snapshot = decode_full_snapshot_from_packet(layout, &packet)?;
    Ok(DecodedSnapshot {
        sequence: Sequence::new(packet.header.sequence),
        snapshot,
    })
}

/// Decodes a full snapshot from a parsed wire packet.
pub fn decode_full_snapshot_from_packet(
    layout: &StreamLayout,
    packet: &WirePacket<'_>,
) -> CodecResult<QuantizedSnapshot> {
    let header = packet.header;
    if !header.flags.is_full_snapshot() {
        return Err(CodecError::UnexpectedPacketKind {
            flags: header.flags.raw(),
        });
    }
    check_layout_hash(layout, &header)?;

    let mut reader = BitReader::new(packet.payload);
    let mut cubes = Vec::with_capacity(layout.entity_count());
    for _ in 0..layout.entity_count() {
        cubes.push(QuantizedCubeState::read(&mut reader, &layout.format)?);
    }
    check_trailing(&reader)?;
    Ok(QuantizedSnapshot { cubes })
}

pub(crate) fn check_entity_count(
    layout: &StreamLayout,
    snapshot: &QuantizedSnapshot,
) -> CodecResult<()> {
    if snapshot.len() != layout.entity_count() {
        return Err(CodecError::EntityCountMismatch {
            expected: layout.entity_count(),
            actual: snapshot.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_layout_hash(layout: &StreamLayout, header: &PacketHeader) -> CodecResult<()> {
    let expected = layout.hash();
    if header.layout_hash != expected {
        return Err(CodecError::LayoutMismatch {
            expected,
            found: header.layout_hash,
        });
    }
    Ok(())
}

/// Only the zero padding of the final byte may remain.
pub(crate) fn check_trailing(reader: &BitReader<'_>) -> CodecResult<()> {
    let remaining_bits = reader.bits_remaining();
    if remaining_bits >= 8 {
        return Err(CodecError::TrailingData { remaining_bits });
    }
    Ok(())
}

pub(crate) fn write_packet(
    header: PacketHeader,
    payload: &[u8],
    out: &mut [u8],
) -> CodecResult<usize> {
    let needed = wire::HEADER_SIZE + payload.len();
    if out.len() < needed {
        return Err(CodecError::OutputTooSmall {
            needed,
            available: out.len(),
        });
    }
    let payload_len = u32::try_from(payload.len()).map_err(|_| CodecError::OutputTooSmall {
        needed,
        available: out.len(),
    })?;
    let header = PacketHeader {
        payload_len,
        ..header
    };
    encode_header(&header, out).map_err(|_| CodecError::OutputTooSmall {
        needed,
        available: out.len(),
    })?;
    out[wire::HEADER_SIZE..needed].copy_from_slice(payload);
    Ok(needed)
}
