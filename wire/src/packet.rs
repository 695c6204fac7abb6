//! Packet encoding and decoding.

use crate::error::{DecodeError, EncodeError, WireResult};
use crate::header::{PacketFlags, PacketHeader, HEADER_SIZE, MAGIC, VERSION};
use crate::limits::Limits;

/// A decoded wire packet: validated header plus borrowed payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WirePacket<'a> {
    pub header: PacketHeader,
    pub payload: &'a [u8],
}

/// Decodes and validates a packet header, returning the payload slice.
pub fn decode_packet<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<WirePacket<'a>> {
    if buf.len() > limits.max_packet_bytes {
        return Err(DecodeError::PacketTooLarge {
            limit: limits.max_packet_bytes,
            actual: buf.len(),
        });
    }
    if buf.len() < HEADER_SIZE {
        return Err(DecodeError::PacketTooSmall {
            actual: buf.len(),
            required: HEADER_SIZE,
        });
    }
    let (head, payload) = buf.split_at(HEADER_SIZE);

    let mut cursor = HeaderCursor { buf: head, pos: 0 };
    let magic = u32::from_le_bytes(cursor.take());
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }

    let version = u16::from_le_bytes(cursor.take());
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let flags_raw = u16::from_le_bytes(cursor.take());
    let flags = PacketFlags::from_raw(flags_raw);
    if !flags.is_valid() {
        return Err(DecodeError::InvalidFlags { flags: flags_raw });
    }

    let layout_hash = u64::from_le_bytes(cursor.take());
    let sequence = u16::from_le_bytes(cursor.take());
    let baseline_sequence = u16::from_le_bytes(cursor.take());
    let payload_len = u32::from_le_bytes(cursor.take());

    // Zero is a legal delta baseline once sequences wrap.
    if flags.is_full_snapshot() && baseline_sequence != 0 {
        return Err(DecodeError::InvalidBaselineSequence {
            baseline_sequence,
            flags: flags_raw,
        });
    }

    if payload_len as usize != payload.len() {
        return Err(DecodeError::PayloadLengthMismatch {
            header_len: payload_len,
            actual_len: payload.len(),
        });
    }

    Ok(WirePacket {
        header: PacketHeader {
            version,
            flags,
            layout_hash,
            sequence,
            baseline_sequence,
            payload_len,
        },
        payload,
    })
}

/// Encodes a packet header into the provided output buffer.
pub fn encode_header(header: &PacketHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if out.len() < HEADER_SIZE {
        return Err(EncodeError::BufferTooSmall {
            needed: HEADER_SIZE,
            available: out.len(),
        });
    }

    out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
    out[4..6].copy_from_slice(&header.version.to_le_bytes());
    out[6..8].copy_from_slice(&header.flags.raw().to_le_bytes());
    out[8..16].copy_from_slice(&header.layout_hash.to_le_bytes());
    out[16..18].copy_from_slice(&header.sequence.to_le_bytes());
    out[18..20].copy_from_slice(&header.baseline_sequence.to_le_bytes());
    out[20..24].copy_from_slice(&header.payload_len.to_le_bytes());

    Ok(HEADER_SIZE)
}

/// Appends a complete packet (header then payload) to `out`.
///
/// `header.payload_len` is overwritten with the actual payload length.
pub fn encode_packet(
    header: PacketHeader,
    payload: &[u8],
    out: &mut Vec<u8>,
) -> Result<usize, EncodeError> {
    let payload_len = u32::try_from(payload.len()).map_err(|_| EncodeError::LengthOverflow {
        length: payload.len(),
    })?;
    let header = PacketHeader {
        payload_len,
        ..header
    };
    let start = out.len();
    out.resize(start + HEADER_SIZE, 0);
    encode_header(&header, &mut out[start..])?;
    out.extend_from_slice(payload);
    Ok(HEADER_SIZE + payload.len())
}

struct HeaderCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl HeaderCursor<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        bytes
    }
}
