//! Error types for wire format operations.

use thiserror::Error;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Decode errors for packet framing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Packet is too small to contain the header.
    #[error("packet too small: {actual} bytes, need at least {required}")]
    PacketTooSmall { actual: usize, required: usize },

    #[error("invalid magic number: 0x{found:08X}")]
    InvalidMagic { found: u32 },

    #[error("unsupported wire version: {found}")]
    UnsupportedVersion { found: u16 },

    #[error("invalid flags: 0x{flags:04X}")]
    InvalidFlags { flags: u16 },

    /// Full snapshots must carry a zero baseline sequence.
    #[error("invalid baseline sequence {baseline_sequence} for flags 0x{flags:04X}")]
    InvalidBaselineSequence { baseline_sequence: u16, flags: u16 },

    #[error("payload length mismatch: header {header_len} bytes but {actual_len} available")]
    PayloadLengthMismatch { header_len: u32, actual_len: usize },

    #[error("packet of {actual} bytes exceeds limit of {limit}")]
    PacketTooLarge { limit: usize, actual: usize },
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("buffer too small: need {needed}, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("payload length overflow: {length}")]
    LengthOverflow { length: usize },
}
