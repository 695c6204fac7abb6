//! Error types for codec operations.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during snapshot encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Wire format error.
    #[error("wire error: {0}")]
    Wire(#[from] wire::DecodeError),

    /// Bitstream error.
    #[error("bitstream error: {0}")]
    Bitstream(#[from] bitstream::BitError),

    /// Invalid layout definition.
    #[error("schema error: {0}")]
    Schema(#[from] schema::SchemaError),

    /// Output buffer is too small.
    #[error("output buffer too small: need {needed}, have {available}")]
    OutputTooSmall { needed: usize, available: usize },

    /// Packet was encoded under a different stream layout.
    #[error("layout hash mismatch: expected 0x{expected:016X}, found 0x{found:016X}")]
    LayoutMismatch { expected: u64, found: u64 },

    /// Packet kind does not match the requested operation.
    #[error("unexpected packet flags 0x{flags:04X}")]
    UnexpectedPacketKind { flags: u16 },

    /// Delta packet was encoded against another baseline.
    #[error("baseline sequence mismatch: expected {expected}, found {found}")]
    BaselineMismatch { expected: u16, found: u16 },

    /// Snapshot length differs from the registry entity count.
    #[error("snapshot holds {actual} cubes, layout expects {expected}")]
    EntityCountMismatch { expected: usize, actual: usize },

    /// Decoded object index lies outside the entity table.
    #[error("object index {index} out of range for {count} entities")]
    IndexOutOfRange { index: usize, count: usize },

    /// Payload had whole bytes left after parsing.
    #[error("payload has {remaining_bits} trailing bits")]
    TrailingData { remaining_bits: usize },
}
