//! Packet header types and constants.

/// Magic number identifying cubesnap packets.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = 0x4355_4245; // "CUBE" in ASCII

/// Current wire format version.
pub const VERSION: u16 = 1;

/// Header size in bytes (24 total).
pub const HEADER_SIZE: usize = 4 + 2 + 2 + 8 + 2 + 2 + 4;

/// Packet flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketFlags(u16);

impl PacketFlags {
    /// Every cube record is present.
    pub const FULL_SNAPSHOT: u16 = 1 << 0;

    /// Only changed records relative to a baseline are present.
    pub const DELTA_SNAPSHOT: u16 = 1 << 1;

    const RESERVED_MASK: u16 = !0b11;

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_full_snapshot(self) -> bool {
        self.0 & Self::FULL_SNAPSHOT != 0
    }

    #[must_use]
    pub const fn is_delta_snapshot(self) -> bool {
        self.0 & Self::DELTA_SNAPSHOT != 0
    }

    /// Exactly one of full/delta is set and no reserved bits are.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        let has_reserved = self.0 & Self::RESERVED_MASK != 0;
        (self.is_full_snapshot() ^ self.is_delta_snapshot()) && !has_reserved
    }

    #[must_use]
    pub const fn full_snapshot() -> Self {
        Self(Self::FULL_SNAPSHOT)
    }

    #[must_use]
    pub const fn delta_snapshot() -> Self {
        Self(Self::DELTA_SNAPSHOT)
    }
}

/// Packet header.
///
/// Holds the fields *after* the magic number; the magic is validated
/// during decoding and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Wire format version.
    pub version: u16,
    /// Packet flags.
    pub flags: PacketFlags,
    /// Stream layout hash for compatibility checking.
    pub layout_hash: u64,
    /// Snapshot sequence number (wrapping).
    pub sequence: u16,
    /// Baseline sequence for delta packets (0 for full snapshots).
    pub baseline_sequence: u16,
    /// Payload length in bytes.
    pub payload_len: u32,
}

impl PacketHeader {
    #[must_use]
    pub const fn full_snapshot(layout_hash: u64, sequence: u16, payload_len: u32) -> Self {
        Self {
            version: VERSION,
            flags: PacketFlags::full_snapshot(),
            layout_hash,
            sequence,
            baseline_sequence: 0,
            payload_len,
        }
    }

    #[must_use]
    pub const fn delta_snapshot(
        layout_hash: u64,
        sequence: u16,
        baseline_sequence: u16,
        payload_len: u32,
    ) -> Self {
        Self {
            version: VERSION,
            flags: PacketFlags::delta_snapshot(),
            layout_hash,
            sequence,
            baseline_sequence,
            payload_len,
        }
    }
}
