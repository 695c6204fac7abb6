//! Wire framing for cubesnap snapshot packets.
//!
//! This crate handles the binary packet envelope: a fixed 24-byte header
//! followed by an opaque bit-packed payload. It knows nothing about cubes;
//! the payload layout belongs to `codec`.
//!
//! # Header layout (little-endian)
//!
//! | offset | size | field               |
//! |--------|------|---------------------|
//! | 0      | 4    | magic `"CUBE"`      |
//! | 4      | 2    | version             |
//! | 6      | 2    | flags (FULL/DELTA)  |
//! | 8      | 8    | layout hash         |
//! | 16     | 2    | sequence            |
//! | 18     | 2    | baseline sequence   |
//! | 20     | 4    | payload length      |
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Length fields are validated against [`Limits`] before use.
//! - **No domain knowledge** - This crate handles framing, not cube state.

mod error;
mod header;
mod limits;
mod packet;

pub use error::{DecodeError, EncodeError, WireResult};
pub use header::{PacketFlags, PacketHeader, HEADER_SIZE, MAGIC, VERSION};
pub use limits::Limits;
pub use packet::{decode_packet, encode_header, encode_packet, WirePacket};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(
            HEADER_SIZE,
            size_of::<u32>() // magic
                + size_of::<u16>() // version
                + size_of::<u16>() // flags
                + size_of::<u64>() // layout_hash
                + size_of::<u16>() // sequence
                + size_of::<u16>() // baseline_sequence
                + size_of::<u32>() // payload_len
        );
    }

    #[test]
    fn packet_flags_and_header_integration() {
        let header = PacketHeader::delta_snapshot(0x1234, 100, 95, 512);
        assert_eq!(header.flags, PacketFlags::delta_snapshot());
        assert!(header.flags.is_valid());
        let _: WireResult<()> = Ok(());
    }
}
