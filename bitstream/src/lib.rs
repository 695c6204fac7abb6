//! Bit cursor primitives for the cubesnap snapshot codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for bit-level encoding and decoding.
//! Every codec in `cubesnap` is expressed as explicit reads and writes over these two
//! cursors, so field layout never depends on native bit-field packing.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about cubes, quaternions, or snapshots.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bool(true);
//! writer.write_bits(42, 7).unwrap();
//! writer.write_int_in_range(-3, -8, 8).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bool().unwrap(), true);
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! assert_eq!(reader.read_int_in_range(-8, 8).unwrap(), -3);
//! ```

mod error;
mod float;
mod range;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use float::compressed_float_bits;
pub use range::bits_required;
pub use reader::BitReader;
pub use writer::BitWriter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_record_shaped_roundtrip() {
        // interacting, position xyz, orientation, as a standard record lays them out.
        let mut writer = BitWriter::with_capacity(11);
        writer.write_bool(true);
        writer.write_int_in_range(-131_072, -131_072, 131_072).unwrap();
        writer.write_int_in_range(4_096, -131_072, 131_072).unwrap();
        writer.write_int_in_range(256, -16_384, 16_384).unwrap();
        writer.write_bits(0b10, 2).unwrap();
        for component in [0x000, 0x1FF, 0x0AA] {
            writer.write_bits(component, 9).unwrap();
        }
        assert_eq!(writer.bits_written(), 1 + 19 + 19 + 16 + 2 + 27);
        let bytes = writer.finish();
        assert_eq!(bytes.len(), 11);

        let mut reader = BitReader::new(&bytes);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_int_in_range(-131_072, 131_072).unwrap(), -131_072);
        assert_eq!(reader.read_int_in_range(-131_072, 131_072).unwrap(), 4_096);
        assert_eq!(reader.read_int_in_range(-16_384, 16_384).unwrap(), 256);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        for component in [0x000, 0x1FF, 0x0AA] {
            assert_eq!(reader.read_bits(9).unwrap(), component);
        }
        assert_eq!(reader.bits_remaining(), 4);
    }

    #[test]
    fn widths_at_every_boundary_offset() {
        for lead in 0..8u8 {
            for bits in [1u8, 7, 8, 9, 31, 63, 64] {
                let value = if bits == 64 { u64::MAX - 1 } else { ((1 << bits) - 2) | 1 };
                let mut writer = BitWriter::new();
                writer.write_bits(0, lead).unwrap();
                writer.write_bits(value, bits).unwrap();
                let bytes = writer.finish();

                let mut reader = BitReader::new(&bytes);
                reader.read_bits(lead).unwrap();
                assert_eq!(reader.read_bits(bits).unwrap(), value, "lead {lead}, {bits} bits");
            }
        }
    }
}
