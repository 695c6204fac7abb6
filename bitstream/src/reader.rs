//! Bounds-checked MSB-first bit cursor over a borrowed buffer.

use crate::error::{BitError, BitResult};
use crate::range::{bits_required, check_range};

/// Reads fields packed by [`BitWriter`](crate::BitWriter).
///
/// A read that would run past the end fails with
/// [`BitError::EndOfBuffer`] and leaves the cursor where it was, so
/// malformed input never panics and never half-consumes a field.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute position of the next unread bit.
    cursor: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    /// Unread bits, including the zero padding of the final byte.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.cursor)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.cursor
    }

    pub fn read_bool(&mut self) -> BitResult<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads a `bits`-wide unsigned field (`bits <= 64`).
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        self.require(usize::from(bits))?;

        let mut value = 0u64;
        let mut left = bits;
        while left > 0 {
            let byte = self.data[self.cursor / 8];
            let unread_in_byte = 8 - (self.cursor % 8) as u8;
            let take = unread_in_byte.min(left);
            let chunk = (byte >> (unread_in_byte - take)) & (u8::MAX >> (8 - take));
            value = (value << take) | u64::from(chunk);
            self.cursor += usize::from(take);
            left -= take;
        }
        Ok(value)
    }

    /// Reads a value written with
    /// [`BitWriter::write_int_in_range`](crate::BitWriter::write_int_in_range).
    ///
    /// An offset that lands above `max` is an error, never wrapped.
    pub fn read_int_in_range(&mut self, min: i64, max: i64) -> BitResult<i64> {
        check_range(min, max)?;
        let start = self.cursor;
        let offset = self.read_bits(bits_required(min, max))?;
        let value = i128::from(min) + i128::from(offset);
        match i64::try_from(value) {
            Ok(value) if value <= max => Ok(value),
            _ => {
                self.cursor = start;
                Err(BitError::IntOutOfRange {
                    value: i64::try_from(value).unwrap_or(i64::MAX),
                    min,
                    max,
                })
            }
        }
    }

    /// Skips the padding up to the next byte boundary.
    pub fn align_to_byte(&mut self) -> BitResult<()> {
        let padding = (8 - self.cursor % 8) % 8;
        self.require(padding)?;
        self.cursor += padding;
        Ok(())
    }

    fn require(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::EndOfBuffer {
                requested: bits,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_nothing_to_read() {
        let mut reader = BitReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.read_bits(0).unwrap(), 0);
        assert_eq!(
            reader.read_bool().unwrap_err(),
            BitError::EndOfBuffer {
                requested: 1,
                available: 0
            }
        );
    }

    #[test]
    fn field_spanning_three_bytes() {
        // 4 bits of padding, then a 17-bit field 1_0110_0101_1010_0011.
        let mut reader = BitReader::new(&[0b0000_1011, 0b0010_1101, 0b0001_1000]);
        reader.read_bits(4).unwrap();
        assert_eq!(reader.read_bits(17).unwrap(), 0b1_0110_0101_1010_0011);
        assert_eq!(reader.bit_position(), 21);
        assert_eq!(reader.bits_remaining(), 3);
    }

    #[test]
    fn full_width_read() {
        let bytes = 0x0123_4567_89AB_CDEFu64.to_be_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(64).unwrap(), 0x0123_4567_89AB_CDEF);
        assert!(reader.is_empty());
    }

    #[test]
    fn short_read_leaves_cursor_in_place() {
        let mut reader = BitReader::new(&[0xFF]);
        reader.read_bits(3).unwrap();
        let err = reader.read_bits(6).unwrap_err();
        assert_eq!(
            err,
            BitError::EndOfBuffer {
                requested: 6,
                available: 5
            }
        );
        assert_eq!(reader.bit_position(), 3);
    }

    #[test]
    fn oversized_width_rejected() {
        let mut reader = BitReader::new(&[0; 16]);
        assert_eq!(
            reader.read_bits(65).unwrap_err(),
            BitError::InvalidBitCount {
                bits: 65,
                max_bits: 64
            }
        );
    }

    #[test]
    fn ranged_read_applies_offset() {
        // 3-bit offsets 000 and 111 over [-4, 3].
        let mut reader = BitReader::new(&[0b0001_1100]);
        assert_eq!(reader.read_int_in_range(-4, 3).unwrap(), -4);
        assert_eq!(reader.read_int_in_range(-4, 3).unwrap(), 3);
    }

    #[test]
    fn ranged_read_rejects_offset_above_max() {
        // [1, 5] uses 3 bits; 0b111 decodes to 8.
        let mut reader = BitReader::new(&[0b1110_0000]);
        let err = reader.read_int_in_range(1, 5).unwrap_err();
        assert!(matches!(err, BitError::IntOutOfRange { value: 8, .. }));
        assert_eq!(reader.bit_position(), 0);
    }

    #[test]
    fn align_skips_padding_only_mid_byte() {
        let mut reader = BitReader::new(&[0b1000_0000, 0xAB]);
        reader.align_to_byte().unwrap();
        assert_eq!(reader.bit_position(), 0);
        assert!(reader.read_bool().unwrap());
        reader.align_to_byte().unwrap();
        assert_eq!(reader.bit_position(), 8);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
    }
}
