//! Growable MSB-first bit sink.

use crate::error::{BitError, BitResult};
use crate::range::{bits_required, check_range};

/// Packs fields of arbitrary bit width into bytes, most significant bit
/// first. [`finish`](Self::finish) zero-pads the final byte.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Bits of the byte under construction, right-aligned.
    partial: u8,
    /// Number of valid bits in `partial`, always below 8.
    partial_len: u8,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for `bytes` output bytes.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + usize::from(self.partial_len)
    }

    pub fn write_bool(&mut self, value: bool) {
        self.push(u64::from(value), 1);
    }

    /// Writes the low `bits` bits of `value` (`bits <= 64`).
    ///
    /// # Errors
    ///
    /// [`BitError::InvalidBitCount`] for `bits > 64`, and
    /// [`BitError::ValueOutOfRange`] when `value` has bits set above `bits`.
    pub fn write_bits(&mut self, value: u64, bits: u8) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }
        self.push(value, bits);
        Ok(())
    }

    /// Writes `value` as its offset from `min` in `bits_required(min, max)`
    /// bits.
    pub fn write_int_in_range(&mut self, value: i64, min: i64, max: i64) -> BitResult<()> {
        check_range(min, max)?;
        if !(min..=max).contains(&value) {
            return Err(BitError::IntOutOfRange { value, min, max });
        }
        self.push(value.abs_diff(min), bits_required(min, max));
        Ok(())
    }

    /// Zero-pads to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        if self.partial_len > 0 {
            self.push(0, 8 - self.partial_len);
        }
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.bytes
    }

    /// Appends the finished bytes to `buf`.
    pub fn finish_into(self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.finish());
    }

    /// Moves `bits` bits of `value` into the output one byte-sized chunk at
    /// a time. `value` must already fit in `bits`.
    fn push(&mut self, value: u64, bits: u8) {
        let mut left = bits;
        while left > 0 {
            let room = 8 - self.partial_len;
            let take = room.min(left);
            let chunk = ((value >> (left - take)) as u8) & (u8::MAX >> (8 - take));
            self.partial = if take == 8 {
                chunk
            } else {
                (self.partial << take) | chunk
            };
            self.partial_len += take;
            left -= take;
            if self.partial_len == 8 {
                self.bytes.push(self.partial);
                self.partial = 0;
                self.partial_len = 0;
            }
        }
    }
}
