//! Bit cursor errors.

use thiserror::Error;

pub type BitResult<T> = Result<T, BitError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BitError {
    /// A read needed more bits than the buffer holds.
    #[error("attempted to read {requested} bits but only {available} bits available")]
    EndOfBuffer { requested: usize, available: usize },

    /// Field width above what a single read or write supports.
    #[error("invalid bit count {bits}, maximum allowed is {max_bits}")]
    InvalidBitCount { bits: u8, max_bits: u8 },

    /// Value has bits set above the declared field width.
    #[error("value {value} cannot be represented in {bits} bits")]
    ValueOutOfRange { value: u64, bits: u8 },

    /// Ranged integer outside its declared `[min, max]`, on write or after decode.
    #[error("integer {value} outside declared range [{min}, {max}]")]
    IntOutOfRange { value: i64, min: i64, max: i64 },

    #[error("invalid range [{min}, {max}]")]
    InvalidRange { min: i64, max: i64 },

    /// Compressed float parameters need finite `min < max` and a positive
    /// resolution that splits the range into at most 2^53 steps.
    #[error("invalid float range [{min}, {max}] at resolution {resolution}")]
    InvalidFloatRange { min: f32, max: f32, resolution: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_values() {
        let cases = [
            (
                BitError::EndOfBuffer {
                    requested: 29,
                    available: 3,
                },
                &["29 bits", "3 bits"][..],
            ),
            (
                BitError::InvalidBitCount {
                    bits: 70,
                    max_bits: 64,
                },
                &["70", "64"][..],
            ),
            (
                BitError::ValueOutOfRange {
                    value: 512,
                    bits: 9,
                },
                &["512", "9 bits"][..],
            ),
            (
                BitError::IntOutOfRange {
                    value: -131_073,
                    min: -131_072,
                    max: 131_072,
                },
                &["-131073", "[-131072, 131072]"][..],
            ),
            (BitError::InvalidRange { min: 4, max: 1 }, &["[4, 1]"][..]),
            (
                BitError::InvalidFloatRange {
                    min: -2.5,
                    max: 2.5,
                    resolution: 0.0,
                },
                &["[-2.5, 2.5]", "resolution 0"][..],
            ),
        ];
        for (err, needles) in cases {
            let msg = err.to_string();
            for needle in needles {
                assert!(msg.contains(needle), "{msg:?} should mention {needle:?}");
            }
        }
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<BitError>();
    }
}
