//! Helpers for integers serialized within a declared range.

use crate::error::{BitError, BitResult};

/// Number of bits needed to store any value of `[min, max]` as an offset
/// from `min`.
///
/// Returns 0 for a degenerate (single value) or empty range.
#[must_use]
pub const fn bits_required(min: i64, max: i64) -> u8 {
    if max <= min {
        return 0;
    }
    let span = max.abs_diff(min);
    (u64::BITS - span.leading_zeros()) as u8
}

pub(crate) fn check_range(min: i64, max: i64) -> BitResult<()> {
    if min > max {
        return Err(BitError::InvalidRange { min, max });
    }
    Ok(())
}
