//! Sparse change-set index coding.
//!
//! A change set is a strictly ascending list of object indices. It is written
//! as a count, the first index in a fixed 10-bit field, then each following
//! index as the difference from its predecessor:
//!
//! | difference | bits                         |
//! |------------|------------------------------|
//! | 1..=8      | `1` + 3                      |
//! | 9..=40     | `0` `1` + 5                  |
//! | 41..       | `0` `0` + 10                 |
//!
//! [`estimate_change_set_bits`] runs the same tier logic over a membership
//! mask, so its result always equals the encoded length.

use bitstream::{bits_required, BitReader, BitWriter};

use crate::error::{CodecError, CodecResult};

/// Width of the absolute first index.
pub const ABSOLUTE_INDEX_BITS: u8 = 10;

const SMALL_MIN: i64 = 1;
const SMALL_MAX: i64 = 8;
const MEDIUM_MIN: i64 = 9;
const MEDIUM_MAX: i64 = 40;
const LARGE_MIN: i64 = 41;
const LARGE_MAX: i64 = LARGE_MIN + (1 << ABSOLUTE_INDEX_BITS) - 1;

/// Bits used by the count prefix for a table of `entity_count` objects.
#[must_use]
pub fn count_bits(entity_count: usize) -> usize {
    usize::from(bits_required(0, entity_count as i64))
}

/// Bits needed to encode the step from one changed index to the next.
#[must_use]
pub const fn relative_index_bits(difference: usize) -> usize {
    if difference <= SMALL_MAX as usize {
        1 + 3
    } else if difference <= MEDIUM_MAX as usize {
        1 + 1 + 5
    } else {
        1 + 1 + ABSOLUTE_INDEX_BITS as usize
    }
}

/// Writes a change set.
///
/// `indices` must be strictly ascending and below `entity_count`.
pub fn encode_change_set(
    writer: &mut BitWriter,
    indices: &[usize],
    entity_count: usize,
) -> CodecResult<()> {
    debug_assert!(
        indices.windows(2).all(|pair| pair[0] < pair[1]),
        "change set must be strictly ascending"
    );
    debug_assert!(indices.iter().all(|&index| index < entity_count));

    writer.write_int_in_range(indices.len() as i64, 0, entity_count as i64)?;
    let mut previous: Option<usize> = None;
    for &index in indices {
        match previous {
            None => writer.write_bits(index as u64, ABSOLUTE_INDEX_BITS)?,
            Some(previous) => {
                write_relative_index(writer, index as i64 - previous as i64)?;
            }
        }
        previous = Some(index);
    }
    Ok(())
}

/// Reads a change set into `out` (cleared first).
///
/// Every decoded index is bounds checked against `entity_count`.
pub fn decode_change_set(
    reader: &mut BitReader<'_>,
    entity_count: usize,
    out: &mut Vec<usize>,
) -> CodecResult<()> {
    out.clear();
    let count = reader.read_int_in_range(0, entity_count as i64)? as usize;
    out.reserve(count);

    let mut previous: Option<usize> = None;
    for _ in 0..count {
        let index = match previous {
            None => reader.read_bits(ABSOLUTE_INDEX_BITS)? as usize,
            Some(previous) => previous + read_relative_index(reader)? as usize,
        };
        if index >= entity_count {
            return Err(CodecError::IndexOutOfRange {
                index,
                count: entity_count,
            });
        }
        out.push(index);
        previous = Some(index);
    }
    Ok(())
}

/// Bit cost of encoding the set bits of `changed` without encoding them.
#[must_use]
pub fn estimate_change_set_bits(changed: &[bool]) -> usize {
    let mut bits = count_bits(changed.len());
    let mut previous: Option<usize> = None;
    for index in changed_indices(changed) {
        bits += match previous {
            None => usize::from(ABSOLUTE_INDEX_BITS),
            Some(previous) => relative_index_bits(index - previous),
        };
        previous = Some(index);
    }
    bits
}

/// Indices of the set entries of `changed`, ascending.
pub fn changed_indices(changed: &[bool]) -> impl Iterator<Item = usize> + '_ {
    changed
        .iter()
        .enumerate()
        .filter_map(|(index, &is_changed)| is_changed.then_some(index))
}

fn write_relative_index(writer: &mut BitWriter, difference: i64) -> CodecResult<()> {
    let small = difference <= SMALL_MAX;
    writer.write_bool(small);
    if small {
        writer.write_int_in_range(difference, SMALL_MIN, SMALL_MAX)?;
        return Ok(());
    }

    let medium = difference <= MEDIUM_MAX;
    writer.write_bool(medium);
    if medium {
        writer.write_int_in_range(difference, MEDIUM_MIN, MEDIUM_MAX)?;
        return Ok(());
    }

    writer.write_int_in_range(difference, LARGE_MIN, LARGE_MAX)?;
    Ok(())
}

fn read_relative_index(reader: &mut BitReader<'_>) -> CodecResult<i64> {
    if reader.read_bool()? {
        return Ok(reader.read_int_in_range(SMALL_MIN, SMALL_MAX)?);
    }
    if reader.read_bool()? {
        return Ok(reader.read_int_in_range(MEDIUM_MIN, MEDIUM_MAX)?);
    }
    Ok(reader.read_int_in_range(LARGE_MIN, LARGE_MAX)?)
}
