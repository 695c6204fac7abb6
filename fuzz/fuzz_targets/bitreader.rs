#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Input bytes pick a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 4;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bool();
            }
            1 => {
                let bits = data[idx.saturating_sub(1)] % 70;
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.align_to_byte();
            }
            _ => {
                let max = i64::from(data[idx.saturating_sub(1)]) * 1021;
                let _ = reader.read_int_in_range(-max, max);
            }
        }
    }
    assert!(reader.bit_position() <= data.len() * 8);
});
