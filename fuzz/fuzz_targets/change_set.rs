#![no_main]

use bitstream::BitReader;
use codec::decode_change_set;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&count_byte, payload)) = data.split_first() else {
        return;
    };
    let entity_count = usize::from(count_byte) * 4 + 1;
    let mut reader = BitReader::new(payload);
    let mut indices = Vec::new();
    if decode_change_set(&mut reader, entity_count, &mut indices).is_ok() {
        assert!(indices.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(indices.iter().all(|&index| index < entity_count));
    }
});
