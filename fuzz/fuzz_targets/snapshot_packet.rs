#![no_main]

use codec::{
    apply_delta_snapshot_from_packet, decode_full_snapshot_from_packet, QuantizedSnapshot,
    Sequence,
};
use libfuzzer_sys::fuzz_target;
use schema::{CubeFormat, EntityRegistry, StreamLayout};

fuzz_target!(|data: &[u8]| {
    let Ok(registry) = EntityRegistry::new(60, 4) else {
        return;
    };
    let Ok(layout) = StreamLayout::new(CubeFormat::standard_with_velocity(), registry) else {
        return;
    };
    let limits = wire::Limits::for_testing();
    let Ok(packet) = wire::decode_packet(data, &limits) else {
        return;
    };

    if packet.header.flags.is_full_snapshot() {
        if let Ok(snapshot) = decode_full_snapshot_from_packet(&layout, &packet) {
            assert_eq!(snapshot.len(), layout.entity_count());
        }
    } else {
        let baseline = QuantizedSnapshot {
            cubes: vec![Default::default(); layout.entity_count()],
        };
        let baseline_sequence = Sequence::new(packet.header.baseline_sequence);
        if let Ok(snapshot) =
            apply_delta_snapshot_from_packet(&layout, baseline_sequence, &baseline, &packet)
        {
            assert_eq!(snapshot.len(), layout.entity_count());
        }
    }
});
