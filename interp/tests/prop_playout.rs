use std::collections::HashMap;

use codec::{CubeState, Sequence, Snapshot};
use glam::Vec3;
use interp::{ObjectUpdate, PlayoutConfig, SequenceBuffer, SnapshotInterpolationBuffer};
use proptest::prelude::*;
use schema::EntityRegistry;

proptest! {
    #[test]
    fn find_returns_latest_insert_per_slot(
        inserts in proptest::collection::vec(any::<u16>(), 1..200),
    ) {
        let mut buffer = SequenceBuffer::new();
        let mut latest_per_slot: HashMap<usize, u16> = HashMap::new();
        for (order, &raw) in inserts.iter().enumerate() {
            buffer.insert(Sequence::new(raw), order);
            latest_per_slot.insert(usize::from(raw) % buffer.capacity(), raw);
        }

        for (order, &raw) in inserts.iter().enumerate() {
            let slot = usize::from(raw) % buffer.capacity();
            let found = buffer.find(Sequence::new(raw));
            if latest_per_slot[&slot] == raw {
                // Only the last insert of this sequence survives.
                let last = inserts.iter().rposition(|&other| other == raw).unwrap();
                prop_assert_eq!(found, Some(&last));
            } else {
                prop_assert!(found.is_none(), "insert {} of {} survived a collision", order, raw);
            }
        }

        buffer.reset();
        for &raw in &inserts {
            prop_assert!(buffer.find(Sequence::new(raw)).is_none());
        }
    }

    #[test]
    fn window_start_never_moves_backwards(
        count in 2u16..60,
        steps in proptest::collection::vec(0.0f64..0.05, 1..120),
    ) {
        let registry = EntityRegistry::new(3, 1).unwrap();
        let config = PlayoutConfig::default();
        let mut buffer = SnapshotInterpolationBuffer::new(registry);
        for raw in 0..count {
            let snapshot = Snapshot::filled(4, CubeState::at_rest(Vec3::new(f32::from(raw), 0.0, 0.0)));
            buffer.add_snapshot(0.0, Sequence::new(raw), snapshot);
        }

        let mut out = vec![ObjectUpdate::default(); 4];
        let mut time = config.playout_delay;
        let mut last_start = f64::NEG_INFINITY;
        for step in steps {
            time += step;
            buffer.get_view_update(&config, time, &mut out);
            if let Some(window) = buffer.window() {
                prop_assert!(window.start_time >= last_start);
                last_start = window.start_time;
            }
        }
    }

    #[test]
    fn produced_positions_stay_inside_the_bracket(
        sample in 0.0f64..0.5,
    ) {
        let registry = EntityRegistry::new(3, 1).unwrap();
        let config = PlayoutConfig::default();
        let mut buffer = SnapshotInterpolationBuffer::new(registry);
        for raw in 0..40u16 {
            let snapshot = Snapshot::filled(4, CubeState::at_rest(Vec3::new(f32::from(raw), 0.0, 0.0)));
            buffer.add_snapshot(0.0, Sequence::new(raw), snapshot);
        }

        let mut out = vec![ObjectUpdate::default(); 4];
        let mut time = config.playout_delay + 1e-3;
        while time < config.playout_delay + sample {
            buffer.get_view_update(&config, time, &mut out);
            time += 1.0 / 120.0;
        }
        if buffer.get_view_update(&config, time, &mut out) > 0 {
            let window = buffer.window().unwrap();
            let low = f32::from(window.start_sequence.raw());
            let high = f32::from(window.end_sequence.raw());
            prop_assert!(out[0].position.x >= low - 1e-4 && out[0].position.x <= high + 1e-4);
        }
    }
}
