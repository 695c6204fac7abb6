use proptest::prelude::*;
use tools::{LossyChannel, Rng};

proptest! {
    #[test]
    fn deliveries_respect_latency_and_arrive_in_order(
        seed in any::<u64>(),
        latency in 0.0f64..0.2,
        jitter in 0.0f64..0.1,
        packet_loss in 0.0f64..0.5,
        sends in 1usize..200,
    ) {
        let mut channel = LossyChannel::new(latency, jitter, packet_loss, Rng::new(seed));
        let mut queued = 0u64;
        for tick in 0..sends {
            let time = tick as f64 / 60.0;
            if channel.send(time, vec![(tick % 256) as u8]) {
                queued += 1;
            }
        }
        prop_assert_eq!(channel.sent(), sends as u64);
        prop_assert_eq!(channel.sent() - channel.lost(), queued);

        let mut delivered = 0u64;
        let mut last_arrival = f64::NEG_INFINITY;
        let mut now = 0.0;
        while channel.in_flight() > 0 {
            now += 1.0 / 120.0;
            for (arrival, _) in channel.deliver(now) {
                prop_assert!(arrival <= now);
                prop_assert!(arrival >= latency);
                prop_assert!(arrival >= last_arrival);
                last_arrival = arrival;
                delivered += 1;
            }
        }
        prop_assert_eq!(delivered, queued);
    }
}
