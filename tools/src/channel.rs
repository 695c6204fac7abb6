//! Simulated unreliable link with latency, jitter and loss.

use crate::rng::Rng;

#[derive(Debug)]
struct InFlight {
    deliver_at: f64,
    order: u64,
    bytes: Vec<u8>,
}

/// One-way packet link. Jitter may reorder packets.
#[derive(Debug)]
pub struct LossyChannel {
    latency: f64,
    jitter: f64,
    packet_loss: f64,
    rng: Rng,
    in_flight: Vec<InFlight>,
    sent: u64,
    lost: u64,
}

impl LossyChannel {
    #[must_use]
    pub const fn new(latency: f64, jitter: f64, packet_loss: f64, rng: Rng) -> Self {
        Self {
            latency,
            jitter,
            packet_loss,
            rng,
            in_flight: Vec::new(),
            sent: 0,
            lost: 0,
        }
    }

    /// Queues `bytes` sent at `time`. Returns `false` if the packet was dropped.
    pub fn send(&mut self, time: f64, bytes: Vec<u8>) -> bool {
        self.sent += 1;
        if self.rng.chance(self.packet_loss) {
            self.lost += 1;
            return false;
        }
        let deliver_at = time + self.latency + self.jitter * self.rng.next_f64();
        self.in_flight.push(InFlight {
            deliver_at,
            order: self.sent,
            bytes,
        });
        true
    }

    /// Removes every packet due by `time`, in arrival order.
    pub fn deliver(&mut self, time: f64) -> Vec<(f64, Vec<u8>)> {
        let (mut ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|packet| packet.deliver_at <= time);
        self.in_flight = pending;
        ready.sort_by(|a, b| {
            a.deliver_at
                .total_cmp(&b.deliver_at)
                .then(a.order.cmp(&b.order))
        });
        ready
            .into_iter()
            .map(|packet| (packet.deliver_at, packet.bytes))
            .collect()
    }

    #[must_use]
    pub const fn sent(&self) -> u64 {
        self.sent
    }

    #[must_use]
    pub const fn lost(&self) -> u64 {
        self.lost
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_after_latency() {
        let mut channel = LossyChannel::new(0.1, 0.0, 0.0, Rng::new(1));
        assert!(channel.send(0.0, vec![1]));
        assert!(channel.deliver(0.05).is_empty());
        let delivered = channel.deliver(0.1);
        assert_eq!(delivered, vec![(0.1, vec![1])]);
        assert_eq!(channel.in_flight(), 0);
    }

    #[test]
    fn total_loss_drops_everything() {
        let mut channel = LossyChannel::new(0.0, 0.0, 1.0, Rng::new(1));
        for i in 0..10u8 {
            assert!(!channel.send(f64::from(i), vec![i]));
        }
        assert_eq!(channel.lost(), 10);
        assert_eq!(channel.sent(), 10);
        assert!(channel.deliver(100.0).is_empty());
    }

    #[test]
    fn jittered_packets_arrive_sorted() {
        let mut channel = LossyChannel::new(0.05, 0.1, 0.0, Rng::new(9));
        for i in 0..20u8 {
            channel.send(f64::from(i) * 0.01, vec![i]);
        }
        let delivered = channel.deliver(10.0);
        assert_eq!(delivered.len(), 20);
        assert!(delivered.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    }
}
