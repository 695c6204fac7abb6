//! Run summary written as JSON.

use anyhow::Result;
use interp::InterpolationStats;
use serde::Serialize;

use crate::SimConfig;

#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub config: SimConfig,
    pub entities: usize,
    pub record_bits: usize,
    pub packets_sent: u64,
    pub packets_lost: u64,
    /// Delta packets whose baseline the receiver did not hold.
    pub packets_undecodable: u64,
    pub full_packets: u64,
    pub delta_packets: u64,
    /// Deltas replaced by a full packet because they would not be smaller.
    pub deltas_promoted: u64,
    pub bytes_total: u64,
    pub avg_packet_bytes: u64,
    pub p95_packet_bytes: u64,
    pub frames: u64,
    pub frames_rendered: u64,
    pub frames_without_updates: u64,
    pub mean_position_error: f64,
    pub max_position_error: f64,
    pub playout: InterpolationStats,
    #[serde(skip)]
    packet_sizes: Vec<u64>,
    #[serde(skip)]
    error_sum: f64,
    #[serde(skip)]
    error_samples: u64,
}

impl SimSummary {
    pub(crate) fn new(config: SimConfig, entities: usize, record_bits: usize) -> Self {
        Self {
            config,
            entities,
            record_bits,
            packets_sent: 0,
            packets_lost: 0,
            packets_undecodable: 0,
            full_packets: 0,
            delta_packets: 0,
            deltas_promoted: 0,
            bytes_total: 0,
            avg_packet_bytes: 0,
            p95_packet_bytes: 0,
            frames: 0,
            frames_rendered: 0,
            frames_without_updates: 0,
            mean_position_error: 0.0,
            max_position_error: 0.0,
            playout: InterpolationStats::default(),
            packet_sizes: Vec::new(),
            error_sum: 0.0,
            error_samples: 0,
        }
    }

    pub(crate) fn push_packet(&mut self, bytes: usize, full: bool) {
        let bytes = bytes as u64;
        if full {
            self.full_packets += 1;
        } else {
            self.delta_packets += 1;
        }
        self.bytes_total += bytes;
        self.packet_sizes.push(bytes);
    }

    pub(crate) fn push_error(&mut self, error: f64) {
        self.error_sum += error;
        self.error_samples += 1;
        self.max_position_error = self.max_position_error.max(error);
    }

    pub(crate) fn finalize(&mut self) {
        let packets = self.packet_sizes.len();
        if packets > 0 {
            self.avg_packet_bytes = self.bytes_total / packets as u64;
            self.packet_sizes.sort_unstable();
            let idx = ((packets as f64) * 0.95).ceil() as usize;
            let idx = idx.saturating_sub(1).min(packets - 1);
            self.p95_packet_bytes = self.packet_sizes[idx];
        }
        if self.error_samples > 0 {
            self.mean_position_error = self.error_sum / self.error_samples as f64;
        }
    }

    /// Fails when packet sizes exceed the given budgets.
    pub fn assert_budgets(&self, max_p95: Option<u64>, max_avg: Option<u64>) -> Result<()> {
        if let Some(max_p95) = max_p95 {
            if self.p95_packet_bytes > max_p95 {
                anyhow::bail!(
                    "p95 packet bytes {} exceeds budget {}",
                    self.p95_packet_bytes,
                    max_p95
                );
            }
        }
        if let Some(max_avg) = max_avg {
            if self.avg_packet_bytes > max_avg {
                anyhow::bail!(
                    "avg packet bytes {} exceeds budget {}",
                    self.avg_packet_bytes,
                    max_avg
                );
            }
        }
        Ok(())
    }
}
