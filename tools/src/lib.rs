//! Playout simulation for the cubesnap codec.
//!
//! [`run_simulation`] drives the whole pipeline end to end:
//!
//! - an analytic scene of orbiting cubes is sampled at the send rate
//! - each sample is quantized and encoded as a full or delta packet
//! - packets cross a [`LossyChannel`] with latency, jitter and loss
//! - the receiver decodes them into a [`SnapshotInterpolationBuffer`]
//! - the buffer is sampled at the render rate and compared to ground truth
//!
//! Runs are deterministic for a given [`SimConfig`].

mod channel;
mod rng;
mod scene;
mod summary;

use anyhow::{Context, Result};
use codec::{
    apply_delta_snapshot_from_packet, decode_full_snapshot_from_packet,
    encode_delta_snapshot_with_scratch, encode_full_snapshot, estimate_delta_bits, CodecError,
    CodecScratch, QuantizedCubeState, QuantizedSnapshot, Sequence, Snapshot, WireLimits,
};
use interp::{
    InterpolationKind, ObjectUpdate, PlaybackState, PlayoutConfig, SnapshotInterpolationBuffer,
};
use log::{debug, info};
use schema::{CubeFormat, EntityRegistry, StreamLayout};
use serde::{Deserialize, Serialize};
use wire::decode_packet;

pub use channel::LossyChannel;
pub use rng::Rng;
pub use scene::Scene;
pub use summary::SimSummary;

/// Salt separating the channel's random stream from the scene's.
const CHANNEL_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Encoding profile of the simulated stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Standard,
    WithVelocity,
    HighPrecision,
}

impl Profile {
    #[must_use]
    pub fn format(self) -> CubeFormat {
        match self {
            Self::Standard => CubeFormat::standard(),
            Self::WithVelocity => CubeFormat::standard_with_velocity(),
            Self::HighPrecision => CubeFormat::high_precision(),
        }
    }
}

/// Packet kind policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    /// Every packet is a full snapshot.
    Full,
    /// Deltas against the latest keyframe, with a full keyframe every
    /// `keyframe_interval` ticks.
    Delta,
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world_objects: usize,
    pub max_players: u16,
    /// Snapshots to send.
    pub ticks: u32,
    pub seed: u64,
    pub send_rate: f64,
    pub render_rate: f64,
    /// Probability that a non-player cube moves.
    pub moving_fraction: f64,
    pub profile: Profile,
    pub mode: SendMode,
    pub keyframe_interval: u32,
    pub playout_delay: f64,
    pub interpolation: InterpolationKind,
    pub extrapolation: f64,
    /// One-way latency in seconds.
    pub latency: f64,
    /// Maximum extra delay in seconds, uniform.
    pub jitter: f64,
    pub packet_loss: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let playout = PlayoutConfig::default();
        Self {
            world_objects: 900,
            max_players: 64,
            ticks: 600,
            seed: 1,
            send_rate: playout.send_rate,
            render_rate: 120.0,
            moving_fraction: 0.1,
            profile: Profile::WithVelocity,
            mode: SendMode::Delta,
            keyframe_interval: 30,
            playout_delay: playout.playout_delay,
            interpolation: playout.interpolation,
            extrapolation: playout.extrapolation,
            latency: 0.05,
            jitter: 0.02,
            packet_loss: 0.01,
        }
    }
}

impl SimConfig {
    /// Playout parameters for the receiver.
    #[must_use]
    pub const fn playout(&self) -> PlayoutConfig {
        PlayoutConfig {
            playout_delay: self.playout_delay,
            send_rate: self.send_rate,
            interpolation: self.interpolation,
            extrapolation: self.extrapolation,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| -> Result<()> {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("{name} must be positive, got {value}");
            }
            Ok(())
        };
        let non_negative = |name: &str, value: f64| -> Result<()> {
            if !(value.is_finite() && value >= 0.0) {
                anyhow::bail!("{name} must be non-negative, got {value}");
            }
            Ok(())
        };
        let probability = |name: &str, value: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{name} must be within [0, 1], got {value}");
            }
            Ok(())
        };

        positive("send_rate", self.send_rate)?;
        positive("render_rate", self.render_rate)?;
        non_negative("playout_delay", self.playout_delay)?;
        non_negative("extrapolation", self.extrapolation)?;
        non_negative("latency", self.latency)?;
        non_negative("jitter", self.jitter)?;
        probability("packet_loss", self.packet_loss)?;
        probability("moving_fraction", self.moving_fraction)?;
        if self.keyframe_interval == 0 {
            anyhow::bail!("keyframe_interval must be at least 1");
        }
        Ok(())
    }
}

/// Encodes ticks into packets under the configured [`SendMode`].
struct Sender<'a> {
    layout: &'a StreamLayout,
    mode: SendMode,
    keyframe_interval: u32,
    keyframe: Option<(Sequence, QuantizedSnapshot)>,
    scratch: CodecScratch,
    buf: Vec<u8>,
}

impl<'a> Sender<'a> {
    fn new(layout: &'a StreamLayout, mode: SendMode, keyframe_interval: u32) -> Self {
        Self {
            layout,
            mode,
            keyframe_interval,
            keyframe: None,
            scratch: CodecScratch::with_capacity(layout.entity_count()),
            buf: vec![0u8; WireLimits::default().max_packet_bytes],
        }
    }

    /// Returns the packet bytes and whether the packet is a full snapshot.
    fn encode(
        &mut self,
        tick: u32,
        snapshot: QuantizedSnapshot,
        summary: &mut SimSummary,
    ) -> Result<(Vec<u8>, bool)> {
        let sequence = Sequence::new(tick as u16);
        let keyframe_due = tick % self.keyframe_interval == 0;

        if self.mode == SendMode::Delta && !keyframe_due {
            if let Some((baseline_sequence, baseline)) = &self.keyframe {
                let full_bits = QuantizedCubeState::bit_cost(&self.layout.format)
                    * self.layout.entity_count();
                let delta_bits = estimate_delta_bits(&self.layout.format, baseline, &snapshot);
                if delta_bits < full_bits {
                    let written = encode_delta_snapshot_with_scratch(
                        self.layout,
                        sequence,
                        *baseline_sequence,
                        baseline,
                        &snapshot,
                        &mut self.scratch,
                        &mut self.buf,
                    )
                    .with_context(|| format!("encode delta snapshot {tick}"))?;
                    return Ok((self.buf[..written].to_vec(), false));
                }
                summary.deltas_promoted += 1;
            }
        }

        let written = encode_full_snapshot(self.layout, sequence, &snapshot, &mut self.buf)
            .with_context(|| format!("encode full snapshot {tick}"))?;
        let bytes = self.buf[..written].to_vec();
        if self.mode == SendMode::Delta {
            self.keyframe = Some((sequence, snapshot));
        }
        Ok((bytes, true))
    }
}

/// Decodes packets back into snapshots, tracking the latest keyframe.
struct Receiver<'a> {
    layout: &'a StreamLayout,
    limits: WireLimits,
    keyframe: Option<(Sequence, QuantizedSnapshot)>,
}

impl<'a> Receiver<'a> {
    fn new(layout: &'a StreamLayout) -> Self {
        Self {
            layout,
            limits: WireLimits::default(),
            keyframe: None,
        }
    }

    /// Returns `None` for a delta whose keyframe was never received.
    fn receive(&mut self, bytes: &[u8]) -> Result<Option<(Sequence, Snapshot)>> {
        let packet = decode_packet(bytes, &self.limits).context("decode packet header")?;
        let sequence = Sequence::new(packet.header.sequence);

        let quantized = if packet.header.flags.is_full_snapshot() {
            let snapshot = decode_full_snapshot_from_packet(self.layout, &packet)
                .context("decode full snapshot")?;
            self.keyframe = Some((sequence, snapshot.clone()));
            snapshot
        } else {
            let Some((keyframe_sequence, keyframe)) = &self.keyframe else {
                return Ok(None);
            };
            match apply_delta_snapshot_from_packet(
                self.layout,
                *keyframe_sequence,
                keyframe,
                &packet,
            ) {
                Ok(snapshot) => snapshot,
                Err(CodecError::BaselineMismatch { expected, found }) => {
                    debug!(
                        "delta {} built on keyframe {found}, holding {expected}",
                        sequence.raw()
                    );
                    return Ok(None);
                }
                Err(err) => return Err(err).context("apply delta snapshot"),
            }
        };
        Ok(Some((sequence, quantized.dequantize(&self.layout.format))))
    }
}

/// Runs one deterministic simulation and summarizes it.
pub fn run_simulation(config: &SimConfig) -> Result<SimSummary> {
    config.validate()?;
    let registry = EntityRegistry::new(config.world_objects, config.max_players)
        .context("build entity registry")?;
    let layout =
        StreamLayout::new(config.profile.format(), registry.clone()).context("build layout")?;
    let playout = config.playout();
    info!(
        "simulating {} cubes for {} ticks, layout 0x{:016X}",
        layout.entity_count(),
        config.ticks,
        layout.hash()
    );

    let mut rng = Rng::new(config.seed);
    let scene = Scene::new(layout.entity_count(), config.moving_fraction, &mut rng);
    let mut channel = LossyChannel::new(
        config.latency,
        config.jitter,
        config.packet_loss,
        Rng::new(config.seed ^ CHANNEL_SEED_SALT),
    );
    let mut sender = Sender::new(&layout, config.mode, config.keyframe_interval);
    let mut receiver = Receiver::new(&layout);
    let mut buffer = SnapshotInterpolationBuffer::new(registry);
    let mut updates = vec![ObjectUpdate::default(); buffer.registry().len()];

    let mut summary = SimSummary::new(
        config.clone(),
        layout.entity_count(),
        QuantizedCubeState::bit_cost(&layout.format),
    );

    let send_interval = 1.0 / config.send_rate;
    let render_interval = 1.0 / config.render_rate;
    let last_tick_time = f64::from(config.ticks.saturating_sub(1)) * send_interval;
    let deadline = last_tick_time + config.playout_delay + config.latency + config.jitter + 1.0;

    let mut next_tick = 0u32;
    let mut frame = 0u64;
    loop {
        let now = frame as f64 * render_interval;
        if now > deadline {
            break;
        }
        // Stop once playout reaches the final tick; sampling past it can only stall.
        if next_tick == config.ticks && channel.in_flight() == 0 {
            let drained = buffer
                .start_time()
                .map_or(true, |start| now - start - config.playout_delay >= last_tick_time);
            if drained {
                break;
            }
        }

        while next_tick < config.ticks && f64::from(next_tick) * send_interval <= now {
            let send_time = f64::from(next_tick) * send_interval;
            let quantized =
                QuantizedSnapshot::quantize(&scene.snapshot_at(send_time), &layout.format);
            let (bytes, full) = sender.encode(next_tick, quantized, &mut summary)?;
            summary.push_packet(bytes.len(), full);
            channel.send(send_time, bytes);
            next_tick += 1;
        }

        for (arrival, bytes) in channel.deliver(now) {
            match receiver.receive(&bytes)? {
                Some((sequence, snapshot)) => buffer.add_snapshot(arrival, sequence, snapshot),
                None => summary.packets_undecodable += 1,
            }
        }

        let count = buffer.get_view_update(&playout, now, &mut updates);
        if count > 0 {
            summary.frames_rendered += 1;
            if let Some(start) = buffer.start_time() {
                let playout_time = now - start - config.playout_delay;
                for update in &updates[..count] {
                    if let Some(truth) = scene.position_at(update.id.index(), playout_time) {
                        summary.push_error(f64::from(truth.distance(update.position)));
                    }
                }
            }
        } else if buffer.state() != PlaybackState::Stopped {
            summary.frames_without_updates += 1;
        }
        frame += 1;
    }

    summary.frames = frame;
    summary.packets_sent = channel.sent();
    summary.packets_lost = channel.lost();
    summary.playout = buffer.stats_mut().take();
    summary.finalize();
    info!(
        "sent {} packets ({} lost), rendered {} of {} frames",
        summary.packets_sent, summary.packets_lost, summary.frames_rendered, summary.frames
    );
    Ok(summary)
}
