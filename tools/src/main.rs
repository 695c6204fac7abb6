use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use interp::InterpolationKind;
use log::info;
use tools::{run_simulation, Profile, SendMode, SimConfig, SimSummary};

#[derive(Parser)]
#[command(
    name = "cubesnap-sim",
    version,
    about = "Deterministic cube snapshot playout simulation"
)]
struct Cli {
    /// Load the base configuration from a JSON file; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of world objects besides player slots.
    #[arg(long)]
    world_objects: Option<usize>,
    /// Number of player slots.
    #[arg(long)]
    max_players: Option<u16>,
    /// Number of snapshots to send.
    #[arg(long)]
    ticks: Option<u32>,
    /// RNG seed for deterministic results.
    #[arg(long)]
    seed: Option<u64>,
    /// Snapshots per second.
    #[arg(long)]
    send_rate: Option<f64>,
    /// Receiver frames per second.
    #[arg(long)]
    render_rate: Option<f64>,
    /// Probability that a non-player cube moves.
    #[arg(long)]
    moving_fraction: Option<f64>,
    #[arg(long, value_enum)]
    profile: Option<Profile>,
    #[arg(long, value_enum)]
    mode: Option<SendMode>,
    /// Ticks between full keyframes in delta mode.
    #[arg(long)]
    keyframe_interval: Option<u32>,
    /// Playout delay in seconds.
    #[arg(long)]
    playout_delay: Option<f64>,
    #[arg(long, value_enum)]
    interpolation: Option<InterpolationArg>,
    /// Hermite extrapolation fraction.
    #[arg(long)]
    extrapolation: Option<f64>,
    /// One-way latency in seconds.
    #[arg(long)]
    latency: Option<f64>,
    /// Maximum extra delay in seconds.
    #[arg(long)]
    jitter: Option<f64>,
    /// Packet loss probability.
    #[arg(long)]
    packet_loss: Option<f64>,
    /// Write the JSON summary here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Fail if p95 packet size exceeds this value.
    #[arg(long)]
    max_p95_bytes: Option<u64>,
    /// Fail if average packet size exceeds this value.
    #[arg(long)]
    max_avg_bytes: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum InterpolationArg {
    Linear,
    Hermite,
    HermiteExtrapolate,
}

impl From<InterpolationArg> for InterpolationKind {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Linear => Self::Linear,
            InterpolationArg::Hermite => Self::Hermite,
            InterpolationArg::HermiteExtrapolate => Self::HermiteWithExtrapolation,
        }
    }
}

impl Cli {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimConfig::default(),
        };

        macro_rules! override_field {
            ($($field:ident),*) => {
                $(if let Some(value) = self.$field {
                    config.$field = value;
                })*
            };
        }
        override_field!(
            world_objects,
            max_players,
            ticks,
            seed,
            send_rate,
            render_rate,
            moving_fraction,
            profile,
            mode,
            keyframe_interval,
            playout_delay,
            extrapolation,
            latency,
            jitter,
            packet_loss
        );
        if let Some(interpolation) = self.interpolation {
            config.interpolation = interpolation.into();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.sim_config()?;

    let summary = run_simulation(&config)?;
    summary.assert_budgets(cli.max_p95_bytes, cli.max_avg_bytes)?;
    write_summary(cli.out.as_deref(), &summary)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

fn write_summary(out: Option<&Path>, summary: &SimSummary) -> Result<()> {
    let contents = serde_json::to_string_pretty(summary).context("serialize summary")?;
    match out {
        Some(path) => {
            fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
            info!("summary written to {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
