//! glidewheeld - smooth-scroll daemon for virtualized pointer devices.
//!
//! Grabs the VM pointer device, converts its coarse wheel detents into
//! fine-grained inertial motion, and republishes everything through a
//! uinput clone with hi-res wheel axes.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glidewheel_engine::Engine;
use glidewheel_evdev::{find_scroll_device, DeviceError, ScrollSource, VirtualSink};
use glidewheel_motion::Tuning;
use glidewheel_scheduler::{CancelToken, Poller, TickTimer};

/// How long consumers get to enumerate the clone before the source is
/// grabbed. Grabbing too early races the compositor's hotplug scan and
/// loses the first events.
const SINK_SETTLE: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "glidewheeld")]
#[command(about = "Smooth-scroll daemon for virtualized pointer devices")]
#[command(version)]
#[command(long_about = "
glidewheeld turns the coarse scroll-wheel pulses of a virtualized pointer
device into fine-grained inertial scrolling. It grabs the source device,
injects wheel impulses into a per-axis velocity model, and emits smooth
hi-res motion (plus legacy detents every 120 fine units) through a uinput
clone. All other events pass through untouched.

Out-of-range tuning flags are clamped to the nearest valid value, never
rejected.
")]
struct Cli {
    /// Source device node; auto-detected from /dev/input when omitted
    device: Option<PathBuf>,

    /// Velocity fraction drained per tick, (0.01, 0.2]
    #[arg(short, long)]
    friction: Option<f64>,

    /// Scheduler tick interval in milliseconds, 1..=50
    #[arg(short, long, value_name = "MS")]
    tick: Option<u64>,

    /// Impulse rate (events/sec) below which scrolling is undampened
    #[arg(long)]
    low_rate: Option<f64>,

    /// Impulse rate (events/sec) at which dampening saturates
    #[arg(long)]
    high_rate: Option<f64>,

    /// Dampening floor at saturation, (0, 1]
    #[arg(long)]
    min_scale: Option<f64>,

    /// Velocity below which an axis settles to rest
    #[arg(long)]
    stop_threshold: Option<f64>,

    /// Gain applied to every injected impulse, (0.01, 10]
    #[arg(short, long)]
    multiplier: Option<f64>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        if let Some(friction) = self.friction {
            tuning.friction = friction;
        }
        if let Some(tick) = self.tick {
            tuning.tick_interval = Duration::from_millis(tick);
        }
        if let Some(low_rate) = self.low_rate {
            tuning.low_rate = low_rate;
        }
        if let Some(high_rate) = self.high_rate {
            tuning.high_rate = high_rate;
        }
        if let Some(min_scale) = self.min_scale {
            tuning.min_scale = min_scale;
        }
        if let Some(stop_threshold) = self.stop_threshold {
            tuning.stop_threshold = stop_threshold;
        }
        if let Some(multiplier) = self.multiplier {
            tuning.multiplier = multiplier;
        }
        tuning.clamped()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("glidewheel={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run(&cli) {
        error!("{e:#}");

        let exit_code = match e.downcast_ref::<DeviceError>() {
            Some(DeviceError::NoDeviceFound | DeviceError::Scan(_)) => 2,
            Some(DeviceError::Open { .. }) => 3,
            Some(DeviceError::Grab(_) | DeviceError::SinkCreate(_)) => 4,
            None => 1,
        };
        std::process::exit(exit_code);
    }

    info!("stopped");
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let tuning = cli.tuning();
    debug!(?tuning, "effective tuning");

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install signal handler")?;

    let path = match &cli.device {
        Some(path) => path.clone(),
        None => find_scroll_device()?,
    };
    let mut source = ScrollSource::open(&path)?;

    let sink = VirtualSink::clone_of(&source)?;
    // Let the input stack pick up the clone before exclusive capture.
    thread::sleep(SINK_SETTLE);
    source.grab()?;

    let mut poller = Poller::new()?;
    let mut timer = TickTimer::new(tuning.tick_interval)?;
    let mut engine = Engine::new(tuning, sink, cancel);
    engine.register_sources(&poller, &source, &timer)?;

    engine.run(&mut source, &mut poller, &mut timer)?;

    source.ungrab();
    Ok(())
}
