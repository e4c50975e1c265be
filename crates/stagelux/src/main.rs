//! Stagelux - Headless DMX Lighting Engine
//!
//! Loads a patch document (or the stock rig), then streams the rig state to
//! an Art-Net node at a fixed rate until interrupted.

#![warn(missing_docs)]

mod logging_setup;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use tracing::{info, warn};

use stagelux_control::dmx::{ArtNetSender, DmxScheduler, DEFAULT_TARGET, FRAME_INTERVAL};
use stagelux_core::state::default_rig;
use stagelux_io::load_patch;

use crate::logging_setup::LogConfig;

const USAGE: &str = "\
Usage: stagelux [OPTIONS] [PATCH_FILE]

Arguments:
  [PATCH_FILE]       Patch document (.ron/.slx/.json); stock rig when omitted

Options:
  --target IP:PORT   Art-Net node address (default 2.0.0.15:6454)
  --universe N       Art-Net universe (default 0)
  --fps N            Output rate in frames per second (default 25)
  --log-file PATH    Also write logs to a file
  -h, --help         Print help
";

struct Args {
    patch_file: Option<PathBuf>,
    target: String,
    universe: u16,
    interval: Duration,
    log_file: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        patch_file: None,
        target: DEFAULT_TARGET.to_string(),
        universe: 0,
        interval: FRAME_INTERVAL,
        log_file: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            "--target" => {
                args.target = iter.next().context("--target needs a value")?;
            }
            "--universe" => {
                let value = iter.next().context("--universe needs a value")?;
                args.universe = value
                    .parse()
                    .with_context(|| format!("invalid universe: {value}"))?;
            }
            "--fps" => {
                let value = iter.next().context("--fps needs a value")?;
                let fps: u64 = value
                    .parse()
                    .with_context(|| format!("invalid fps: {value}"))?;
                if fps == 0 || fps > 44 {
                    bail!("fps must be between 1 and 44 (DMX512 refresh limit)");
                }
                args.interval = Duration::from_millis(1000 / fps);
            }
            "--log-file" => {
                args.log_file = Some(PathBuf::from(
                    iter.next().context("--log-file needs a value")?,
                ));
            }
            other if other.starts_with('-') => {
                bail!("unknown option: {other}\n\n{USAGE}");
            }
            other => {
                if args.patch_file.is_some() {
                    bail!("more than one patch file given\n\n{USAGE}");
                }
                args.patch_file = Some(PathBuf::from(other));
            }
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let _log_guard = logging_setup::init(&LogConfig {
        log_file: args.log_file.clone(),
        ..LogConfig::default()
    })?;

    let rig = match &args.patch_file {
        Some(path) => {
            let rig = load_patch(path)
                .with_context(|| format!("failed to load patch file {}", path.display()))?;
            info!(path = %path.display(), fixtures = rig.fixtures.len(), "patch loaded");
            rig
        }
        None => {
            let rig = default_rig();
            info!(fixtures = rig.fixtures.len(), "no patch file given, using stock rig");
            rig
        }
    };

    for (a, b) in rig.patch.conflicts() {
        warn!(first = a.0, second = b.0, "fixtures overlap in the universe");
    }

    let mut sender = ArtNetSender::new(args.universe, &args.target)
        .with_context(|| format!("failed to create Art-Net sender for {}", args.target))?;
    // A dead link is not fatal: the engine keeps running dark and the
    // operator can fix the network without losing show state.
    if let Err(e) = sender.connect() {
        warn!(node = %args.target, error = %e, "Art-Net node unreachable, running without output");
    }

    let rig = Arc::new(Mutex::new(rig));
    let handle = DmxScheduler::spawn_with_interval(Arc::clone(&rig), sender, args.interval);

    info!(
        node = %args.target,
        universe = args.universe,
        "engine running, Ctrl-C to stop"
    );
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("shutting down");
    handle.shutdown().await;

    Ok(())
}
