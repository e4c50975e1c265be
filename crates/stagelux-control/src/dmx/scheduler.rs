//! Fixed-rate output loop
//!
//! One tokio task ticks at 25 Hz. Each tick takes the rig lock exactly
//! once, builds the full 512-byte frame from that consistent snapshot,
//! releases the lock, then hands the frame to the Art-Net sender. Edits to
//! the rig between ticks need no extra synchronization: they are simply
//! picked up by the next frame.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use stagelux_core::{RigState, DMX_CHANNELS};

use super::artnet::ArtNetSender;
use super::resolver::{resolve_fixture, ResolveContext};

/// Output period: 40 ms, 25 frames per second.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(40);

/// Build one DMX frame from a consistent view of the rig.
pub fn build_frame(rig: &RigState, now_ms: u64) -> [u8; DMX_CHANNELS] {
    let mut buffer = [0u8; DMX_CHANNELS];
    let looks = rig.looks();
    let ctx = ResolveContext {
        now_ms,
        effect_speed: rig.effect_speed,
    };

    for fixture in &rig.fixtures {
        let Some(addresses) = rig.patch.addresses(fixture.id) else {
            continue; // unpatched fixtures emit nothing
        };
        let Some(look) = looks.get(&fixture.id) else {
            continue;
        };
        resolve_fixture(&mut buffer, fixture, look, &addresses, &ctx);
    }

    buffer
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The 25 Hz frame loop.
pub struct DmxScheduler;

impl DmxScheduler {
    /// Spawn the output task at the standard 25 Hz. The returned handle
    /// stops it.
    pub fn spawn(rig: Arc<Mutex<RigState>>, sender: ArtNetSender) -> SchedulerHandle {
        Self::spawn_with_interval(rig, sender, FRAME_INTERVAL)
    }

    /// Spawn the output task with a custom frame interval.
    pub fn spawn_with_interval(
        rig: Arc<Mutex<RigState>>,
        mut sender: ArtNetSender,
        interval: Duration,
    ) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A stalled receiver or a long GC of the host must not cause a
            // burst of stale frames afterwards.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_ms = interval.as_millis() as u64,
                universe = sender.universe(),
                "DMX scheduler started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let frame = {
                            let rig = rig.lock();
                            build_frame(&rig, wall_clock_ms())
                        };
                        // Send outside the lock; writers never wait on UDP.
                        // A failed connect or send drops this frame only;
                        // the next tick tries again with fresh data.
                        if !sender.is_connected() && sender.connect().is_err() {
                            continue;
                        }
                        if let Err(e) = sender.send_frame(&frame) {
                            tracing::debug!(error = %e, "frame dropped");
                        }
                    }
                    // Fires on shutdown() and when the handle is dropped.
                    _ = shutdown_rx.changed() => break,
                }
            }

            sender.disconnect();
            tracing::info!("DMX scheduler stopped");
        });

        SchedulerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running scheduler task.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for the task to finish. The socket is closed
    /// by the task itself, so no frame can go out after this resolves.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "scheduler task did not stop cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagelux_core::state::default_rig;
    use stagelux_core::Rgb8;

    #[test]
    fn build_frame_end_to_end() {
        let mut rig = default_rig();
        // First face PAR, RGBDS at addresses 1-5.
        let id = rig.fixtures[0].id;
        {
            let f = rig.fixture_mut(id).unwrap();
            f.level = 50;
            f.base_color = Rgb8::new(255, 0, 0);
        }

        let frame = build_frame(&rig, 100);
        assert_eq!(&frame[0..5], &[255, 0, 0, 128, 0]);
        // Face 2 (addresses 6-10) is untouched: RGB idle at the white base
        // color, dimmer closed.
        assert_eq!(&frame[5..10], &[255, 255, 255, 0, 0]);
        // Smoke machine (addresses 111-112) idle.
        assert_eq!(&frame[110..112], &[0, 0]);
    }

    #[test]
    fn build_frame_skips_unpatched_fixtures() {
        let mut rig = default_rig();
        let id = rig.fixtures[0].id;
        {
            let f = rig.fixture_mut(id).unwrap();
            f.level = 100;
            f.base_color = Rgb8::WHITE;
        }
        rig.patch.remove(id);

        let frame = build_frame(&rig, 100);
        // The unpatched fixture's former addresses stay at zero even though
        // the fixture itself is at full.
        assert_eq!(&frame[0..5], &[0, 0, 0, 0, 0]);
        // Its patched neighbour still resolves.
        assert_eq!(frame[5], 255);
    }

    #[test]
    fn build_frame_composites_pads() {
        use stagelux_core::PadOverride;

        let mut rig = default_rig();
        rig.pads.push(PadOverride {
            groups: vec!["face".into()],
            color: Rgb8::new(0, 0, 255),
            fader: 100,
        });

        let frame = build_frame(&rig, 100);
        // Face 1 at 1-5: pad blue at full, Dim 255.
        assert_eq!(&frame[0..5], &[0, 0, 255, 255, 0]);
        // Contre group untouched by the face pad: dimmer stays closed.
        let contre = rig.group("contre").next().unwrap();
        let base = usize::from(contre.start_address) - 1;
        assert_eq!(&frame[base..base + 5], &[255, 255, 255, 0, 0]);
    }

    #[tokio::test]
    async fn scheduler_spawns_and_shuts_down() {
        let rig = Arc::new(Mutex::new(default_rig()));
        let mut sender = ArtNetSender::new(0, "127.0.0.1:6454").unwrap();
        sender.connect().unwrap();

        let handle = DmxScheduler::spawn(Arc::clone(&rig), sender);
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn scheduler_keeps_ticking_through_send_errors() {
        let rig = Arc::new(Mutex::new(default_rig()));
        // Every send to an IPv6 target fails on the IPv4 socket, so each
        // tick exercises the retry path.
        let mut sender = ArtNetSender::new(0, "[::1]:6454").unwrap();
        sender.connect().unwrap();

        let handle = DmxScheduler::spawn(Arc::clone(&rig), sender);
        tokio::time::sleep(Duration::from_millis(120)).await;
        // Still running after several failed frames.
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn rig_edits_are_picked_up_between_ticks() {
        let rig = Arc::new(Mutex::new(default_rig()));
        let sender = ArtNetSender::new(0, "127.0.0.1:6454").unwrap();
        let handle = DmxScheduler::spawn(Arc::clone(&rig), sender);

        {
            let mut rig = rig.lock();
            let id = rig.fixtures[0].id;
            let f = rig.fixture_mut(id).unwrap();
            f.level = 100;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await;
    }
}
