//! DMX output system
//!
//! DMX512 output via Art-Net, fed by a fixed-rate scheduler.
//!
//! ## Pipeline
//!
//! Once per tick (40 ms):
//! 1. The scheduler locks the shared [`RigState`](stagelux_core::RigState)
//!    and composites every control source ([`stagelux_core::composite`]).
//! 2. The [`resolver`] turns each patched fixture's winning look into
//!    channel bytes at its patched addresses.
//! 3. The [`ArtNetSender`] wraps the 512-byte frame in an ArtDMX packet and
//!    sends it over UDP (default target `2.0.0.15:6454`).
//!
//! ## Art-Net
//!
//! Art-Net is a UDP protocol for DMX transmission over Ethernet.
//! - Port 6454, ArtDMX OpCode 0x5000, protocol version 14
//! - Packets carry a sequence byte so receivers can drop reordered frames

pub mod artnet;
pub mod resolver;
pub mod scheduler;

pub use artnet::{encode_artdmx, ArtNetSender, LinkState, ARTNET_PORT, DEFAULT_TARGET};
pub use resolver::{resolve_fixture, ResolveContext};
pub use scheduler::{build_frame, DmxScheduler, SchedulerHandle, FRAME_INTERVAL};
