//! Stagelux Control - DMX Output Pipeline
//!
//! This crate turns the rig state from `stagelux-core` into light:
//! - **Resolver**: fixture state -> channel bytes, per profile
//! - **Art-Net**: ArtDMX encoding and UDP transmission
//! - **Scheduler**: fixed-rate (25 Hz) frame loop over the shared rig
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use stagelux_control::dmx::{ArtNetSender, DmxScheduler};
//! use stagelux_core::state::default_rig;
//!
//! # async fn run() -> stagelux_control::Result<()> {
//! let rig = Arc::new(Mutex::new(default_rig()));
//! let mut sender = ArtNetSender::new(0, "2.0.0.15:6454")?;
//! sender.connect()?;
//! let handle = DmxScheduler::spawn(rig, sender);
//! // ... run the show ...
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Error types
pub mod error;

/// DMX output (resolver, Art-Net, scheduler)
pub mod dmx;

pub use error::{ControlError, Result};
