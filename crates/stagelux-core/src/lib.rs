//! Stagelux Core - Domain Model for the DMX Rig
//!
//! This crate contains the core domain model for Stagelux, including:
//! - Channel types and fixture profiles (built-in registry + legacy modes)
//! - Fixture runtime state (color, level, pose, mute)
//! - Memory banks and pad overrides for console-style playback
//! - HTP composition of all control sources
//! - The DMX patch (fixture -> start address/profile) with validation

#![warn(missing_docs)]

use thiserror::Error;

pub mod color;
pub mod compositor;
pub mod fixture;
pub mod patch;
pub mod playback;
pub mod profile;
pub mod state;

pub use color::Rgb8;
pub use compositor::{composite, Look};
pub use fixture::{DmxMode, Fixture, FixtureId, SceneFixture};
pub use patch::{PatchEntry, PatchStore};
pub use playback::{MemoryBank, PadOverride, Snapshot, MEMORY_BANKS, SNAPSHOTS_PER_BANK};
pub use profile::{ChannelType, Profile, ProfileRegistry};
pub use state::{default_rig, RigState};

/// Number of channels in one DMX universe.
pub const DMX_CHANNELS: usize = 512;

/// Core error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// A fixture's channel range does not fit in the universe.
    #[error("fixture channels {start}..={end} exceed the 512-channel universe")]
    AddressOutOfRange {
        /// First channel of the fixture (1-indexed).
        start: u16,
        /// Last channel of the fixture (1-indexed).
        end: u32,
    },

    /// A DMX start address outside 1..=512.
    #[error("invalid DMX start address: {0} (must be 1-512)")]
    InvalidStartAddress(u16),

    /// A profile with no channels.
    #[error("profile has no channels")]
    EmptyProfile,

    /// Memory bank slot index outside the bank.
    #[error("invalid memory slot: {0} (bank holds {SNAPSHOTS_PER_BANK})")]
    InvalidSlot(usize),

    /// Activating a memory slot that holds no snapshot.
    #[error("memory slot {0} is empty")]
    EmptySlot(usize),

    /// Malformed color string.
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
