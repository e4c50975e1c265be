//! Fixture runtime state
//!
//! A fixture is one logical lighting instrument: its current color, level
//! and pose, plus where it sits in the DMX universe (start address and
//! profile). Controllers of every kind (pads, memory playback, effects,
//! external writers) mutate this state; the output pipeline only reads it.

use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::profile::Profile;

/// Newtype for fixture identity. Prevents mixing fixture IDs with other integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub u32);

/// How the fixture's intensity is being driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmxMode {
    /// Plain level/color output.
    #[default]
    Manual,
    /// Strobe effect: drives the hardware Strobe channel when the profile
    /// has one, otherwise a time-based software blink on RGB.
    Strobe,
}

/// One logical lighting instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Stable identity.
    pub id: FixtureId,
    /// User-assigned display name.
    pub name: String,
    /// Logical bucket ("face", "contre", "douche1", "lat", "public", ...)
    /// used by group selection and pad overrides, not by the resolver.
    pub group: String,
    /// Intensity, 0-100.
    pub level: u8,
    /// The color the operator picked, before any level scaling.
    pub base_color: Rgb8,
    /// Muted fixtures resolve every patched channel to 0.
    pub muted: bool,
    /// Intensity drive mode.
    pub dmx_mode: DmxMode,
    /// First DMX channel (1-512).
    pub start_address: u16,
    /// Channel layout starting at `start_address`.
    pub profile: Profile,

    /// Pan position (neutral = 128).
    pub pan: u8,
    /// Tilt position (neutral = 128).
    pub tilt: u8,
    /// Gobo wheel selection.
    pub gobo: u8,
    /// Beam zoom.
    pub zoom: u8,
    /// Mechanical shutter.
    pub shutter: u8,
    /// Color wheel position.
    pub color_wheel: u8,
    /// Fan speed, fog machines only.
    pub fan_speed: u8,
}

impl Fixture {
    /// Create a fixture with neutral pose and everything dark.
    pub fn new(id: FixtureId, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            group: group.into(),
            level: 0,
            base_color: Rgb8::WHITE,
            muted: false,
            dmx_mode: DmxMode::Manual,
            start_address: 1,
            profile: crate::profile::ProfileRegistry::resolve("RGBDS"),
            pan: 128,
            tilt: 128,
            gobo: 0,
            zoom: 128,
            shutter: 0,
            color_wheel: 0,
            fan_speed: 0,
        }
    }

    /// The color as actually displayed: base color scaled by level, or
    /// black when muted or fully faded down.
    pub fn effective_color(&self) -> Rgb8 {
        if self.muted || self.level == 0 {
            Rgb8::BLACK
        } else {
            self.base_color.scaled(self.level)
        }
    }

    /// Last DMX channel occupied by this fixture (may exceed 512 when
    /// misconfigured; the patch store rejects such entries).
    pub fn end_address(&self) -> u32 {
        u32::from(self.start_address) + self.profile.len() as u32 - 1
    }

    /// Export the show-persistable part of the state.
    pub fn scene_state(&self) -> SceneFixture {
        SceneFixture {
            group: self.group.clone(),
            level: self.level,
            base_color: self.base_color,
            muted: self.muted,
        }
    }

    /// Restore state captured by [`Fixture::scene_state`].
    pub fn apply_scene(&mut self, scene: &SceneFixture) {
        self.group = scene.group.clone();
        self.level = scene.level;
        self.base_color = scene.base_color;
        self.muted = scene.muted;
    }
}

/// The portion of fixture state that show files save and restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFixture {
    /// Logical group bucket.
    pub group: String,
    /// Intensity, 0-100.
    pub level: u8,
    /// Unscaled operator color.
    pub base_color: Rgb8,
    /// Mute flag.
    pub muted: bool,
}
