//! Channel types and fixture profiles
//!
//! A profile is the ordered list of channel roles a fixture exposes on
//! consecutive DMX addresses. Built-in profiles live in a static registry;
//! user-composed ("custom") profiles are stored verbatim on the fixture and
//! in the patch document, never in the registry.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Type of DMX channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    /// Red color channel
    R,
    /// Green color channel
    G,
    /// Blue color channel
    B,
    /// White color channel (derived from RGB when driven from an RGB state)
    W,
    /// Master dimmer
    Dim,
    /// Electronic strobe frequency
    Strobe,
    /// Ultraviolet channel
    Uv,
    /// Amber color channel
    Amber,
    /// Orange color channel
    Orange,
    /// Beam zoom
    Zoom,
    /// Smoke output (fog machines)
    Smoke,
    /// Fan speed (fog machines)
    Fan,
    /// Horizontal movement, coarse 8-bit
    Pan,
    /// Horizontal movement, fine byte
    PanFine,
    /// Vertical movement, coarse 8-bit
    Tilt,
    /// Vertical movement, fine byte
    TiltFine,
    /// Primary gobo wheel
    Gobo1,
    /// Secondary gobo wheel
    Gobo2,
    /// Prism effect
    Prism,
    /// Beam focus
    Focus,
    /// Color wheel
    ColorWheel,
    /// Mechanical shutter
    Shutter,
    /// Movement speed
    Speed,
    /// Fixture mode/control channel
    Mode,
}

impl ChannelType {
    /// Human-readable label for editors and logs.
    pub fn name(self) -> &'static str {
        match self {
            ChannelType::R => "Red",
            ChannelType::G => "Green",
            ChannelType::B => "Blue",
            ChannelType::W => "White",
            ChannelType::Dim => "Dimmer",
            ChannelType::Strobe => "Strobe",
            ChannelType::Uv => "UV",
            ChannelType::Amber => "Amber",
            ChannelType::Orange => "Orange",
            ChannelType::Zoom => "Zoom",
            ChannelType::Smoke => "Smoke",
            ChannelType::Fan => "Fan",
            ChannelType::Pan => "Pan",
            ChannelType::PanFine => "Pan Fine",
            ChannelType::Tilt => "Tilt",
            ChannelType::TiltFine => "Tilt Fine",
            ChannelType::Gobo1 => "Gobo 1",
            ChannelType::Gobo2 => "Gobo 2",
            ChannelType::Prism => "Prism",
            ChannelType::Focus => "Focus",
            ChannelType::ColorWheel => "Color Wheel",
            ChannelType::Shutter => "Shutter",
            ChannelType::Speed => "Speed",
            ChannelType::Mode => "Mode",
        }
    }
}

/// An ordered sequence of channel types.
///
/// Two profiles are equal iff their sequences are equal; that equality is
/// what the registry's reverse lookup uses to recover a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(pub Vec<ChannelType>);

impl Profile {
    /// Number of DMX channels this profile occupies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a profile with no channels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the profile declares the given channel type.
    pub fn contains(&self, ct: ChannelType) -> bool {
        self.0.contains(&ct)
    }

    /// Iterate over the channel types in address order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChannelType> {
        self.0.iter()
    }
}

impl From<Vec<ChannelType>> for Profile {
    fn from(channels: Vec<ChannelType>) -> Self {
        Self(channels)
    }
}

use ChannelType::*;

/// Built-in profile table: `(name, channel sequence)`.
///
/// Sequences are unique so that reverse lookup by equality is well-defined.
static BUILTIN_PROFILES: Lazy<Vec<(&'static str, Profile)>> = Lazy::new(|| {
    vec![
        ("RGB", Profile(vec![R, G, B])),
        ("RGBD", Profile(vec![R, G, B, Dim])),
        ("RGBDS", Profile(vec![R, G, B, Dim, Strobe])),
        // Legacy 6-channel wiring: RGBDS plus one unused trailing channel.
        ("RGBDS6", Profile(vec![R, G, B, Dim, Strobe, Mode])),
        ("RGBW", Profile(vec![R, G, B, W])),
        ("RGBWD", Profile(vec![R, G, B, W, Dim])),
        ("RGBWDS", Profile(vec![R, G, B, W, Dim, Strobe])),
        ("HEX7", Profile(vec![R, G, B, W, Amber, Uv, Dim])),
        ("SMOKE", Profile(vec![Smoke, Fan])),
        ("SPOT5", Profile(vec![Shutter, Dim, ColorWheel, Gobo1, Speed])),
        (
            "SPOT8",
            Profile(vec![Pan, Tilt, Shutter, Dim, ColorWheel, Gobo1, Speed, Mode]),
        ),
        (
            "WASH9",
            Profile(vec![Pan, Tilt, R, G, B, W, Dim, Shutter, Speed]),
        ),
    ]
});

/// Legacy channel-count mode tokens carried over from old patch files.
const LEGACY_MODES: &[(&str, &str)] = &[
    ("2CH_FUMEE", "SMOKE"),
    ("3CH", "RGB"),
    ("4CH", "RGBD"),
    ("5CH", "RGBDS"),
    ("6CH", "RGBDS6"),
];

/// Name used when an unknown profile name or mode token is encountered.
pub const FALLBACK_PROFILE: &str = "RGBDS";

/// Lookup of built-in profiles and legacy mode tokens.
pub struct ProfileRegistry;

impl ProfileRegistry {
    /// Resolve a profile name or legacy mode token to a profile.
    ///
    /// Unknown names fall back to [`FALLBACK_PROFILE`] instead of failing;
    /// this masks misconfiguration, so a diagnostic is always emitted.
    pub fn resolve(name_or_mode: &str) -> Profile {
        let name = LEGACY_MODES
            .iter()
            .find(|(mode, _)| *mode == name_or_mode)
            .map_or(name_or_mode, |(_, name)| *name);

        match BUILTIN_PROFILES.iter().find(|(n, _)| *n == name) {
            Some((_, profile)) => profile.clone(),
            None => {
                tracing::warn!(
                    name = name_or_mode,
                    fallback = FALLBACK_PROFILE,
                    "unknown profile name, using fallback"
                );
                Self::resolve(FALLBACK_PROFILE)
            }
        }
    }

    /// Reverse lookup: recover the built-in name of a profile by exact
    /// sequence equality. `None` means a custom/unregistered profile.
    pub fn name_of(profile: &Profile) -> Option<&'static str> {
        BUILTIN_PROFILES
            .iter()
            .find(|(_, p)| p == profile)
            .map(|(n, _)| *n)
    }

    /// Names of all built-in profiles, in table order.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_PROFILES.iter().map(|(n, _)| *n)
    }
}
