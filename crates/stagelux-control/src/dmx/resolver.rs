//! Fixture state to channel bytes
//!
//! `resolve_fixture` writes one fixture's composited look into the frame
//! buffer at its patched addresses, following the fixture's profile. The
//! function is pure: wall clock and global effect speed come in through
//! [`ResolveContext`], so the same inputs always produce the same bytes.

use stagelux_core::compositor::Look;
use stagelux_core::fixture::{DmxMode, Fixture};
use stagelux_core::profile::ChannelType;
use stagelux_core::DMX_CHANNELS;

/// Per-tick inputs that are not fixture state.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    /// Wall-clock milliseconds. Only the 100 ms parity matters (software
    /// strobe phase).
    pub now_ms: u64,
    /// Global effect speed, 0-100. Drives hardware strobe frequency.
    pub effect_speed: u8,
}

/// Intensity 0-100 mapped to a full DMX byte, rounded.
fn level_to_byte(level: u8) -> u8 {
    ((u16::from(level.min(100)) * 255 + 50) / 100) as u8
}

/// Hardware strobe byte for the given mode and global speed.
fn strobe_byte(mode: DmxMode, effect_speed: u8) -> u8 {
    match mode {
        DmxMode::Manual => 0,
        DmxMode::Strobe => {
            if effect_speed > 0 {
                // 16..=250 span, empirically the usable range on cheap PARs.
                (16.0 + f64::from(effect_speed.min(100)) / 100.0 * (250.0 - 16.0)) as u8
            } else {
                100
            }
        }
    }
}

/// Write one fixture's look into the frame buffer.
///
/// `addresses` is the consecutive channel list from the patch (1-indexed);
/// entries of 0 or above 512 are skipped, and resolution stops at the
/// shorter of profile and address list.
pub fn resolve_fixture(
    buffer: &mut [u8; DMX_CHANNELS],
    fixture: &Fixture,
    look: &Look,
    addresses: &[u16],
    ctx: &ResolveContext,
) {
    let profile = &fixture.profile;

    let mut write = |address: u16, value: u8| {
        if address >= 1 && address as usize <= DMX_CHANNELS {
            buffer[usize::from(address) - 1] = value;
        }
    };

    // Fog machines replace the whole channel loop: smoke output follows the
    // level fader, the fan its own attribute, everything else stays dark.
    if profile.contains(ChannelType::Smoke) {
        for (i, ct) in profile.iter().enumerate() {
            let Some(&address) = addresses.get(i) else {
                break;
            };
            let value = if fixture.muted {
                0
            } else {
                match ct {
                    ChannelType::Smoke => (u16::from(look.level.min(100)) * 255 / 100) as u8,
                    ChannelType::Fan => fixture.fan_speed,
                    _ => 0,
                }
            };
            write(address, value);
        }
        return;
    }

    // Mute wins over everything: blackout every patched channel.
    if fixture.muted {
        for (i, _) in profile.iter().enumerate() {
            let Some(&address) = addresses.get(i) else {
                break;
            };
            write(address, 0);
        }
        return;
    }

    let has_dim = profile.contains(ChannelType::Dim);
    let has_strobe_channel = profile.contains(ChannelType::Strobe);

    // Virtual dimmer: without a hardware Dim channel the level is baked
    // into the RGB bytes.
    let rgb = if has_dim {
        look.base_color
    } else {
        look.base_color.scaled(look.level)
    };

    // White approximation, from the unscaled color.
    let white = look.base_color.min_component();

    // Software strobe: no Strobe channel, strobe mode on, blink the color
    // channels on wall-clock parity.
    let blanked = !has_strobe_channel
        && fixture.dmx_mode == DmxMode::Strobe
        && (ctx.now_ms / 100) % 2 == 0;
    let gate = |v: u8| if blanked { 0 } else { v };

    let amber = if rgb.r > 0 {
        ((f64::from(rgb.r).min(f64::from(rgb.g) * 0.5)) * 0.8) as u8
    } else {
        0
    };
    let orange = if rgb.r > 0 {
        ((f64::from(rgb.r).min(f64::from(rgb.g) * 0.6)) * 0.9) as u8
    } else {
        0
    };

    for (i, ct) in profile.iter().enumerate() {
        let Some(&address) = addresses.get(i) else {
            break;
        };
        let value = match ct {
            ChannelType::R => gate(rgb.r),
            ChannelType::G => gate(rgb.g),
            ChannelType::B => gate(rgb.b),
            ChannelType::W => white,
            ChannelType::Dim => level_to_byte(look.level),
            ChannelType::Strobe => strobe_byte(fixture.dmx_mode, ctx.effect_speed),
            ChannelType::Amber => amber,
            ChannelType::Orange => orange,
            ChannelType::Pan => fixture.pan,
            ChannelType::Tilt => fixture.tilt,
            // TODO: true 16-bit pan/tilt needs a fractional position on the
            // fixture; (value * 256) % 256 is always 0 for integer values.
            ChannelType::PanFine => (u16::from(fixture.pan) << 8) as u8,
            ChannelType::TiltFine => (u16::from(fixture.tilt) << 8) as u8,
            ChannelType::Gobo1 => fixture.gobo,
            ChannelType::ColorWheel => fixture.color_wheel,
            ChannelType::Shutter => fixture.shutter,
            ChannelType::Zoom => fixture.zoom,
            ChannelType::Uv
            | ChannelType::Gobo2
            | ChannelType::Prism
            | ChannelType::Focus
            | ChannelType::Speed
            | ChannelType::Mode
            | ChannelType::Smoke
            | ChannelType::Fan => 0,
        };
        write(address, value);
    }
}
