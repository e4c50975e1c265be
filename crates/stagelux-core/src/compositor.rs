//! Highest-takes-precedence composition
//!
//! Per output tick, every fixture's base state competes with the active
//! memory snapshots (scaled by their bank faders) and the live pad
//! overrides (gated by their own faders). The source with the strictly
//! highest resolved level wins; evaluation order never changes the outcome
//! and nothing here mutates the underlying stores. The winning view is
//! consumed by the channel resolver and then discarded.

use std::collections::HashMap;

use crate::color::Rgb8;
use crate::fixture::{Fixture, FixtureId};
use crate::playback::{MemoryBank, PadOverride, MEMORY_BANKS};

/// The composited view of one fixture for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Look {
    /// Winning intensity, 0-100.
    pub level: u8,
    /// Winning color at that intensity.
    pub color: Rgb8,
    /// Winning color before intensity scaling.
    pub base_color: Rgb8,
}

impl Look {
    fn from_source(level: u8, base_color: Rgb8) -> Self {
        Self {
            level,
            color: base_color.scaled(level),
            base_color,
        }
    }
}

/// Compute the winning `(level, color)` per fixture across all sources.
///
/// Read-only over every input. Ties keep the earlier evaluated source
/// (base, then banks in order, then pads in order), which renders
/// identically anyway.
pub fn composite(
    fixtures: &[Fixture],
    banks: &[MemoryBank; MEMORY_BANKS],
    pads: &[PadOverride],
) -> HashMap<FixtureId, Look> {
    let mut looks: HashMap<FixtureId, Look> = fixtures
        .iter()
        .map(|f| {
            (
                f.id,
                Look {
                    level: f.level,
                    color: f.effective_color(),
                    base_color: f.base_color,
                },
            )
        })
        .collect();

    for bank in banks {
        if bank.fader == 0 {
            continue;
        }
        let Some(snapshot) = bank.active_snapshot() else {
            continue;
        };
        for (id, state) in &snapshot.fixtures {
            let Some(current) = looks.get_mut(id) else {
                continue; // snapshot of a fixture that no longer exists
            };
            let candidate = (u16::from(state.level) * u16::from(bank.fader) / 100) as u8;
            if candidate > current.level {
                *current = Look::from_source(candidate, state.base_color);
            }
        }
    }

    for pad in pads {
        if pad.fader == 0 {
            continue;
        }
        for fixture in fixtures {
            if !pad.groups.iter().any(|g| *g == fixture.group) {
                continue;
            }
            let current = looks
                .entry(fixture.id)
                .or_insert_with(|| Look::from_source(0, Rgb8::BLACK));
            if pad.fader > current.level {
                *current = Look::from_source(pad.fader, pad.color);
            }
        }
    }

    looks
}
