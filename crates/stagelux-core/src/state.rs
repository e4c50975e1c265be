//! Shared rig state
//!
//! `RigState` is the single mutable document every writer (pads, playback,
//! external control surfaces) edits and the output scheduler reads once per
//! tick. It owns the fixtures, the four memory banks, the live pad
//! overrides and the patch table.

use serde::{Deserialize, Serialize};

use crate::compositor::{composite, Look};
use crate::fixture::{Fixture, FixtureId};
use crate::patch::{PatchEntry, PatchStore};
use crate::playback::{MemoryBank, PadOverride, MEMORY_BANKS};
use crate::profile::ProfileRegistry;
use crate::Result;

use std::collections::HashMap;

/// Everything the engine needs to produce one DMX frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigState {
    /// All fixtures in patch order.
    pub fixtures: Vec<Fixture>,
    /// Four playback banks.
    pub banks: [MemoryBank; MEMORY_BANKS],
    /// Live pad overrides.
    pub pads: Vec<PadOverride>,
    /// Fixture addressing.
    pub patch: PatchStore,
    /// Global effect speed, 0-100. Drives hardware strobe frequency.
    pub effect_speed: u8,
}

impl RigState {
    /// Look up a fixture by id.
    pub fn fixture(&self, id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    /// Look up a fixture mutably by id.
    pub fn fixture_mut(&mut self, id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    /// All fixtures in a group.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Fixture> + 'a {
        self.fixtures.iter().filter(move |f| f.group == group)
    }

    /// Patch one fixture: validates the entry, stores it, and mirrors the
    /// addressing onto the fixture itself.
    pub fn patch_fixture(&mut self, id: FixtureId, entry: PatchEntry) -> Result<()> {
        self.patch.set(id, entry.clone())?;
        if let Some(f) = self.fixture_mut(id) {
            f.start_address = entry.start_address;
            f.profile = entry.profile;
        }
        Ok(())
    }

    /// Rebuild the patch table from the fixtures' own addressing. Used after
    /// loading a patch document, which writes the fixtures first.
    pub fn apply_patch(&mut self) -> Result<()> {
        let mut patch = PatchStore::new();
        for f in &self.fixtures {
            patch.set(
                f.id,
                PatchEntry {
                    start_address: f.start_address,
                    profile: f.profile.clone(),
                },
            )?;
        }
        self.patch = patch;
        Ok(())
    }

    /// Composite every control source into the winning per-fixture view.
    pub fn looks(&self) -> HashMap<FixtureId, Look> {
        composite(&self.fixtures, &self.banks, &self.pads)
    }
}

/// The stock theatre rig: four face PARs, three rows of three downlight
/// PARs, two laterals, six backlight PARs, one audience light and a smoke
/// machine, addressed back to back from channel 1.
pub fn default_rig() -> RigState {
    let plan: &[(&str, &str, usize, &str)] = &[
        ("Face", "face", 4, "RGBDS"),
        ("Douche1", "douche1", 3, "RGBDS"),
        ("Douche2", "douche2", 3, "RGBDS"),
        ("Douche3", "douche3", 3, "RGBDS"),
        ("Lat", "lat", 2, "RGBDS"),
        ("Contre", "contre", 6, "RGBDS"),
        ("Public", "public", 1, "RGBDS"),
        ("Fumee", "fumee", 1, "SMOKE"),
    ];

    let mut rig = RigState::default();
    let mut next_id = 1u32;
    let mut next_address = 1u16;

    for (label, group, count, profile_name) in plan {
        for i in 0..*count {
            let name = if *count > 1 {
                format!("{label} {}", i + 1)
            } else {
                (*label).to_string()
            };
            let mut fixture = Fixture::new(FixtureId(next_id), name, *group);
            fixture.profile = ProfileRegistry::resolve(profile_name);
            fixture.start_address = next_address;

            let entry = PatchEntry {
                start_address: next_address,
                profile: fixture.profile.clone(),
            };
            next_address += fixture.profile.len() as u16;
            next_id += 1;

            let id = fixture.id;
            rig.fixtures.push(fixture);
            // Sequential addressing from 1 always fits; 23 fixtures use
            // 112 channels.
            rig.patch
                .set(id, entry)
                .unwrap_or_else(|_| unreachable!("default rig fits the universe"));
        }
    }

    rig
}
