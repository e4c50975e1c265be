//! Memory banks and pad overrides
//!
//! The console surface exposes four memory banks, each a column of eight
//! pads with a dedicated fader. One snapshot per bank can be active at a
//! time (radio behavior across the column); the fader scales the levels the
//! snapshot recorded. Pad overrides are live color punches gated by their
//! own fader and targeted at fixture groups. Both are composited over the
//! base state highest-takes-precedence, never written into it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::fixture::{Fixture, FixtureId};
use crate::{CoreError, Result};

/// Number of independently-addressable memory banks.
pub const MEMORY_BANKS: usize = 4;

/// Snapshot slots per bank.
pub const SNAPSHOTS_PER_BANK: usize = 8;

/// Captured state of one fixture inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    /// Captured intensity, 0-100.
    pub level: u8,
    /// Captured unscaled color.
    pub base_color: Rgb8,
}

/// A named capture of the rig's levels and colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Operator-facing name.
    pub name: String,
    /// Captured state keyed by fixture.
    pub fixtures: HashMap<FixtureId, SnapshotState>,
}

impl Snapshot {
    /// Capture the current level/color of every fixture.
    pub fn capture(name: impl Into<String>, fixtures: &[Fixture]) -> Self {
        Self {
            name: name.into(),
            fixtures: fixtures
                .iter()
                .map(|f| {
                    (
                        f.id,
                        SnapshotState {
                            level: f.level,
                            base_color: f.base_color,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// One playback bank: eight snapshot slots, at most one active, own fader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryBank {
    slots: [Option<Snapshot>; SNAPSHOTS_PER_BANK],
    active: Option<usize>,
    /// Playback fader, 0-100. Scales the active snapshot's levels.
    pub fader: u8,
}

impl MemoryBank {
    /// Store a snapshot in a slot, replacing any previous content.
    pub fn store(&mut self, slot: usize, snapshot: Snapshot) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(CoreError::InvalidSlot(slot))?;
        *entry = Some(snapshot);
        Ok(())
    }

    /// Clear a slot; deactivates it if it was the active one.
    pub fn clear(&mut self, slot: usize) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(CoreError::InvalidSlot(slot))?;
        *entry = None;
        if self.active == Some(slot) {
            self.active = None;
        }
        Ok(())
    }

    /// Activate a stored slot. Refuses empty slots so a dead pad press
    /// cannot blank the playback.
    pub fn activate(&mut self, slot: usize) -> Result<()> {
        match self.slots.get(slot) {
            None => Err(CoreError::InvalidSlot(slot)),
            Some(None) => Err(CoreError::EmptySlot(slot)),
            Some(Some(_)) => {
                self.active = Some(slot);
                Ok(())
            }
        }
    }

    /// Deactivate the bank.
    pub fn deactivate(&mut self) {
        self.active = None;
    }

    /// Index of the active slot, if any.
    pub fn active_slot(&self) -> Option<usize> {
        self.active
    }

    /// The active snapshot, if any.
    pub fn active_snapshot(&self) -> Option<&Snapshot> {
        self.active.and_then(|slot| self.slots[slot].as_ref())
    }

    /// The snapshot stored in a slot, if any.
    pub fn snapshot(&self, slot: usize) -> Option<&Snapshot> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }
}

/// A live console pad: a color and a fader applied to fixture groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadOverride {
    /// Fixture groups this pad drives.
    pub groups: Vec<String>,
    /// Punch color.
    pub color: Rgb8,
    /// Pad fader, 0-100. Doubles as the candidate HTP level.
    pub fader: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Fixture;

    fn rig() -> Vec<Fixture> {
        let mut a = Fixture::new(FixtureId(1), "Face 1", "face");
        a.level = 60;
        a.base_color = Rgb8::new(255, 0, 0);
        let b = Fixture::new(FixtureId(2), "Contre 1", "contre");
        vec![a, b]
    }

    #[test]
    fn capture_records_every_fixture() {
        let snap = Snapshot::capture("warm", &rig());
        assert_eq!(snap.fixtures.len(), 2);
        let s = &snap.fixtures[&FixtureId(1)];
        assert_eq!(s.level, 60);
        assert_eq!(s.base_color, Rgb8::new(255, 0, 0));
    }

    #[test]
    fn activate_requires_stored_slot() {
        let mut bank = MemoryBank::default();
        assert_eq!(bank.activate(0), Err(CoreError::EmptySlot(0)));
        assert_eq!(bank.activate(99), Err(CoreError::InvalidSlot(99)));

        bank.store(0, Snapshot::capture("warm", &rig())).unwrap();
        bank.activate(0).unwrap();
        assert_eq!(bank.active_slot(), Some(0));
        assert_eq!(bank.active_snapshot().unwrap().name, "warm");
    }

    #[test]
    fn clear_deactivates_active_slot() {
        let mut bank = MemoryBank::default();
        bank.store(2, Snapshot::capture("cold", &rig())).unwrap();
        bank.activate(2).unwrap();
        bank.clear(2).unwrap();
        assert_eq!(bank.active_slot(), None);
        assert!(bank.active_snapshot().is_none());
    }

    #[test]
    fn one_active_slot_per_bank() {
        let mut bank = MemoryBank::default();
        bank.store(0, Snapshot::capture("a", &rig())).unwrap();
        bank.store(1, Snapshot::capture("b", &rig())).unwrap();
        bank.activate(0).unwrap();
        bank.activate(1).unwrap();
        assert_eq!(bank.active_slot(), Some(1));
    }
}
