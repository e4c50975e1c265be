//! DMX patch: fixture -> (start address, profile)
//!
//! The patch is the persisted wiring of the rig. Entries are validated at
//! edit time: a fixture whose channels would run past channel 512 is a
//! configuration error and is rejected, not clamped. Overlapping ranges are
//! reported to the operator but tolerated, since half-moved rigs overlap
//! transiently while re-addressing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::fixture::FixtureId;
use crate::profile::Profile;
use crate::{CoreError, Result, DMX_CHANNELS};

/// Where one fixture sits in the universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    /// First DMX channel, 1-512.
    pub start_address: u16,
    /// Channel layout from that address on.
    pub profile: Profile,
}

impl PatchEntry {
    /// Last channel occupied by the entry.
    pub fn end_address(&self) -> u32 {
        u32::from(self.start_address) + self.profile.len() as u32 - 1
    }
}

/// The full patch table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchStore {
    entries: HashMap<FixtureId, PatchEntry>,
}

impl PatchStore {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry after validating it.
    pub fn set(&mut self, id: FixtureId, entry: PatchEntry) -> Result<()> {
        Self::validate(&entry)?;
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Remove an entry.
    pub fn remove(&mut self, id: FixtureId) -> Option<PatchEntry> {
        self.entries.remove(&id)
    }

    /// Look up an entry.
    pub fn get(&self, id: FixtureId) -> Option<&PatchEntry> {
        self.entries.get(&id)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (FixtureId, &PatchEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    /// Number of patched fixtures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is patched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The consecutive channel addresses of a patched fixture, one per
    /// profile entry, ready for the channel resolver.
    pub fn addresses(&self, id: FixtureId) -> Option<Vec<u16>> {
        self.entries.get(&id).map(|e| {
            (0..e.profile.len() as u16)
                .map(|i| e.start_address + i)
                .collect()
        })
    }

    /// Check one entry against the universe bounds.
    pub fn validate(entry: &PatchEntry) -> Result<()> {
        if entry.profile.is_empty() {
            return Err(CoreError::EmptyProfile);
        }
        if entry.start_address == 0 || entry.start_address as usize > DMX_CHANNELS {
            return Err(CoreError::InvalidStartAddress(entry.start_address));
        }
        let end = entry.end_address();
        if end > DMX_CHANNELS as u32 {
            return Err(CoreError::AddressOutOfRange {
                start: entry.start_address,
                end,
            });
        }
        Ok(())
    }

    /// Pairs of fixtures whose channel ranges overlap. Reported to the
    /// operator at edit time; the resolver happily writes whatever the
    /// patch says in the meantime.
    pub fn conflicts(&self) -> Vec<(FixtureId, FixtureId)> {
        let mut entries: Vec<(FixtureId, &PatchEntry)> = self.iter().collect();
        entries.sort_by_key(|(id, _)| id.0);

        let mut pairs = Vec::new();
        for (i, (id_a, a)) in entries.iter().enumerate() {
            for (id_b, b) in &entries[i + 1..] {
                let a_range = u32::from(a.start_address)..=a.end_address();
                let b_range = u32::from(b.start_address)..=b.end_address();
                if a_range.start() <= b_range.end() && b_range.start() <= a_range.end() {
                    pairs.push((*id_a, *id_b));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileRegistry;

    fn entry(start: u16, profile: &str) -> PatchEntry {
        PatchEntry {
            start_address: start,
            profile: ProfileRegistry::resolve(profile),
        }
    }

    #[test]
    fn accepts_entry_at_universe_edge() {
        let mut patch = PatchStore::new();
        // RGBDS is 5 channels: 508..=512 just fits.
        patch.set(FixtureId(1), entry(508, "RGBDS")).unwrap();
        assert_eq!(patch.get(FixtureId(1)).unwrap().end_address(), 512);
    }

    #[test]
    fn rejects_range_past_512() {
        let mut patch = PatchStore::new();
        let err = patch.set(FixtureId(1), entry(509, "RGBDS")).unwrap_err();
        assert_eq!(
            err,
            CoreError::AddressOutOfRange {
                start: 509,
                end: 513
            }
        );
        assert!(patch.is_empty());
    }

    #[test]
    fn rejects_zero_start_address() {
        let mut patch = PatchStore::new();
        assert_eq!(
            patch.set(FixtureId(1), entry(0, "RGB")).unwrap_err(),
            CoreError::InvalidStartAddress(0)
        );
    }

    #[test]
    fn rejects_empty_profile() {
        let mut patch = PatchStore::new();
        let e = PatchEntry {
            start_address: 1,
            profile: Profile(vec![]),
        };
        assert_eq!(patch.set(FixtureId(1), e).unwrap_err(), CoreError::EmptyProfile);
    }

    #[test]
    fn addresses_are_consecutive() {
        let mut patch = PatchStore::new();
        patch.set(FixtureId(7), entry(11, "RGBDS")).unwrap();
        assert_eq!(
            patch.addresses(FixtureId(7)).unwrap(),
            vec![11, 12, 13, 14, 15]
        );
        assert_eq!(patch.addresses(FixtureId(8)), None);
    }

    #[test]
    fn overlap_detection() {
        let mut patch = PatchStore::new();
        patch.set(FixtureId(1), entry(1, "RGBDS")).unwrap(); // 1..=5
        patch.set(FixtureId(2), entry(5, "RGB")).unwrap(); // 5..=7 overlaps
        patch.set(FixtureId(3), entry(8, "RGB")).unwrap(); // 8..=10 clean

        let conflicts = patch.conflicts();
        assert_eq!(conflicts, vec![(FixtureId(1), FixtureId(2))]);
    }

    #[test]
    fn adjacent_ranges_do_not_conflict() {
        let mut patch = PatchStore::new();
        patch.set(FixtureId(1), entry(1, "RGBDS")).unwrap(); // 1..=5
        patch.set(FixtureId(2), entry(6, "RGBDS")).unwrap(); // 6..=10
        assert!(patch.conflicts().is_empty());
    }
}
