//! Patch I/O - High-level API
//!
//! Saving and loading the rig's wiring. Version validation and the
//! rig <-> document conversion live here; low-level serialization and file
//! handling are delegated to the `patch_format` module.

use crate::error::{IoError, Result};
use crate::patch_format::{PatchDocument, PatchFile, PATCH_FILE_VERSION};
use stagelux_core::RigState;
use std::path::Path;

/// Save the rig's wiring to a patch file.
///
/// Only the persisted part of the rig is written (identity, grouping,
/// addressing, profiles); live state like levels and faders is not.
pub fn save_patch(rig: &RigState, path: &Path) -> Result<()> {
    let mut patch_file = PatchFile::new(PatchDocument::from_rig(rig));
    patch_file.save(path)
}

/// Load a rig from a patch file.
///
/// Performs a version check, then rebuilds fixtures and the validated
/// patch table from the records.
pub fn load_patch(path: &Path) -> Result<RigState> {
    let patch_file = PatchFile::load(path)?;

    if patch_file.version != PATCH_FILE_VERSION {
        return Err(IoError::VersionMismatch {
            expected: PATCH_FILE_VERSION.to_string(),
            found: patch_file.version,
        });
    }

    patch_file.document.into_rig()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagelux_core::state::default_rig;
    use tempfile::NamedTempFile;

    #[test]
    fn patch_ron_roundtrip() {
        let rig = default_rig();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("ron");

        save_patch(&rig, &path).unwrap();
        let loaded = load_patch(&path).unwrap();

        assert_eq!(loaded.fixtures.len(), rig.fixtures.len());
        assert_eq!(loaded.patch.len(), rig.patch.len());
        assert!(loaded.patch.conflicts().is_empty());
    }

    #[test]
    fn patch_json_roundtrip() {
        let rig = default_rig();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("json");

        save_patch(&rig, &path).unwrap();
        let loaded = load_patch(&path).unwrap();

        assert_eq!(loaded.fixtures.len(), rig.fixtures.len());
    }

    #[test]
    fn test_version_mismatch() {
        let mut patch_file = PatchFile::new(PatchDocument::from_rig(&default_rig()));
        patch_file.version = "0.1.0".to_string();

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("ron");
        patch_file.save(&path).unwrap();

        let result = load_patch(&path);
        assert!(matches!(result, Err(IoError::VersionMismatch { .. })));

        if let Err(IoError::VersionMismatch { expected, found }) = result {
            assert_eq!(expected, PATCH_FILE_VERSION);
            assert_eq!(found, "0.1.0");
        }
    }

    #[test]
    fn loaded_rig_starts_dark() {
        let mut rig = default_rig();
        rig.fixtures[0].level = 100;

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("ron");
        save_patch(&rig, &path).unwrap();

        // Levels are live state, not wiring.
        let loaded = load_patch(&path).unwrap();
        assert_eq!(loaded.fixtures[0].level, 0);
    }
}
