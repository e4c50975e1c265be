//! On-disk patch document format.
//!
//! The patch document records the rig's wiring: one record per fixture with
//! its identity, group, start address and profile. It is serialized to RON
//! or JSON depending on the file extension, wrapped in a versioned container
//! with metadata.

use crate::error::{IoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stagelux_core::{ChannelType, Fixture, FixtureId, ProfileRegistry, RigState};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The current version of the patch file format.
///
/// Stamped into saved files; incremented on breaking changes to
/// `PatchFile` or its children.
pub const PATCH_FILE_VERSION: &str = "1.0.0";

/// Maximum allowed patch file size (1 MB).
///
/// A patch document is a few KB even for a full universe; anything bigger
/// is rejected before parsing.
pub const MAX_PATCH_FILE_SIZE: u64 = 1024 * 1024;

/// Top-level structure of a saved patch file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchFile {
    /// The version of the patch file format.
    pub version: String,
    /// Metadata about the document.
    pub metadata: PatchMetadata,
    /// The wiring records.
    pub document: PatchDocument,
}

/// Metadata associated with a patch file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchMetadata {
    /// Timestamp of when the document was first created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last modification.
    pub modified_at: DateTime<Utc>,
}

impl PatchFile {
    /// Wrap a document, setting creation and modification times to now.
    pub fn new(document: PatchDocument) -> Self {
        let now = Utc::now();
        Self {
            version: PATCH_FILE_VERSION.to_string(),
            metadata: PatchMetadata {
                created_at: now,
                modified_at: now,
            },
            document,
        }
    }

    /// Load a `PatchFile` from the given path, RON or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_limit(path, MAX_PATCH_FILE_SIZE)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let size = metadata.len();
        if size > limit {
            return Err(IoError::FileTooLarge { size, limit });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("ron");

        let mut content = String::new();
        File::open(path)?.read_to_string(&mut content)?;

        match extension {
            "json" => Ok(serde_json::from_str(&content)?),
            "ron" | "slx" => Ok(ron::from_str(&content)?),
            _ => Err(IoError::UnsupportedFormat(extension.to_string())),
        }
    }

    /// Save to the given path, RON or JSON by extension. Updates the
    /// `modified_at` timestamp.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("ron");

        self.metadata.modified_at = Utc::now();

        match extension {
            "json" => {
                let file = File::create(path)?;
                serde_json::to_writer_pretty(file, self)?;
            }
            "ron" | "slx" => {
                let config = ron::ser::PrettyConfig::default();
                let s = ron::ser::to_string_pretty(self, config)?;
                let mut file = File::create(path)?;
                file.write_all(s.as_bytes())?;
            }
            _ => return Err(IoError::UnsupportedFormat(extension.to_string())),
        }

        Ok(())
    }
}

/// How a record refers to its profile: by registry name, or as a verbatim
/// channel list for user-composed profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProfileRef {
    /// A built-in profile (or legacy mode token) resolved on load.
    Named(String),
    /// A custom channel sequence stored verbatim.
    Custom(Vec<ChannelType>),
}

/// One fixture's wiring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchRecord {
    /// Stable fixture identity.
    pub fixture: FixtureId,
    /// Display name.
    pub name: String,
    /// Logical group bucket.
    pub group: String,
    /// First DMX channel, 1-512.
    pub start_address: u16,
    /// Profile reference.
    pub profile: ProfileRef,
}

/// The persisted wiring of the whole rig.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchDocument {
    /// One record per fixture, in patch order.
    pub fixtures: Vec<PatchRecord>,
}

impl PatchDocument {
    /// Extract the wiring from a rig. Built-in profiles are recorded by
    /// name, custom ones verbatim.
    pub fn from_rig(rig: &RigState) -> Self {
        let fixtures = rig
            .fixtures
            .iter()
            .map(|f| PatchRecord {
                fixture: f.id,
                name: f.name.clone(),
                group: f.group.clone(),
                start_address: f.start_address,
                profile: match ProfileRegistry::name_of(&f.profile) {
                    Some(name) => ProfileRef::Named(name.to_string()),
                    None => ProfileRef::Custom(f.profile.0.clone()),
                },
            })
            .collect();
        Self { fixtures }
    }

    /// Build a rig from the document. Named profiles go through the
    /// registry (unknown names fall back with a diagnostic); the patch
    /// table is rebuilt and validated from the loaded addressing.
    pub fn into_rig(self) -> Result<RigState> {
        let mut rig = RigState::default();
        for record in self.fixtures {
            let mut fixture = Fixture::new(record.fixture, record.name, record.group);
            fixture.start_address = record.start_address;
            fixture.profile = match record.profile {
                ProfileRef::Named(name) => ProfileRegistry::resolve(&name),
                ProfileRef::Custom(channels) => channels.into(),
            };
            rig.fixtures.push(fixture);
        }
        rig.apply_patch()?;
        tracing::debug!(fixtures = rig.fixtures.len(), "patch document loaded");
        Ok(rig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagelux_core::state::default_rig;
    use stagelux_core::Profile;
    use tempfile::NamedTempFile;

    #[test]
    fn patch_file_ron_roundtrip() {
        let document = PatchDocument::from_rig(&default_rig());
        let mut patch_file = PatchFile::new(document);

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("ron");

        patch_file.save(&path).unwrap();
        let loaded = PatchFile::load(&path).unwrap();

        assert_eq!(patch_file.version, loaded.version);
        assert_eq!(patch_file.document, loaded.document);
        assert_eq!(patch_file.metadata.created_at, loaded.metadata.created_at);
    }

    #[test]
    fn patch_file_json_roundtrip() {
        let document = PatchDocument::from_rig(&default_rig());
        let mut patch_file = PatchFile::new(document);

        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("json");

        patch_file.save(&path).unwrap();
        let loaded = PatchFile::load(&path).unwrap();

        assert_eq!(patch_file.document, loaded.document);
    }

    #[test]
    fn builtin_profiles_are_recorded_by_name() {
        let document = PatchDocument::from_rig(&default_rig());
        assert_eq!(
            document.fixtures[0].profile,
            ProfileRef::Named("RGBDS".to_string())
        );
        let fumee = document.fixtures.last().unwrap();
        assert_eq!(fumee.profile, ProfileRef::Named("SMOKE".to_string()));
    }

    #[test]
    fn custom_profile_roundtrips_verbatim() {
        use ChannelType::*;
        let mut rig = default_rig();
        rig.fixtures[0].profile = Profile(vec![R, R, G, B, Dim]);
        rig.apply_patch().unwrap();

        let document = PatchDocument::from_rig(&rig);
        assert_eq!(
            document.fixtures[0].profile,
            ProfileRef::Custom(vec![R, R, G, B, Dim])
        );

        let loaded = document.into_rig().unwrap();
        assert_eq!(loaded.fixtures[0].profile, Profile(vec![R, R, G, B, Dim]));
    }

    #[test]
    fn document_rig_roundtrip() {
        let rig = default_rig();
        let loaded = PatchDocument::from_rig(&rig).into_rig().unwrap();

        assert_eq!(loaded.fixtures.len(), rig.fixtures.len());
        for (a, b) in rig.fixtures.iter().zip(&loaded.fixtures) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.group, b.group);
            assert_eq!(a.start_address, b.start_address);
            assert_eq!(a.profile, b.profile);
        }
        assert_eq!(loaded.patch.len(), rig.patch.len());
    }

    #[test]
    fn invalid_record_is_rejected_on_load() {
        let document = PatchDocument {
            fixtures: vec![PatchRecord {
                fixture: FixtureId(1),
                name: "Bad".into(),
                group: "face".into(),
                start_address: 511,
                profile: ProfileRef::Named("RGBDS".into()),
            }],
        };
        assert!(matches!(
            document.into_rig(),
            Err(IoError::InvalidRecord(_))
        ));
    }

    #[test]
    fn legacy_mode_tokens_resolve_on_load() {
        let document = PatchDocument {
            fixtures: vec![PatchRecord {
                fixture: FixtureId(1),
                name: "Old PAR".into(),
                group: "face".into(),
                start_address: 1,
                profile: ProfileRef::Named("5CH".into()),
            }],
        };
        let rig = document.into_rig().unwrap();
        assert_eq!(rig.fixtures[0].profile, ProfileRegistry::resolve("RGBDS"));
    }

    #[test]
    fn test_load_file_too_large() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("ron");
        let mut f = File::create(&path).unwrap();
        f.write_all(&vec![b' '; 1024]).unwrap();

        let result = PatchFile::load_with_limit(&path, 500);
        assert!(matches!(result, Err(IoError::FileTooLarge { .. })));

        if let Err(IoError::FileTooLarge { size, limit }) = result {
            assert_eq!(size, 1024);
            assert_eq!(limit, 500);
        }
    }

    #[test]
    fn test_unsupported_format() {
        let mut patch_file = PatchFile::new(PatchDocument::default());
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("txt");

        assert!(matches!(
            patch_file.save(&path),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
