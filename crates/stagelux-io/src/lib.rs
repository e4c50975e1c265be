//! Stagelux IO - Patch Document Persistence
//!
//! Versioned on-disk format for the rig's wiring (fixtures, groups, DMX
//! addressing, profiles), serialized to RON or JSON by file extension.
//!
//! - [`patch_format`] - the on-disk structures and low-level (de)serialization
//! - [`patch`] - high-level save/load with version validation

#![warn(missing_docs)]

/// Error types
pub mod error;
/// High-level save/load API
pub mod patch;
/// On-disk format definition
pub mod patch_format;

pub use error::{IoError, Result};
pub use patch::{load_patch, save_patch};
pub use patch_format::{
    PatchDocument, PatchFile, PatchMetadata, PatchRecord, ProfileRef, MAX_PATCH_FILE_SIZE,
    PATCH_FILE_VERSION,
};
