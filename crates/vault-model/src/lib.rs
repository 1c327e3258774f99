//! Data model for versioned website template content.
//!
//! These types describe what the vault persists: the immutable baseline
//! produced by template analysis, the single mutable working copy, and the
//! chain of named versions recorded in a per-template history ledger.
//! Nothing in this crate touches the filesystem.

pub mod color;
pub mod content;
pub mod diff;
pub mod error;
pub mod ids;
pub mod patch;
pub mod version;

pub use color::ColorSystem;
pub use content::{
    AnalysisArtifact, OriginalData, OriginalImage, OriginalText, SnapshotContent, WorkingData,
};
pub use diff::{ContentDiff, FieldChange};
pub use error::{ModelError, Result};
pub use ids::{SnapshotRef, TemplateId, VersionNumber};
pub use patch::ContentPatch;
pub use version::{ChangeCounts, VersionHistory, VersionMetadata};

/// Current schema version of persisted working and version content.
///
/// Records written before the field existed deserialize as schema 0 and are
/// upgraded on load. Records newer than this are rejected.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Current UTC time as an RFC 3339 string, the timestamp format used on disk.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
