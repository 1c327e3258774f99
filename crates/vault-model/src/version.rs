//! Version metadata and the per-template history ledger.

use serde::{Deserialize, Serialize};

use crate::{ModelError, TemplateId, VersionNumber};

/// Per-field change counts between a snapshot and its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub texts: usize,
    pub styles: usize,
    pub media: usize,
    pub colors: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.texts + self.styles + self.media + self.colors
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Descriptor of one saved version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    pub id: String,
    pub version: VersionNumber,
    pub timestamp: String,
    pub description: String,
    pub changes: ChangeCounts,
    pub checksum: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_version: Option<VersionNumber>,
}

/// The version ledger of one template.
///
/// `current_version` is `None` while Working reflects the baseline with no
/// saved version checked out. It otherwise names an entry in `versions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    pub template_id: TemplateId,
    #[serde(default)]
    pub versions: Vec<VersionMetadata>,
    #[serde(default)]
    pub current_version: Option<VersionNumber>,
    pub original_backup_date: String,
    pub latest_version: VersionNumber,
}

impl VersionHistory {
    pub fn new(template_id: TemplateId) -> Self {
        Self {
            template_id,
            versions: Vec::new(),
            current_version: None,
            original_backup_date: crate::now_rfc3339(),
            latest_version: VersionNumber::ZERO,
        }
    }

    pub fn find(&self, version: VersionNumber) -> Option<&VersionMetadata> {
        self.versions.iter().find(|meta| meta.version == version)
    }

    pub fn contains(&self, version: VersionNumber) -> bool {
        self.find(version).is_some()
    }

    /// The version a new save would get.
    pub fn next_version(&self) -> Result<VersionNumber, ModelError> {
        self.latest_version.next_patch()
    }

    /// Metadata of the checked-out version, if any.
    pub fn current(&self) -> Option<&VersionMetadata> {
        self.current_version.and_then(|version| self.find(version))
    }

    /// Record a freshly created version and check it out.
    pub fn append(&mut self, meta: VersionMetadata) {
        if meta.version > self.latest_version {
            self.latest_version = meta.version;
        }
        self.current_version = Some(meta.version);
        self.versions.push(meta);
    }

    /// Drop a version from the ledger, clearing the checkout if it pointed there.
    ///
    /// `latest_version` is left alone so deleted numbers are never handed out again.
    pub fn remove(&mut self, version: VersionNumber) -> Option<VersionMetadata> {
        let index = self.versions.iter().position(|meta| meta.version == version)?;
        if self.current_version == Some(version) {
            self.current_version = None;
        }
        Some(self.versions.remove(index))
    }

    /// Entries ordered newest first.
    pub fn newest_first(&self) -> Vec<&VersionMetadata> {
        let mut entries: Vec<&VersionMetadata> = self.versions.iter().collect();
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        entries
    }
}
