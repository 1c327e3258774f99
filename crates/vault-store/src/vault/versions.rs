//! Version store and history ledger.

use std::collections::BTreeSet;

use vault_model::{
    CURRENT_SCHEMA_VERSION, ColorSystem, SnapshotContent, TemplateId, VersionHistory,
    VersionMetadata, VersionNumber, WorkingData,
};

use super::Vault;
use crate::backend::{Artifact, ContentKey, ContentStore};
use crate::codec;
use crate::diff::diff_content;
use crate::error::{Result, VaultError};
use crate::migrate::{SideArtifacts, migrate_working};

impl<S: ContentStore> Vault<S> {
    /// Freeze Working into a new version and check it out.
    ///
    /// Change counts are taken against the checked-out version's content, or
    /// against Original when nothing is checked out. The version directory is
    /// published in one step, then the history is written, then Working is
    /// marked clean. A failure at any step leaves no history update visible.
    pub fn create_version(&self, template: &TemplateId, description: &str) -> Result<VersionMetadata> {
        self.locks
            .with_lock(template, || self.create_version_locked(template, description))
    }

    fn create_version_locked(&self, template: &TemplateId, description: &str) -> Result<VersionMetadata> {
        let Some((mut working, _)) = self.read_working_record(template)? else {
            return Err(VaultError::MissingWorkingData {
                template: template.clone(),
            });
        };

        let mut history = self.load_history(template)?;
        let previous_history = history.clone();
        let parent = history.current().map(|meta| meta.version);
        let baseline = self.change_baseline(template, parent)?;
        let changes = diff_content(&working.content, &baseline);
        let version = history.next_version()?;

        let meta = VersionMetadata {
            id: format!("{}-{}", version.dir_name(), chrono::Utc::now().timestamp_millis()),
            version,
            timestamp: vault_model::now_rfc3339(),
            description: description.trim().to_string(),
            changes,
            checksum: self.checksum(&working.content)?,
            parent_version: parent,
        };

        working.schema_version = CURRENT_SCHEMA_VERSION;
        working.is_dirty = false;

        let mut artifacts = vec![
            (Artifact::Content, codec::encode(&working)?),
            (Artifact::Metadata, codec::encode(&meta)?),
        ];
        if let Some(colors) = &working.content.color_system {
            artifacts.push((Artifact::Colors, codec::encode(colors)?));
        }
        if let Some(mappings) = &working.content.component_mappings {
            artifacts.push((Artifact::ComponentMappings, codec::encode(mappings)?));
        }
        self.store.publish_version(template, version, &artifacts)?;

        history.append(meta.clone());
        if let Err(error) = self.write_history(&history) {
            self.discard_version(template, version);
            return Err(error);
        }

        if let Err(error) = self.write_working(&working) {
            if let Err(rollback) = self.write_history(&previous_history) {
                tracing::warn!(template = %template, error = %rollback, "failed to restore previous history");
            }
            self.discard_version(template, version);
            return Err(error);
        }

        tracing::info!(
            template = %template,
            version = %version,
            parent = ?parent.map(|p| p.to_string()),
            texts = changes.texts,
            styles = changes.styles,
            media = changes.media,
            colors = changes.colors,
            "created version"
        );
        Ok(meta)
    }

    /// Overwrite Working with a saved version's content and check it out.
    ///
    /// Working's files are put back as they were if any write fails.
    pub fn restore_version(&self, template: &TemplateId, version: VersionNumber) -> Result<WorkingData> {
        self.locks.with_lock(template, || {
            let mut history = self.load_history(template)?;
            if !history.contains(version) {
                return Err(self.version_not_found(template, version));
            }
            let snapshot = self.load_version(template, version)?;

            let mut working = match self.read_working_record(template)? {
                Some((working, _)) => working,
                None => WorkingData::new(template.clone(), SnapshotContent::default()),
            };

            let SnapshotContent {
                texts,
                images,
                styles,
                color_system,
                component_mappings,
            } = snapshot.content;
            working.content.texts = texts;
            working.content.images = images;
            working.content.styles = styles;

            let colors = match color_system {
                Some(colors) => Some(colors),
                None => self.read::<ColorSystem>(&ContentKey::version(template, version, Artifact::Colors))?,
            };
            let mappings = match component_mappings {
                Some(mappings) => Some(mappings),
                None => self.read(&ContentKey::version(template, version, Artifact::ComponentMappings))?,
            };
            let mut side_files = Vec::new();
            if let Some(colors) = colors {
                side_files.push((Artifact::Colors, codec::encode(&colors)?));
                working.content.color_system = Some(colors);
            }
            if let Some(mappings) = mappings {
                side_files.push((Artifact::ComponentMappings, codec::encode(&mappings)?));
                working.content.component_mappings = Some(mappings);
            }
            working.schema_version = CURRENT_SCHEMA_VERSION;
            working.touch();
            working.is_dirty = true;
            history.current_version = Some(version);

            let checkpoint = self.checkpoint_working(template)?;
            if let Err(error) = self.write_restored(&working, &history, &side_files) {
                self.rollback_working(template, &checkpoint);
                return Err(error);
            }

            tracing::info!(template = %template, version = %version, "restored version");
            Ok(working)
        })
    }

    /// Working's side files, then Working, then the ledger.
    fn write_restored(
        &self,
        working: &WorkingData,
        history: &VersionHistory,
        side_files: &[(Artifact, Vec<u8>)],
    ) -> Result<()> {
        for (artifact, bytes) in side_files {
            self.store
                .put(&ContentKey::working(&working.template_id, *artifact), bytes)?;
        }
        self.write_working(working)?;
        self.write_history(history)
    }

    /// Remove a version's storage and its history entry.
    ///
    /// Clears the checkout if it pointed at the deleted version. Versions
    /// naming it as their parent keep the dangling pointer.
    pub fn delete_version(&self, template: &TemplateId, version: VersionNumber) -> Result<()> {
        self.locks.with_lock(template, || {
            let mut history = self.load_history(template)?;
            let in_history = history.remove(version).is_some();
            if !in_history && !self.store.version_exists(template, version)? {
                return Err(self.version_not_found(template, version));
            }

            if in_history {
                self.write_history(&history)?;
            }
            self.store.remove_version(template, version)?;

            let orphans: Vec<String> = history
                .versions
                .iter()
                .filter(|meta| meta.parent_version == Some(version))
                .map(|meta| meta.version.to_string())
                .collect();
            if !orphans.is_empty() {
                tracing::warn!(
                    template = %template,
                    version = %version,
                    children = ?orphans,
                    "deleted version is still the parent of other versions"
                );
            }
            tracing::info!(template = %template, version = %version, "deleted version");
            Ok(())
        })
    }

    /// History entries, newest first.
    pub fn list_versions(&self, template: &TemplateId) -> Result<Vec<VersionMetadata>> {
        let history = self.load_history(template)?;
        Ok(history.newest_first().into_iter().cloned().collect())
    }

    /// Walk parent pointers from `version` back to the root of its chain.
    ///
    /// Stops at the first parent that no longer exists.
    pub fn lineage(&self, template: &TemplateId, version: VersionNumber) -> Result<Vec<VersionMetadata>> {
        let history = self.load_history(template)?;
        let mut chain = Vec::new();
        let mut seen = BTreeSet::new();
        let mut next = Some(version);

        while let Some(current) = next {
            if !seen.insert(current) {
                tracing::warn!(template = %template, version = %current, "cycle in version lineage");
                break;
            }
            match history.find(current) {
                Some(meta) => {
                    next = meta.parent_version;
                    chain.push(meta.clone());
                }
                None if chain.is_empty() => return Err(self.version_not_found(template, version)),
                None => {
                    tracing::warn!(template = %template, version = %current, "lineage broken by deleted parent");
                    break;
                }
            }
        }
        Ok(chain)
    }

    /// Recompute a version's checksum and compare it to the recorded one.
    pub fn verify_version(&self, template: &TemplateId, version: VersionNumber) -> Result<()> {
        self.read_version_content(template, version, true)?
            .map(|_| ())
            .ok_or_else(|| self.version_not_found(template, version))
    }

    /// Read a saved version's content, verifying its checksum when enabled.
    pub fn load_version(&self, template: &TemplateId, version: VersionNumber) -> Result<WorkingData> {
        self.read_version_content(template, version, self.config.verify_checksums)?
            .ok_or_else(|| self.version_not_found(template, version))
    }

    /// Checksums attest the stored bytes, so verification runs before any
    /// schema upgrade touches the content.
    fn read_version_content(
        &self,
        template: &TemplateId,
        version: VersionNumber,
        verify: bool,
    ) -> Result<Option<WorkingData>> {
        let key = ContentKey::version(template, version, Artifact::Content);
        let Some(mut snapshot) = self.read::<WorkingData>(&key)? else {
            return Ok(None);
        };
        if verify {
            let meta = self.version_metadata(template, version)?;
            self.check_checksum(template, &meta, &snapshot.content)?;
        }
        let side = if snapshot.schema_version == 0 {
            SideArtifacts {
                component_mappings: self.read(&ContentKey::version(
                    template,
                    version,
                    Artifact::ComponentMappings,
                ))?,
            }
        } else {
            SideArtifacts::default()
        };
        migrate_working(&mut snapshot, side, &key.relative_path())?;
        Ok(Some(snapshot))
    }

    /// Metadata from the ledger, falling back to the version's own file.
    fn version_metadata(&self, template: &TemplateId, version: VersionNumber) -> Result<VersionMetadata> {
        if let Some(meta) = self
            .read_history(template)?
            .and_then(|history| history.find(version).cloned())
        {
            return Ok(meta);
        }
        self.read(&ContentKey::version(template, version, Artifact::Metadata))?
            .ok_or_else(|| self.version_not_found(template, version))
    }

    fn check_checksum(
        &self,
        template: &TemplateId,
        meta: &VersionMetadata,
        content: &SnapshotContent,
    ) -> Result<()> {
        let actual = codec::checksum(content, meta.checksum.len())?;
        if actual != meta.checksum {
            return Err(VaultError::ChecksumMismatch {
                template: template.clone(),
                version: meta.version,
                expected: meta.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Content a new version's change counts are measured against.
    fn change_baseline(
        &self,
        template: &TemplateId,
        parent: Option<VersionNumber>,
    ) -> Result<SnapshotContent> {
        if let Some(parent) = parent {
            match self.read_version_content(template, parent, false) {
                Ok(Some(snapshot)) => return Ok(snapshot.content),
                Ok(None) => {
                    tracing::warn!(template = %template, parent = %parent, "parent version content missing, diffing against original");
                }
                Err(error) => {
                    tracing::warn!(template = %template, parent = %parent, error = %error, "parent version unreadable, diffing against original");
                }
            }
        }
        self.reset_baseline(template)
    }

    /// Best-effort removal of a version published by a failed save.
    fn discard_version(&self, template: &TemplateId, version: VersionNumber) {
        if let Err(error) = self.store.remove_version(template, version) {
            tracing::warn!(template = %template, version = %version, error = %error, "failed to discard version directory");
        }
    }

    fn version_not_found(&self, template: &TemplateId, version: VersionNumber) -> VaultError {
        VaultError::VersionNotFound {
            template: template.clone(),
            version,
        }
    }
}
