//! Working store: the single mutable working copy of each template.

use vault_model::{
    ColorSystem, ContentPatch, CURRENT_SCHEMA_VERSION, SnapshotContent, TemplateId,
    VersionHistory, WorkingData,
};

use super::Vault;
use crate::backend::{Artifact, ContentKey, ContentStore, Scope};
use crate::error::{ContentKind, Result, VaultError};
use crate::migrate::{SideArtifacts, migrate_working};

impl<S: ContentStore> Vault<S> {
    /// Read Working. `Ok(None)` means it has not been created yet.
    ///
    /// `is_dirty` is recomputed on load: the working content is dirty when
    /// its checksum differs from the checked-out version's, or from the
    /// reset baseline when no version is checked out.
    pub fn load_working(&self, template: &TemplateId) -> Result<Option<WorkingData>> {
        let Some((mut working, _)) = self.read_working_record(template)? else {
            return Ok(None);
        };
        working.is_dirty = self.differs_from_checkout(template, &working.content)?;
        Ok(Some(working))
    }

    /// Apply a partial update to Working and return the stored record.
    ///
    /// Fields present in `patch` replace the stored ones wholesale. Working
    /// is seeded from Original (or an empty record) first if it does not
    /// exist yet. Always stamps `last_modified` and sets `is_dirty`.
    pub fn save_working(&self, template: &TemplateId, patch: ContentPatch) -> Result<WorkingData> {
        self.edit_working(template, |_| Ok::<_, VaultError>(patch))
    }

    /// Build a patch from the current working content and apply it, all
    /// under the template lock.
    ///
    /// Use this instead of `load_working` followed by `save_working` when the
    /// patch depends on what is stored, e.g. to change one text id inside
    /// the whole `texts` map. Nothing is written if `edit` fails.
    pub fn edit_working<E>(
        &self,
        template: &TemplateId,
        edit: impl FnOnce(&SnapshotContent) -> std::result::Result<ContentPatch, E>,
    ) -> std::result::Result<WorkingData, E>
    where
        E: From<VaultError>,
    {
        self.locks.with_lock(template, || {
            let mut working = match self.read_working_record(template)? {
                Some((working, _)) => working,
                None => {
                    tracing::debug!(template = %template, "seeding working content before first edit");
                    WorkingData::seed(template.clone(), self.load_original(template)?.as_ref())
                }
            };

            let patch = edit(&working.content)?;
            let fields = patch.field_names();
            let mappings = patch.component_mappings.clone();
            patch.apply(&mut working.content);
            working.schema_version = CURRENT_SCHEMA_VERSION;
            working.touch();
            working.is_dirty = true;

            self.write_working(&working)?;
            if let Some(mappings) = mappings {
                self.write(
                    &ContentKey::working(template, Artifact::ComponentMappings),
                    &mappings,
                )?;
            }
            tracing::debug!(template = %template, fields = ?fields, "saved working content");
            Ok(working)
        })
    }

    /// Discard all uncommitted edits and return Working to the baseline.
    ///
    /// Texts and images come from Original, the color system returns to the
    /// default palette, component mappings are removed, and the history's
    /// checkout is cleared. If any write fails, Working's files are put back
    /// as they were.
    pub fn reset_to_original(&self, template: &TemplateId) -> Result<WorkingData> {
        self.locks.with_lock(template, || {
            let original = self
                .load_original(template)?
                .ok_or_else(|| VaultError::NotFound {
                    kind: ContentKind::Original,
                    template: template.clone(),
                })?;
            let mut history = self.load_history(template)?;
            let checkpoint = self.checkpoint_working(template)?;

            let mut working = WorkingData::seed(template.clone(), Some(&original));
            working.is_dirty = true;
            history.current_version = None;

            let reset = self
                .write_working(&working)
                .and_then(|()| {
                    self.write(
                        &ContentKey::working(template, Artifact::Colors),
                        &ColorSystem::default_palette(),
                    )
                })
                .and_then(|()| {
                    self.store
                        .delete(&ContentKey::working(template, Artifact::ComponentMappings))
                })
                .and_then(|()| self.write_history(&history));
            if let Err(error) = reset {
                self.rollback_working(template, &checkpoint);
                return Err(error);
            }

            tracing::info!(template = %template, "reset working content to original");
            Ok(working)
        })
    }

    /// Read Working as stored, migrating legacy records in memory.
    ///
    /// The flag is true when the record came from the legacy flat file or was
    /// upgraded, i.e. the stored bytes are stale.
    pub(super) fn read_working_record(
        &self,
        template: &TemplateId,
    ) -> Result<Option<(WorkingData, bool)>> {
        let key = ContentKey::working(template, Artifact::Content);
        let legacy_key = ContentKey::new(template, Scope::Root, Artifact::Content);

        let (mut working, path, from_legacy) = match self.read::<WorkingData>(&key)? {
            Some(working) => (working, key.relative_path(), false),
            None => match self.read::<WorkingData>(&legacy_key)? {
                Some(working) => {
                    tracing::warn!(template = %template, "migrating legacy flat working file");
                    (working, legacy_key.relative_path(), true)
                }
                None => return Ok(None),
            },
        };

        let side = if working.schema_version == 0 {
            SideArtifacts {
                component_mappings: self
                    .read(&ContentKey::working(template, Artifact::ComponentMappings))?,
            }
        } else {
            SideArtifacts::default()
        };
        let migrated = migrate_working(&mut working, side, &path)?;
        working.template_id = template.clone();
        Ok(Some((working, from_legacy || migrated)))
    }

    fn differs_from_checkout(
        &self,
        template: &TemplateId,
        content: &SnapshotContent,
    ) -> Result<bool> {
        let history = self.read_history(template)?;
        match history.as_ref().and_then(VersionHistory::current) {
            Some(meta) => {
                let checksum = crate::codec::checksum(content, meta.checksum.len())?;
                Ok(checksum != meta.checksum)
            }
            None => {
                let baseline = self.reset_baseline(template)?;
                Ok(self.checksum(content)? != self.checksum(&baseline)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryContentStore, VaultConfig, codec};
    use std::collections::BTreeMap;

    fn vault() -> Vault<MemoryContentStore> {
        Vault::with_store(MemoryContentStore::new(), VaultConfig::default())
    }

    fn texts(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn first_save_seeds_empty_record_without_original() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();

        let working = vault
            .save_working(&template, ContentPatch::new().with_texts(texts(&[("t1", "Hi")])))
            .unwrap();

        assert!(working.is_dirty);
        assert_eq!(working.content.texts, texts(&[("t1", "Hi")]));
        assert_eq!(working.content.color_system, Some(ColorSystem::default_palette()));
    }

    #[test]
    fn save_preserves_fields_absent_from_patch() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        let images = texts(&[("i1", "a.png")]);

        vault
            .save_working(&template, ContentPatch::new().with_images(images.clone()))
            .unwrap();
        let working = vault
            .save_working(&template, ContentPatch::new().with_texts(texts(&[("t1", "Hi")])))
            .unwrap();

        assert_eq!(working.content.images, images);
        assert_eq!(working.content.texts, texts(&[("t1", "Hi")]));
    }

    #[test]
    fn mapping_patch_writes_side_artifact() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        let mappings = texts(&[("hero", "brand.primary")]);

        vault
            .save_working(
                &template,
                ContentPatch::new().with_component_mappings(mappings.clone()),
            )
            .unwrap();

        let bytes = vault
            .store()
            .get(&ContentKey::working(&template, Artifact::ComponentMappings))
            .unwrap()
            .unwrap();
        let stored: BTreeMap<String, String> =
            codec::decode(&bytes, std::path::Path::new("x")).unwrap();
        assert_eq!(stored, mappings);
    }

    #[test]
    fn edit_builds_patch_from_stored_content() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        vault
            .save_working(&template, ContentPatch::new().with_texts(texts(&[("t1", "Hi"), ("t2", "Yo")])))
            .unwrap();

        let working = vault
            .edit_working(&template, |current| {
                let mut texts = current.texts.clone();
                texts.insert("t2".to_string(), "Hey".to_string());
                Ok::<_, VaultError>(ContentPatch::new().with_texts(texts))
            })
            .unwrap();

        assert_eq!(working.content.texts, texts(&[("t1", "Hi"), ("t2", "Hey")]));
    }

    #[test]
    fn failed_edit_writes_nothing() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();

        let result = vault.edit_working(&template, |_| Err(VaultError::MissingWorkingData {
            template: template.clone(),
        }));

        assert!(matches!(result, Err(VaultError::MissingWorkingData { .. })));
        assert!(vault.load_working(&template).unwrap().is_none());
    }

    #[test]
    fn reset_without_original_is_not_found() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        let error = vault.reset_to_original(&template).unwrap_err();
        assert!(matches!(
            error,
            VaultError::NotFound {
                kind: ContentKind::Original,
                ..
            }
        ));
    }

    #[test]
    fn legacy_flat_file_is_migrated_on_read() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        let legacy = br#"{"templateId":"landing","lastModified":"2024-05-01T00:00:00Z","texts":{"t1":"Old"},"isDirty":true}"#;
        vault
            .store()
            .put(&ContentKey::new(&template, Scope::Root, Artifact::Content), legacy)
            .unwrap();
        vault
            .store()
            .put(
                &ContentKey::working(&template, Artifact::ComponentMappings),
                br#"{"hero":"brand.accent"}"#,
            )
            .unwrap();

        let working = vault.load_working(&template).unwrap().unwrap();

        assert_eq!(working.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(working.content.texts, texts(&[("t1", "Old")]));
        assert_eq!(working.content.color_system, Some(ColorSystem::default_palette()));
        assert_eq!(
            working.content.component_mappings,
            Some(texts(&[("hero", "brand.accent")]))
        );
    }

    #[test]
    fn future_schema_is_rejected_on_load() {
        let vault = vault();
        let template = TemplateId::new("landing").unwrap();
        let record = br#"{"schemaVersion":99,"templateId":"landing","lastModified":"x","isDirty":false}"#;
        vault
            .store()
            .put(&ContentKey::working(&template, Artifact::Content), record)
            .unwrap();

        assert!(matches!(
            vault.load_working(&template),
            Err(VaultError::UnsupportedSchema { found: 99, .. })
        ));
    }
}
