//! The vault: every public operation on template content.
//!
//! Operations are grouped by the store they act on:
//!
//! - `original` - the immutable baseline
//! - `working` - the single mutable working copy
//! - `versions` - saved versions and the history ledger
//! - `compare` - differences between any two snapshots
//!
//! Mutating operations hold the template's lock for their whole
//! read-modify-write sequence. Reads take no lock.

mod compare;
mod original;
mod versions;
mod working;

use std::fs;

use serde::Serialize;
use serde::de::DeserializeOwned;
use vault_model::{
    AnalysisArtifact, OriginalData, SnapshotContent, TemplateId, VersionHistory, WorkingData,
};

use crate::backend::{Artifact, ContentKey, ContentStore, FsContentStore, Scope};
use crate::codec;
use crate::config::VaultConfig;
use crate::error::{ContentKind, Result, VaultError};
use crate::locks::TemplateLocks;

const WORKING_ARTIFACTS: [Artifact; 3] = [
    Artifact::Content,
    Artifact::Colors,
    Artifact::ComponentMappings,
];

type WorkingCheckpoint = Vec<(Artifact, Option<Vec<u8>>)>;

/// Versioned content store over a [`ContentStore`] backend.
#[derive(Debug)]
pub struct Vault<S = FsContentStore> {
    store: S,
    config: VaultConfig,
    locks: TemplateLocks,
}

impl Vault<FsContentStore> {
    /// Open a filesystem vault at `config.root`, creating the directory.
    pub fn open(config: VaultConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)
            .map_err(|e| VaultError::io("create directory", &config.root, e))?;
        let store = FsContentStore::new(&config.root).keep_staging(config.keep_staging);
        tracing::debug!(root = %config.root.display(), "opened vault");
        Ok(Self::with_store(store, config))
    }
}

impl<S: ContentStore> Vault<S> {
    pub fn with_store(store: S, config: VaultConfig) -> Self {
        Self {
            store,
            config,
            locks: TemplateLocks::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Bootstrap a template: write its baseline if absent, create an empty
    /// history if absent, and seed Working if absent.
    ///
    /// Safe to call repeatedly; existing state is never overwritten.
    pub fn initialize(&self, template: &TemplateId, original: OriginalData) -> Result<()> {
        self.locks
            .with_lock(template, || self.initialize_locked(template, original))
    }

    /// Bootstrap a template from the analysis pipeline's `analysis.json`.
    pub fn initialize_from_analysis(&self, template: &TemplateId) -> Result<OriginalData> {
        self.locks.with_lock(template, || {
            let original = match self.load_original(template)? {
                Some(original) => original,
                None => {
                    let key = ContentKey::new(template, Scope::Root, Artifact::Analysis);
                    let artifact: AnalysisArtifact =
                        self.read(&key)?.ok_or_else(|| VaultError::NotFound {
                            kind: ContentKind::Analysis,
                            template: template.clone(),
                        })?;
                    tracing::info!(template = %template, "migrating analysis artifact to original");
                    artifact.into_original(template.clone())
                }
            };
            self.initialize_locked(template, original)?;
            self.load_original(template)?.ok_or_else(|| VaultError::NotFound {
                kind: ContentKind::Original,
                template: template.clone(),
            })
        })
    }

    fn initialize_locked(&self, template: &TemplateId, original: OriginalData) -> Result<()> {
        self.initialize_original_locked(template, original)?;

        if self.read_history(template)?.is_none() {
            self.write_history(&VersionHistory::new(template.clone()))?;
            tracing::debug!(template = %template, "created empty version history");
        }

        match self.read_working_record(template)? {
            Some((working, true)) => {
                self.write_working(&working)?;
            }
            Some((_, false)) => {}
            None => {
                let original = self.load_original(template)?;
                self.write_working(&WorkingData::seed(template.clone(), original.as_ref()))?;
                tracing::debug!(template = %template, "seeded working content from original");
            }
        }
        Ok(())
    }

    /// Read the history ledger.
    ///
    /// Absence is a bootstrap error: `initialize` always creates one.
    pub fn load_history(&self, template: &TemplateId) -> Result<VersionHistory> {
        self.read_history(template)?
            .ok_or_else(|| VaultError::HistoryNotInitialized {
                template: template.clone(),
            })
    }

    fn read_history(&self, template: &TemplateId) -> Result<Option<VersionHistory>> {
        self.read(&ContentKey::history(template))
    }

    fn write_history(&self, history: &VersionHistory) -> Result<()> {
        self.write(&ContentKey::history(&history.template_id), history)
    }

    fn write_working(&self, working: &WorkingData) -> Result<()> {
        self.write(
            &ContentKey::working(&working.template_id, Artifact::Content),
            working,
        )
    }

    /// Raw bytes of every Working artifact, for [`Self::rollback_working`].
    fn checkpoint_working(&self, template: &TemplateId) -> Result<WorkingCheckpoint> {
        WORKING_ARTIFACTS
            .into_iter()
            .map(|artifact| {
                self.store
                    .get(&ContentKey::working(template, artifact))
                    .map(|bytes| (artifact, bytes))
            })
            .collect()
    }

    /// Put Working's artifacts back as checkpointed, deleting any that were
    /// absent. Best-effort: failures are logged and the rest still restored.
    fn rollback_working(&self, template: &TemplateId, checkpoint: &WorkingCheckpoint) {
        for (artifact, bytes) in checkpoint {
            let key = ContentKey::working(template, *artifact);
            let restored = match bytes {
                Some(bytes) => self.store.put(&key, bytes),
                None => self.store.delete(&key),
            };
            if let Err(error) = restored {
                tracing::warn!(
                    template = %template,
                    path = %key.relative_path().display(),
                    error = %error,
                    "failed to restore working artifact"
                );
            }
        }
    }

    /// Content Working returns to on reset, and the clean state when no
    /// version is checked out.
    fn reset_baseline(&self, template: &TemplateId) -> Result<SnapshotContent> {
        Ok(self.load_original(template)?.map_or_else(
            SnapshotContent::empty_with_default_palette,
            |original| original.baseline_content(),
        ))
    }

    fn read<T: DeserializeOwned>(&self, key: &ContentKey<'_>) -> Result<Option<T>> {
        self.store
            .get(key)?
            .map(|bytes| codec::decode(&bytes, &key.relative_path()))
            .transpose()
    }

    fn write<T: Serialize>(&self, key: &ContentKey<'_>, value: &T) -> Result<()> {
        self.store.put(key, &codec::encode(value)?)
    }

    fn checksum<T: Serialize>(&self, value: &T) -> Result<String> {
        codec::checksum(value, self.config.checksum_length)
    }
}
