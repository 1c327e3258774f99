//! In-process backend for tests and embedders that persist elsewhere.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use vault_model::{TemplateId, VersionNumber};

use super::{Artifact, ContentKey, ContentStore, Scope, scope_dir};
use crate::error::{Result, VaultError};

/// Keeps every artifact in a map keyed by its relative path.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts across all templates.
    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    // The map stays consistent even if a holder panicked, so poisoning is ignored.
    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        self.files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ContentStore for MemoryContentStore {
    fn get(&self, key: &ContentKey<'_>) -> Result<Option<Vec<u8>>> {
        Ok(self.files().get(&key.relative_path()).cloned())
    }

    fn put(&self, key: &ContentKey<'_>, bytes: &[u8]) -> Result<()> {
        self.files().insert(key.relative_path(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, key: &ContentKey<'_>) -> Result<()> {
        self.files().remove(&key.relative_path());
        Ok(())
    }

    fn publish_version(
        &self,
        template: &TemplateId,
        version: VersionNumber,
        artifacts: &[(Artifact, Vec<u8>)],
    ) -> Result<()> {
        let dir = scope_dir(template, Scope::Version(version));
        let mut files = self.files();
        if files.keys().any(|path| path.starts_with(&dir)) {
            return Err(VaultError::VersionExists {
                template: template.clone(),
                version,
            });
        }
        for (artifact, bytes) in artifacts {
            files.insert(dir.join(artifact.file_name()), bytes.clone());
        }
        Ok(())
    }

    fn remove_version(&self, template: &TemplateId, version: VersionNumber) -> Result<bool> {
        let dir = scope_dir(template, Scope::Version(version));
        let mut files = self.files();
        let before = files.len();
        files.retain(|path, _| !path.starts_with(&dir));
        Ok(files.len() != before)
    }

    fn list_versions(&self, template: &TemplateId) -> Result<Vec<VersionNumber>> {
        let versions_dir = scope_dir(template, Scope::Versions);
        let mut versions: Vec<VersionNumber> = self
            .files()
            .keys()
            .filter_map(|path| path.strip_prefix(&versions_dir).ok())
            .filter(|rest| rest.components().count() > 1)
            .filter_map(|rest| rest.components().next())
            .filter_map(|dir| dir.as_os_str().to_str()?.strip_prefix('v')?.parse().ok())
            .collect();
        versions.sort();
        versions.dedup();
        Ok(versions)
    }
}
