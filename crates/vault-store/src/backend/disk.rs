//! Local filesystem backend.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use vault_model::{TemplateId, VersionNumber};

use super::{Artifact, ContentKey, ContentStore, Scope, scope_dir};
use crate::error::{Result, VaultError};

const STAGING_PREFIX: &str = ".staging-";

/// Stores each template under `{root}/{template}` using the documented layout.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
    keep_staging: bool,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            keep_staging: false,
        }
    }

    /// Keep staging directories of failed publishes instead of removing them.
    #[must_use]
    pub fn keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging = keep;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &ContentKey<'_>) -> PathBuf {
        self.root.join(key.relative_path())
    }

    fn versions_dir(&self, template: &TemplateId) -> PathBuf {
        self.root.join(scope_dir(template, Scope::Versions))
    }

    fn stage_version(&self, staging: &Path, artifacts: &[(Artifact, Vec<u8>)]) -> Result<()> {
        fs::create_dir_all(staging)
            .map_err(|e| VaultError::io("create directory", staging, e))?;
        for (artifact, bytes) in artifacts {
            write_synced(&staging.join(artifact.file_name()), bytes)?;
        }
        Ok(())
    }
}

/// Write bytes to `path` and flush them to disk.
fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| VaultError::io("create", path, e))?;
    file.write_all(bytes)
        .map_err(|e| VaultError::io("write", path, e))?;
    file.sync_all().map_err(|e| VaultError::io("sync", path, e))
}

/// Write to a temp file next to `path`, then rename over it.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VaultError::io("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    write_synced(&temp_path, bytes)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VaultError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

impl ContentStore for FsContentStore {
    fn get(&self, key: &ContentKey<'_>) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::io("read", path, e)),
        }
    }

    fn put(&self, key: &ContentKey<'_>, bytes: &[u8]) -> Result<()> {
        atomic_write(&self.path_for(key), bytes)
    }

    fn delete(&self, key: &ContentKey<'_>) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed artifact");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::io("remove", path, e)),
        }
    }

    fn publish_version(
        &self,
        template: &TemplateId,
        version: VersionNumber,
        artifacts: &[(Artifact, Vec<u8>)],
    ) -> Result<()> {
        let target = self.root.join(scope_dir(template, Scope::Version(version)));
        if target.exists() {
            return Err(VaultError::VersionExists {
                template: template.clone(),
                version,
            });
        }

        let staging = self
            .versions_dir(template)
            .join(format!("{STAGING_PREFIX}{}", version.dir_name()));
        if staging.exists() {
            tracing::warn!(path = %staging.display(), "removing leftover staging directory");
            fs::remove_dir_all(&staging)
                .map_err(|e| VaultError::io("remove directory", &staging, e))?;
        }

        let published = self.stage_version(&staging, artifacts).and_then(|()| {
            fs::rename(&staging, &target).map_err(|e| VaultError::AtomicWriteFailed {
                temp_path: staging.clone(),
                target_path: target.clone(),
                source: e,
            })
        });

        if let Err(error) = published {
            if self.keep_staging {
                tracing::warn!(path = %staging.display(), "keeping failed staging directory");
            } else if let Err(cleanup) = fs::remove_dir_all(&staging) {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(path = %staging.display(), error = %cleanup, "failed to remove staging directory");
                }
            }
            return Err(error);
        }

        tracing::debug!(path = %target.display(), artifacts = artifacts.len(), "published version directory");
        Ok(())
    }

    fn remove_version(&self, template: &TemplateId, version: VersionNumber) -> Result<bool> {
        let dir = self.root.join(scope_dir(template, Scope::Version(version)));
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!(path = %dir.display(), "removed version directory");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VaultError::io("remove directory", dir, e)),
        }
    }

    fn list_versions(&self, template: &TemplateId) -> Result<Vec<VersionNumber>> {
        let dir = self.versions_dir(template);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(VaultError::io("list", dir, e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VaultError::io("list", &dir, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| VaultError::io("inspect", entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(version) = name
                .strip_prefix('v')
                .and_then(|rest| rest.parse::<VersionNumber>().ok())
            {
                versions.push(version);
            }
        }
        versions.sort();
        Ok(versions)
    }

    fn version_exists(&self, template: &TemplateId, version: VersionNumber) -> Result<bool> {
        Ok(self
            .root
            .join(scope_dir(template, Scope::Version(version)))
            .is_dir())
    }
}
