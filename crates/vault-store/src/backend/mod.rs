//! Storage backends.
//!
//! The vault addresses every persisted artifact by a [`ContentKey`]
//! (template + scope + artifact) and never builds paths itself, so the
//! medium behind [`ContentStore`] can be swapped.

mod disk;
mod memory;

use std::path::PathBuf;

use vault_model::{TemplateId, VersionNumber};

use crate::error::Result;

pub use disk::FsContentStore;
pub use memory::MemoryContentStore;

/// Directory-level grouping of artifacts within a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The template directory itself (legacy and analysis files).
    Root,
    Original,
    Working,
    /// The version ledger directory.
    Versions,
    Version(VersionNumber),
}

/// A single persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Content,
    Metadata,
    Colors,
    ComponentMappings,
    History,
    Analysis,
}

impl Artifact {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Content => "content.json",
            Self::Metadata => "metadata.json",
            Self::Colors => "colors.json",
            Self::ComponentMappings => "component-mappings.json",
            Self::History => "version-history.json",
            Self::Analysis => "analysis.json",
        }
    }
}

/// Address of one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey<'a> {
    pub template: &'a TemplateId,
    pub scope: Scope,
    pub artifact: Artifact,
}

impl<'a> ContentKey<'a> {
    pub fn new(template: &'a TemplateId, scope: Scope, artifact: Artifact) -> Self {
        Self {
            template,
            scope,
            artifact,
        }
    }

    pub fn original(template: &'a TemplateId) -> Self {
        Self::new(template, Scope::Original, Artifact::Content)
    }

    pub fn working(template: &'a TemplateId, artifact: Artifact) -> Self {
        Self::new(template, Scope::Working, artifact)
    }

    pub fn history(template: &'a TemplateId) -> Self {
        Self::new(template, Scope::Versions, Artifact::History)
    }

    pub fn version(template: &'a TemplateId, version: VersionNumber, artifact: Artifact) -> Self {
        Self::new(template, Scope::Version(version), artifact)
    }

    /// Path relative to the store root, e.g. `landing/versions/v0.0.1/content.json`.
    pub fn relative_path(&self) -> PathBuf {
        scope_dir(self.template, self.scope).join(self.artifact.file_name())
    }
}

pub(crate) fn scope_dir(template: &TemplateId, scope: Scope) -> PathBuf {
    let base = PathBuf::from(template.as_str());
    match scope {
        Scope::Root => base,
        Scope::Original => base.join("original"),
        Scope::Working => base.join("working"),
        Scope::Versions => base.join("versions"),
        Scope::Version(version) => base.join("versions").join(version.dir_name()),
    }
}

/// Byte-level storage of template artifacts.
///
/// Single-artifact writes must be atomic: a reader sees either the old bytes
/// or the new ones. A version's artifacts are published together by
/// [`ContentStore::publish_version`] and become visible all at once.
pub trait ContentStore: Send + Sync {
    /// Read an artifact; `Ok(None)` when it does not exist.
    fn get(&self, key: &ContentKey<'_>) -> Result<Option<Vec<u8>>>;

    /// Write an artifact, replacing any previous bytes.
    fn put(&self, key: &ContentKey<'_>, bytes: &[u8]) -> Result<()>;

    /// Remove an artifact. Removing a missing artifact is not an error.
    fn delete(&self, key: &ContentKey<'_>) -> Result<()>;

    /// Publish all artifacts of a new version at once.
    ///
    /// Fails with `VersionExists` if the version is already published.
    fn publish_version(
        &self,
        template: &TemplateId,
        version: VersionNumber,
        artifacts: &[(Artifact, Vec<u8>)],
    ) -> Result<()>;

    /// Remove a version's storage entirely. Returns false if it was absent.
    fn remove_version(&self, template: &TemplateId, version: VersionNumber) -> Result<bool>;

    /// Versions that have storage, ascending.
    fn list_versions(&self, template: &TemplateId) -> Result<Vec<VersionNumber>>;

    fn version_exists(&self, template: &TemplateId, version: VersionNumber) -> Result<bool> {
        Ok(self.list_versions(template)?.contains(&version))
    }
}
