//! Vault error types.
//!
//! Every operation returns a structured error that front ends can turn into
//! editor-facing text through [`VaultError::user_message`] and
//! [`VaultError::suggestion`]. This crate never formats UI messages itself.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use vault_model::{ModelError, TemplateId, VersionNumber};

/// Which kind of record an absence refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Original,
    Working,
    History,
    Analysis,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Original => "original content",
            Self::Working => "working content",
            Self::History => "version history",
            Self::Analysis => "analysis artifact",
        })
    }
}

/// Vault operation error.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Expected absence, e.g. no baseline has been created yet.
    #[error("No {kind} for template {template}")]
    NotFound {
        kind: ContentKind,
        template: TemplateId,
    },

    /// `create_version` was called before Working existed.
    #[error("Template {template} has no working content to save")]
    MissingWorkingData { template: TemplateId },

    /// Restore, delete, or compare named a version the template does not have.
    #[error("Version {version} of template {template} does not exist")]
    VersionNotFound {
        template: TemplateId,
        version: VersionNumber,
    },

    /// A version directory with this number is already published.
    #[error("Version {version} of template {template} already exists")]
    VersionExists {
        template: TemplateId,
        version: VersionNumber,
    },

    /// The history ledger is missing; `initialize` has not run.
    #[error("Template {template} has no version history")]
    HistoryNotInitialized { template: TemplateId },

    /// Stored bytes could not be decoded.
    #[error("Corrupt content at {path}: {reason}")]
    CorruptContent { path: PathBuf, reason: String },

    /// Stored version content does not match its recorded checksum.
    #[error("Checksum mismatch for version {version} of template {template}")]
    ChecksumMismatch {
        template: TemplateId,
        version: VersionNumber,
        expected: String,
        actual: String,
    },

    /// The record was written by a newer schema than this build understands.
    #[error("Schema version {found} is not supported (maximum: {max_supported})")]
    UnsupportedSchema {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// File I/O error.
    #[error("Failed to {operation}: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file or staging directory couldn't be renamed).
    #[error("Failed to complete write to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Failed to serialize content")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Invalid identifier or version string.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration at {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl VaultError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// True for routine absences callers are expected to handle.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::VersionNotFound { .. } | Self::MissingWorkingData { .. }
        )
    }

    /// True when stored data failed to decode or verify.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::CorruptContent { .. } | Self::ChecksumMismatch { .. }
        )
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { kind, template } => {
                format!("Template '{template}' has no {kind} yet.")
            }
            Self::MissingWorkingData { .. } => {
                "There are no edits to save. Make a change first.".to_string()
            }
            Self::VersionNotFound { version, .. } => {
                format!("Version {version} no longer exists.")
            }
            Self::VersionExists { version, .. } => {
                format!("Version {version} has already been saved.")
            }
            Self::HistoryNotInitialized { template } => {
                format!("Template '{template}' has not been set up for versioning.")
            }
            Self::CorruptContent { .. } | Self::ChecksumMismatch { .. } => {
                "Saved content is damaged and cannot be read.".to_string()
            }
            Self::UnsupportedSchema { .. } => {
                "This content was saved by a newer version of the editor.".to_string()
            }
            Self::Io { operation, path, .. } => {
                format!("Could not {} {}", operation, path.display())
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Serialization { .. } => "An error occurred while saving content.".to_string(),
            Self::Model(error) => error.to_string(),
            Self::Config { path, .. } => {
                format!("The configuration file {} is invalid.", path.display())
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound {
                kind: ContentKind::Original | ContentKind::Analysis,
                ..
            } => Some("Run the template analysis to create a baseline.".into()),
            Self::NotFound { .. } | Self::HistoryNotInitialized { .. } => {
                Some("Initialize the template before editing it.".into())
            }
            Self::VersionNotFound { .. } => Some("Refresh the version list.".into()),
            Self::CorruptContent { .. } | Self::ChecksumMismatch { .. } => {
                Some("Restore a different version or reset to the original.".into())
            }
            Self::UnsupportedSchema { .. } => Some("Update to the latest release.".into()),
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => {
                Some("Check that you have permission to write to the template folder.".into())
            }
            Self::MissingWorkingData { .. }
            | Self::VersionExists { .. }
            | Self::Serialization { .. }
            | Self::Model(_)
            | Self::Config { .. } => None,
        }
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> TemplateId {
        TemplateId::new("landing").unwrap()
    }

    #[test]
    fn version_not_found_is_routine() {
        let error = VaultError::VersionNotFound {
            template: template(),
            version: VersionNumber::new(0, 0, 7),
        };
        assert!(error.is_not_found());
        assert_eq!(error.user_message(), "Version 0.0.7 no longer exists.");
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn checksum_mismatch_is_corrupt() {
        let error = VaultError::ChecksumMismatch {
            template: template(),
            version: VersionNumber::new(0, 0, 1),
            expected: "aaaa".into(),
            actual: "bbbb".into(),
        };
        assert!(error.is_corrupt());
        assert!(!error.is_not_found());
    }

    #[test]
    fn display_names_the_template() {
        let error = VaultError::NotFound {
            kind: ContentKind::Original,
            template: template(),
        };
        assert_eq!(error.to_string(), "No original content for template landing");
    }
}
