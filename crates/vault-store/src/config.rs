//! Vault configuration, stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_CHECKSUM_LENGTH;
use crate::error::{Result, VaultError};

/// Conventional config file name inside a store root.
pub const CONFIG_FILENAME: &str = "vault.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Directory holding one subdirectory per template.
    pub root: PathBuf,
    /// Hex characters kept from each SHA-256 checksum.
    pub checksum_length: usize,
    /// Verify version content against its recorded checksum when reading it back.
    pub verify_checksums: bool,
    /// Leave failed staging directories in place for inspection.
    pub keep_staging: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("templates"),
            checksum_length: DEFAULT_CHECKSUM_LENGTH,
            verify_checksums: true,
            keep_staging: false,
        }
    }
}

impl VaultConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content).map_err(|e| VaultError::Config {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                tracing::debug!(path = %path.display(), "loaded vault config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no vault config found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(VaultError::io("read config", path, e)),
        }
    }

    /// Save configuration to a TOML file, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::io("create directory", parent, e))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| VaultError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| VaultError::io("write config", path, e))?;
        tracing::info!(path = %path.display(), "saved vault config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = VaultConfig::load(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, VaultConfig::default());
    }

    #[test]
    fn config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let config = VaultConfig {
            checksum_length: 24,
            keep_staging: true,
            ..VaultConfig::with_root(dir.path())
        };
        config.save(&path).unwrap();
        assert_eq!(VaultConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "verify_checksums = false\n").unwrap();
        let config = VaultConfig::load(&path).unwrap();
        assert!(!config.verify_checksums);
        assert_eq!(config.checksum_length, DEFAULT_CHECKSUM_LENGTH);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "checksum_length = \"long\"\n").unwrap();
        assert!(matches!(
            VaultConfig::load(&path),
            Err(VaultError::Config { .. })
        ));
    }
}
