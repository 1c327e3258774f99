//! Shared fixtures for vault integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use tempfile::TempDir;
use vault_model::{OriginalData, OriginalImage, OriginalText, TemplateId};
use vault_store::{Vault, VaultConfig};

pub fn template() -> TemplateId {
    TemplateId::new("landing").unwrap()
}

pub fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Original with a single text `t1 = "Hi"` and one logo image.
pub fn original() -> OriginalData {
    OriginalData {
        template_id: template(),
        analyzed_at: "2026-01-01T00:00:00+00:00".to_string(),
        html_file: "index.html".to_string(),
        texts: vec![OriginalText {
            id: "t1".to_string(),
            selector: "h1.hero-title".to_string(),
            original_content: "Hi".to_string(),
            section: "hero".to_string(),
            context: "heading".to_string(),
        }],
        images: vec![OriginalImage {
            id: "i1".to_string(),
            selector: "img.logo".to_string(),
            original_path: "images/logo.png".to_string(),
            section: "header".to_string(),
            attributes: BTreeMap::from([("alt".to_string(), "Logo".to_string())]),
        }],
        checksum: String::new(),
    }
}

/// A filesystem vault in a fresh temp dir with `landing` initialized.
pub fn fs_vault() -> (TempDir, Vault) {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::open(VaultConfig::with_root(dir.path())).unwrap();
    vault.initialize(&template(), original()).unwrap();
    (dir, vault)
}
