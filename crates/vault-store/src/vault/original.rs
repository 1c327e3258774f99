//! Original store: one immutable baseline per template.

use vault_model::{OriginalData, TemplateId};

use super::Vault;
use crate::backend::{ContentKey, ContentStore};
use crate::error::Result;

impl<S: ContentStore> Vault<S> {
    /// Read the baseline. `Ok(None)` means no baseline has been created yet;
    /// I/O and decode failures are errors.
    ///
    /// The returned checksum is derived from the baseline content on every load.
    pub fn load_original(&self, template: &TemplateId) -> Result<Option<OriginalData>> {
        let Some(mut original) = self.read::<OriginalData>(&ContentKey::original(template))? else {
            return Ok(None);
        };
        original.checksum = self.checksum(&original.baseline_content())?;
        Ok(Some(original))
    }

    /// Write the baseline unless one already exists.
    ///
    /// Returns whether anything was written. An existing baseline is never
    /// overwritten, even with different data.
    pub fn initialize_original(&self, template: &TemplateId, data: OriginalData) -> Result<bool> {
        self.locks
            .with_lock(template, || self.initialize_original_locked(template, data))
    }

    pub(super) fn initialize_original_locked(
        &self,
        template: &TemplateId,
        mut data: OriginalData,
    ) -> Result<bool> {
        let key = ContentKey::original(template);
        if self.store.get(&key)?.is_some() {
            tracing::debug!(template = %template, "original already exists, leaving it untouched");
            return Ok(false);
        }
        data.template_id = template.clone();
        self.write(&key, &data)?;
        tracing::info!(
            template = %template,
            texts = data.texts.len(),
            images = data.images.len(),
            "created original content"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryContentStore, VaultConfig};
    use vault_model::OriginalText;

    fn original(template: &TemplateId, text: &str) -> OriginalData {
        OriginalData {
            template_id: template.clone(),
            analyzed_at: "2026-01-01T00:00:00+00:00".into(),
            html_file: "index.html".into(),
            texts: vec![OriginalText {
                id: "t1".into(),
                selector: "h1".into(),
                original_content: text.into(),
                section: "hero".into(),
                context: String::new(),
            }],
            images: Vec::new(),
            checksum: String::new(),
        }
    }

    #[test]
    fn absent_original_is_none() {
        let vault = Vault::with_store(MemoryContentStore::new(), VaultConfig::default());
        let template = TemplateId::new("landing").unwrap();
        assert!(vault.load_original(&template).unwrap().is_none());
    }

    #[test]
    fn initialize_original_never_overwrites() {
        let vault = Vault::with_store(MemoryContentStore::new(), VaultConfig::default());
        let template = TemplateId::new("landing").unwrap();

        assert!(vault.initialize_original(&template, original(&template, "Hi")).unwrap());
        assert!(!vault.initialize_original(&template, original(&template, "Bye")).unwrap());

        let loaded = vault.load_original(&template).unwrap().unwrap();
        assert_eq!(loaded.text_map()["t1"], "Hi");
    }

    #[test]
    fn checksum_is_derived_on_load() {
        let vault = Vault::with_store(MemoryContentStore::new(), VaultConfig::default());
        let template = TemplateId::new("landing").unwrap();
        vault.initialize_original(&template, original(&template, "Hi")).unwrap();

        let first = vault.load_original(&template).unwrap().unwrap();
        assert_eq!(first.checksum.len(), 16);
        let second = vault.load_original(&template).unwrap().unwrap();
        assert_eq!(first.checksum, second.checksum);
    }
}
