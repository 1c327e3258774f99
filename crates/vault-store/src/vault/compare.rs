//! Comparison between any two loadable snapshots.

use vault_model::{ContentDiff, SnapshotContent, SnapshotRef, TemplateId};

use super::Vault;
use crate::backend::ContentStore;
use crate::diff::compare_content;
use crate::error::{ContentKind, Result, VaultError};

impl<S: ContentStore> Vault<S> {
    /// List per-id differences going from snapshot `a` to snapshot `b`.
    ///
    /// `original` and `working` resolve through their own stores; anything
    /// else must name a saved version.
    pub fn compare_versions(
        &self,
        template: &TemplateId,
        a: SnapshotRef,
        b: SnapshotRef,
    ) -> Result<ContentDiff> {
        let before = self.resolve_snapshot(template, a)?;
        let after = self.resolve_snapshot(template, b)?;
        let diff = compare_content(&before, &after);
        tracing::debug!(
            template = %template,
            from = %a,
            to = %b,
            texts = diff.texts.len(),
            images = diff.images.len(),
            colors = diff.colors.len(),
            "compared snapshots"
        );
        Ok(diff)
    }

    fn resolve_snapshot(&self, template: &TemplateId, snapshot: SnapshotRef) -> Result<SnapshotContent> {
        let not_found = |kind| VaultError::NotFound {
            kind,
            template: template.clone(),
        };
        match snapshot {
            SnapshotRef::Original => self
                .load_original(template)?
                .map(|original| original.baseline_content())
                .ok_or_else(|| not_found(ContentKind::Original)),
            SnapshotRef::Working => self
                .load_working(template)?
                .map(|working| working.content)
                .ok_or_else(|| not_found(ContentKind::Working)),
            SnapshotRef::Version(version) => {
                Ok(self.load_version(template, version)?.content)
            }
        }
    }
}
