//! Turning command-line edits into a [`ContentPatch`].
//!
//! A patch replaces whole fields, so single-id edits are merged into the
//! current field value before they are sent.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use vault_model::{ContentPatch, SnapshotContent};

/// A `key=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("expected KEY=VALUE, got '{s}'");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("missing key in '{s}'");
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Edits collected from one `edit` invocation.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    pub texts: Vec<Assignment>,
    pub images: Vec<Assignment>,
    /// Keys are dotted color token paths such as `brand.primary`.
    pub colors: Vec<Assignment>,
    pub base: Option<ContentPatch>,
}

impl EditSet {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
            && self.images.is_empty()
            && self.colors.is_empty()
            && self.base.as_ref().is_none_or(ContentPatch::is_empty)
    }

    /// Build the patch to send, merging single edits over `current`.
    ///
    /// Fields carried by the base patch take precedence over `current` as the
    /// starting point for merges.
    pub fn into_patch(self, current: &SnapshotContent) -> Result<ContentPatch> {
        if self.is_empty() {
            bail!("nothing to edit; pass --text, --image, --color, or --patch");
        }
        let mut patch = self.base.unwrap_or_default();

        if !self.texts.is_empty() {
            let mut texts = patch.texts.take().unwrap_or_else(|| current.texts.clone());
            merge(&mut texts, self.texts);
            patch.texts = Some(texts);
        }
        if !self.images.is_empty() {
            let mut images = patch
                .images
                .take()
                .unwrap_or_else(|| current.images.clone());
            merge(&mut images, self.images);
            patch.images = Some(images);
        }
        if !self.colors.is_empty() {
            let mut colors = patch
                .color_system
                .take()
                .unwrap_or_else(|| current.effective_colors());
            for Assignment { key, value } in self.colors {
                colors
                    .set(&key, value)
                    .with_context(|| format!("invalid color edit '{key}'"))?;
            }
            patch.color_system = Some(colors);
        }
        Ok(patch)
    }
}

fn merge(target: &mut BTreeMap<String, String>, edits: Vec<Assignment>) {
    for Assignment { key, value } in edits {
        target.insert(key, value);
    }
}

/// Read a JSON patch file (`{"texts": {...}, "colorSystem": {...}, ...}`).
pub fn read_patch_file(path: &Path) -> Result<ContentPatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read patch file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse patch file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        let assignment: Assignment = "t1=a=b".parse().unwrap();
        assert_eq!(assignment.key, "t1");
        assert_eq!(assignment.value, "a=b");
    }

    #[test]
    fn assignment_allows_empty_value() {
        let assignment: Assignment = "t1=".parse().unwrap();
        assert_eq!(assignment.value, "");
    }

    #[test]
    fn assignment_rejects_missing_parts() {
        assert!("t1".parse::<Assignment>().is_err());
        assert!(" =x".parse::<Assignment>().is_err());
    }
}
