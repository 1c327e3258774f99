//! Typed partial update for the working copy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ColorSystem, SnapshotContent};

/// A partial update to Working.
///
/// Each field that is `Some` replaces the stored field wholesale; fields left
/// `None` are preserved. Maps are never deep-merged, so a patch carrying
/// `texts` must carry every text the caller wants to keep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_system: Option<ColorSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_mappings: Option<BTreeMap<String, String>>,
}

impl ContentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_texts(mut self, texts: BTreeMap<String, String>) -> Self {
        self.texts = Some(texts);
        self
    }

    #[must_use]
    pub fn with_images(mut self, images: BTreeMap<String, String>) -> Self {
        self.images = Some(images);
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: BTreeMap<String, Value>) -> Self {
        self.styles = Some(styles);
        self
    }

    #[must_use]
    pub fn with_color_system(mut self, colors: ColorSystem) -> Self {
        self.color_system = Some(colors);
        self
    }

    #[must_use]
    pub fn with_component_mappings(mut self, mappings: BTreeMap<String, String>) -> Self {
        self.component_mappings = Some(mappings);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_none()
            && self.images.is_none()
            && self.styles.is_none()
            && self.color_system.is_none()
            && self.component_mappings.is_none()
    }

    /// Names of the fields this patch replaces, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.texts.is_some() {
            names.push("texts");
        }
        if self.images.is_some() {
            names.push("images");
        }
        if self.styles.is_some() {
            names.push("styles");
        }
        if self.color_system.is_some() {
            names.push("colorSystem");
        }
        if self.component_mappings.is_some() {
            names.push("componentMappings");
        }
        names
    }

    pub fn apply(self, content: &mut SnapshotContent) {
        if let Some(texts) = self.texts {
            content.texts = texts;
        }
        if let Some(images) = self.images {
            content.images = images;
        }
        if let Some(styles) = self.styles {
            content.styles = Some(styles);
        }
        if let Some(colors) = self.color_system {
            content.color_system = Some(colors);
        }
        if let Some(mappings) = self.component_mappings {
            content.component_mappings = Some(mappings);
        }
    }
}
