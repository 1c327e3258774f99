//! Baseline, working, and snapshot content records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ColorSystem, TemplateId, CURRENT_SCHEMA_VERSION};

/// A text node found by template analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalText {
    pub id: String,
    pub selector: String,
    #[serde(alias = "content")]
    pub original_content: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub context: String,
}

/// An image found by template analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalImage {
    pub id: String,
    pub selector: String,
    #[serde(alias = "src")]
    pub original_path: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Immutable baseline of a template, written once from the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalData {
    pub template_id: TemplateId,
    pub analyzed_at: String,
    pub html_file: String,
    #[serde(default)]
    pub texts: Vec<OriginalText>,
    #[serde(default)]
    pub images: Vec<OriginalImage>,
    /// Derived on load from the baseline content; never persisted.
    #[serde(skip)]
    pub checksum: String,
}

impl OriginalData {
    pub fn text_map(&self) -> BTreeMap<String, String> {
        self.texts
            .iter()
            .map(|text| (text.id.clone(), text.original_content.clone()))
            .collect()
    }

    pub fn image_map(&self) -> BTreeMap<String, String> {
        self.images
            .iter()
            .map(|image| (image.id.clone(), image.original_path.clone()))
            .collect()
    }

    /// The content Working holds right after a reset: the baseline texts and
    /// images with the default palette and nothing else.
    pub fn baseline_content(&self) -> SnapshotContent {
        SnapshotContent {
            texts: self.text_map(),
            images: self.image_map(),
            styles: None,
            color_system: Some(ColorSystem::default_palette()),
            component_mappings: None,
        }
    }
}

/// Raw output of the analysis pipeline, before it becomes an [`OriginalData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub html_file: String,
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub texts: Vec<OriginalText>,
    #[serde(default)]
    pub images: Vec<OriginalImage>,
}

impl AnalysisArtifact {
    pub fn into_original(self, template_id: TemplateId) -> OriginalData {
        OriginalData {
            template_id,
            analyzed_at: self.analyzed_at.unwrap_or_else(crate::now_rfc3339),
            html_file: self.html_file,
            texts: self.texts,
            images: self.images,
            checksum: String::new(),
        }
    }
}

/// The editable content of a template, without bookkeeping fields.
///
/// This is what checksums attest and what diffs compare.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotContent {
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_system: Option<ColorSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_mappings: Option<BTreeMap<String, String>>,
}

impl SnapshotContent {
    /// Content of a template that has no baseline yet.
    pub fn empty_with_default_palette() -> Self {
        Self {
            color_system: Some(ColorSystem::default_palette()),
            ..Self::default()
        }
    }

    /// The color system in effect: the explicit one, or the default palette.
    pub fn effective_colors(&self) -> ColorSystem {
        self.color_system
            .clone()
            .unwrap_or_else(ColorSystem::default_palette)
    }
}

/// The single mutable in-progress state of a template.
///
/// Also the on-disk shape of each version's `content.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingData {
    #[serde(default)]
    pub schema_version: u32,
    pub template_id: TemplateId,
    pub last_modified: String,
    #[serde(flatten)]
    pub content: SnapshotContent,
    #[serde(default)]
    pub is_dirty: bool,
}

impl WorkingData {
    pub fn new(template_id: TemplateId, content: SnapshotContent) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            template_id,
            last_modified: crate::now_rfc3339(),
            content,
            is_dirty: false,
        }
    }

    /// Seed a working copy from the baseline, or from nothing.
    pub fn seed(template_id: TemplateId, original: Option<&OriginalData>) -> Self {
        let content = original.map_or_else(
            SnapshotContent::empty_with_default_palette,
            OriginalData::baseline_content,
        );
        Self::new(template_id, content)
    }

    pub fn touch(&mut self) {
        self.last_modified = crate::now_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_original() -> OriginalData {
        OriginalData {
            template_id: TemplateId::new("landing").unwrap(),
            analyzed_at: "2026-01-01T00:00:00+00:00".to_string(),
            html_file: "index.html".to_string(),
            texts: vec![OriginalText {
                id: "t1".to_string(),
                selector: "h1".to_string(),
                original_content: "Hi".to_string(),
                section: "hero".to_string(),
                context: String::new(),
            }],
            images: vec![OriginalImage {
                id: "i1".to_string(),
                selector: "img.logo".to_string(),
                original_path: "logo.png".to_string(),
                section: "header".to_string(),
                attributes: BTreeMap::new(),
            }],
            checksum: String::new(),
        }
    }

    #[test]
    fn seed_from_original_uses_baseline_values() {
        let original = sample_original();
        let working = WorkingData::seed(original.template_id.clone(), Some(&original));
        assert_eq!(working.content.texts["t1"], "Hi");
        assert_eq!(working.content.images["i1"], "logo.png");
        assert_eq!(working.content.color_system, Some(ColorSystem::default_palette()));
        assert_eq!(working.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(!working.is_dirty);
    }

    #[test]
    fn working_data_uses_flat_camel_case_layout() {
        let original = sample_original();
        let working = WorkingData::seed(original.template_id.clone(), Some(&original));
        let json = serde_json::to_value(&working).unwrap();
        assert_eq!(json["templateId"], "landing");
        assert_eq!(json["texts"]["t1"], "Hi");
        assert!(json.get("colorSystem").is_some());
        assert!(json.get("styles").is_none());
        assert_eq!(json["isDirty"], false);
    }

    #[test]
    fn legacy_record_without_schema_version_reads_as_zero() {
        let json = r#"{"templateId":"landing","lastModified":"x","texts":{"t1":"Hi"},"isDirty":true}"#;
        let working: WorkingData = serde_json::from_str(json).unwrap();
        assert_eq!(working.schema_version, 0);
        assert!(working.content.color_system.is_none());
        assert!(working.content.images.is_empty());
    }

    #[test]
    fn checksum_is_not_persisted_for_original() {
        let mut original = sample_original();
        original.checksum = "abc".to_string();
        let json = serde_json::to_value(&original).unwrap();
        assert!(json.get("checksum").is_none());
    }

    #[test]
    fn analysis_artifact_accepts_short_field_names() {
        let json = r#"{
            "htmlFile": "index.html",
            "texts": [{"id": "t1", "selector": "h1", "content": "Hi"}],
            "images": [{"id": "i1", "selector": "img", "src": "a.png"}]
        }"#;
        let artifact: AnalysisArtifact = serde_json::from_str(json).unwrap();
        let original = artifact.into_original(TemplateId::new("landing").unwrap());
        assert_eq!(original.text_map()["t1"], "Hi");
        assert_eq!(original.image_map()["i1"], "a.png");
        assert!(!original.analyzed_at.is_empty());
    }
}
