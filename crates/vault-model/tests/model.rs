//! Tests for vault-model wire formats.

use vault_model::{
    ContentPatch, SnapshotRef, VersionHistory, VersionMetadata, VersionNumber, WorkingData,
};

#[test]
fn version_history_reads_editor_json() {
    let json = r#"{
        "templateId": "landing",
        "versions": [{
            "id": "v0.0.1-1767225600000",
            "version": "0.0.1",
            "timestamp": "2026-01-01T00:00:00Z",
            "description": "translate",
            "changes": {"texts": 1, "styles": 0, "media": 0, "colors": 0},
            "checksum": "0123456789abcdef",
            "parentVersion": null
        }],
        "currentVersion": "0.0.1",
        "originalBackupDate": "2026-01-01T00:00:00Z",
        "latestVersion": "0.0.1"
    }"#;

    let history: VersionHistory = serde_json::from_str(json).expect("parse history");
    assert_eq!(history.template_id.as_str(), "landing");
    assert_eq!(history.current().map(|meta| meta.changes.total()), Some(1));
    assert_eq!(history.next_version().unwrap(), VersionNumber::new(0, 0, 2));
}

#[test]
fn version_metadata_serializes_camel_case() {
    let meta = VersionMetadata {
        id: "v0.0.2-1".to_string(),
        version: VersionNumber::new(0, 0, 2),
        timestamp: "2026-01-01T00:00:00Z".to_string(),
        description: "second".to_string(),
        changes: Default::default(),
        checksum: "abc".to_string(),
        parent_version: Some(VersionNumber::new(0, 0, 1)),
    };
    let json = serde_json::to_value(&meta).expect("serialize metadata");
    assert_eq!(json["parentVersion"], "0.0.1");
    assert_eq!(json["version"], "0.0.2");
}

#[test]
fn patch_parses_partial_json() {
    let patch: ContentPatch =
        serde_json::from_str(r#"{"texts": {"t1": "안녕"}}"#).expect("parse patch");
    assert_eq!(patch.field_names(), ["texts"]);
    assert!(patch.images.is_none());
}

#[test]
fn working_record_keeps_unknown_color_groups() {
    let json = r##"{
        "schemaVersion": 1,
        "templateId": "landing",
        "lastModified": "2026-01-01T00:00:00Z",
        "texts": {},
        "images": {},
        "colorSystem": {
            "brand": {"primary": "#000000"},
            "semantic": {},
            "neutral": {},
            "interaction": {},
            "gradients": {"hero": "linear"}
        },
        "isDirty": false
    }"##;
    let working: WorkingData = serde_json::from_str(json).expect("parse working");
    let colors = working.content.color_system.as_ref().expect("colors");
    assert!(colors.extra.contains_key("gradients"));

    let back = serde_json::to_value(&working).expect("serialize working");
    assert_eq!(back["colorSystem"]["gradients"]["hero"], "linear");
}

#[test]
fn snapshot_refs_parse_from_cli_words() {
    assert_eq!("original".parse::<SnapshotRef>().unwrap(), SnapshotRef::Original);
    assert_eq!("working".parse::<SnapshotRef>().unwrap(), SnapshotRef::Working);
    assert_eq!(
        "v1.2.3".parse::<SnapshotRef>().unwrap(),
        SnapshotRef::Version(VersionNumber::new(1, 2, 3))
    );
    assert!("latest".parse::<SnapshotRef>().is_err());
}
