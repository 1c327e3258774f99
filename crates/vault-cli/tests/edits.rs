//! Tests for merging command-line edits into patches.

use std::collections::BTreeMap;
use std::io::Write;

use vault_cli::edits::{Assignment, EditSet, read_patch_file};
use vault_model::{ContentPatch, SnapshotContent};

fn assign(s: &str) -> Assignment {
    s.parse().expect("valid assignment")
}

fn current() -> SnapshotContent {
    SnapshotContent {
        texts: BTreeMap::from([
            ("t1".to_string(), "Hi".to_string()),
            ("t2".to_string(), "There".to_string()),
        ]),
        images: BTreeMap::from([("i1".to_string(), "logo.png".to_string())]),
        ..SnapshotContent::empty_with_default_palette()
    }
}

#[test]
fn single_text_edit_keeps_other_texts() {
    let edits = EditSet {
        texts: vec![assign("t1=안녕")],
        ..EditSet::default()
    };
    let patch = edits.into_patch(&current()).unwrap();

    let texts = patch.texts.unwrap();
    assert_eq!(texts["t1"], "안녕");
    assert_eq!(texts["t2"], "There");
    assert!(patch.images.is_none());
    assert!(patch.color_system.is_none());
}

#[test]
fn color_edit_updates_one_token() {
    let edits = EditSet {
        colors: vec![assign("brand.primary=#000000")],
        ..EditSet::default()
    };
    let patch = edits.into_patch(&current()).unwrap();

    let colors = patch.color_system.unwrap();
    assert_eq!(colors.get("brand.primary").as_deref(), Some("#000000"));
    assert_eq!(colors.get("neutral.textMuted").as_deref(), Some("#64748B"));
}

#[test]
fn invalid_color_path_is_rejected() {
    let edits = EditSet {
        colors: vec![assign("brand=#000000")],
        ..EditSet::default()
    };
    assert!(edits.into_patch(&current()).is_err());
}

#[test]
fn empty_edit_set_is_rejected() {
    let edits = EditSet {
        base: Some(ContentPatch::new()),
        ..EditSet::default()
    };
    assert!(edits.into_patch(&current()).is_err());
}

#[test]
fn single_edits_merge_over_patch_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"images": {{"i1": "hero.png", "i2": "banner.png"}}}}"#).unwrap();
    let base = read_patch_file(file.path()).unwrap();

    let edits = EditSet {
        images: vec![assign("i2=footer.png")],
        base: Some(base),
        ..EditSet::default()
    };
    let patch = edits.into_patch(&current()).unwrap();

    let images = patch.images.unwrap();
    assert_eq!(images["i1"], "hero.png");
    assert_eq!(images["i2"], "footer.png");
}

#[test]
fn malformed_patch_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(read_patch_file(file.path()).is_err());
}
