//! Diff/change engine.
//!
//! Counts and lists differences between two snapshots. An id present on only
//! one side counts as changed. Colors are compared token by token, and a side
//! without an explicit color system is read as the default palette.

use std::collections::{BTreeMap, BTreeSet};

use vault_model::{ChangeCounts, ContentDiff, FieldChange, SnapshotContent};

/// Per-field change counts of `current` relative to `baseline`.
pub fn diff_content(current: &SnapshotContent, baseline: &SnapshotContent) -> ChangeCounts {
    let empty = BTreeMap::new();
    ChangeCounts {
        texts: count_changed(&current.texts, &baseline.texts),
        styles: count_changed(
            current.styles.as_ref().unwrap_or(&empty),
            baseline.styles.as_ref().unwrap_or(&empty),
        ),
        media: count_changed(&current.images, &baseline.images),
        colors: count_changed(
            &current.effective_colors().tokens(),
            &baseline.effective_colors().tokens(),
        ),
    }
}

/// Per-id differences going from `before` to `after`.
pub fn compare_content(before: &SnapshotContent, after: &SnapshotContent) -> ContentDiff {
    ContentDiff {
        texts: changed_fields(&before.texts, &after.texts),
        images: changed_fields(&before.images, &after.images),
        colors: changed_fields(
            &before.effective_colors().tokens(),
            &after.effective_colors().tokens(),
        ),
    }
}

fn changed_keys<'a, V: PartialEq>(
    a: &'a BTreeMap<String, V>,
    b: &'a BTreeMap<String, V>,
) -> impl Iterator<Item = &'a String> {
    a.keys()
        .chain(b.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(move |key| a.get(*key) != b.get(*key))
}

fn count_changed<V: PartialEq>(a: &BTreeMap<String, V>, b: &BTreeMap<String, V>) -> usize {
    changed_keys(a, b).count()
}

fn changed_fields(
    before: &BTreeMap<String, String>,
    after: &BTreeMap<String, String>,
) -> Vec<FieldChange> {
    changed_keys(before, after)
        .map(|id| FieldChange {
            id: id.clone(),
            before: before.get(id).cloned(),
            after: after.get(id).cloned(),
        })
        .collect()
}
