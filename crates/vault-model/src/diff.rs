//! Per-id differences between two snapshots.

use serde::{Deserialize, Serialize};

/// One id whose value differs. `None` means the id is absent on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub id: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Result of comparing two snapshots, ids sorted ascending in each list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentDiff {
    pub texts: Vec<FieldChange>,
    pub images: Vec<FieldChange>,
    /// Color tokens keyed by dotted path.
    pub colors: Vec<FieldChange>,
}

impl ContentDiff {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty() && self.colors.is_empty()
    }
}
