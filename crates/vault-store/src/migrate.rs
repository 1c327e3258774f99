//! Schema migration for persisted working and version content.
//!
//! Records carry `schemaVersion`; records written before the field existed
//! read as schema 0. Each step upgrades one schema version.

use std::collections::BTreeMap;
use std::path::Path;

use vault_model::{CURRENT_SCHEMA_VERSION, ColorSystem, WorkingData};

use crate::error::{Result, VaultError};

/// Artifacts that older layouts kept beside the content file.
#[derive(Debug, Default)]
pub struct SideArtifacts {
    pub component_mappings: Option<BTreeMap<String, String>>,
}

/// Upgrade a record to [`CURRENT_SCHEMA_VERSION`].
///
/// `path` names the record for errors. Returns whether anything changed.
pub fn migrate_working(
    working: &mut WorkingData,
    side: SideArtifacts,
    path: &Path,
) -> Result<bool> {
    if working.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(VaultError::UnsupportedSchema {
            found: working.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let from = working.schema_version;
    if from == 0 {
        upgrade_v0_to_v1(working, side);
    }

    if from != working.schema_version {
        tracing::info!(
            template = %working.template_id,
            from,
            to = working.schema_version,
            "migrated working content"
        );
    }
    Ok(from != working.schema_version)
}

/// Schema 0 had no guaranteed color system and kept component mappings only
/// in a side file.
fn upgrade_v0_to_v1(working: &mut WorkingData, side: SideArtifacts) {
    let content = &mut working.content;
    if content.color_system.is_none() {
        content.color_system = Some(ColorSystem::default_palette());
    }
    if content.component_mappings.is_none() {
        content.component_mappings = side.component_mappings;
    }
    working.schema_version = 1;
}
