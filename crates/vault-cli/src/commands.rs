use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info_span};

use vault_cli::edits::{EditSet, read_patch_file};
use vault_model::{AnalysisArtifact, SnapshotRef};
use vault_store::{ContentKind, Vault, VaultError};

use crate::cli::{
    CompareArgs, EditArgs, HistoryArgs, InitArgs, SaveArgs, ShowArgs, TemplateArg, VerifyArgs,
    VersionArgs,
};
use crate::summary::{print_diff, print_history, print_verification};

pub fn run_init(vault: &Vault, args: &InitArgs) -> Result<()> {
    let template = &args.template.template;
    let original = match &args.analysis {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("read analysis file {}", path.display()))?;
            let artifact: AnalysisArtifact = serde_json::from_str(&content)
                .with_context(|| format!("parse analysis file {}", path.display()))?;
            vault.initialize(template, artifact.into_original(template.clone()))?;
            vault
                .load_original(template)?
                .context("original content missing after initialization")?
        }
        None => vault.initialize_from_analysis(template)?,
    };
    println!(
        "Initialized {template}: {} texts, {} images",
        original.texts.len(),
        original.images.len()
    );
    Ok(())
}

pub fn run_edit(vault: &Vault, args: &EditArgs) -> Result<()> {
    let template = &args.template.template;
    let _span = info_span!("edit", template = %template).entered();
    let base = args.patch.as_deref().map(read_patch_file).transpose()?;
    let edits = EditSet {
        texts: args.texts.clone(),
        images: args.images.clone(),
        colors: args.colors.clone(),
        base,
    };
    let mut fields = Vec::new();
    vault.edit_working(template, |current| -> Result<_> {
        let patch = edits.into_patch(current)?;
        fields = patch.field_names();
        debug!(fields = ?fields, "sending patch");
        Ok(patch)
    })?;
    println!("Updated {} of {template}", fields.join(", "));
    Ok(())
}

pub fn run_save(vault: &Vault, args: &SaveArgs) -> Result<()> {
    let template = &args.template.template;
    let meta = vault.create_version(template, &args.description)?;
    println!(
        "Saved {template} version {} ({} texts, {} styles, {} media, {} colors changed)",
        meta.version,
        meta.changes.texts,
        meta.changes.styles,
        meta.changes.media,
        meta.changes.colors
    );
    Ok(())
}

pub fn run_restore(vault: &Vault, args: &VersionArgs) -> Result<()> {
    let template = &args.template.template;
    vault.restore_version(template, args.version)?;
    println!("Restored {template} to version {}", args.version);
    Ok(())
}

pub fn run_reset(vault: &Vault, args: &TemplateArg) -> Result<()> {
    let template = &args.template;
    vault.reset_to_original(template)?;
    println!("Reset {template} to its original content");
    Ok(())
}

pub fn run_delete(vault: &Vault, args: &VersionArgs) -> Result<()> {
    let template = &args.template.template;
    vault.delete_version(template, args.version)?;
    println!("Deleted {template} version {}", args.version);
    Ok(())
}

pub fn run_compare(vault: &Vault, args: &CompareArgs) -> Result<()> {
    let diff = vault.compare_versions(&args.template.template, args.from, args.to)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        println!("{} -> {}", args.from, args.to);
        print_diff(&diff);
    }
    Ok(())
}

pub fn run_history(vault: &Vault, args: &HistoryArgs) -> Result<()> {
    let template = &args.template.template;
    let current = vault.load_history(template)?.current_version;
    let versions = match args.lineage {
        Some(version) => vault.lineage(template, version)?,
        None => vault.list_versions(template)?,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&versions)?);
    } else {
        print_history(&versions, current);
    }
    Ok(())
}

pub fn run_show(vault: &Vault, args: &ShowArgs) -> Result<()> {
    let template = &args.template.template;
    let json = match args.snapshot {
        SnapshotRef::Original => {
            let original = vault.load_original(template)?.ok_or(VaultError::NotFound {
                kind: ContentKind::Original,
                template: template.clone(),
            })?;
            serde_json::to_string_pretty(&original)?
        }
        SnapshotRef::Working => {
            let working = vault.load_working(template)?.ok_or(VaultError::NotFound {
                kind: ContentKind::Working,
                template: template.clone(),
            })?;
            serde_json::to_string_pretty(&working)?
        }
        SnapshotRef::Version(version) => {
            serde_json::to_string_pretty(&vault.load_version(template, version)?)?
        }
    };
    println!("{json}");
    Ok(())
}

pub fn run_verify(vault: &Vault, args: &VerifyArgs) -> Result<()> {
    let template = &args.template.template;
    let versions = match args.version {
        Some(version) => vec![version],
        None => vault
            .list_versions(template)?
            .into_iter()
            .rev()
            .map(|meta| meta.version)
            .collect(),
    };
    let results: Vec<_> = versions
        .into_iter()
        .map(|version| {
            let problem = vault
                .verify_version(template, version)
                .err()
                .map(|error| error.to_string());
            (version, problem)
        })
        .collect();
    print_verification(&results);

    let failed = results.iter().filter(|(_, problem)| problem.is_some()).count();
    if failed > 0 {
        bail!("{failed} of {} versions failed verification", results.len());
    }
    Ok(())
}
