//! Versioned content store for website templates.
//!
//! Each template owns an immutable baseline (Original), one mutable working
//! copy (Working), and an append-only chain of named versions indexed by a
//! history ledger. Authors edit Working, freeze it into versions, and can
//! restore, reset, delete, or compare snapshots.
//!
//! # Features
//!
//! - **Atomic writes**: every file is written to a temp path and renamed; a
//!   new version directory is staged and published in one rename
//! - **Checksums**: SHA-256 over sorted-key JSON, so key order never matters
//! - **Per-template serialization** of all mutating operations
//! - **Swappable backends** behind the [`ContentStore`] trait
//!
//! # On-disk layout
//!
//! ```text
//! {template}/original/content.json
//! {template}/working/content.json
//! {template}/working/colors.json
//! {template}/working/component-mappings.json
//! {template}/versions/version-history.json
//! {template}/versions/v{version}/content.json
//! {template}/versions/v{version}/metadata.json
//! {template}/versions/v{version}/colors.json
//! {template}/versions/v{version}/component-mappings.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vault_store::{Vault, VaultConfig};
//!
//! let vault = Vault::open(VaultConfig::with_root("/srv/templates"))?;
//! vault.save_working(&template, ContentPatch::new().with_texts(texts))?;
//! let meta = vault.create_version(&template, "translate hero")?;
//! vault.restore_version(&template, meta.version)?;
//! ```

mod backend;
pub mod codec;
mod config;
pub mod diff;
mod error;
mod locks;
mod migrate;
mod vault;

pub use backend::{Artifact, ContentKey, ContentStore, FsContentStore, MemoryContentStore, Scope};
pub use config::{CONFIG_FILENAME, VaultConfig};
pub use error::{ContentKind, Result, VaultError};
pub use locks::TemplateLocks;
pub use migrate::{SideArtifacts, migrate_working};
pub use vault::Vault;

pub use vault_model as model;
