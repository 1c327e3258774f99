//! CLI argument definitions for the template vault.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use vault_cli::edits::Assignment;
use vault_model::{SnapshotRef, TemplateId, VersionNumber};

#[derive(Parser)]
#[command(
    name = "template-vault",
    version,
    about = "Versioned content store for website templates",
    long_about = "Edit template content, save named versions, restore or compare them, \n\
                  and reset to the analyzed original."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root holding one directory per template (overrides the config file).
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Config file (default: <ROOT>/vault.toml).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the baseline, history, and working copy of a template.
    Init(InitArgs),

    /// Change working content.
    Edit(EditArgs),

    /// Save working content as a new version.
    Save(SaveArgs),

    /// Replace working content with a saved version.
    Restore(VersionArgs),

    /// Discard edits and return to the original content.
    Reset(TemplateArg),

    /// Delete a saved version.
    Delete(VersionArgs),

    /// List differences between two snapshots.
    Compare(CompareArgs),

    /// List saved versions, newest first.
    History(HistoryArgs),

    /// Print a snapshot's content as JSON.
    Show(ShowArgs),

    /// Check saved versions against their recorded checksums.
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct TemplateArg {
    /// Template directory name under the store root.
    #[arg(value_name = "TEMPLATE")]
    pub template: TemplateId,
}

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Analysis JSON to build the baseline from (default: <ROOT>/<TEMPLATE>/analysis.json).
    #[arg(long = "from", value_name = "FILE")]
    pub analysis: Option<PathBuf>,
}

#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Set a text by id.
    #[arg(long = "text", value_name = "ID=VALUE")]
    pub texts: Vec<Assignment>,

    /// Set an image path by id.
    #[arg(long = "image", value_name = "ID=PATH")]
    pub images: Vec<Assignment>,

    /// Set a color token by dotted path, e.g. brand.primary=#1D4ED8.
    #[arg(long = "color", value_name = "TOKEN=COLOR")]
    pub colors: Vec<Assignment>,

    /// JSON patch file; its fields replace the stored ones wholesale.
    #[arg(long = "patch", value_name = "FILE")]
    pub patch: Option<PathBuf>,
}

#[derive(Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Version description.
    #[arg(short = 'm', long = "message", default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct VersionArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    #[arg(value_name = "VERSION")]
    pub version: VersionNumber,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Snapshot to compare from: original, working, or a version.
    #[arg(value_name = "FROM")]
    pub from: SnapshotRef,

    /// Snapshot to compare to.
    #[arg(value_name = "TO", default_value = "working")]
    pub to: SnapshotRef,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Show only the parent chain of this version.
    #[arg(long, value_name = "VERSION")]
    pub lineage: Option<VersionNumber>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    #[arg(value_name = "SNAPSHOT", default_value = "working")]
    pub snapshot: SnapshotRef,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub template: TemplateArg,

    /// Verify a single version instead of all.
    #[arg(value_name = "VERSION")]
    pub version: Option<VersionNumber>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
