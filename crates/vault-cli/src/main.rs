//! Template vault CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use vault_cli::logging::{LogConfig, LogFormat, init_logging};
use vault_store::{CONFIG_FILENAME, Vault, VaultConfig, VaultError};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_compare, run_delete, run_edit, run_history, run_init, run_reset, run_restore, run_save,
    run_show, run_verify,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let vault = Vault::open(resolve_config(cli)?)?;
    match &cli.command {
        Command::Init(args) => run_init(&vault, args),
        Command::Edit(args) => run_edit(&vault, args),
        Command::Save(args) => run_save(&vault, args),
        Command::Restore(args) => run_restore(&vault, args),
        Command::Reset(args) => run_reset(&vault, args),
        Command::Delete(args) => run_delete(&vault, args),
        Command::Compare(args) => run_compare(&vault, args),
        Command::History(args) => run_history(&vault, args),
        Command::Show(args) => run_show(&vault, args),
        Command::Verify(args) => run_verify(&vault, args),
    }
}

/// `--config` wins, then `<root>/vault.toml`; `--root` overrides the loaded root.
fn resolve_config(cli: &Cli) -> Result<VaultConfig> {
    let default_root = cli
        .root
        .clone()
        .unwrap_or_else(|| VaultConfig::default().root);
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| default_root.join(CONFIG_FILENAME));
    let mut config = VaultConfig::load(&path)?;
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    tracing::debug!(config = %path.display(), root = %config.root.display(), "resolved vault config");
    Ok(config)
}

fn report_error(error: &anyhow::Error) {
    match error.downcast_ref::<VaultError>() {
        Some(vault_error) => {
            eprintln!("error: {}", vault_error.user_message());
            tracing::debug!(error = %format!("{error:#}"), "operation failed");
            if let Some(suggestion) = vault_error.suggestion() {
                eprintln!("hint: {suggestion}");
            }
        }
        None => eprintln!("error: {error:#}"),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
