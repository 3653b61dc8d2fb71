pub mod config;
pub mod lint;
pub mod rules;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::errors::{MonolintError, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "monolint",
    version,
    about = "Linter for monorepos: checks module conventions and keeps shared files consistent"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Monorepo root directory
    #[arg(long, short = 'b', global = true, default_value = ".")]
    pub base_dir: PathBuf,

    /// Name of the configuration file looked up at each directory level
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Show successful checks and debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub lint: lint::LintArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect configuration resolution
    Config(config::ConfigArgs),
    /// List the available rules
    Rules(rules::RulesArgs),
}

/// Dispatch to the appropriate command handler.
///
/// Exit code 0 means no problems were found and 2 that violations were
/// reported. Errors are left to the caller, which exits with 1.
pub fn dispatch(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        None => lint::run(&cli.lint, &cli.base_dir, &cli.config, cli.verbose),
        Some(Commands::Config(args)) => config::run(args, &cli.base_dir, &cli.config),
        Some(Commands::Rules(args)) => rules::run(args),
    }
}

/// Absolute form of the base dir, which must exist.
fn canonical_base_dir(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|_| MonolintError::BaseDirNotFound {
            path: path.to_path_buf(),
        })
}
