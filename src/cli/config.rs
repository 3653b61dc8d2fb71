use crate::cli::canonical_base_dir;
use crate::config::resolve::resolve_with_sources;
use crate::config::show::render_show;
use crate::errors::Result;
use crate::rules::registry::RuleRegistry;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the config files and extensions applied to a directory, and the resolved config
    Show {
        /// Directory inside the monorepo (defaults to the base dir)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(args: &ConfigArgs, base_dir: &Path, config_file: &str) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show { path } => {
            let root = canonical_base_dir(base_dir)?;
            let target = match path {
                Some(p) => canonical_base_dir(p)?,
                None => root.clone(),
            };
            let resolution =
                resolve_with_sources(&target, &root, config_file, &RuleRegistry::builtin())?;
            let mut stdout = std::io::stdout().lock();
            render_show(&mut stdout, &resolution)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
