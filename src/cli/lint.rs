use crate::cli::canonical_base_dir;
use crate::errors::Result;
use crate::lint::run_passes;
use crate::output::json::write_results_json;
use crate::output::text::write_results_text;
use crate::output::OutputFormat;
use crate::rules::registry::RuleRegistry;
use crate::rules::RuleResult;
use clap::Args;
use regex::Regex;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Args)]
pub struct LintArgs {
    /// Try to fix the problems found
    #[arg(long)]
    pub fix: bool,

    /// Only show results whose resource matches this regex
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn run(args: &LintArgs, base_dir: &Path, config_file: &str, verbose: bool) -> Result<ExitCode> {
    let base_dir = canonical_base_dir(base_dir)?;
    let filter = args.filter.as_deref().map(Regex::new).transpose()?;

    let registry = RuleRegistry::builtin();
    let report = run_passes(&base_dir, config_file, args.fix, &registry)?;
    tracing::debug!(
        "Lint finished after {} passes with {} results",
        report.passes,
        report.results.len()
    );

    let results: Vec<RuleResult> = match filter {
        Some(re) => report
            .results
            .into_iter()
            .filter(|r| re.is_match(&r.resource))
            .collect(),
        None => report.results,
    };

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            let cwd = std::env::current_dir()?;
            write_results_text(&mut stdout, &results, report.fixed, verbose, &cwd)?;
        }
        OutputFormat::Json => write_results_json(&mut stdout, &results)?,
    }

    if results.iter().any(|r| !r.valid) {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
