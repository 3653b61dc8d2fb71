use crate::errors::Result;
use crate::rules::registry::RuleRegistry;
use clap::Args;
use std::io::Write;
use std::process::ExitCode;

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Also print example configurations
    #[arg(long)]
    pub examples: bool,
}

pub fn run(args: &RulesArgs) -> Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();
    write_rules(&mut stdout, &RuleRegistry::builtin(), args.examples)?;
    Ok(ExitCode::SUCCESS)
}

/// One line per rule, optionally followed by its documented examples.
pub fn write_rules<W: Write>(
    writer: &mut W,
    registry: &RuleRegistry,
    examples: bool,
) -> std::io::Result<()> {
    let width = registry
        .all_rules()
        .iter()
        .map(|r| r.name().len())
        .max()
        .unwrap_or(0);
    for rule in registry.all_rules() {
        writeln!(writer, "{:<width$}  {}", rule.name(), rule.description())?;
        if examples {
            for example in rule.examples() {
                writeln!(writer, "    {}", example.description)?;
                writeln!(writer, "      \"{}\": {}", rule.name(), example.config)?;
            }
        }
    }
    Ok(())
}
