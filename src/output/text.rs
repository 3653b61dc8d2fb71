use crate::rules::{FixType, RuleResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Write lint results as human-readable text, grouped by resource.
///
/// Failing resources are always listed; passing ones only when `verbose`.
/// Paths below `cwd` are shown relative to it.
pub fn write_results_text<W: Write>(
    writer: &mut W,
    results: &[RuleResult],
    fixed: usize,
    verbose: bool,
    cwd: &Path,
) -> std::io::Result<()> {
    let mut by_resource: BTreeMap<&str, Vec<&RuleResult>> = BTreeMap::new();
    for result in results {
        by_resource.entry(&result.resource).or_default().push(result);
    }

    let prefix = format!("{}/", cwd.display());
    let relative = |text: &str| text.replace(&prefix, "");

    writeln!(writer)?;
    if verbose {
        for (resource, group) in by_resource.iter().filter(|(_, g)| g.iter().all(|r| r.valid)) {
            writeln!(writer, "{}", relative(resource))?;
            for result in group {
                write_success(writer, result, &relative)?;
            }
            writeln!(writer)?;
        }
    }

    let mut fixable = 0;
    for (resource, group) in by_resource.iter().filter(|(_, g)| g.iter().any(|r| !r.valid)) {
        writeln!(writer, "{}", relative(resource))?;
        let (passed, failed): (Vec<&&RuleResult>, Vec<&&RuleResult>) =
            group.iter().partition(|r| r.valid);
        if verbose {
            for result in passed {
                write_success(writer, result, &relative)?;
            }
        }
        for result in failed {
            let fix = result.fix_result.as_ref();
            let annotation = match fix.map(|f| &f.kind) {
                Some(FixType::Possible) => {
                    fixable += 1;
                    " fixable"
                }
                Some(FixType::NotPossible) => " fix failed",
                _ => "",
            };
            writeln!(
                writer,
                "  error {} {}{annotation}",
                relative(result.message.as_deref().unwrap_or_default()),
                result.rule,
            )?;
            let fix_message = fix.and_then(|f| f.message.as_deref());
            let failed_fix = fix.is_some_and(|f| f.kind == FixType::NotPossible);
            if let Some(message) = fix_message.filter(|_| verbose || failed_fix) {
                writeln!(writer, "    {}", relative(message))?;
            }
        }
        writeln!(writer)?;
    }

    if verbose {
        let successful = results.iter().filter(|r| r.valid).count();
        writeln!(writer, "✓ {successful} checks successful")?;
    }

    let problems = results.iter().filter(|r| !r.valid).count();
    let suffix = if fixed > 0 {
        format!(" ({fixed} fixed)")
    } else if fixable > 0 {
        format!(" ({fixable} fixable)")
    } else {
        String::new()
    };
    writeln!(writer, "✖ {problems} problems found{suffix}")?;
    Ok(())
}

fn write_success<W: Write>(
    writer: &mut W,
    result: &RuleResult,
    relative: &impl Fn(&str) -> String,
) -> std::io::Result<()> {
    let fixed = result
        .fix_result
        .as_ref()
        .is_some_and(|f| f.kind == FixType::Fixed);
    writeln!(
        writer,
        "  success {} {}{}",
        relative(result.message.as_deref().unwrap_or_default()),
        result.rule,
        if fixed { " fixed" } else { "" }
    )
}
