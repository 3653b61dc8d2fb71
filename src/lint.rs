//! Lint entry point and the multi-pass fix driver.

use crate::config::resolve::load_base_config;
use crate::errors::{MonolintError, Result};
use crate::modules::{discover_modules, Module};
use crate::rules::registry::RuleRegistry;
use crate::rules::{FixResult, FixType, LintContext, RuleResult};
use std::collections::HashMap;
use std::path::Path;

/// Upper bound on lint passes when fixing.
pub const MAX_FIX_PASSES: usize = 10;

/// Run every registered rule once over the monorepo at `base_dir`.
///
/// Rules enabled in the root configuration get a whole-repository `check`;
/// every rule then sees the modules that have it enabled. Results are
/// sorted by resource, then rule.
pub fn lint(
    base_dir: &Path,
    config_file: &str,
    fix: bool,
    registry: &RuleRegistry,
) -> Result<Vec<RuleResult>> {
    if !base_dir.is_dir() {
        return Err(MonolintError::BaseDirNotFound {
            path: base_dir.to_path_buf(),
        });
    }

    let base_config = load_base_config(base_dir, config_file, registry)?;
    let modules = discover_modules(base_dir, &base_config, config_file, registry)?;
    let ctx = LintContext {
        base_dir,
        base_config: &base_config,
        modules: &modules,
        fix,
    };

    let mut results = Vec::new();
    for rule in registry.all_rules() {
        if base_config.rule_enabled(rule.name()) {
            results.extend(rule.check(&ctx)?);
        }

        let enabled: Vec<&Module> = modules
            .iter()
            .filter(|m| m.rule_enabled(rule.name()))
            .collect();
        if enabled.is_empty() {
            continue;
        }
        tracing::debug!("Running {} on {} modules", rule.name(), enabled.len());
        results.extend(rule.check_modules(&enabled, &ctx)?);
    }

    results.sort_by(|a, b| {
        a.resource
            .cmp(&b.resource)
            .then_with(|| a.rule.cmp(&b.rule))
    });
    Ok(results)
}

/// Outcome of one or more lint passes.
#[derive(Debug, Clone)]
pub struct LintReport {
    /// Results of the last pass.
    pub results: Vec<RuleResult>,
    /// Results whose fix was applied, in any pass.
    pub fixed: usize,
    pub passes: usize,
}

impl LintReport {
    pub fn problems(&self) -> usize {
        self.results.iter().filter(|r| !r.valid).count()
    }
}

/// Lint, and when fixing keep re-linting while problems remain.
///
/// A fix can expose or resolve issues only visible on the next pass.
/// The first fix result recorded for each `rule:resource` is carried to the
/// final results, so fixes from early passes are still reported.
pub fn run_passes(
    base_dir: &Path,
    config_file: &str,
    fix: bool,
    registry: &RuleRegistry,
) -> Result<LintReport> {
    let max_passes = if fix { MAX_FIX_PASSES } else { 1 };
    let mut first_fixes: HashMap<String, FixResult> = HashMap::new();
    let mut results = Vec::new();
    let mut passes = 0;

    while passes < max_passes {
        passes += 1;
        results = lint(base_dir, config_file, fix, registry)?;

        for result in &results {
            if let Some(fix_result) = &result.fix_result {
                first_fixes
                    .entry(fix_key(result))
                    .or_insert_with(|| fix_result.clone());
            }
        }

        let pending = results.iter().filter(|r| !r.valid).count();
        tracing::debug!("Pass {passes}: {pending} problems pending");
        if pending == 0 {
            break;
        }
    }

    let mut fixed = 0;
    for result in &mut results {
        if let Some(fix_result) = first_fixes.get(&fix_key(result)) {
            if fix_result.kind == FixType::Fixed {
                fixed += 1;
            }
            result.fix_result = Some(fix_result.clone());
        }
    }
    if fixed > 0 {
        tracing::info!("{fixed} problems fixed in {passes} passes");
    }

    Ok(LintReport {
        results,
        fixed,
        passes,
    })
}

fn fix_key(result: &RuleResult) -> String {
    format!("{}:{}", result.rule, result.resource)
}
