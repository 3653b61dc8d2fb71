use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, structured, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use crate::walk::path_glob;
use globset::GlobSetBuilder;
use serde_json::json;
use std::path::Path;

const NAME: &str = "module-parent-folder";

/// The folder containing a module must match one of the configured globs.
#[derive(Debug, Clone, Copy)]
pub struct ModuleParentFolder;

impl Rule for ModuleParentFolder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check whether all module folders have an allowed parent folder, using glob path patterns"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
            RuleExample {
                description: "All modules should be inside 'packages', 'apps', 'libs' or 'services'",
                config: json!(["packages", "apps", "libs", "services"]),
            },
            RuleExample {
                description: "All modules should be in a folder named 'packages' that is a descendant of a folder named 'apps'",
                config: json!(["apps/**/packages"]),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let patterns = match setting {
            RuleSetting::Shorthand(p) => vec![p.clone()],
            RuleSetting::Structured(value) => structured::<Vec<String>>(NAME, value)?,
            RuleSetting::Disabled | RuleSetting::Enabled => {
                return Err(invalid_config(NAME, "a list of parent folder patterns is required"))
            }
        };
        for pattern in &patterns {
            path_glob(&anchored(pattern)).map_err(|e| invalid_config(NAME, e))?;
        }
        Ok(RuleOptions::ParentFolder(patterns))
    }

    fn check_modules(&self, modules: &[&Module], ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let Some(RuleOptions::ParentFolder(patterns)) = module.options(NAME) else {
                continue;
            };
            if patterns.is_empty() {
                continue;
            }

            let mut builder = GlobSetBuilder::new();
            for pattern in patterns {
                builder.add(path_glob(&anchored(pattern))?);
            }
            let set = builder.build()?;

            let parent = module
                .path
                .parent()
                .and_then(|p| p.strip_prefix(ctx.base_dir).ok())
                .unwrap_or(Path::new(""));
            let result = if !parent.as_os_str().is_empty() && set.is_match(parent) {
                RuleResult::valid(
                    NAME,
                    resource(&module.path),
                    "Module parent folder name is valid",
                )
            } else {
                RuleResult::invalid(
                    NAME,
                    resource(&module.path),
                    format!(
                        "Module parent folder name does not match any of the patterns: {}",
                        patterns.join(", ")
                    ),
                )
            };
            results.push(result.for_module(module));
        }
        Ok(results)
    }
}

fn anchored(pattern: &str) -> String {
    let trimmed = pattern.trim_end_matches('/');
    if trimmed.starts_with("**/") {
        trimmed.to_string()
    } else {
        format!("**/{trimmed}")
    }
}
