use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, structured, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};

const NAME: &str = "gh-workflow-module-prefix";
const WORKFLOWS_DIR: &str = ".github/workflows";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowPrefixOptions {
    /// Every module must have one workflow file per suffix.
    #[serde(default)]
    pub required: bool,
    /// Allowed text between the module name and `.yml`.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
}

fn default_suffixes() -> Vec<String> {
    vec![String::new()]
}

impl Default for WorkflowPrefixOptions {
    fn default() -> Self {
        Self {
            required: false,
            suffixes: default_suffixes(),
        }
    }
}

/// GitHub workflow files must be named after the module they build.
#[derive(Debug, Clone, Copy)]
pub struct GhWorkflowModulePrefix;

impl Rule for GhWorkflowModulePrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if GitHub Actions workflow files are prefixed by the name of a module"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Workflow file names must start with a module name",
                config: json!(true),
            },
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
            RuleExample {
                description: "Each module must have '-dev' and '-prd' workflows",
                config: json!({"required": true, "suffixes": ["-dev", "-prd"]}),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let options = match setting {
            RuleSetting::Disabled | RuleSetting::Enabled => WorkflowPrefixOptions::default(),
            RuleSetting::Shorthand(suffix) => WorkflowPrefixOptions {
                required: false,
                suffixes: vec![suffix.clone()],
            },
            RuleSetting::Structured(value) => structured(NAME, value)?,
        };
        if options.suffixes.is_empty() {
            return Err(invalid_config(NAME, "at least one suffix is required"));
        }
        Ok(RuleOptions::GhWorkflowPrefix(options))
    }

    /// Every existing workflow file must start with some module's name.
    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        let Some(setting) = ctx.base_config.rule(NAME) else {
            return Ok(Vec::new());
        };
        let RuleOptions::GhWorkflowPrefix(options) = self.options(setting)? else {
            return Ok(Vec::new());
        };

        let dir = ctx.base_dir.join(WORKFLOWS_DIR);
        let (files, mut results) = workflow_files(&dir);
        for file_name in files {
            let path = dir.join(&file_name);
            let mut owner = None;
            let mut valid_suffix = false;
            for module in ctx.modules {
                if file_name.starts_with(&module.name) {
                    owner = Some(module);
                    valid_suffix |= options
                        .suffixes
                        .iter()
                        .any(|s| s.is_empty() || has_suffix(&file_name, s));
                }
            }

            let result = match owner {
                None => RuleResult::invalid(
                    NAME,
                    resource(&path),
                    "File should have the name of a module as prefix",
                ),
                Some(_) if !valid_suffix => RuleResult::invalid(
                    NAME,
                    resource(&path),
                    format!(
                        "File name suffix should be one of {}",
                        options.suffixes.join(",")
                    ),
                ),
                Some(module) => {
                    RuleResult::valid(NAME, resource(&path), "Workflow file name is correct")
                        .for_module(module)
                }
            };
            results.push(result);
        }
        Ok(results)
    }

    /// Modules with `required` set must have a workflow file per suffix.
    fn check_modules(
        &self,
        modules: &[&Module],
        ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        let dir = ctx.base_dir.join(WORKFLOWS_DIR);
        // unreadable entries are reported by `check`
        let (files, _) = workflow_files(&dir);
        let mut results = Vec::new();

        for module in modules {
            let Some(RuleOptions::GhWorkflowPrefix(options)) = module.options(NAME) else {
                continue;
            };
            if !options.required {
                continue;
            }
            for suffix in &options.suffixes {
                let pattern = format!(
                    r"^{}.*{}\.ya?ml$",
                    regex::escape(&module.name),
                    regex::escape(suffix)
                );
                let re = Regex::new(&pattern)?;
                let result = match files.iter().find(|f| re.is_match(f)) {
                    Some(found) => RuleResult::valid(
                        NAME,
                        resource(&dir.join(found)),
                        "Required gh workflow file found",
                    ),
                    None => RuleResult::invalid(
                        NAME,
                        resource(&dir.join(format!("{}{suffix}.yml", module.name))),
                        "Missing required gh workflow file",
                    ),
                };
                results.push(result.for_module(module));
            }
        }
        Ok(results)
    }
}

fn has_suffix(file_name: &str, suffix: &str) -> bool {
    file_name.ends_with(&format!("{suffix}.yml")) || file_name.ends_with(&format!("{suffix}.yaml"))
}

type WorkflowEntry = std::result::Result<(String, bool), (PathBuf, std::io::Error)>;

/// File names in the workflows folder, sorted, plus an invalid result per
/// entry that could not be read. Missing folder is empty.
fn workflow_files(dir: &Path) -> (Vec<String>, Vec<RuleResult>) {
    if !dir.is_dir() {
        return (Vec::new(), Vec::new());
    }
    match std::fs::read_dir(dir) {
        Ok(entries) => split_entries(entries.map(|entry| -> WorkflowEntry {
            let entry = entry.map_err(|e| (dir.to_path_buf(), e))?;
            let file_type = entry.file_type().map_err(|e| (entry.path(), e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            Ok((name, file_type.is_file()))
        })),
        Err(e) => (Vec::new(), vec![unreadable(dir, &e)]),
    }
}

fn split_entries(
    entries: impl IntoIterator<Item = WorkflowEntry>,
) -> (Vec<String>, Vec<RuleResult>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in entries {
        match entry {
            Ok((name, true)) => files.push(name),
            Ok(_) => {}
            Err((path, e)) => errors.push(unreadable(&path, &e)),
        }
    }
    files.sort();
    (files, errors)
}

fn unreadable(path: &Path, error: &std::io::Error) -> RuleResult {
    tracing::warn!("Could not read {}: {error}", path.display());
    RuleResult::invalid(NAME, resource(path), format!("Couldn't read workflow entry: {error}"))
}
