use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, structured, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use crate::walk::path_glob;
use globset::GlobSet;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const NAME: &str = "module-folder-structure";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderStructureOptions {
    /// Glob patterns, relative to the module, that must match a folder.
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,
    /// Reject folders not covered by `folders`.
    #[serde(default)]
    pub strict: bool,
}

fn default_folders() -> Vec<String> {
    vec!["src".to_string()]
}

impl Default for FolderStructureOptions {
    fn default() -> Self {
        Self {
            folders: default_folders(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleFolderStructure;

impl Rule for ModuleFolderStructure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check whether the folder structure is present in the modules"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
            RuleExample {
                description: "Activates this rule using default folders (defaults: `[\"src\"]`)",
                config: json!(true),
            },
            RuleExample {
                description: "Loosely requires module structure. The module should contain at least this set of folders, but can still have others.",
                config: json!({"strict": false, "folders": ["src", "docs", "libs"]}),
            },
            RuleExample {
                description: "Strictly requires module structure. No extra folders allowed.",
                config: json!({
                    "strict": true,
                    "folders": ["src/test", "src/**/utils", "src/libs/**/release"]
                }),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let options = match setting {
            RuleSetting::Disabled | RuleSetting::Enabled => FolderStructureOptions::default(),
            RuleSetting::Structured(value) if value.is_array() => FolderStructureOptions {
                folders: structured(NAME, value)?,
                strict: false,
            },
            RuleSetting::Structured(value) => structured(NAME, value)?,
            RuleSetting::Shorthand(s) => {
                return Err(invalid_config(NAME, format!("unexpected string '{s}'")))
            }
        };
        for pattern in &options.folders {
            path_glob(pattern).map_err(|e| invalid_config(NAME, e))?;
        }
        Ok(RuleOptions::FolderStructure(options))
    }

    fn check_modules(
        &self,
        modules: &[&Module],
        _ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let Some(RuleOptions::FolderStructure(options)) = module.options(NAME) else {
                continue;
            };
            if options.folders.is_empty() {
                continue;
            }
            results.extend(check_module(module, options)?);
        }
        Ok(results)
    }
}

fn check_module(module: &Module, options: &FolderStructureOptions) -> Result<Vec<RuleResult>> {
    let folders = module_folders(&module.path);
    let mut results = Vec::new();
    let mut all = globset::GlobSetBuilder::new();

    for pattern in &options.folders {
        let glob = path_glob(pattern)?;
        all.add(glob.clone());
        let matcher = glob.compile_matcher();
        let found = folders.iter().any(|f| matcher.is_match(f));
        let target = resource(&module.path.join(pattern));
        let result = if found {
            RuleResult::valid(NAME, target, "Required folder found")
        } else {
            RuleResult::invalid(NAME, target, "Required folder not found")
        };
        results.push(result.for_module(module));
    }

    if options.strict {
        let all = all.build()?;
        results.extend(extra_folders(&folders, &all).into_iter().map(|folder| {
            RuleResult::invalid(
                NAME,
                resource(&module.path.join(folder)),
                "Folder outside the required list not allowed (strict mode)",
            )
            .for_module(module)
        }));
    }
    Ok(results)
}

/// Folders that neither match a pattern nor lead to a matching folder.
fn extra_folders<'a>(folders: &'a [PathBuf], patterns: &GlobSet) -> Vec<&'a PathBuf> {
    let matching: Vec<&PathBuf> = folders.iter().filter(|f| patterns.is_match(f)).collect();
    if matching.is_empty() {
        return Vec::new();
    }
    folders
        .iter()
        .filter(|folder| !matching.iter().any(|m| m.starts_with(folder)))
        .collect()
}

/// Every folder below `root`, relative to it.
fn module_folders(root: &Path) -> Vec<PathBuf> {
    let mut folders = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if let Ok(relative) = entry.path().strip_prefix(root) {
                folders.push(relative.to_path_buf());
            }
        }
    }
    folders
}
