use crate::config::ignore::load_ignore_patterns;
use crate::config::resolve::resolve_module_config;
use crate::config::{Config, RuleSetting};
use crate::errors::{MonolintError, Result};
use crate::rules::registry::RuleRegistry;
use crate::rules::{ModuleRef, Rule, RuleOptions};
use crate::walk::{build_ignore_set, find_marker_files};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An enabled rule together with its normalized options for one module.
#[derive(Debug, Clone)]
pub struct RuleBinding {
    pub rule: Arc<dyn Rule>,
    pub setting: RuleSetting,
    pub options: RuleOptions,
}

/// A directory identified by a marker file.
#[derive(Debug, Clone)]
pub struct Module {
    pub path: PathBuf,
    pub name: String,
    /// Configuration resolved for this module's directory.
    pub config: Config,
    pub enabled_rules: BTreeMap<String, RuleBinding>,
}

impl Module {
    pub fn reference(&self) -> ModuleRef {
        ModuleRef {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }

    pub fn rule_enabled(&self, rule: &str) -> bool {
        self.enabled_rules.contains_key(rule)
    }

    pub fn options(&self, rule: &str) -> Option<&RuleOptions> {
        self.enabled_rules.get(rule).map(|b| &b.options)
    }
}

/// Find all modules below `base_dir`.
///
/// Modules are de-duplicated by directory, nested modules collapse to the
/// innermost one, and the result is sorted by name then path.
pub fn discover_modules(
    base_dir: &Path,
    base_config: &Config,
    config_file: &str,
    registry: &RuleRegistry,
) -> Result<Vec<Module>> {
    let patterns = load_ignore_patterns(base_dir, base_config.use_gitignore());
    let ignore_set = build_ignore_set(&patterns)?;
    let marker_files = find_marker_files(base_dir, base_config.markers(), &ignore_set)?;

    let dirs: BTreeSet<PathBuf> = marker_files
        .iter()
        .filter_map(|file| file.parent().map(Path::to_path_buf))
        .collect();

    let mut candidates = Vec::with_capacity(dirs.len());
    for path in dirs {
        let config = resolve_module_config(&path, base_dir, config_file, registry)?;
        let enabled_rules = bind_rules(&config, registry, &path.join(config_file))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        candidates.push(Module {
            path,
            name,
            config,
            enabled_rules,
        });
    }

    let mut modules = retain_leaves(candidates, |m| m.path.as_path());
    modules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));

    tracing::debug!("{} modules found", modules.len());
    for module in &modules {
        tracing::debug!("Module {} at {}", module.name, module.path.display());
    }
    Ok(modules)
}

/// Normalize the setting of every enabled rule through its rule.
pub fn bind_rules(
    config: &Config,
    registry: &RuleRegistry,
    source: &Path,
) -> Result<BTreeMap<String, RuleBinding>> {
    let mut bindings = BTreeMap::new();
    for (name, setting) in config.rules.iter().flatten() {
        if !setting.is_enabled() {
            continue;
        }
        let rule = registry
            .get_rule(name)
            .ok_or_else(|| MonolintError::UnknownRule {
                rule: name.clone(),
                file: source.to_path_buf(),
            })?;
        let options = rule.options(setting)?;
        bindings.insert(
            name.clone(),
            RuleBinding {
                rule: Arc::clone(rule),
                setting: setting.clone(),
                options,
            },
        );
    }
    Ok(bindings)
}

/// Drop every item whose path contains another item's path.
///
/// Comparison is by whole path components, so `a/mod` does not contain
/// `a/module`.
pub fn retain_leaves<T, F>(items: Vec<T>, path_of: F) -> Vec<T>
where
    F: Fn(&T) -> &Path,
{
    let paths: Vec<PathBuf> = items.iter().map(|i| path_of(i).to_path_buf()).collect();
    items
        .into_iter()
        .zip(paths.iter())
        .filter(|(_, path)| {
            !paths
                .iter()
                .any(|other| other != *path && other.starts_with(path))
        })
        .map(|(item, _)| item)
        .collect()
}
