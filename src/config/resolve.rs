use crate::config::presets::{resolve_preset, RECOMMENDED};
use crate::config::{merge_configs, Config};
use crate::errors::{MonolintError, Result};
use crate::rules::registry::RuleRegistry;
use crate::walk::levels_within;
use std::path::{Path, PathBuf};

/// A resolved configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: Config,
    /// Config files that contributed, root first.
    pub loaded_files: Vec<PathBuf>,
    /// Presets expanded along the way, in application order.
    pub presets: Vec<String>,
}

/// Resolve the configuration that applies to `target`.
///
/// Walks every directory from `root` down to `target`. Each level that has
/// a `file_name` config file contributes its presets and then its own
/// settings; the root level always contributes, with `monolint:recommended`
/// as its implicit preset.
pub fn resolve_with_sources(
    target: &Path,
    root: &Path,
    file_name: &str,
    registry: &RuleRegistry,
) -> Result<Resolution> {
    let mut config = Config {
        extends: Some(vec![RECOMMENDED.to_string()]),
        use_gitignore: Some(true),
        ..Default::default()
    };
    let mut loaded_files = Vec::new();
    let mut presets = Vec::new();

    for level in levels_within(root, target)? {
        let config_file = level.path.join(file_name);

        let mut loaded = if config_file.is_file() {
            let loaded = load_config_file(&config_file)?;
            loaded_files.push(config_file.clone());
            loaded
        } else if level.is_root {
            Config::default()
        } else {
            continue;
        };

        if loaded.module_markers.is_some() && !level.is_root {
            return Err(MonolintError::MarkersBelowRoot { file: config_file });
        }

        let extends = loaded.extends.take().unwrap_or_else(|| {
            if level.is_root {
                vec![RECOMMENDED.to_string()]
            } else {
                Vec::new()
            }
        });

        let referenced_from = config_file.display().to_string();
        for name in &extends {
            let preset = resolve_preset(name, &referenced_from)?;
            config = merge_configs(&config, &preset);
            presets.push(name.clone());
        }

        config = merge_configs(&config, &loaded);
        validate_config(&config, registry, &config_file)?;
    }

    Ok(Resolution {
        config,
        loaded_files,
        presets,
    })
}

pub fn resolve_module_config(
    target: &Path,
    root: &Path,
    file_name: &str,
    registry: &RuleRegistry,
) -> Result<Config> {
    Ok(resolve_with_sources(target, root, file_name, registry)?.config)
}

/// Configuration of the monorepo root itself.
pub fn load_base_config(root: &Path, file_name: &str, registry: &RuleRegistry) -> Result<Config> {
    resolve_module_config(root, root, file_name, registry)
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&content).map_err(|e| MonolintError::ConfigParse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Loaded config {}", path.display());
    Ok(config)
}

/// Every configured rule, enabled or not, must be registered.
pub fn validate_config(config: &Config, registry: &RuleRegistry, file: &Path) -> Result<()> {
    let rules = config
        .rules
        .as_ref()
        .ok_or_else(|| MonolintError::MissingRules {
            file: file.to_path_buf(),
        })?;
    for name in rules.keys() {
        if registry.get_rule(name).is_none() {
            return Err(MonolintError::UnknownRule {
                rule: name.clone(),
                file: file.to_path_buf(),
            });
        }
    }
    Ok(())
}
