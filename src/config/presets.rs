//! Built-in configuration presets that can be pulled in with `extends`.
//!
//! `monolint:recommended` is the default for the monorepo root and bundles
//! the narrower presets.

use crate::config::{merge_configs, Config, RuleSetting};
use crate::errors::{MonolintError, Result};
use std::collections::BTreeMap;

pub const BASIC: &str = "monolint:basic";
pub const PACKAGE_JSON: &str = "monolint:packagejson";
pub const SERVERLESS: &str = "monolint:serverless";
pub const MAKEFILE: &str = "monolint:makefile";
pub const RECOMMENDED: &str = "monolint:recommended";

/// Names of all built-in presets, least dependent first.
pub const PRESET_NAMES: &[&str] = &[BASIC, PACKAGE_JSON, SERVERLESS, MAKEFILE, RECOMMENDED];

fn rules(entries: &[(&str, RuleSetting)]) -> Option<BTreeMap<String, RuleSetting>> {
    Some(
        entries
            .iter()
            .map(|(name, setting)| (name.to_string(), setting.clone()))
            .collect(),
    )
}

/// The preset exactly as declared, `extends` not yet expanded.
fn declared(name: &str) -> Option<Config> {
    let config = match name {
        BASIC => Config {
            use_gitignore: Some(true),
            rules: rules(&[
                ("module-name-regex", RuleSetting::Enabled),
                ("module-unique-name", RuleSetting::Enabled),
                ("module-same-contents", RuleSetting::Enabled),
            ]),
            ..Default::default()
        },
        PACKAGE_JSON => Config {
            module_markers: Some(vec!["package.json".to_string()]),
            rules: rules(&[("packagejson-same-name", RuleSetting::Enabled)]),
            ..Default::default()
        },
        SERVERLESS => Config {
            module_markers: Some(vec!["serverless.yml".to_string()]),
            rules: rules(&[("serverless-same-name", RuleSetting::Enabled)]),
            ..Default::default()
        },
        // Makefile targets are compared by module-same-contents defaults.
        MAKEFILE => Config::default(),
        RECOMMENDED => Config {
            extends: Some(vec![
                BASIC.to_string(),
                PACKAGE_JSON.to_string(),
                SERVERLESS.to_string(),
                MAKEFILE.to_string(),
            ]),
            ..Default::default()
        },
        _ => return None,
    };
    Some(config)
}

/// Resolve a preset by name, expanding its own `extends` first so the
/// preset's own settings win over what it extends.
pub fn resolve_preset(name: &str, referenced_from: &str) -> Result<Config> {
    let mut chain = Vec::new();
    resolve_inner(name, referenced_from, &mut chain)
}

fn resolve_inner(name: &str, referenced_from: &str, chain: &mut Vec<String>) -> Result<Config> {
    if chain.iter().any(|n| n == name) {
        chain.push(name.to_string());
        return Err(MonolintError::PresetCycle {
            name: name.to_string(),
            chain: chain.join(" -> "),
        });
    }

    let preset = declared(name).ok_or_else(|| MonolintError::UnknownPreset {
        name: name.to_string(),
        referenced_from: referenced_from.to_string(),
    })?;

    chain.push(name.to_string());
    let mut merged = Config::default();
    for parent in preset.extends.iter().flatten() {
        let resolved = resolve_inner(parent, name, chain)?;
        merged = merge_configs(&merged, &resolved);
    }
    chain.pop();

    tracing::debug!("Resolved extension '{name}'");
    Ok(merge_configs(&merged, &preset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_bundles_all() {
        let config = resolve_preset(RECOMMENDED, "test").unwrap();
        assert!(config.rule_enabled("module-name-regex"));
        assert!(config.rule_enabled("module-unique-name"));
        assert!(config.rule_enabled("module-same-contents"));
        assert!(config.rule_enabled("packagejson-same-name"));
        assert!(config.rule_enabled("serverless-same-name"));
        assert_eq!(config.markers(), ["package.json", "serverless.yml"]);
        assert!(config.use_gitignore());
        assert!(config.extends.is_none());
    }

    #[test]
    fn every_builtin_resolves() {
        for name in PRESET_NAMES {
            assert!(resolve_preset(name, "test").is_ok(), "{name} failed");
        }
    }

    #[test]
    fn unknown_preset_is_error() {
        let err = resolve_preset("monolint:nope", "/repo/.monolint.json").unwrap_err();
        match err {
            MonolintError::UnknownPreset {
                name,
                referenced_from,
            } => {
                assert_eq!(name, "monolint:nope");
                assert_eq!(referenced_from, "/repo/.monolint.json");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
