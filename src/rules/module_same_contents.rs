//! Cross-module file content equivalence.
//!
//! Every module is compared against a reference module, either named in the
//! configuration or picked automatically: first the modules that contain the
//! most configured files and selectors, then among those the one that
//! produces the fewest violations. Ties go to the first module in
//! discovery order.

use crate::config::merge::merge_deep;
use crate::config::RuleSetting;
use crate::content::selector::Query;
use crate::content::similarity::{
    full_content_similarity, is_empty_value, value_similarity, ALL,
};
use crate::content::{load_structured, ContentFormat};
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

const NAME: &str = "module-same-contents";
const DEFAULT_MIN_SIMILARITY: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SameContentsOptions {
    pub reference_module: Option<String>,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub enabled: bool,
    pub min_similarity: f64,
    pub selectors: Vec<Selector>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// As written in the configuration; used in result resources.
    pub raw: String,
    pub query: Query,
    /// The selected content must be present.
    pub required: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawOptions {
    #[serde(default, alias = "referenceModule")]
    reference_module: Option<String>,
    #[serde(default)]
    files: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawFile {
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default = "default_min_similarity", alias = "minSimilarity")]
    min_similarity: f64,
    #[serde(default)]
    selectors: Map<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

fn default_min_similarity() -> f64 {
    DEFAULT_MIN_SIMILARITY
}

/// Files compared when the configuration does not say otherwise.
pub fn default_files() -> Value {
    json!({
        "LICENSE": true,
        "jest.config.js": true,
        "tsconfig.json": true,
        "tsconfig.eslint.json": true,
        ".eslintrc.js": true,
        ".eslintignore": true,
        ".prettierrc.js": true,
        ".prettierignore": true,
        "package.json": {
            "selectors": [
                "license",
                "author",
                "repository.type",
                "scripts.build",
                "scripts.lint",
                "scripts.lint-fix",
                "scripts.clean",
                "scripts.test",
                "scripts.unit-tests",
                "scripts.integration-tests",
                "scripts.deploy",
                "dependencies",
                "devDependencies",
                "engines.node",
                "publishConfig"
            ]
        },
        "serverless.yml": {
            "selectors": [
                "provider.runtime",
                "provider.lambdaHashingVersion",
                "provider.logRetentionInDays",
                "provider.tracing"
            ]
        },
        "Makefile": {
            "selectors": [
                "build",
                "lint",
                "test",
                "unit-tests",
                "integration-tests",
                "package",
                "deploy",
                "undeploy",
                "start",
                "clean",
                "install"
            ]
        }
    })
}

/// Bring a file entry to object form with selectors as a map, so that
/// user settings merge key by key over the defaults.
fn normalize_file_entry(value: &Value) -> std::result::Result<Value, String> {
    match value {
        Value::Bool(enabled) => Ok(json!({ "enabled": enabled })),
        Value::Object(obj) => {
            let mut obj = obj.clone();
            if let Some(Value::Array(items)) = obj.get("selectors") {
                let mut map = Map::new();
                for item in items {
                    let key = item
                        .as_str()
                        .ok_or_else(|| format!("selector {item} is not a string"))?;
                    map.insert(key.to_string(), Value::Bool(true));
                }
                obj.insert("selectors".to_string(), Value::Object(map));
            }
            Ok(Value::Object(obj))
        }
        other => Err(format!("unexpected file configuration {other}")),
    }
}

fn normalize_files(files: &Map<String, Value>) -> std::result::Result<Value, String> {
    let mut out = Map::new();
    for (name, entry) in files {
        out.insert(name.clone(), normalize_file_entry(entry)?);
    }
    Ok(Value::Object(out))
}

fn parse_selector(raw: &str, value: &Value) -> std::result::Result<Option<Selector>, String> {
    let required = match value {
        Value::Bool(false) | Value::Null => return Ok(None),
        Value::Bool(true) => false,
        Value::Object(obj) => {
            if obj.get("enabled") == Some(&Value::Bool(false)) {
                return Ok(None);
            }
            let flag = |k: &str| obj.get(k).and_then(Value::as_bool).unwrap_or(false);
            flag("required") || flag("strict")
        }
        other => return Err(format!("unexpected selector configuration {other}")),
    };
    let query = raw.parse::<Query>().map_err(|e| e.to_string())?;
    Ok(Some(Selector {
        raw: raw.to_string(),
        query,
        required,
    }))
}

/// Expand a raw setting over the default file list.
pub fn expand_options(setting: &RuleSetting) -> Result<SameContentsOptions> {
    let raw = match setting {
        RuleSetting::Disabled | RuleSetting::Enabled => RawOptions {
            reference_module: None,
            files: Map::new(),
        },
        RuleSetting::Shorthand(reference) => RawOptions {
            reference_module: Some(reference.clone()),
            files: Map::new(),
        },
        RuleSetting::Structured(value) => {
            serde_json::from_value(value.clone()).map_err(|e| invalid_config(NAME, e))?
        }
    };

    let defaults = match default_files() {
        Value::Object(files) => normalize_files(&files),
        _ => Ok(Value::Object(Map::new())),
    }
    .map_err(|e| invalid_config(NAME, e))?;
    let user = normalize_files(&raw.files).map_err(|e| invalid_config(NAME, e))?;
    let merged = merge_deep([&defaults, &user]);

    let mut files = Vec::new();
    for (name, entry) in merged.as_object().into_iter().flatten() {
        let file: RawFile = serde_json::from_value(entry.clone())
            .map_err(|e| invalid_config(NAME, format!("{name}: {e}")))?;
        if !(0.0..=100.0).contains(&file.min_similarity) {
            return Err(invalid_config(
                NAME,
                format!("{name}: min-similarity must be between 0 and 100"),
            ));
        }
        let mut selectors = Vec::new();
        for (raw, value) in &file.selectors {
            let selector = parse_selector(raw, value)
                .map_err(|e| invalid_config(NAME, format!("{name}: {e}")))?;
            if let Some(selector) = selector {
                selectors.push(selector);
            }
        }
        files.push(FileEntry {
            name: name.clone(),
            enabled: file.enabled,
            min_similarity: file.min_similarity,
            selectors,
        });
    }

    Ok(SameContentsOptions {
        reference_module: raw.reference_module,
        files,
    })
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleSameContents;

impl Rule for ModuleSameContents {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if files (or parts of structured files) are similar across modules, compared to a reference module"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Compare the default files against an automatically chosen reference module",
                config: json!(true),
            },
            RuleExample {
                description: "Use 'mod1-svc' as reference",
                config: json!("mod1-svc"),
            },
            RuleExample {
                description: "Require 90% similarity of the build scripts in package.json and skip LICENSE",
                config: json!({
                    "files": {
                        "LICENSE": false,
                        "package.json": {
                            "min-similarity": 90,
                            "selectors": {"scripts.build": {"required": true}}
                        }
                    }
                }),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        Ok(RuleOptions::SameContents(expand_options(setting)?))
    }

    fn check_modules(&self, modules: &[&Module], ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        let mut groups: Vec<(&SameContentsOptions, Vec<&Module>)> = Vec::new();
        for &module in modules {
            let Some(RuleOptions::SameContents(options)) = module.options(NAME) else {
                continue;
            };
            match groups.iter_mut().find(|(o, _)| *o == options) {
                Some((_, members)) => members.push(module),
                None => groups.push((options, vec![module])),
            }
        }

        let mut results = Vec::new();
        for (options, members) in groups {
            let group_results = match &options.reference_module {
                Some(name) => check_with_named_reference(name, &members, options, ctx),
                None => check_with_best_reference(&members, options),
            };
            results.extend(group_results);
        }
        Ok(results)
    }
}

fn check_with_named_reference(
    name: &str,
    members: &[&Module],
    options: &SameContentsOptions,
    ctx: &LintContext<'_>,
) -> Vec<RuleResult> {
    let matching: Vec<&Module> = ctx.modules.iter().filter(|m| m.name == name).collect();
    match matching.as_slice() {
        [reference] => {
            tracing::debug!("Using reference module {}", reference.path.display());
            compare_all(reference, members, options)
        }
        [] => vec![RuleResult::invalid(
            NAME,
            name,
            format!("Reference module '{name}' not found"),
        )],
        _ => vec![RuleResult::invalid(
            NAME,
            name,
            format!(
                "Reference name '{name}' cannot be used because it points to more than one module"
            ),
        )],
    }
}

/// Pick the reference module automatically and compare everyone with it.
fn check_with_best_reference(
    members: &[&Module],
    options: &SameContentsOptions,
) -> Vec<RuleResult> {
    // Stage A: modules that satisfy the most configured files themselves.
    let mut max_count = 0;
    let mut candidates: Vec<&Module> = Vec::new();
    for &module in members {
        let count = compare_files(module, module, options)
            .iter()
            .filter(|r| r.valid)
            .count();
        if count > max_count {
            max_count = count;
            candidates.clear();
        }
        if count == max_count && count > 0 {
            candidates.push(module);
        }
    }

    // Stage B: fewest violations across the group, first one wins ties.
    let mut best: Option<(usize, &Module, Vec<RuleResult>)> = None;
    for candidate in candidates {
        let results = compare_all(candidate, members, options);
        let invalid = results.iter().filter(|r| !r.valid).count();
        if best.as_ref().map_or(true, |(fewest, _, _)| invalid < *fewest) {
            best = Some((invalid, candidate, results));
        }
    }

    match best {
        Some((invalid, reference, results)) => {
            tracing::debug!(
                "Reference module {} selected ({max_count} files, {invalid} violations)",
                reference.path.display()
            );
            results
        }
        None => Vec::new(),
    }
}

fn compare_all(
    reference: &Module,
    members: &[&Module],
    options: &SameContentsOptions,
) -> Vec<RuleResult> {
    members
        .iter()
        .flat_map(|module| compare_files(reference, module, options))
        .collect()
}

/// Compare each configured file of `module` with the reference copy.
fn compare_files(
    reference: &Module,
    module: &Module,
    options: &SameContentsOptions,
) -> Vec<RuleResult> {
    let mut results = Vec::new();
    let is_reference = reference.path == module.path;

    for file in options.files.iter().filter(|f| f.enabled) {
        let ref_path = reference.path.join(&file.name);
        let path = module.path.join(&file.name);
        if !ref_path.is_file() || !path.is_file() {
            continue;
        }

        if file.selectors.is_empty() {
            let result = if is_reference {
                RuleResult::valid(NAME, resource(&path), "Reference file")
            } else {
                match full_content_similarity(&ref_path, &path) {
                    Ok(sim) => {
                        similarity_result(resource(&path), sim, file.min_similarity, reference)
                    }
                    Err(e) => RuleResult::invalid(NAME, resource(&path), e.to_string()),
                }
            };
            results.push(result.for_module(module));
            continue;
        }

        if ContentFormat::detect(&path).is_none() {
            results.push(
                RuleResult::invalid(
                    NAME,
                    resource(&path),
                    "Selectors can only be used with .json, .yml, .yaml and Makefile files",
                )
                .for_module(module),
            );
            continue;
        }

        let trees = load_structured(&ref_path).and_then(|r| Ok((r, load_structured(&path)?)));
        let (ref_tree, tree) = match trees {
            Ok(trees) => trees,
            Err(e) => {
                results.push(
                    RuleResult::invalid(NAME, resource(&path), e.to_string()).for_module(module),
                );
                continue;
            }
        };

        for selector in &file.selectors {
            let target = format!("{}[{}]", resource(&path), selector.raw);
            let ref_value = present(selector.query.select(&ref_tree));
            let value = present(selector.query.select(&tree));

            if selector.required && ref_value.is_none() {
                results.push(
                    RuleResult::invalid(
                        NAME,
                        target,
                        format!(
                            "Required content not found in reference module '{}'",
                            reference.name
                        ),
                    )
                    .for_module(module),
                );
                continue;
            }
            if selector.required && value.is_none() {
                results.push(
                    RuleResult::invalid(NAME, target, "Required content not found")
                        .for_module(module),
                );
                continue;
            }
            if ref_value.is_none() && value.is_none() {
                continue;
            }
            if is_reference {
                results.push(RuleResult::valid(NAME, target, "Reference file").for_module(module));
                continue;
            }

            let sim = value_similarity(ref_value, value, true);
            let all = sim.get(ALL).copied().unwrap_or(0.0);
            let min = file.min_similarity;
            results.push(similarity_result(target.clone(), all, min, reference).for_module(module));
            if all < min {
                let failing = sim.iter().filter(|(k, s)| k.as_str() != ALL && **s < min);
                for (key, score) in failing {
                    results.push(
                        similarity_result(format!("{target}.{key}"), *score, min, reference)
                            .for_module(module),
                    );
                }
            }
        }
    }
    results
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_empty_value(v))
}

fn similarity_result(target: String, similarity: f64, min: f64, reference: &Module) -> RuleResult {
    if similarity >= min {
        RuleResult::valid(
            NAME,
            target,
            format!("Content is similar to '{}' ({similarity}%)", reference.name),
        )
    } else {
        RuleResult::invalid(
            NAME,
            target,
            format!(
                "Content should be at least {min}% similar to '{}' (actual: {similarity}%)",
                reference.name
            ),
        )
    }
}
