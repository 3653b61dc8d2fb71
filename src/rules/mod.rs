//! Rule trait, rule results and the built-in rules.

pub mod gh_workflow_module_prefix;
pub mod module_folder_structure;
pub mod module_name_regex;
pub mod module_parent_folder;
pub mod module_required_files;
pub mod module_same_contents;
pub mod module_unique_name;
pub mod packagejson_same_name;
pub mod registry;
pub mod serverless_same_name;

use crate::config::{Config, RuleSetting};
use crate::errors::{MonolintError, Result};
use crate::modules::Module;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything a rule can look at during one lint pass.
#[derive(Debug, Clone, Copy)]
pub struct LintContext<'a> {
    pub base_dir: &'a Path,
    pub base_config: &'a Config,
    /// All discovered modules, sorted by name then path.
    pub modules: &'a [Module],
    /// Whether rules should write fixes to disk.
    pub fix: bool,
}

/// A documented configuration for a rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleExample {
    pub description: &'static str,
    pub config: Value,
}

/// A named, stateless check.
///
/// `check` runs once per lint pass against the whole repository when the
/// rule is enabled in the base config. `check_modules` receives only the
/// modules that have the rule enabled.
pub trait Rule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn examples(&self) -> Vec<RuleExample> {
        Vec::new()
    }

    /// Normalize a raw setting into this rule's options.
    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions>;

    fn check(&self, _ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        Ok(Vec::new())
    }

    fn check_modules(
        &self,
        _modules: &[&Module],
        _ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        Ok(Vec::new())
    }
}

/// Typed options of an enabled rule.
#[derive(Debug, Clone)]
pub enum RuleOptions {
    /// The rule takes no options.
    Flag,
    PackageJsonSameName(packagejson_same_name::PackageJsonOptions),
    NameRegex(Regex),
    RequiredFiles(Vec<String>),
    FolderStructure(module_folder_structure::FolderStructureOptions),
    ParentFolder(Vec<String>),
    GhWorkflowPrefix(gh_workflow_module_prefix::WorkflowPrefixOptions),
    SameContents(module_same_contents::SameContentsOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixType {
    /// The fix was written to disk.
    Fixed,
    /// A fix is available but was not requested.
    Possible,
    /// A fix was attempted and failed.
    NotPossible,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixResult {
    #[serde(rename = "type")]
    pub kind: FixType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FixResult {
    pub fn new(kind: FixType) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: FixType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }
}

/// Lightweight pointer to the module a result is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRef {
    pub name: String,
    pub path: PathBuf,
}

/// One pass/fail determination for one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub resource: String,
    pub valid: bool,
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_result: Option<FixResult>,
}

impl RuleResult {
    pub fn valid(rule: &str, resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, resource, true, message)
    }

    pub fn invalid(rule: &str, resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, resource, false, message)
    }

    fn new(
        rule: &str,
        resource: impl Into<String>,
        valid: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            valid,
            rule: rule.to_string(),
            message: Some(message.into()),
            module: None,
            fix_result: None,
        }
    }

    pub fn for_module(mut self, module: &Module) -> Self {
        self.module = Some(module.reference());
        self
    }

    pub fn with_fix(mut self, fix: FixResult) -> Self {
        self.fix_result = Some(fix);
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.fix_result
            .as_ref()
            .is_some_and(|f| f.kind == FixType::Fixed)
    }

    pub fn is_fixable(&self) -> bool {
        self.fix_result
            .as_ref()
            .is_some_and(|f| f.kind == FixType::Possible)
    }
}

/// Display form of a path used as a result resource.
pub fn resource(path: &Path) -> String {
    path.display().to_string()
}

pub(crate) fn invalid_config(rule: &str, message: impl fmt::Display) -> MonolintError {
    MonolintError::InvalidRuleConfig {
        rule: rule.to_string(),
        message: message.to_string(),
    }
}

/// Deserialize a structured setting into a rule's options type.
pub(crate) fn structured<T: DeserializeOwned>(rule: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| invalid_config(rule, e))
}

/// Options for rules that are only switched on or off.
pub(crate) fn flag_options(rule: &str, setting: &RuleSetting) -> Result<RuleOptions> {
    match setting {
        RuleSetting::Disabled | RuleSetting::Enabled => Ok(RuleOptions::Flag),
        other => Err(invalid_config(
            rule,
            format!("expected true or false, found {}", other.to_value()),
        )),
    }
}

/// Overwrite `path` with fixed contents, reporting how it went.
pub(crate) fn write_fix(path: &Path, contents: &str, description: &str) -> FixResult {
    match std::fs::write(path, contents) {
        Ok(()) => {
            tracing::info!("Fixed {}: {description}", path.display());
            FixResult::with_message(FixType::Fixed, description)
        }
        Err(e) => {
            tracing::warn!("Could not write fix to {}: {e}", path.display());
            FixResult::with_message(
                FixType::NotPossible,
                format!("Couldn't write {}: {e}", path.display()),
            )
        }
    }
}
