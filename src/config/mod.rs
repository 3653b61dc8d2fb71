pub mod ignore;
pub mod merge;
pub mod presets;
pub mod resolve;
pub mod show;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default name of the per-directory configuration file.
pub const DEFAULT_CONFIG_FILE: &str = ".monolint.json";

/// Linting options attached to one directory level, as read from
/// `.monolint.json` or produced by merging levels together.
///
/// Every field is optional so that a child level can tell "not set" apart
/// from "set to the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(
        default,
        alias = "moduleMarkers",
        skip_serializing_if = "Option::is_none"
    )]
    pub module_markers: Option<Vec<String>>,

    #[serde(
        default,
        alias = "useGitignore",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_gitignore: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, RuleSetting>>,
}

impl Config {
    /// Marker file names, empty when none are configured.
    pub fn markers(&self) -> &[String] {
        self.module_markers.as_deref().unwrap_or_default()
    }

    pub fn use_gitignore(&self) -> bool {
        self.use_gitignore.unwrap_or(false)
    }

    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.as_ref().and_then(|r| r.get(name))
    }

    pub fn rule_enabled(&self, name: &str) -> bool {
        self.rule(name).is_some_and(RuleSetting::is_enabled)
    }
}

/// How a single rule is configured.
///
/// Raw JSON is normalized into one of these shapes when a config file is
/// read, so rule code never inspects JSON types to find out whether it is
/// on, off, or carrying options.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    Disabled,
    Enabled,
    /// A single string, e.g. a regex.
    Shorthand(String),
    /// An object or array with rule-specific options.
    Structured(Value),
}

impl RuleSetting {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RuleSetting::Disabled)
    }

    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null | Value::Bool(false) => Ok(RuleSetting::Disabled),
            Value::Bool(true) => Ok(RuleSetting::Enabled),
            Value::String(s) => Ok(RuleSetting::Shorthand(s)),
            v @ (Value::Object(_) | Value::Array(_)) => Ok(RuleSetting::Structured(v)),
            Value::Number(n) => Err(format!(
                "expected a boolean, string, object or array rule configuration, found {n}"
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RuleSetting::Disabled => Value::Bool(false),
            RuleSetting::Enabled => Value::Bool(true),
            RuleSetting::Shorthand(s) => Value::String(s.clone()),
            RuleSetting::Structured(v) => v.clone(),
        }
    }
}

impl From<bool> for RuleSetting {
    fn from(enabled: bool) -> Self {
        if enabled {
            RuleSetting::Enabled
        } else {
            RuleSetting::Disabled
        }
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RuleSetting::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Merge a child level on top of its parent.
///
/// - `rules` are merged shallowly, child entries replace parent entries.
/// - `module-markers` are concatenated (duplicates kept).
/// - other fields take the child's value when it sets one.
/// - `extends` is always cleared so it is never expanded twice.
pub fn merge_configs(parent: &Config, child: &Config) -> Config {
    let mut markers = parent.module_markers.clone().unwrap_or_default();
    if let Some(child_markers) = &child.module_markers {
        markers.extend(child_markers.iter().cloned());
    }

    let mut rules = parent.rules.clone().unwrap_or_default();
    if let Some(child_rules) = &child.rules {
        for (name, setting) in child_rules {
            rules.insert(name.clone(), setting.clone());
        }
    }

    Config {
        module_markers: Some(markers),
        use_gitignore: child.use_gitignore.or(parent.use_gitignore),
        extends: None,
        rules: Some(rules),
    }
}
