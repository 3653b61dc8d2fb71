use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum MonolintError {
    #[error("Monorepo base dir {path} not found")]
    #[diagnostic(code(monolint::base_dir))]
    BaseDirNotFound { path: PathBuf },

    #[error("Error loading {file}: {message}")]
    #[diagnostic(code(monolint::config_parse))]
    ConfigParse { file: PathBuf, message: String },

    #[error("Rule '{rule}' is not valid (referenced in {file})")]
    #[diagnostic(
        code(monolint::unknown_rule),
        help("run `monolint rules` to list the registered rules")
    )]
    UnknownRule { rule: String, file: PathBuf },

    #[error("'module-markers' is only valid on monorepo root level configuration ({file})")]
    #[diagnostic(code(monolint::markers_below_root))]
    MarkersBelowRoot { file: PathBuf },

    #[error("Cannot find extension '{name}' defined in {referenced_from}")]
    #[diagnostic(code(monolint::unknown_preset))]
    UnknownPreset {
        name: String,
        referenced_from: String,
    },

    #[error("Extension '{name}' extends itself through {chain}")]
    #[diagnostic(code(monolint::preset_cycle))]
    PresetCycle { name: String, chain: String },

    #[error("Config has no rule configurations ({file})")]
    #[diagnostic(code(monolint::missing_rules))]
    MissingRules { file: PathBuf },

    #[error("Invalid configuration for rule '{rule}': {message}")]
    #[diagnostic(code(monolint::rule_config))]
    InvalidRuleConfig { rule: String, message: String },

    #[error("Path {path} is not inside monorepo base dir {root}")]
    #[diagnostic(code(monolint::outside_root))]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Couldn't parse {file}: {message}")]
    #[diagnostic(code(monolint::content_parse))]
    ContentParse { file: PathBuf, message: String },

    #[error("Unsupported file format for structured comparison: {file}")]
    #[diagnostic(
        code(monolint::unsupported_format),
        help("selectors can only be used with .json, .yml, .yaml and Makefile files")
    )]
    UnsupportedFormat { file: PathBuf },

    #[error("Invalid selector '{selector}': {message}")]
    #[diagnostic(code(monolint::selector))]
    InvalidSelector { selector: String, message: String },

    #[error(transparent)]
    #[diagnostic(code(monolint::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(monolint::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(monolint::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    #[diagnostic(code(monolint::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(monolint::regex))]
    Regex(#[from] regex::Error),
}

impl MonolintError {
    /// Whether this error comes from reading or interpreting configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MonolintError::ConfigParse { .. }
                | MonolintError::UnknownRule { .. }
                | MonolintError::MarkersBelowRoot { .. }
                | MonolintError::UnknownPreset { .. }
                | MonolintError::PresetCycle { .. }
                | MonolintError::MissingRules { .. }
                | MonolintError::InvalidRuleConfig { .. }
                | MonolintError::OutsideRoot { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MonolintError>;
