//! Monorepo convention linter.
//!
//! Modules are directories holding a marker file such as `package.json`.
//! Each module gets a configuration layered from the `.monolint.json` files
//! between the repository root and the module, and every enabled rule is
//! checked against it.

pub mod cli;
pub mod config;
pub mod content;
pub mod errors;
pub mod lint;
pub mod modules;
pub mod output;
pub mod rules;
pub mod walk;

pub use errors::{MonolintError, Result};
pub use lint::{lint, run_passes, LintReport};
pub use rules::registry::RuleRegistry;
pub use rules::{FixResult, FixType, RuleResult};
