use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, structured, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use serde_json::json;

const NAME: &str = "module-required-files";

fn default_files() -> Vec<String> {
    vec!["README.md".to_string()]
}

/// Every module must contain the listed files.
#[derive(Debug, Clone, Copy)]
pub struct ModuleRequiredFiles;

impl Rule for ModuleRequiredFiles {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if all the required files are present in the module folder"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Require README.md in every module",
                config: json!(true),
            },
            RuleExample {
                description: "Require a custom list of files",
                config: json!(["README.md", "Makefile", "package.json"]),
            },
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let files = match setting {
            RuleSetting::Disabled | RuleSetting::Enabled => default_files(),
            RuleSetting::Shorthand(file) => vec![file.clone()],
            RuleSetting::Structured(value) => structured::<Vec<String>>(NAME, value)?,
        };
        if files.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid_config(NAME, "file names must not be empty"));
        }
        Ok(RuleOptions::RequiredFiles(files))
    }

    fn check_modules(
        &self,
        modules: &[&Module],
        _ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let Some(RuleOptions::RequiredFiles(files)) = module.options(NAME) else {
                continue;
            };
            for file in files {
                let path = module.path.join(file);
                let result = if path.exists() {
                    RuleResult::valid(NAME, resource(&path), "Required file found")
                } else {
                    RuleResult::invalid(NAME, resource(&path), "Required file not found")
                };
                results.push(result.for_module(module));
            }
        }
        Ok(results)
    }
}
