use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, LintContext, Rule, RuleExample, RuleOptions, RuleResult,
};
use regex::Regex;
use serde_json::json;

const NAME: &str = "module-name-regex";
const DEFAULT_REGEX: &str = "[a-z]+[a-z0-9-_]{4,12}";

/// Module directory names must match a regex.
#[derive(Debug, Clone, Copy)]
pub struct ModuleNameRegex;

impl Rule for ModuleNameRegex {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if the module name matches a regex"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Activates this rule with default regex \"[a-z]+[a-z0-9-_]{4,12}\"",
                config: json!(true),
            },
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
            RuleExample {
                description: "Module names should be suffixed by \"-svc\" or \"-web\"",
                config: json!(".+(-svc|-web)"),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let pattern = match setting {
            RuleSetting::Disabled | RuleSetting::Enabled => DEFAULT_REGEX,
            RuleSetting::Shorthand(pattern) => pattern.as_str(),
            RuleSetting::Structured(value) => {
                return Err(invalid_config(NAME, format!("Invalid config '{value}'")))
            }
        };
        let regex = Regex::new(pattern).map_err(|e| invalid_config(NAME, e))?;
        Ok(RuleOptions::NameRegex(regex))
    }

    fn check_modules(
        &self,
        modules: &[&Module],
        _ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let Some(RuleOptions::NameRegex(regex)) = module.options(NAME) else {
                continue;
            };
            let result = if regex.is_match(&module.name) {
                RuleResult::valid(NAME, resource(&module.path), "Module name is valid")
            } else {
                RuleResult::invalid(
                    NAME,
                    resource(&module.path),
                    format!("Module name should match regex \"{}\"", regex.as_str()),
                )
            };
            results.push(result.for_module(module));
        }
        Ok(results)
    }
}
