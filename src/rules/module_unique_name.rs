use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{flag_options, resource, LintContext, Rule, RuleExample, RuleOptions, RuleResult};
use serde_json::json;
use std::collections::HashMap;

const NAME: &str = "module-unique-name";

/// No two modules may share a directory name.
#[derive(Debug, Clone, Copy)]
pub struct ModuleUniqueName;

impl Rule for ModuleUniqueName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check that module names are unique across the whole monorepo, regardless of the folder they are in"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![RuleExample {
            description: "Disable this rule",
            config: json!(false),
        }]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        flag_options(NAME, setting)
    }

    fn check_modules(
        &self,
        modules: &[&Module],
        _ctx: &LintContext<'_>,
    ) -> Result<Vec<RuleResult>> {
        let mut by_name: HashMap<&str, Vec<&Module>> = HashMap::new();
        for module in modules {
            by_name.entry(module.name.as_str()).or_default().push(module);
        }

        let results = modules
            .iter()
            .map(|module| {
                let other = by_name
                    .get(module.name.as_str())
                    .and_then(|same| same.iter().find(|m| m.path != module.path));
                let result = match other {
                    Some(other) => RuleResult::invalid(
                        NAME,
                        resource(&module.path),
                        format!("Module has the same name as '{}'", other.path.display()),
                    ),
                    None => {
                        RuleResult::valid(NAME, resource(&module.path), "Module name is unique")
                    }
                };
                result.for_module(module)
            })
            .collect();
        Ok(results)
    }
}
