use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    flag_options, resource, write_fix, FixResult, FixType, LintContext, Rule, RuleExample,
    RuleOptions, RuleResult,
};
use serde_json::json;
use serde_yaml::Value as Yaml;

const NAME: &str = "serverless-same-name";
const SERVERLESS_FILE: &str = "serverless.yml";

/// `service` in serverless.yml must be the module name.
#[derive(Debug, Clone, Copy)]
pub struct ServerlessSameName;

impl Rule for ServerlessSameName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if \"service\" attribute of the serverless.yml file equals the name of the module"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![RuleExample {
            description: "Deactivates this rule",
            config: json!(false),
        }]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        flag_options(NAME, setting)
    }

    fn check_modules(&self, modules: &[&Module], ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let file = module.path.join(SERVERLESS_FILE);
            if !file.is_file() {
                continue;
            }
            tracing::debug!("Checking {}", file.display());

            let parsed = std::fs::read_to_string(&file)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_yaml::from_str::<Yaml>(&c).map_err(|e| e.to_string()));
            let mut doc = match parsed {
                Ok(doc) => doc,
                Err(e) => {
                    results.push(
                        RuleResult::invalid(
                            NAME,
                            resource(&file),
                            format!("Couldn't load yml file: {e}"),
                        )
                        .for_module(module),
                    );
                    continue;
                }
            };

            if doc.get("service").and_then(Yaml::as_str) == Some(module.name.as_str()) {
                results.push(
                    RuleResult::valid(NAME, resource(&file), "\"service\" is valid")
                        .for_module(module),
                );
                continue;
            }

            let message = format!("Attribute 'service' should be '{}'", module.name);
            if !ctx.fix {
                results.push(
                    RuleResult::invalid(NAME, resource(&file), message)
                        .for_module(module)
                        .with_fix(FixResult::new(FixType::Possible)),
                );
                continue;
            }

            let fix = match doc.as_mapping_mut() {
                Some(mapping) => {
                    mapping.insert(
                        Yaml::String("service".to_string()),
                        Yaml::String(module.name.clone()),
                    );
                    match serde_yaml::to_string(&doc) {
                        Ok(contents) => write_fix(
                            &file,
                            &contents,
                            &format!("Attribute 'service' set to '{}'", module.name),
                        ),
                        Err(e) => FixResult::with_message(FixType::NotPossible, e.to_string()),
                    }
                }
                None => FixResult::with_message(
                    FixType::NotPossible,
                    "serverless.yml is not a mapping",
                ),
            };
            let result = if fix.kind == FixType::Fixed {
                RuleResult::valid(NAME, resource(&file), message)
            } else {
                RuleResult::invalid(NAME, resource(&file), message)
            };
            results.push(result.for_module(module).with_fix(fix));
        }
        Ok(results)
    }
}
