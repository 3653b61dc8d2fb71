use crate::config::RuleSetting;
use crate::errors::Result;
use crate::modules::Module;
use crate::rules::{
    invalid_config, resource, structured, write_fix, FixResult, FixType, LintContext, Rule,
    RuleExample, RuleOptions, RuleResult,
};
use serde::Deserialize;
use serde_json::{json, Value};

const NAME: &str = "packagejson-same-name";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageJsonOptions {
    #[serde(default = "default_file", alias = "packageJsonFile")]
    pub package_json_file: String,
}

fn default_file() -> String {
    "package.json".to_string()
}

impl Default for PackageJsonOptions {
    fn default() -> Self {
        Self {
            package_json_file: default_file(),
        }
    }
}

/// `name` in package.json must end with the module name.
#[derive(Debug, Clone, Copy)]
pub struct PackageJsonSameName;

impl Rule for PackageJsonSameName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Check if \"name\" attribute of the package.json file equals (or ends with) the name of the module"
    }

    fn examples(&self) -> Vec<RuleExample> {
        vec![
            RuleExample {
                description: "Deactivates this rule",
                config: json!(false),
            },
            RuleExample {
                description: "Check a different file",
                config: json!({"package-json-file": "package-lock.json"}),
            },
        ]
    }

    fn options(&self, setting: &RuleSetting) -> Result<RuleOptions> {
        let options = match setting {
            RuleSetting::Disabled | RuleSetting::Enabled => PackageJsonOptions::default(),
            RuleSetting::Structured(value) => structured(NAME, value)?,
            RuleSetting::Shorthand(s) => {
                return Err(invalid_config(NAME, format!("unexpected string '{s}'")))
            }
        };
        Ok(RuleOptions::PackageJsonSameName(options))
    }

    fn check_modules(&self, modules: &[&Module], ctx: &LintContext<'_>) -> Result<Vec<RuleResult>> {
        let mut results = Vec::new();
        for module in modules {
            let Some(RuleOptions::PackageJsonSameName(options)) = module.options(NAME) else {
                continue;
            };
            let file = module.path.join(&options.package_json_file);
            if !file.is_file() {
                continue;
            }
            tracing::debug!("Checking {}", file.display());

            let parsed = std::fs::read_to_string(&file)
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<Value>(&c).map_err(|e| e.to_string()));
            let mut package = match parsed {
                Ok(p) => p,
                Err(e) => {
                    results.push(
                        RuleResult::invalid(
                            NAME,
                            resource(&file),
                            format!("Couldn't load json file: {e}"),
                        )
                        .for_module(module),
                    );
                    continue;
                }
            };

            let name = package.get("name").and_then(Value::as_str).unwrap_or_default();
            if name.ends_with(&module.name) {
                let valid = RuleResult::valid(NAME, resource(&file), "\"name\" is valid");
                results.push(valid.for_module(module));
                continue;
            }

            let message = format!("Attribute 'name' should be '{}'", module.name);
            if !ctx.fix {
                results.push(
                    RuleResult::invalid(NAME, resource(&file), message)
                        .for_module(module)
                        .with_fix(FixResult::new(FixType::Possible)),
                );
                continue;
            }

            let Some(obj) = package.as_object_mut() else {
                results.push(
                    RuleResult::invalid(NAME, resource(&file), message)
                        .for_module(module)
                        .with_fix(FixResult::with_message(
                            FixType::NotPossible,
                            "package.json is not an object",
                        )),
                );
                continue;
            };
            obj.insert("name".to_string(), Value::String(module.name.clone()));

            let fix = match serde_json::to_string_pretty(&package) {
                Ok(contents) => write_fix(
                    &file,
                    &contents,
                    &format!("Attribute 'name' set to '{}'", module.name),
                ),
                Err(e) => FixResult::with_message(FixType::NotPossible, e.to_string()),
            };
            let valid = fix.kind == FixType::Fixed;
            let result = if valid {
                RuleResult::valid(NAME, resource(&file), message)
            } else {
                RuleResult::invalid(NAME, resource(&file), message)
            };
            results.push(result.for_module(module).with_fix(fix));
        }
        Ok(results)
    }
}
