use crate::config::Config;
use crate::rules::{
    gh_workflow_module_prefix::GhWorkflowModulePrefix,
    module_folder_structure::ModuleFolderStructure, module_name_regex::ModuleNameRegex,
    module_parent_folder::ModuleParentFolder, module_required_files::ModuleRequiredFiles,
    module_same_contents::ModuleSameContents, module_unique_name::ModuleUniqueName,
    packagejson_same_name::PackageJsonSameName, serverless_same_name::ServerlessSameName, Rule,
};
use std::sync::Arc;

/// Read-only set of registered rules.
///
/// Built once through [`RegistryBuilder`]; there is no way to add rules to
/// a finished registry.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    rules: Vec<Arc<dyn Rule>>,
}

impl RegistryBuilder {
    /// Add a rule. A rule with the same name replaces the earlier one.
    pub fn register<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.retain(|r| r.name() != rule.name());
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry { rules: self.rules }
    }
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with every built-in rule.
    pub fn builtin() -> Self {
        Self::builder()
            .register(PackageJsonSameName)
            .register(ServerlessSameName)
            .register(ModuleNameRegex)
            .register(ModuleUniqueName)
            .register(ModuleRequiredFiles)
            .register(ModuleFolderStructure)
            .register(ModuleParentFolder)
            .register(GhWorkflowModulePrefix)
            .register(ModuleSameContents)
            .build()
    }

    pub fn all_rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn get_rule(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Rules switched on in `config`, in registration order.
    pub fn enabled_rules(&self, config: &Config) -> Vec<&Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| config.rule_enabled(r.name()))
            .collect()
    }
}
