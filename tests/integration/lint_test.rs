use crate::write;
use monolint::{lint, run_passes, RuleRegistry, RuleResult};
use pretty_assertions::assert_eq;
use std::path::Path;

const CONFIG: &str = ".monolint.json";

fn of_rule<'a>(results: &'a [RuleResult], rule: &str) -> Vec<&'a RuleResult> {
    results.iter().filter(|r| r.rule == rule).collect()
}

fn wrong_names(root: &Path) {
    write(root, CONFIG, r#"{"module-markers": ["package.json"]}"#);
    write(root, "mod-alpha/package.json", r#"{"name": "something"}"#);
    write(root, "mod-beta/package.json", r#"{"name": "else"}"#);
}

#[test]
fn wrong_package_names_reported() {
    let tmp = tempfile::tempdir().unwrap();
    wrong_names(tmp.path());

    let results = lint(tmp.path(), CONFIG, false, &RuleRegistry::builtin()).unwrap();
    let names = of_rule(&results, "packagejson-same-name");
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|r| !r.valid));
    assert_eq!(
        names[0].resource,
        tmp.path().join("mod-alpha/package.json").display().to_string()
    );
    assert_eq!(
        names[0].message.as_deref(),
        Some("Attribute 'name' should be 'mod-alpha'")
    );
    assert_eq!(
        names[1].message.as_deref(),
        Some("Attribute 'name' should be 'mod-beta'")
    );
}

#[test]
fn name_with_scope_is_valid() {
    let tmp = tempfile::tempdir().unwrap();
    wrong_names(tmp.path());
    write(tmp.path(), "mod-beta/package.json", r#"{"name": "@org/mod-beta"}"#);

    let results = lint(tmp.path(), CONFIG, false, &RuleRegistry::builtin()).unwrap();
    let names = of_rule(&results, "packagejson-same-name");
    assert!(!names[0].valid);
    assert!(names[1].valid);
    assert_eq!(names[1].message.as_deref(), Some("\"name\" is valid"));
}

#[test]
fn fix_then_clean() {
    let tmp = tempfile::tempdir().unwrap();
    wrong_names(tmp.path());
    let registry = RuleRegistry::builtin();

    let report = run_passes(tmp.path(), CONFIG, true, &registry).unwrap();
    let names = of_rule(&report.results, "packagejson-same-name");
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|r| r.is_fixed()));

    let content = std::fs::read_to_string(tmp.path().join("mod-alpha/package.json")).unwrap();
    assert_eq!(content, "{\n  \"name\": \"mod-alpha\"\n}");

    let after = lint(tmp.path(), CONFIG, false, &registry).unwrap();
    assert!(of_rule(&after, "packagejson-same-name")
        .iter()
        .all(|r| r.valid));
}

#[test]
fn reference_module_with_most_files() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        CONFIG,
        r#"{"extends": [], "module-markers": ["package.json"], "rules": {"module-same-contents": true}}"#,
    );
    let tsconfig = r#"{"compilerOptions": {"strict": true}}"#;
    write(root, "modA/package.json", r#"{"private": true}"#);
    write(root, "modA/tsconfig.json", tsconfig);
    write(root, "modB/package.json", r#"{"private": true}"#);
    write(root, "modB/tsconfig.json", tsconfig);
    write(root, "modB/LICENSE", "MIT");

    let results = lint(root, CONFIG, false, &RuleRegistry::builtin()).unwrap();
    let summary: Vec<(String, bool, String)> = results
        .iter()
        .map(|r| {
            (
                r.resource.clone(),
                r.valid,
                r.message.clone().unwrap_or_default(),
            )
        })
        .collect();
    let res = |p: &str| root.join(p).display().to_string();
    assert_eq!(
        summary,
        vec![
            (
                res("modA/tsconfig.json"),
                true,
                "Content is similar to 'modB' (100%)".to_string()
            ),
            (res("modB/LICENSE"), true, "Reference file".to_string()),
            (res("modB/tsconfig.json"), true, "Reference file".to_string()),
        ]
    );
}

#[test]
fn nested_modules_collapse_to_leaf() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        CONFIG,
        r#"{"extends": [], "module-markers": ["package.json"], "rules": {"module-required-files": true}}"#,
    );
    write(root, "group/package.json", "{}");
    write(root, "group/inner/package.json", "{}");
    write(root, "group/inner/README.md", "# inner");

    let results = lint(root, CONFIG, false, &RuleRegistry::builtin()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].valid);
    assert!(results[0].resource.ends_with("inner/README.md"));
}

#[test]
fn child_config_disables_rule() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        CONFIG,
        r#"{"extends": [], "module-markers": ["package.json"], "rules": {"module-required-files": true}}"#,
    );
    write(root, "svc-one/package.json", "{}");
    write(root, "svc-two/package.json", "{}");
    write(root, "svc-two/.monolint.json", r#"{"rules": {"module-required-files": false}}"#);

    let results = lint(root, CONFIG, false, &RuleRegistry::builtin()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].resource.contains("svc-one"));
}

#[test]
fn ignored_modules_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        CONFIG,
        r#"{"extends": [], "module-markers": ["package.json"], "rules": {"module-required-files": true}}"#,
    );
    write(root, ".monolintignore", "# generated\nvendor\n");
    write(root, "app-one/package.json", "{}");
    write(root, "vendor/thing/package.json", "{}");

    let results = lint(root, CONFIG, false, &RuleRegistry::builtin()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].resource.contains("app-one"));
}

#[test]
fn repeated_runs_are_identical() {
    let tmp = tempfile::tempdir().unwrap();
    wrong_names(tmp.path());
    write(tmp.path(), "mod-alpha/LICENSE", "MIT");
    write(tmp.path(), "mod-beta/LICENSE", "MIT License");
    let registry = RuleRegistry::builtin();

    let first = lint(tmp.path(), CONFIG, false, &registry).unwrap();
    let second = lint(tmp.path(), CONFIG, false, &registry).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_rule_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), CONFIG, r#"{"rules": {"no-such-rule": true}}"#);
    let err = lint(tmp.path(), CONFIG, false, &RuleRegistry::builtin()).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("no-such-rule"));
}
