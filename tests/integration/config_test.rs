use crate::write;
use monolint::config::resolve::resolve_with_sources;
use monolint::config::show::render_show;
use monolint::config::RuleSetting;
use monolint::{MonolintError, RuleRegistry};

#[test]
fn layered_resolution_with_presets() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    write(
        root,
        ".monolint.json",
        r#"{"extends": ["monolint:packagejson"], "rules": {"module-required-files": ["README.md"]}}"#,
    );
    write(
        root,
        "apps/.monolint.json",
        r#"{"extends": ["monolint:basic"], "rules": {"module-name-regex": "[a-z]+"}}"#,
    );
    std::fs::create_dir_all(root.join("apps/web")).unwrap();

    let resolution = resolve_with_sources(
        &root.join("apps/web"),
        root,
        ".monolint.json",
        &RuleRegistry::builtin(),
    )
    .unwrap();

    assert_eq!(resolution.loaded_files.len(), 2);
    assert_eq!(
        resolution.presets,
        vec!["monolint:packagejson".to_string(), "monolint:basic".to_string()]
    );
    let config = &resolution.config;
    assert_eq!(config.markers().to_vec(), vec!["package.json".to_string()]);
    assert!(config.use_gitignore());
    assert_eq!(
        config.rule("module-name-regex"),
        Some(&RuleSetting::Shorthand("[a-z]+".to_string()))
    );
    assert!(config.rule_enabled("packagejson-same-name"));
    assert!(config.rule_enabled("module-required-files"));
    assert!(!config.rule_enabled("serverless-same-name"));
    assert!(config.extends.is_none());

    let mut out = Vec::new();
    render_show(&mut out, &resolution).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Extensions: monolint:packagejson, monolint:basic"));
}

#[test]
fn unknown_extension_names_its_file() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), ".monolint.json", r#"{"extends": ["monolint:nope"]}"#);
    let err = resolve_with_sources(
        tmp.path(),
        tmp.path(),
        ".monolint.json",
        &RuleRegistry::builtin(),
    )
    .unwrap_err();
    match err {
        MonolintError::UnknownPreset {
            name,
            referenced_from,
        } => {
            assert_eq!(name, "monolint:nope");
            assert!(referenced_from.ends_with(".monolint.json"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn path_outside_root_rejected() {
    let root = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let err = resolve_with_sources(
        other.path(),
        root.path(),
        ".monolint.json",
        &RuleRegistry::builtin(),
    )
    .unwrap_err();
    assert!(matches!(err, MonolintError::OutsideRoot { .. }));
}
