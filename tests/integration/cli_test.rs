use crate::write;
use assert_cmd::Command;
use predicates::prelude::*;

fn monolint() -> Command {
    Command::cargo_bin("monolint").unwrap()
}

fn repo(names: &[(&str, &str)]) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        ".monolint.json",
        r#"{"extends": [], "module-markers": ["package.json"], "rules": {"packagejson-same-name": true}}"#,
    );
    for (dir, name) in names {
        write(
            tmp.path(),
            &format!("{dir}/package.json"),
            &format!("{{\"name\": \"{name}\"}}"),
        );
    }
    tmp
}

#[test]
fn exit_code_0_when_clean() {
    let tmp = repo(&[("svc-one", "svc-one")]);
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("0 problems found"));
}

#[test]
fn exit_code_2_on_violations() {
    let tmp = repo(&[("svc-one", "wrong")]);
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Attribute 'name' should be 'svc-one'"))
        .stdout(predicate::str::contains("1 problems found (1 fixable)"));
}

#[test]
fn fix_flag_rewrites_files() {
    let tmp = repo(&[("svc-one", "wrong")]);
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("--fix")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("(1 fixed)"));
    let content = std::fs::read_to_string(tmp.path().join("svc-one/package.json")).unwrap();
    assert!(content.contains("\"svc-one\""));
}

#[test]
fn filter_limits_results() {
    let tmp = repo(&[("svc-one", "wrong"), ("svc-two", "svc-two")]);
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .args(["--filter", "svc-two", "--verbose"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("svc-one").not());
}

#[test]
fn json_output() {
    let tmp = repo(&[("svc-one", "wrong")]);
    let output = monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["rule"], "packagejson-same-name");
    assert_eq!(value[0]["valid"], false);
}

#[test]
fn exit_code_1_on_bad_base_dir() {
    monolint()
        .args(["--base-dir", "/nonexistent/monorepo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn exit_code_1_on_bad_config() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), ".monolint.json", "{ not json");
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config show"));
}

#[test]
fn rules_subcommand_lists_rules() {
    monolint()
        .arg("rules")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("module-same-contents"))
        .stdout(predicate::str::contains("gh-workflow-module-prefix"));
}

#[test]
fn config_show_prints_resolution() {
    let tmp = repo(&[("svc-one", "svc-one")]);
    write(tmp.path(), "svc-one/.monolint.json", r#"{"extends": ["monolint:basic"]}"#);
    monolint()
        .arg("--base-dir")
        .arg(tmp.path())
        .arg("config")
        .arg("show")
        .arg("--path")
        .arg(tmp.path().join("svc-one"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("monolint:basic"))
        .stdout(predicate::str::contains("\"module-name-regex\": true"));
}
