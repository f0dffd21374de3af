//! Integration tests for `provgen sites` and `provgen tree`.

use predicates::prelude::*;
use serde_json::Value;

use super::{app_model, model_dir, provgen};
use provgen::test_utils::ModelFixture;

#[test]
fn test_sites_qualified_json() {
    let (temp, model) = app_model();

    let output = provgen(&temp)
        .arg("sites")
        .arg(&model)
        .args(["--qualified", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let sites = report[0]["sites"].as_array().unwrap();
    assert_eq!(report[0]["component"], ModelFixture::APP_COMPONENT);
    assert!(sites.iter().all(|s| !s["qualifier"].is_null()));

    let region = sites.iter().find(|s| s["kind"] == "module-static-provides-parameter").unwrap();
    assert_eq!(region["style"], "OPTIONAL");
    assert_eq!(region["provided_type"], "java.lang.String");
    assert_eq!(region["nullable"], true);
}

#[test]
fn test_sites_text() {
    let (temp, model) = app_model();

    provgen(&temp)
        .arg("sites")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("field com.acme.Service.appName"))
        .stdout(predicate::str::contains("@SystemProperty(\"app.name\", default=\"demo\")"));
}

#[test]
fn test_tree() {
    let (temp, model) = app_model();

    provgen(&temp)
        .arg("tree")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("com.acme.AppComponent [component]"))
        .stdout(predicate::str::contains("com.acme.DbModule [module]"))
        .stdout(predicate::str::contains("com.acme.Service"));
}

#[test]
fn test_tree_marks_cycles() {
    let (temp, model) = model_dir(
        r#"
[[types]]
name = "app.App"
kind = "component"

[[types.methods]]
name = "a"
returns = "app.A"

[[types]]
name = "app.A"

[[types.fields]]
name = "b"
type = "app.B"
inject = true

[[types]]
name = "app.B"

[[types.fields]]
name = "a"
type = "javax.inject.Provider<app.A>"
inject = true
"#,
    );

    provgen(&temp)
        .arg("tree")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("(circular reference)"))
        .stdout(predicate::str::contains("(graph contains cycles)"));
}

#[test]
fn test_tree_not_a_component() {
    let (temp, model) = app_model();

    provgen(&temp)
        .arg("tree")
        .arg(&model)
        .args(["--component", "com.acme.Service"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No component matches"));
}
