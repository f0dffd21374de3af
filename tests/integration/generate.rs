//! Integration tests for `provgen generate`.

use predicates::prelude::*;
use provgen::test_utils::{ModelFixture, write_fixture};
use serde_json::Value;

use super::{app_model, model_dir, provgen};

#[test]
fn test_generate_text() {
    let (temp, model) = app_model();

    provgen(&temp)
        .args(["generate"])
        .arg(&model)
        .args(["--domain", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.acme.AppComponent"))
        .stdout(predicate::str::contains("provideEnvDatabaseUrl"))
        .stdout(predicate::str::contains("Integer.parseInt(value)"))
        .stdout(predicate::str::contains("7 provider(s), 1 warning(s), 0 error(s)"))
        .stderr(predicate::str::contains("effectively required"));
}

#[test]
fn test_generate_json_all_domains() {
    let (temp, model) = app_model();

    let output = provgen(&temp)
        .arg("generate")
        .arg(&model)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let passes = report["passes"].as_array().unwrap();
    let domains: Vec<&str> = passes.iter().map(|p| p["domain"].as_str().unwrap()).collect();
    assert_eq!(domains, vec!["env", "sys", "ssm", "cli"]);

    let providers: u64 = passes.iter().map(|p| p["summary"]["providers"].as_u64().unwrap()).sum();
    assert_eq!(providers, 7 + 4 + 2);

    let diagnostics = report["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["severity"], "warning");
}

#[test]
fn test_generate_component_filter() {
    let (temp, model) = app_model();

    provgen(&temp)
        .arg("generate")
        .arg(&model)
        .args(["--component", "com.other.*"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No component matches"));
}

#[test]
fn test_generate_unknown_domain() {
    let (temp, model) = app_model();

    provgen(&temp)
        .arg("generate")
        .arg(&model)
        .args(["--domain", "vault"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown domain 'vault'"));
}

#[test]
fn test_structural_error_fails_run_but_reports_other_roots() {
    let (temp, _) = app_model();
    write_fixture(temp.path(), "models/app.toml", ModelFixture::APP);
    // The module is declared by app.toml; only the misspelled reference remains.
    let broken = ModelFixture::BROKEN
        .replace("[[types]]\nname = \"com.acme.DbModule\"\nkind = \"module\"\n", "");
    write_fixture(temp.path(), "models/broken.toml", &broken);

    provgen(&temp)
        .args(["generate", "models", "--domain", "env"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("provideEnvDatabaseUrl"))
        .stderr(predicate::str::contains("com.acme.DbModul"))
        .stderr(predicate::str::contains("Generation reported 1 error(s)"));
}

#[test]
fn test_conversion_failure_is_reported() {
    let (temp, model) = model_dir(
        r#"
[[types]]
name = "app.App"
kind = "component"

[[types.methods]]
name = "anything"
returns = "java.lang.Object"
annotations = [{ type = "EnvironmentVariable", qualifier = true, name = "ANY" }]
"#,
    );

    provgen(&temp)
        .arg("generate")
        .arg(&model)
        .args(["--domain", "env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot convert java.lang.String to java.lang.Object for parameter 'ANY'",
        ));
}

#[test]
fn test_missing_model() {
    let (temp, _) = app_model();

    provgen(&temp)
        .args(["generate", "nowhere.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
