//! Integration tests for `provgen expand` and configuration loading.

use predicates::prelude::*;
use provgen::test_utils::write_fixture;

use super::{app_model, provgen};

#[test]
fn test_expand_env_and_default() {
    let (temp, _) = app_model();

    provgen(&temp)
        .args(["expand", "db.${env.PROVGEN_IT_STAGE:-dev}.${env.PROVGEN_IT_UNSET:-local}"])
        .env("PROVGEN_IT_STAGE", "prod")
        .env_remove("PROVGEN_IT_UNSET")
        .assert()
        .success()
        .stdout("db.prod.local\n");
}

#[test]
fn test_expand_sys_from_local_config() {
    let (temp, _) = app_model();
    write_fixture(temp.path(), "provgen.toml", "[system_properties]\n\"app.stage\" = \"qa\"\n");

    provgen(&temp).args(["expand", "${sys.app.stage}/url"]).assert().success().stdout("qa/url\n");
}

#[test]
fn test_expand_config_from_env_var() {
    let (temp, _) = app_model();
    let config =
        write_fixture(temp.path(), "conf/custom.toml", "[system_properties]\nregion = \"eu\"\n");

    provgen(&temp)
        .args(["expand", "${sys.region}"])
        .env("PROVGEN_CONFIG", &config)
        .assert()
        .success()
        .stdout("eu\n");
}

#[test]
fn test_expand_unresolved() {
    let (temp, _) = app_model();

    provgen(&temp)
        .args(["expand", "${sys.missing}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot resolve variable 'sys.missing'"));
}

#[test]
fn test_expand_syntax_error() {
    let (temp, _) = app_model();

    provgen(&temp)
        .args(["expand", "db.${env.X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid name template 'db.${env.X'"));
}

#[test]
fn test_invalid_config_rejected() {
    let (temp, model) = app_model();
    let config = write_fixture(temp.path(), "bad.toml", "unknown_key = 1\n");

    provgen(&temp)
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_configured_domain() {
    let (temp, _) = app_model();
    write_fixture(
        temp.path(),
        "provgen.toml",
        r#"
[[domains]]
name = "props"
qualifier = "SystemProperty"
prefix = "Props"
"#,
    );

    provgen(&temp)
        .args(["generate", "model.toml", "--domain", "props"])
        .assert()
        .success()
        .stdout(predicate::str::contains("provideProps"));
}
