//! Library-level pipeline tests over the app fixture.

use provgen::core::ProvgenError;
use provgen::diagnostics::{Diagnostics, Severity};
use provgen::domain::Domain;
use provgen::generator::{CollectingSink, Generator, ProviderSpec};
use provgen::sites::{SiteKind, collect_sites};
use provgen::test_utils::{ModelFixture, init_test_logging};
use std::collections::HashSet;

fn domain(name: &str) -> Domain {
    Domain::builtins().into_iter().find(|d| d.name == name).unwrap()
}

fn run(name: &str) -> (Vec<ProviderSpec>, Diagnostics) {
    init_test_logging(None);
    let model = ModelFixture::app_model();
    let mut sink = CollectingSink::default();
    let mut diagnostics = Diagnostics::new();
    Generator::new(&model)
        .run(ModelFixture::APP_COMPONENT, &domain(name), &mut sink, &mut diagnostics)
        .unwrap();
    (sink.into_specs(), diagnostics)
}

fn find<'a>(specs: &'a [ProviderSpec], name: &str, provided: &str) -> &'a ProviderSpec {
    specs
        .iter()
        .find(|s| s.name == name && s.provided_type.to_string() == provided)
        .unwrap_or_else(|| panic!("no provider for {name} as {provided}"))
}

#[test]
fn test_sites_are_collected_once() {
    let model = ModelFixture::app_model();
    let sites = collect_sites(&model, ModelFixture::APP_COMPONENT).unwrap();

    let elements: Vec<&str> = sites.iter().map(|s| s.element.as_str()).collect();
    let unique: HashSet<&str> = elements.iter().copied().collect();
    assert_eq!(elements.len(), unique.len(), "{elements:#?}");

    let kinds: HashSet<SiteKind> = sites.iter().map(|s| s.kind).collect();
    assert!(kinds.contains(&SiteKind::ComponentProvisionResult));
    assert!(kinds.contains(&SiteKind::ModuleInstanceProvidesParameter));
    assert!(kinds.contains(&SiteKind::ModuleStaticProvidesParameter));
    assert!(kinds.contains(&SiteKind::InjectConstructorParameter));
    assert!(kinds.contains(&SiteKind::InjectMethodParameter));
    assert!(kinds.contains(&SiteKind::InjectField));
}

#[test]
fn test_env_providers() {
    let (specs, diagnostics) = run("env");

    let url = find(&specs, "DATABASE_URL", "java.lang.String");
    assert!(url.required);
    assert!(!url.nullable);
    assert_eq!(url.method_name, "provideEnvDatabaseUrl");
    assert_eq!(url.sites.len(), 2);

    let port = find(&specs, "PORT", "int");
    assert_eq!(port.default_value.as_deref(), Some("8080"));
    assert_eq!(port.expression, "Integer.parseInt(value)");
    assert!(!port.required);

    let mode = find(&specs, "MODE", "com.acme.Mode");
    assert_eq!(mode.expression, "com.acme.Mode.valueOf(value)");

    // Every non-string representation gets a string sibling.
    for name in ["PORT", "POOL_SIZE", "MODE"] {
        let string = find(&specs, name, "java.lang.String");
        assert!(string.sites.is_empty());
        assert!(!string.nullable);
    }
    assert_eq!(specs.len(), 7);
    assert!(specs.iter().all(|s| s.domain == "env"));

    // The nullable constructor parameter is overridden by the module's demand.
    let warnings: Vec<_> = diagnostics.warnings().collect();
    assert!(warnings.iter().any(|w| w.message.contains("'DATABASE_URL' is effectively required")));
    assert!(!diagnostics.has_errors());
}

#[test]
fn test_sys_providers() {
    let (specs, diagnostics) = run("sys");

    let region = find(&specs, "aws.region", "java.lang.String");
    assert!(region.nullable);
    assert!(!region.required);

    let name = find(&specs, "app.name", "java.lang.String");
    assert_eq!(name.default_value.as_deref(), Some("demo"));
    assert!(name.method_name.starts_with("provideSysAppNameWithDefault"));

    let timeout = find(&specs, "app.timeout", "java.lang.Long");
    assert!(timeout.required);
    assert_eq!(timeout.expression, "java.lang.Long.valueOf(value)");
    assert_eq!(diagnostics.count(Severity::Error), 0);
}

#[test]
fn test_cli_lists() {
    let (specs, diagnostics) = run("cli");

    let ports = find(&specs, "ports", "java.util.List<java.lang.Integer>");
    assert!(ports.expression.starts_with("value.stream().map(e0 -> "));
    assert!(ports.expression.contains("java.lang.Integer.valueOf(e0)"));
    assert_eq!(ports.source_type.to_string(), "java.util.List<java.lang.String>");

    find(&specs, "ports", "java.util.List<java.lang.String>");
    assert_eq!(specs.len(), 2);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_unrelated_domain_is_empty() {
    let (specs, diagnostics) = run("ssm");
    assert!(specs.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_misspelled_module_is_structural() {
    let model = ModelFixture::model(ModelFixture::BROKEN);
    let err = collect_sites(&model, "com.acme.BrokenComponent").unwrap_err();

    assert!(err.is_structural());
    match err {
        ProvgenError::UnknownType {
            type_name,
            suggestion,
            ..
        } => {
            assert_eq!(type_name, "com.acme.DbModul");
            assert_eq!(suggestion.as_deref(), Some("com.acme.DbModule"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
