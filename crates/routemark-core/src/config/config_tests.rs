#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn GeneratorConfig___default___has_expected_names() {
    let config = GeneratorConfig::default();

    assert_eq!(config.package_name, "routes");
    assert_eq!(config.runtime_crate, "routemark_runtime");
    assert_eq!(config.runtime_alias, "rt");
    assert_eq!(config.entry_point, "init_routes");
    assert_eq!(config.registry_type, "Registry");
    assert_eq!(config.registration_fn, "register_route_with_meta");
    assert_eq!(config.websocket_registration_fn, "register_websocket_handler");
    assert!(!config.minify);
    assert!(config.validate);
    assert!(!config.strict_responses);
    assert_eq!(config.log_level, "normal");
}

#[test]
fn GeneratorConfig___from_toml_str___empty_is_default() {
    let config = GeneratorConfig::from_toml_str("").unwrap();

    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn GeneratorConfig___from_toml_str___partial_overrides() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        package_name = "api"
        minify = true
        log_level = "verbose"
        "#,
    )
    .unwrap();

    assert_eq!(config.package_name, "api");
    assert!(config.minify);
    assert_eq!(config.log_level, "verbose");
    assert_eq!(config.entry_point, "init_routes");
}

#[test]
fn GeneratorConfig___from_toml_str___invalid_toml_is_config_error() {
    let err = GeneratorConfig::from_toml_str("minify = \"yes\"").unwrap_err();

    assert!(matches!(err, RoutemarkError::Config(_)));
}

#[test]
fn GeneratorConfig___from_toml_str___bad_entry_point_is_rejected() {
    let err = GeneratorConfig::from_toml_str("entry_point = \"init routes\"").unwrap_err();

    assert!(err.to_string().contains("entry_point"));
}

#[test]
fn GeneratorConfig___validate___unknown_log_level_is_rejected() {
    let config = GeneratorConfig::default().with_log_level("loud");

    assert!(matches!(config.validate(), Err(RoutemarkError::Config(_))));
}

#[test]
fn GeneratorConfig___validate___empty_package_name_is_rejected() {
    let config = GeneratorConfig::default().with_package_name("  ");

    assert!(config.validate().is_err());
}

#[test]
fn GeneratorConfig___builders___set_fields() {
    let config = GeneratorConfig::new()
        .with_minify(true)
        .with_validate(false)
        .with_strict_responses(true);

    assert!(config.minify);
    assert!(!config.validate);
    assert!(config.strict_responses);
}

#[test_case("rt", true)]
#[test_case("_private", true)]
#[test_case("init_routes2", true)]
#[test_case("", false ; "empty")]
#[test_case("_", false ; "lone underscore")]
#[test_case("2fast", false)]
#[test_case("has-dash", false)]
#[test_case("has space", false)]
fn is_identifier___classifies(value: &str, expected: bool) {
    assert_eq!(is_identifier(value), expected);
}
