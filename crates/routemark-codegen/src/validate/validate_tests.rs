#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn validator() -> PostValidator {
    PostValidator::new("init_routes", "register_route_with_meta")
}

const GOOD: &str = r#"
use routemark_runtime as rt;

pub fn init_routes(registry: &mut rt::Registry) {
    registry.register_route_with_meta(rt::RouteEntry { method: "GET" });
}
"#;

#[test]
fn PostValidator___well_formed___ok() {
    validator().validate_source(GOOD).unwrap();
}

#[test]
fn PostValidator___path_call___counts_as_registration() {
    let source = r#"
use routemark_runtime as rt;
pub fn init_routes(registry: &mut rt::Registry) {
    rt::register_route_with_meta(registry, "GET");
}
"#;

    validator().validate_source(source).unwrap();
}

#[test_case("use a; pub fn init_routes( {", "syntax" ; "syntax error")]
#[test_case("pub fn init_routes(r: &mut R) { r.register_route_with_meta(1); }", "imports" ; "no imports")]
#[test_case("use a; pub fn other(r: &mut R) { r.register_route_with_meta(1); }", "entry" ; "no entry point")]
#[test_case("use a; pub fn init_routes(r: &mut R) { r.something_else(1); }", "registrations" ; "no registrations")]
fn PostValidator___malformed___reports(source: &str, expected: &str) {
    let err = validator().validate_source(source).unwrap_err();

    let matched = match err {
        PostValidationError::Syntax { .. } => "syntax",
        PostValidationError::MissingImports => "imports",
        PostValidationError::MissingEntryPoint(ref name) => {
            assert_eq!(name, "init_routes");
            "entry"
        }
        PostValidationError::MissingRegistrations { .. } => "registrations",
        other => panic!("unexpected error {other}"),
    };
    assert_eq!(matched, expected);
}

#[test]
fn PostValidator___registration_outside_entry_point___not_counted() {
    let source = r#"
use a;
pub fn init_routes(r: &mut R) {}
pub fn helper(r: &mut R) { r.register_route_with_meta(1); }
"#;

    let err = validator().validate_source(source).unwrap_err();

    assert!(matches!(err, PostValidationError::MissingRegistrations { .. }));
}

#[test]
fn PostValidator___missing_file___missing() {
    let dir = tempfile::tempdir().unwrap();

    let err = validator().validate(&dir.path().join("nope.rs")).unwrap_err();

    assert!(matches!(err, PostValidationError::Missing(_)));
}

#[test]
fn PostValidator___blank_file___empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.rs");
    std::fs::write(&path, "  \n\n").unwrap();

    let err = validator().validate(&path).unwrap_err();

    assert!(matches!(err, PostValidationError::Empty(_)));
}

#[test]
fn PostValidator___for_config___uses_configured_names() {
    let mut config = GeneratorConfig::default();
    config.entry_point = "install".into();
    config.registration_fn = "add_route".into();
    let source = "use a; pub fn install(r: &mut R) { r.add_route(1); }";

    PostValidator::for_config(&config).validate_source(source).unwrap();
    assert!(validator().validate_source(source).is_err());
}
