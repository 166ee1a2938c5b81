#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("\"admin\"", "admin" ; "double quotes")]
#[test_case("'admin'", "admin" ; "single quotes")]
#[test_case("admin", "admin" ; "bare")]
#[test_case("\"admin'", "\"admin'" ; "mismatched quotes kept")]
#[test_case("\"", "\"" ; "lone quote kept")]
#[test_case("\"\"\"x\"\"\"", "\"\"x\"\"" ; "only one layer stripped")]
fn strip_quotes___input___strips_one_matching_layer(input: &str, expected: &str) {
    assert_eq!(strip_quotes(input), expected);
}

#[test]
fn split_key_value___quoted_value___unquotes() {
    assert_eq!(split_key_value("role = \"admin\""), Some(("role", "admin")));
}

#[test]
fn split_key_value___value_with_equals___splits_on_first() {
    assert_eq!(split_key_value("filter=a=b"), Some(("filter", "a=b")));
}

#[test]
fn split_key_value___quoted_prose___is_not_a_pair() {
    assert_eq!(split_key_value("\"x = y\""), None);
}

#[test]
fn MarkerInstance___named_arg___finds_key() {
    let marker = MarkerInstance::new(
        "Param",
        "@Param(name=id, type=string)",
        vec!["name=id".into(), "type=string".into()],
    );

    assert_eq!(marker.named_arg("type"), Some("string"));
    assert_eq!(marker.named_arg("missing"), None);
}

#[test]
fn MarkerInstance___positional_args___skips_pairs() {
    let marker = MarkerInstance::new(
        "Group",
        "@Group(users, prefix=/u)",
        vec!["users".into(), "prefix=/u".into()],
    );

    let positional: Vec<&str> = marker.positional_args().collect();

    assert_eq!(positional, vec!["users"]);
}

#[test]
fn MiddlewareInfo___new___folds_pairs_and_positionals() {
    let info = MiddlewareInfo::new(
        "Cache",
        &["ttl=5m".into(), "memory".into()],
        0,
        "Response caching",
    );

    assert_eq!(info.args.get("ttl").map(String::as_str), Some("5m"));
    assert_eq!(info.args.get("value").map(String::as_str), Some("memory"));
}

#[test]
fn RouteMetadata___websocket_only___has_no_http_binding() {
    let meta = RouteMetadata::websocket_only("on_chat");

    assert!(meta.is_websocket_only());
}

#[test]
fn RouteMetadata___route___is_not_websocket_only() {
    let meta = RouteMetadata::route("GET", "/users", "list_users");

    assert!(!meta.is_websocket_only());
}

#[test]
fn RouteMetadata___add_tag___deduplicates_in_first_seen_order() {
    let mut meta = RouteMetadata::route("GET", "/users", "list_users");

    meta.add_tag("users");
    meta.add_tag("admin");
    meta.add_tag("users");
    meta.add_tag("");

    assert_eq!(meta.tags, vec!["users", "admin"]);
}

#[test]
fn ResponseMetadata___is_complete___requires_code_and_description() {
    let mut response = ResponseMetadata {
        code: "200".into(),
        ..Default::default()
    };
    assert!(!response.is_complete());

    response.description = "OK".into();
    assert!(response.is_complete());
}

#[test]
fn RouteMetadata___serialize___renames_type_fields() {
    let mut meta = RouteMetadata::route("GET", "/users/{id}", "get_user");
    meta.parameters.push(ParameterMetadata {
        name: "id".into(),
        type_name: "string".into(),
        location: "path".into(),
        required: true,
        ..Default::default()
    });

    let json = serde_json::to_value(&meta).unwrap();

    assert_eq!(json["parameters"][0]["type"], "string");
    assert!(json.get("group").is_none());
}
