//! End-to-end runs over temporary crate trees.
//!
//! Each test lays out a small crate with annotated handlers, runs the whole
//! pipeline, and inspects the generated file.

#![allow(non_snake_case)]

use chrono::TimeZone;
use routemark_codegen::{GenerationContext, HookPipeline, Pipeline, PostValidator};
use routemark_core::{GeneratorConfig, GroupRegistry, RoutemarkError, ValidationCode};
use routemark_logging::CaptureLayer;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing_subscriber::prelude::*;

const USERS: &str = r#"
//! User handlers

/// Fetch one user.
/// @Route("GET", "/users/{id}")
/// @Param(name=id, type=string, location=path, required=true)
/// @Response(code=200, description="The user", type=User)
/// @Tag(users)
pub fn get_user() {}

/// Create a user.
/// @Route(POST, /users)
/// @Auth(role=admin)
/// @Cache(ttl=5m)
/// @RequestBody(NewUser, "User to create")
pub fn create_user() {}
"#;

const CHAT: &str = r#"
/// @WebSocket("chat.message")
pub fn on_message() {}

/// @Route(GET, /rooms)
/// @Group(chat)
pub fn list_rooms() {}
"#;

/// A crate at `<tmp>/app` with handlers under `src/api`
fn crate_tree(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("app");
    fs::create_dir_all(app.join("src/api")).unwrap();
    fs::write(app.join("Cargo.toml"), "[package]\nname = \"shop\"\nversion = \"0.1.0\"\n").unwrap();
    for (name, contents) in files {
        let path = app.join("src/api").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    (dir, app)
}

fn output(app: &Path) -> PathBuf {
    app.join(".routemark").join("routes.rs")
}

fn pipeline(config: GeneratorConfig) -> Pipeline {
    Pipeline::new(config)
        .generated_at(chrono::Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap())
}

#[test]
fn run___annotated_crate___registration_file_generated() {
    let (_dir, app) = crate_tree(&[("users.rs", USERS), ("chat.rs", CHAT)]);

    let summary = pipeline(GeneratorConfig::default())
        .run(&app.join("src/api"), &output(&app))
        .unwrap();

    assert_eq!(summary.routes, 4);
    assert_eq!(summary.websocket_handlers, 1);
    assert_eq!(summary.middlewares, 3);

    let text = fs::read_to_string(output(&app)).unwrap();
    assert!(text.starts_with("// @generated by routemark. DO NOT EDIT.\n"));
    assert!(text.contains("// crate: shop"));
    assert!(text.contains("use crate::api;"));
    assert!(text.contains("handler: api::users::get_user,"));
    assert!(text.contains("path: \"/chat/rooms\","));
    assert!(text.contains("registry.register_websocket_handler(\"chat.message\", api::chat::on_message);"));
    assert!(text.contains("registry.register_default_websocket_handlers();"));
    assert!(text.contains("rt::create_cache_middleware(&[\"ttl=5m\"])"));

    PostValidator::new("init_routes", "register_route_with_meta")
        .validate(&output(&app))
        .unwrap();
    assert_eq!(
        fs::read_to_string(app.join(".routemark/.gitignore")).unwrap(),
        "# Generated by routemark\n*.rs\n!.gitignore\n"
    );
}

#[test]
fn run___minified___smaller_and_still_valid() {
    let (_dir, app) = crate_tree(&[("users.rs", USERS), ("chat.rs", CHAT)]);

    pipeline(GeneratorConfig::default())
        .run(&app.join("src/api"), &output(&app))
        .unwrap();
    let verbose = fs::read_to_string(output(&app)).unwrap();

    pipeline(GeneratorConfig::default().with_minify(true))
        .run(&app.join("src/api"), &output(&app))
        .unwrap();
    let minified = fs::read_to_string(output(&app)).unwrap();

    assert!(minified.len() < verbose.len());
    assert!(minified.contains("use {routemark_runtime as rt, crate::api};"));
    assert!(!minified.contains("// GET"));
}

#[test]
fn run___two_runs___identical_apart_from_timestamp() {
    let (_dir, app) = crate_tree(&[("users.rs", USERS), ("chat.rs", CHAT)]);
    let config = GeneratorConfig::default();

    Pipeline::new(config.clone())
        .generated_at(chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        .run(&app.join("src/api"), &output(&app))
        .unwrap();
    let first = fs::read_to_string(output(&app)).unwrap();
    Pipeline::new(config)
        .generated_at(chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        .run(&app.join("src/api"), &output(&app))
        .unwrap();
    let second = fs::read_to_string(output(&app)).unwrap();

    let differing: Vec<(&str, &str)> = first
        .lines()
        .zip(second.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(differing.len(), 1);
    assert!(differing[0].0.contains("generated_at: \"2025-01-01T00:00:00Z\""));
    assert_eq!(first.lines().count(), second.lines().count());
}

#[test]
fn run___every_bad_declaration_reported_together() {
    let bad = r#"
/// @Route(FETCH, /a)
pub fn a() {}

/// @Route(GET, b)
pub fn b() {}

/// @Route(GET)
pub fn c() {}

/// @Auth(role="admin)
pub fn d() {}
"#;
    let (_dir, app) = crate_tree(&[("bad.rs", bad), ("users.rs", USERS)]);

    let err = pipeline(GeneratorConfig::default())
        .run(&app.join("src/api"), &output(&app))
        .unwrap_err();

    let RoutemarkError::Validation(errors) = err else {
        panic!("expected aggregated validation errors, got {err}");
    };
    assert_eq!(
        errors.codes(),
        vec![
            ValidationCode::InvalidHttpMethod,
            ValidationCode::InvalidPath,
            ValidationCode::InvalidArgumentCount,
            ValidationCode::UnmatchedQuotes,
        ]
    );
    let report = errors.to_string();
    assert_eq!(report.lines().count(), 4);
    assert!(report.lines().all(|line| line.starts_with("bad.rs:")));
    assert!(!output(&app).exists());
}

#[test]
fn run___nested_modules___packages_follow_the_tree() {
    let nested = "/// @Route(DELETE, /orders/{id})\npub fn cancel() {}\n";
    let (_dir, app) = crate_tree(&[("orders/mod.rs", ""), ("orders/admin.rs", nested)]);

    let report = pipeline(GeneratorConfig::default())
        .scan_only(&app.join("src/api"))
        .unwrap();

    assert_eq!(report.routes.len(), 1);
    assert_eq!(report.routes[0].package, "orders::admin");
}

#[test]
fn run___shared_group_registry___explicit_prefix_respected() {
    let (_dir, app) = crate_tree(&[("chat.rs", CHAT)]);
    let groups = Arc::new(GroupRegistry::new());
    groups.register("chat", "/v2/chat", "Chat API");

    let report = pipeline(GeneratorConfig::default())
        .groups(groups)
        .scan_only(&app.join("src/api"))
        .unwrap();

    let rooms = report.routes.iter().find(|r| r.func_name == "list_rooms").unwrap();
    assert_eq!(rooms.path, "/v2/chat/rooms");
    assert!(rooms.tags.contains(&"chat".to_string()));
}

#[test]
fn run___summary_logged_at_info() {
    let (_dir, app) = crate_tree(&[("users.rs", USERS)]);
    let capture = CaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        pipeline(GeneratorConfig::default())
            .run(&app.join("src/api"), &output(&app))
            .unwrap();
    });

    let info = capture.messages_at(tracing::Level::INFO);
    assert!(info.iter().any(|m| m.starts_with("generated 2 routes, 0 websocket handlers")));
}

#[test]
fn run___user_hook_sees_resolved_handler_root() {
    let (_dir, app) = crate_tree(&[("users.rs", USERS)]);
    let hooks = HookPipeline::new()
        .pre_generation(|ctx: &mut GenerationContext| -> anyhow::Result<()> {
            anyhow::ensure!(ctx.handler_root == "api", "handler root was {}", ctx.handler_root);
            Ok(())
        });

    Pipeline::new(GeneratorConfig::default())
        .hooks(hooks)
        .run(&app.join("src/api"), &output(&app))
        .unwrap();
}
