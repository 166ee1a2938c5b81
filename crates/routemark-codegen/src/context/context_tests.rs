#![allow(non_snake_case)]

use super::*;
use chrono::TimeZone;

fn context() -> GenerationContext {
    let mut chat = RouteMetadata::websocket_only("on_message");
    chat.package = "chat".into();
    chat.websocket_handlers = vec!["chat.message".into(), "chat.typing".into()];

    GenerationContext::new(
        "routes",
        vec![RouteMetadata::route("GET", "/users", "list_users"), chat],
    )
}

#[test]
fn GenerationContext___add_import___skips_duplicates() {
    let mut ctx = context();

    assert!(ctx.add_import("routemark_runtime as rt"));
    assert!(!ctx.add_import("routemark_runtime as rt"));
    assert_eq!(ctx.imports.len(), 1);
}

#[test]
fn GenerationContext___dedup_imports___keeps_first_occurrence() {
    let mut ctx = context();
    ctx.imports = vec!["b".into(), "a".into(), "b".into(), "c".into(), "a".into()];

    ctx.dedup_imports();

    assert_eq!(ctx.imports, vec!["b", "a", "c"]);
}

#[test]
fn GenerationContext___timestamp___second_precision_utc() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap();
    let ctx = context().with_generated_at(at);

    assert_eq!(ctx.timestamp(), "2024-05-01T12:30:15Z");
}

#[test]
fn GenerationContext___handler_path___skips_empty_package() {
    let mut ctx = context();
    ctx.handler_root = "handlers".into();

    assert_eq!(ctx.handler_path(&ctx.routes[0]), "handlers::list_users");
    assert_eq!(ctx.handler_path(&ctx.routes[1]), "handlers::chat::on_message");
}

#[test]
fn GenerationContext___http_routes___excludes_websocket_only() {
    let ctx = context();

    assert_eq!(ctx.http_routes().count(), 1);
    assert_eq!(ctx.websocket_bindings(), 2);
}
