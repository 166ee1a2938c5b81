#![allow(non_snake_case)]

use super::*;

#[test]
fn minify___keeps_generated_banner() {
    let out = minify("// @generated by routemark. DO NOT EDIT.\n// plain note\nfn f() {}\n");

    assert_eq!(out, "// @generated by routemark. DO NOT EDIT.\nfn f() {}\n");
}

#[test]
fn minify___strips_doc_and_indented_comments() {
    let out = minify("/// Register routes\npub fn f() {\n    // GET /users\n    g();\n}\n");

    assert_eq!(out, "pub fn f() {\n    g();\n}\n");
}

#[test]
fn minify___collapses_blank_runs_and_trailing_whitespace() {
    let out = minify("a();   \n\n\n\nb();\t\n\n");

    assert_eq!(out, "a();\n\nb();\n");
}

#[test]
fn minify___compacts_consecutive_uses() {
    let out = minify("use routemark_runtime as rt;\nuse crate::handlers;\n\nfn f() {}\n");

    assert_eq!(out, "use {routemark_runtime as rt, crate::handlers};\n\nfn f() {}\n");
}

#[test]
fn minify___single_use_is_unchanged() {
    let out = minify("use routemark_runtime as rt;\nfn f() {}\n");

    assert_eq!(out, "use routemark_runtime as rt;\nfn f() {}\n");
}

#[test]
fn minify___comment_between_uses_does_not_split_them() {
    let out = minify("use a;\n// note\nuse b;\n");

    assert_eq!(out, "use {a, b};\n");
}

#[test]
fn minify___string_with_slashes_is_kept() {
    let out = minify("    f(&[\"target=http://svc\"]);\n");

    assert_eq!(out, "    f(&[\"target=http://svc\"]);\n");
}

#[test]
fn minify___compacted_uses_still_parse() {
    let out = minify("use routemark_runtime as rt;\nuse crate::handlers;\n");

    let file = syn::parse_file(&out).unwrap();
    assert_eq!(file.items.len(), 1);
}

#[test]
fn minify___is_idempotent() {
    let once = minify("// @generated\nuse a;\nuse b;\n\n\n// x\nfn f() {}\n");

    assert_eq!(minify(&once), once);
}
