//! Property-based tests for string escaping and generated source
//!
//! Whatever text an annotation carries, the generated file must parse and
//! every literal must read back as the original text.

use chrono::TimeZone;
use proptest::prelude::*;
use routemark_codegen::{GenerationContext, Template, escape_str};
use routemark_core::builtins::VALID_METHODS;
use routemark_core::{GeneratorConfig, MiddlewareCall, MiddlewareInfo, RouteMetadata};

fn arb_route() -> impl Strategy<Value = RouteMetadata> {
    (
        prop::sample::select(VALID_METHODS.to_vec()),
        "/[a-z{}/]{0,20}",
        "[a-z][a-z0-9_]{0,10}",
        any::<String>(),
        any::<String>(),
        prop::collection::vec(any::<String>(), 0..4),
        prop::collection::vec(any::<String>(), 0..3),
    )
        .prop_map(|(method, path, name, description, summary, tags, args)| {
            let mut route = RouteMetadata::route(method, path, format!("handle_{name}"));
            route.package = "handlers".into();
            route.description = description;
            route.summary = summary;
            route.tags = tags;
            route.middleware_info = vec![MiddlewareInfo::new("Auth", &args, 0, "Authentication")];
            route.middleware_calls = vec![MiddlewareCall::new("create_auth_middleware", args)];
            route
        })
}

fn context(routes: Vec<RouteMetadata>) -> GenerationContext {
    let mut ctx = GenerationContext::new("routes", routes)
        .with_generated_at(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    ctx.add_import("routemark_runtime as rt");
    ctx
}

fn registrations(source: &str) -> usize {
    let file = syn::parse_file(source).expect("generated source parses");
    file.items
        .iter()
        .find_map(|item| match item {
            syn::Item::Fn(f) => Some(f.block.stmts.len()),
            _ => None,
        })
        .unwrap_or(0)
}

proptest! {
    /// Property: an escaped literal parses back to the original text
    #[test]
    fn proptest_escape_str_roundtrip(value in any::<String>()) {
        let literal = escape_str(&value);

        let parsed: syn::LitStr = syn::parse_str(&literal).expect("escaped literal parses");

        prop_assert_eq!(parsed.value(), value);
        prop_assert!(!literal.contains('\n'));
    }

    /// Property: both templates emit parseable source with one call per route
    #[test]
    fn proptest_generated_source_parses(routes in prop::collection::vec(arb_route(), 1..4)) {
        let config = GeneratorConfig::default();
        let ctx = context(routes.clone());

        let verbose = Template::Verbose.render(&ctx, &config).expect("verbose renders");
        let minified = Template::Minified.render(&ctx, &config).expect("minified renders");

        prop_assert_eq!(registrations(&verbose), routes.len());
        prop_assert_eq!(registrations(&minified), routes.len());
    }

    /// Property: rendering is deterministic for a fixed context
    #[test]
    fn proptest_render_is_deterministic(routes in prop::collection::vec(arb_route(), 0..3)) {
        let config = GeneratorConfig::default();
        let ctx = context(routes);

        let first = Template::Verbose.render(&ctx, &config).expect("renders");
        let second = Template::Verbose.render(&ctx, &config).expect("renders");

        prop_assert_eq!(first, second);
    }
}
