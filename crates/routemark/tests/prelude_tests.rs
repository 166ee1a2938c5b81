//! The facade prelude is enough to run the compiler and extend it.

#![allow(non_snake_case)]

use routemark::prelude::*;
use std::fs;
use std::sync::Arc;

#[test]
fn prelude___custom_marker_and_hook___end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("orders.rs"),
        "/// @Route(POST, /orders)\n/// @Audit(level=full)\npub fn create_order() {}\n",
    )
    .unwrap();

    let markers = MarkerRegistry::with_builtins();
    markers.register(MarkerDefinition::behavior("Audit", "create_audit_middleware", "Audit trail"));
    let hooks = HookPipeline::new().post_parse(|routes: &[RouteMetadata]| -> anyhow::Result<()> {
        anyhow::ensure!(routes.len() == 1);
        Ok(())
    });

    let output = dir.path().join("out/routes.rs");
    let summary = Pipeline::new(GeneratorConfig::default())
        .markers(Arc::new(markers))
        .hooks(hooks)
        .run(&src, &output)
        .unwrap();

    assert_eq!(summary.routes, 1);
    assert_eq!(summary.middlewares, 1);
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("rt::create_audit_middleware(&[\"level=full\"])"));
}

#[test]
fn prelude___config_from_toml___verbosity_parsed() {
    let config = GeneratorConfig::from_toml_str("log_level = \"verbose\"\nminify = true\n").unwrap();

    assert!(config.minify);
    assert_eq!(config.log_level.parse::<Verbosity>().unwrap(), Verbosity::Verbose);
}
