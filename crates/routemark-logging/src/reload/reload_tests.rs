#![allow(non_snake_case)]

use super::*;

#[test]
fn verbosity_directive___maps_each_level() {
    assert_eq!(verbosity_directive(Verbosity::Silent), "warn");
    assert_eq!(verbosity_directive(Verbosity::Normal), "info");
    assert_eq!(verbosity_directive(Verbosity::Verbose), "debug");
}

#[test]
fn verbosity_directive___parses_as_filter() {
    let filter = EnvFilter::new(verbosity_directive(Verbosity::Verbose));

    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn ReloadHandle___reload_verbosity___uninitialized_is_error() {
    let handle = ReloadHandle::new();

    let result = handle.reload_verbosity(Verbosity::Verbose);

    assert!(result.is_err());
    assert!(!handle.is_initialized());
}

#[test]
fn ReloadHandle___reload_verbosity___updates_current_level() {
    let (_layer, inner) = reload::Layer::<EnvFilter, tracing_subscriber::Registry>::new(
        EnvFilter::new("info"),
    );
    let handle = ReloadHandle::new();
    handle.set_handle(inner, Verbosity::Normal);

    handle.reload_verbosity(Verbosity::Silent).unwrap();

    assert_eq!(handle.verbosity(), Verbosity::Silent);
}

#[test]
fn ReloadHandle___global___returns_same_instance() {
    let a = ReloadHandle::global() as *const ReloadHandle;
    let b = ReloadHandle::global() as *const ReloadHandle;

    assert_eq!(a, b);
}
