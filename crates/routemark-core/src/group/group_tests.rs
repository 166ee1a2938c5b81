#![allow(non_snake_case)]

use super::*;

#[test]
fn default_prefix___lowercases_name() {
    assert_eq!(default_prefix("Admin"), "/admin");
}

#[test]
fn GroupRegistry___resolve___creates_with_defaults() {
    let registry = GroupRegistry::new();

    let group = registry.resolve("Users", None, None);

    assert_eq!(group.prefix, "/users");
    assert_eq!(group.description, "Group Users");
    assert_eq!(registry.len(), 1);
}

#[test]
fn GroupRegistry___resolve___explicit_values_override_defaults() {
    let registry = GroupRegistry::new();

    let group = registry.resolve("Admin", Some("/api/admin"), Some("Administration"));

    assert_eq!(group.prefix, "/api/admin");
    assert_eq!(group.description, "Administration");
}

#[test]
fn GroupRegistry___resolve___existing_group_is_not_changed() {
    let registry = GroupRegistry::new();
    registry.register("Admin", "/backoffice", "Back office");

    let group = registry.resolve("Admin", Some("/other"), Some("Other"));

    assert_eq!(group.prefix, "/backoffice");
    assert_eq!(group.description, "Back office");
}

#[test]
fn GroupRegistry___register___last_write_wins() {
    let registry = GroupRegistry::new();
    registry.register("Admin", "/a", "first");

    let previous = registry.register("Admin", "/b", "second");

    assert_eq!(previous.map(|g| g.prefix), Some("/a".to_string()));
    assert_eq!(registry.get("Admin").unwrap().prefix, "/b");
    assert_eq!(registry.len(), 1);
}

#[test]
fn GroupRegistry___get___unknown_is_none() {
    let registry = GroupRegistry::new();

    assert!(registry.get("Missing").is_none());
}

#[test]
fn GroupRegistry___all___is_ordered_by_name() {
    let registry = GroupRegistry::new();
    registry.resolve("Zeta", None, None);
    registry.resolve("Alpha", None, None);

    let names: Vec<String> = registry.all().into_iter().map(|g| g.name).collect();

    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn GroupRegistry___reset___clears_everything() {
    let registry = GroupRegistry::new();
    registry.resolve("Admin", None, None);

    registry.reset();

    assert!(registry.is_empty());
}
