use stitch_model::{
    PropertyCatalog, PropertyMergeStrategyType, PropertyType, StaticCatalog,
    DEFAULT_MERGE_STRATEGY,
};

// ── Property types ───────────────────────────────────────────────

#[test]
fn undeclared_property_uses_default_strategy() {
    let catalog = StaticCatalog::new();
    assert_eq!(
        catalog.strategy_id_for_property("email"),
        DEFAULT_MERGE_STRATEGY
    );
}

#[test]
fn declared_property_without_strategy_uses_default() {
    let mut catalog = StaticCatalog::new();
    catalog.register_property_type(PropertyType::new("email"));
    assert_eq!(
        catalog.strategy_id_for_property("email"),
        DEFAULT_MERGE_STRATEGY
    );
}

#[test]
fn declared_strategy_wins() {
    let mut catalog = StaticCatalog::new();
    catalog.register_property_type(PropertyType::with_strategy("visits", "adding"));
    assert_eq!(catalog.strategy_id_for_property("visits"), "adding");
}

#[test]
fn register_property_type_replaces() {
    let mut catalog = StaticCatalog::new();
    catalog.register_property_type(PropertyType::new("email"));
    catalog.register_property_type(PropertyType::with_strategy("email", "mostRecent"));
    assert_eq!(catalog.strategy_id_for_property("email"), "mostRecent");
}

// ── Strategy types ───────────────────────────────────────────────

#[test]
fn empty_catalog_resolves_no_strategy_types() {
    let catalog = StaticCatalog::new();
    assert!(catalog.strategy_type(DEFAULT_MERGE_STRATEGY).is_none());
}

#[test]
fn builtins_are_resolvable() {
    let catalog = StaticCatalog::with_builtins();
    for id in [DEFAULT_MERGE_STRATEGY, "mostRecent", "adding"] {
        assert!(catalog.strategy_type(id).is_some(), "missing builtin {id}");
    }
    assert!(catalog.strategy_type("nonsense").is_none());
}

#[test]
fn registered_strategy_type_resolves() {
    let mut catalog = StaticCatalog::new();
    catalog.register_strategy_type(PropertyMergeStrategyType::new("custom"));
    assert_eq!(catalog.strategy_type("custom").unwrap().id, "custom");
}
