//! Manager resolution and merge tests.

use std::rc::Rc;

use crate::error::Error;
use crate::registry::{MemoryTypeRegistry, TypeRegistry};
use crate::selector::Selector;
use crate::sheet::{Property, RuleSet, StyleRule};
use crate::source::{
    MemoryStyleStore, MemoryValueStore, StyleSource, StyleStore, ValueSource, ValueStore,
};
use crate::value::{Color, RawValue, Value};

use super::StyleManager;

fn registry() -> MemoryTypeRegistry {
    let mut registry = MemoryTypeRegistry::default();
    for name in ["Button", "Window", "Label", "PanelContainer"] {
        registry.register(name);
    }
    registry
}

fn manager(sources: Vec<StyleSource>) -> StyleManager {
    manager_with_values(sources, Vec::new())
}

fn manager_with_values(sources: Vec<StyleSource>, values: Vec<ValueSource>) -> StyleManager {
    let styles = MemoryStyleStore::default();
    for source in sources {
        styles.insert(source);
    }
    let value_store = MemoryValueStore::default();
    for value in values {
        value_store.insert(value);
    }
    StyleManager::new(
        Rc::new(styles) as Rc<dyn StyleStore>,
        Rc::new(value_store) as Rc<dyn ValueStore>,
        Rc::new(registry()) as Rc<dyn TypeRegistry>,
    )
}

fn selector(path: &str) -> Selector {
    Selector::parse(path, None, &registry()).unwrap()
}

fn rule(path: &str, props: &[(&str, Value)]) -> StyleRule {
    StyleRule::with_properties(
        selector(path),
        props
            .iter()
            .map(|(name, value)| Property::new(*name, value.clone()))
            .collect(),
    )
}

#[test]
fn test_resolve_without_parents_in_declaration_order() {
    let manager = manager(vec![
        StyleSource::builder("theme")
            .prop("Button", "color", "#ff0000")
            .prop("Label", "size", 12.0)
            .build(),
    ]);

    let rules = manager.rules("theme").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].selector(), &selector("Button"));
    assert_eq!(rules[1].selector(), &selector("Label"));
    assert_eq!(
        rules[0].property("color"),
        Some(&Value::Color(Color::rgb(255, 0, 0)))
    );
}

#[test]
fn test_ancestor_rules_precede_own_rules() {
    let manager = manager(vec![
        StyleSource::builder("base")
            .prop("Button", "color", "#ff0000")
            .build(),
        StyleSource::builder("mid")
            .parent("base")
            .prop("Button", "color", "#00ff00")
            .build(),
        StyleSource::builder("leaf")
            .parent("mid")
            .prop("Label", "size", 10.0)
            .build(),
    ]);

    let rules = manager.rules("leaf").unwrap();
    assert_eq!(rules.len(), 3);
    // base's Button, then mid's Button, then leaf's own Label
    assert_eq!(
        rules[0].property("color"),
        Some(&Value::Color(Color::rgb(255, 0, 0)))
    );
    assert_eq!(
        rules[1].property("color"),
        Some(&Value::Color(Color::rgb(0, 255, 0)))
    );
    assert_eq!(rules[2].selector(), &selector("Label"));
}

#[test]
fn test_parents_resolved_in_declared_order() {
    let manager = manager(vec![
        StyleSource::builder("a").prop("Button", "x", 1.0).build(),
        StyleSource::builder("b").prop("Button", "x", 2.0).build(),
        StyleSource::builder("combined")
            .parent("a")
            .parent("b")
            .build(),
    ]);

    let rules = manager.rules("combined").unwrap();
    assert_eq!(rules[0].property("x"), Some(&Value::Number(1.0)));
    assert_eq!(rules[1].property("x"), Some(&Value::Number(2.0)));
}

#[test]
fn test_unknown_id_is_not_found() {
    let manager = manager(Vec::new());
    assert!(matches!(
        manager.rules("missing").unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_unknown_parent_is_not_found() {
    let manager = manager(vec![StyleSource::builder("leaf").parent("gone").build()]);
    assert!(matches!(
        manager.rules("leaf").unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_parent_cycle_is_reported() {
    let manager = manager(vec![
        StyleSource::builder("a").parent("b").build(),
        StyleSource::builder("b").parent("a").build(),
    ]);

    match manager.rules("a").unwrap_err() {
        Error::Cycle { path } => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("expected cycle error, got {other}"),
    }
}

#[test]
fn test_unknown_selector_type_skips_rule_only() {
    let manager = manager(vec![
        StyleSource::builder("theme")
            .prop("Slider", "width", 4.0)
            .prop("Button", "width", 8.0)
            .build(),
    ]);

    let rules = manager.rules("theme").unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].selector(), &selector("Button"));
}

#[test]
fn test_unresolvable_property_skipped_others_survive() {
    let manager = manager(vec![
        StyleSource::builder("theme")
            .prop("Button", "color", "missingValueSource")
            .prop("Button", "size", 4.0)
            .build(),
    ]);

    let rules = manager.rules("theme").unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].property("color"), None);
    assert_eq!(rules[0].property("size"), Some(&Value::Number(4.0)));
}

#[test]
fn test_value_reference_resolves_through_store() {
    let manager = manager_with_values(
        vec![
            StyleSource::builder("theme")
                .prop("Button", "color", "accent")
                .build(),
        ],
        vec![ValueSource::new(
            "accent",
            RawValue::Text("#336699".to_string()),
        )],
    );

    let rules = manager.rules("theme").unwrap();
    assert_eq!(
        rules[0].property("color"),
        Some(&Value::Color(Color::rgb(0x33, 0x66, 0x99)))
    );
}

#[test]
fn test_merge_adds_new_selectors() {
    let mut manager = manager(vec![
        StyleSource::builder("extra")
            .prop("Label", "size", 14.0)
            .build(),
    ]);

    let base = Rc::new(RuleSet::default());
    let (reference, stats) = manager.merge_counted(&base, "extra").unwrap();

    assert_eq!(stats.added, 1);
    assert_eq!(stats.merged, 0);
    let result = reference.get();
    assert_eq!(result.len(), 1);
    assert_eq!(result.rules()[0].property("size"), Some(&Value::Number(14.0)));
}

#[test]
fn test_merge_is_property_granular() {
    let mut manager = manager(vec![
        StyleSource::builder("override")
            .prop("Button", "color", "#0000ff")
            .build(),
    ]);

    let base = Rc::new(RuleSet::new(vec![rule(
        "Button",
        &[
            ("color", Value::Color(Color::rgb(255, 0, 0))),
            ("size", Value::Number(10.0)),
        ],
    )]));

    let (reference, stats) = manager.merge_counted(&base, "override").unwrap();
    assert_eq!(stats.merged, 1);
    assert_eq!(stats.added, 0);
    assert_eq!(stats.overwritten, 1);

    let result = reference.get();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.rules()[0].property("color"),
        Some(&Value::Color(Color::rgb(0, 0, 255)))
    );
    // Unspecified properties survive.
    assert_eq!(result.rules()[0].property("size"), Some(&Value::Number(10.0)));
}

#[test]
fn test_merge_idempotent_for_unchanged_source() {
    let mut manager = manager(vec![
        StyleSource::builder("theme")
            .prop("Button", "color", "#123456")
            .prop("Label", "size", 9.0)
            .build(),
    ]);

    let base = Rc::new(RuleSet::new(vec![rule(
        "Button",
        &[("size", Value::Number(2.0))],
    )]));

    let once = manager.merge(&base, "theme").unwrap().get();
    let twice = manager.merge(&base, "theme").unwrap().get();
    assert!(once.equivalent(&twice));
}

#[test]
fn test_merge_missing_source_degrades_without_caching() {
    let mut manager = manager(Vec::new());
    let base = Rc::new(RuleSet::new(vec![rule(
        "Button",
        &[("size", Value::Number(1.0))],
    )]));

    let reference = manager.merge(&base, "ghost").unwrap();
    assert!(Rc::ptr_eq(&reference.get(), &base));
    assert!(!manager.is_cached("ghost"));
}

#[test]
fn test_merge_reuses_reference_on_recompute() {
    let mut manager = manager(vec![
        StyleSource::builder("theme")
            .prop("Button", "color", "#ffffff")
            .build(),
    ]);

    let base = Rc::new(RuleSet::default());
    let first = manager.merge(&base, "theme").unwrap();
    let second = manager.merge(&base, "theme").unwrap();
    assert!(first.same_ref(&second));
}

#[test]
fn test_inherited_duplicate_selectors_collapse_last_wins() {
    // A declares Button red, B inherits A and declares Button green;
    // resolution keeps both rules, merge collapses to green.
    let mut manager = manager(vec![
        StyleSource::builder("A")
            .prop("Button", "color", "#ff0000")
            .build(),
        StyleSource::builder("B")
            .parent("A")
            .prop("Button", "color", "#00ff00")
            .build(),
    ]);

    let rules = manager.rules("B").unwrap();
    assert_eq!(rules.len(), 2);

    let reference = manager.merge(&Rc::new(RuleSet::default()), "B").unwrap();
    let result = reference.get();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.rules()[0].property("color"),
        Some(&Value::Color(Color::rgb(0, 255, 0)))
    );
}

#[test]
fn test_selector_helper_uses_owner_aliases() {
    let manager = manager(Vec::new());
    let owner = StyleSource::builder("themed")
        .type_alias("Panel", "PanelContainer")
        .build();

    let selector = manager.selector("Panel.dark", Some(&owner)).unwrap();
    assert_eq!(selector.to_string(), "PanelContainer.dark");
}
