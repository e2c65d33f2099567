//! Style rules and rule sets.

use std::collections::HashMap;

use crate::selector::Selector;
use crate::value::Value;

/// A named, fully resolved property value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Property {
            name: name.into(),
            value,
        }
    }
}

/// A selector paired with the properties it applies.
///
/// Property names are unique within one rule; the last write wins during
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    selector: Selector,
    properties: Vec<Property>,
}

impl StyleRule {
    pub fn new(selector: Selector) -> Self {
        StyleRule {
            selector,
            properties: Vec::new(),
        }
    }

    pub fn with_properties(selector: Selector, properties: Vec<Property>) -> Self {
        let mut rule = StyleRule::new(selector);
        for property in properties {
            rule.set(property);
        }
        rule
    }

    /// Insert or overwrite a property by name.
    pub fn set(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

/// A collection of style rules applied to a UI scope.
///
/// Resolution output may carry several rules for the same selector (ancestor
/// definitions before descendants); after a merge there is at most one rule
/// per distinct selector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<StyleRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<StyleRule>) -> Self {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Content equality by selector → property set, ignoring rule order.
    /// Duplicate selectors group first-wins, matching merge grouping.
    pub fn equivalent(&self, other: &RuleSet) -> bool {
        fn grouped(set: &RuleSet) -> HashMap<&Selector, HashMap<&str, &Value>> {
            let mut groups: HashMap<&Selector, HashMap<&str, &Value>> = HashMap::new();
            for rule in &set.rules {
                groups.entry(rule.selector()).or_insert_with(|| {
                    rule.properties()
                        .iter()
                        .map(|p| (p.name.as_str(), &p.value))
                        .collect()
                });
            }
            groups
        }

        grouped(self) == grouped(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::ElementSelector;

    fn selector(class: &str) -> Selector {
        Selector::Element(ElementSelector {
            element_type: None,
            classes: vec![class.to_string()],
            pseudo: Vec::new(),
        })
    }

    #[test]
    fn test_rule_last_write_wins() {
        let mut rule = StyleRule::new(selector("a"));
        rule.set(Property::new("color", Value::Number(1.0)));
        rule.set(Property::new("size", Value::Number(2.0)));
        rule.set(Property::new("color", Value::Number(3.0)));

        assert_eq!(rule.properties().len(), 2);
        assert_eq!(rule.property("color"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_equivalent_ignores_rule_order() {
        let rule_a = StyleRule::with_properties(
            selector("a"),
            vec![Property::new("x", Value::Number(1.0))],
        );
        let rule_b = StyleRule::with_properties(
            selector("b"),
            vec![Property::new("y", Value::Number(2.0))],
        );

        let forward = RuleSet::new(vec![rule_a.clone(), rule_b.clone()]);
        let backward = RuleSet::new(vec![rule_b, rule_a]);
        assert!(forward.equivalent(&backward));
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_equivalent_detects_property_difference() {
        let base = RuleSet::new(vec![StyleRule::with_properties(
            selector("a"),
            vec![Property::new("x", Value::Number(1.0))],
        )]);
        let changed = RuleSet::new(vec![StyleRule::with_properties(
            selector("a"),
            vec![Property::new("x", Value::Number(9.0))],
        )]);
        assert!(!base.equivalent(&changed));
    }
}
