//! Style and value sources, their document forms, and the store traits.
//!
//! Sources are loaded in two phases: value sources first (they are pure
//! data), then style sources, whose property descriptions are run through
//! the typed-value reader against the already-populated value store. A
//! source is replaced whole on reload, never edited in place.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::warn;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::value::{self, DynamicValue, RawValue};

/// A named, inheritable bundle of selector-path → property declarations.
#[derive(Debug)]
pub struct StyleSource {
    id: String,
    parents: Vec<String>,
    styles: Vec<StyleBlock>,
    type_aliases: HashMap<String, String>,
}

/// One element path with its property declarations, in declaration order.
#[derive(Debug)]
pub struct StyleBlock {
    pub path: String,
    pub props: Vec<(String, DynamicValue)>,
}

impl StyleSource {
    pub fn builder(id: impl Into<String>) -> StyleSourceBuilder {
        StyleSourceBuilder {
            data: StyleSourceData {
                id: id.into(),
                parents: Vec::new(),
                styles: Vec::new(),
                type_aliases: HashMap::new(),
            },
        }
    }

    /// Convert a deserialized document into a source, reading every property
    /// description. A malformed property is logged and skipped; it aborts
    /// only that single value.
    pub fn from_data(data: StyleSourceData, values: &dyn ValueStore) -> StyleSource {
        let mut styles = Vec::with_capacity(data.styles.len());
        for (path, props) in data.styles {
            let mut block = StyleBlock {
                path,
                props: Vec::with_capacity(props.len()),
            };
            for (name, raw) in props {
                match value::read(&raw, values) {
                    Ok(dynamic) => block.props.push((name, dynamic)),
                    Err(err) => warn!(
                        "skipping property '{}' of '{}' in style source '{}': {err}",
                        name, block.path, data.id
                    ),
                }
            }
            styles.push(block);
        }

        StyleSource {
            id: data.id,
            parents: data.parents,
            styles,
            type_aliases: data.type_aliases,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Parent identifiers in declared order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Style blocks in declaration order.
    pub fn styles(&self) -> &[StyleBlock] {
        &self.styles
    }

    /// Resolve a short type alias declared by this source.
    pub fn type_alias(&self, short: &str) -> Option<&str> {
        self.type_aliases.get(short).map(String::as_str)
    }
}

/// Fluent construction for hosts and tests; document loading goes through
/// [`StyleSourceData`] instead.
pub struct StyleSourceBuilder {
    data: StyleSourceData,
}

impl StyleSourceBuilder {
    pub fn parent(mut self, id: impl Into<String>) -> Self {
        self.data.parents.push(id.into());
        self
    }

    pub fn type_alias(mut self, short: impl Into<String>, full: impl Into<String>) -> Self {
        self.data.type_aliases.insert(short.into(), full.into());
        self
    }

    /// Append a property declaration under an element path.
    pub fn prop(
        mut self,
        path: &str,
        name: impl Into<String>,
        raw: impl Into<RawValue>,
    ) -> Self {
        let entry = (name.into(), raw.into());
        match self.data.styles.iter_mut().find(|(p, _)| p == path) {
            Some((_, props)) => props.push(entry),
            None => self.data.styles.push((path.to_string(), vec![entry])),
        }
        self
    }

    /// Build against an empty value store. References stay deferred, so this
    /// is sufficient unless structured parents must resolve at load time.
    pub fn build(self) -> StyleSource {
        self.build_with(&MemoryValueStore::default())
    }

    pub fn build_with(self, values: &dyn ValueStore) -> StyleSource {
        StyleSource::from_data(self.data, values)
    }
}

/// A named dynamic value definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSource {
    id: String,
    value: RawValue,
}

impl ValueSource {
    pub fn new(id: impl Into<String>, value: RawValue) -> Self {
        ValueSource {
            id: id.into(),
            value,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &RawValue {
        &self.value
    }
}

/// Keyed lookup over loaded style sources.
///
/// Sources are handed out as shared `Rc` handles: the store behind the
/// manager is replaced wholesale on hot reload while resolution may still be
/// walking previously obtained sources.
pub trait StyleStore {
    fn try_index(&self, id: &str) -> Option<Rc<StyleSource>>;
    /// Every loaded source, in load order.
    fn all(&self) -> Vec<Rc<StyleSource>>;
}

/// Keyed lookup over loaded value sources.
pub trait ValueStore {
    fn try_index(&self, id: &str) -> Option<Rc<ValueSource>>;
}

/// In-memory style store; hosts with their own prototype storage implement
/// [`StyleStore`] directly instead.
///
/// Interior mutability lets a host replace definitions on reload while the
/// manager holds a shared handle to the store.
#[derive(Debug, Default)]
pub struct MemoryStyleStore {
    order: RefCell<Vec<String>>,
    sources: RefCell<HashMap<String, Rc<StyleSource>>>,
}

impl MemoryStyleStore {
    /// Insert or replace a source. Replacement keeps the original position.
    pub fn insert(&self, source: StyleSource) {
        let mut sources = self.sources.borrow_mut();
        if !sources.contains_key(source.id()) {
            self.order.borrow_mut().push(source.id().to_string());
        }
        sources.insert(source.id().to_string(), Rc::new(source));
    }

    pub fn load(&self, data: Vec<StyleSourceData>, values: &dyn ValueStore) {
        for entry in data {
            self.insert(StyleSource::from_data(entry, values));
        }
    }
}

impl StyleStore for MemoryStyleStore {
    fn try_index(&self, id: &str) -> Option<Rc<StyleSource>> {
        self.sources.borrow().get(id).cloned()
    }

    fn all(&self) -> Vec<Rc<StyleSource>> {
        let sources = self.sources.borrow();
        self.order
            .borrow()
            .iter()
            .filter_map(|id| sources.get(id).cloned())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct MemoryValueStore {
    sources: RefCell<HashMap<String, Rc<ValueSource>>>,
}

impl MemoryValueStore {
    pub fn insert(&self, source: ValueSource) {
        self.sources
            .borrow_mut()
            .insert(source.id().to_string(), Rc::new(source));
    }

    pub fn load(&self, data: Vec<ValueSourceData>) {
        for entry in data {
            self.insert(ValueSource::new(entry.id, entry.value));
        }
    }
}

impl ValueStore for MemoryValueStore {
    fn try_index(&self, id: &str) -> Option<Rc<ValueSource>> {
        self.sources.borrow().get(id).cloned()
    }
}

/// Document form of a style source.
#[derive(Debug, Deserialize)]
pub struct StyleSourceData {
    pub id: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default, deserialize_with = "ordered_styles")]
    pub styles: Vec<(String, Vec<(String, RawValue)>)>,
    #[serde(default, rename = "typeAliases")]
    pub type_aliases: HashMap<String, String>,
}

/// Document form of a value source.
#[derive(Debug, Deserialize)]
pub struct ValueSourceData {
    pub id: String,
    pub value: RawValue,
}

// Styles are declared as nested mappings, but declaration order is part of
// the contract (last processed wins), so they deserialize into vectors.
fn ordered_styles<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, Vec<(String, RawValue)>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StylesVisitor;

    impl<'de> Visitor<'de> for StylesVisitor {
        type Value = Vec<(String, Vec<(String, RawValue)>)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of element paths to property mappings")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut styles = Vec::new();
            while let Some((path, OrderedProps(props))) = map.next_entry::<String, _>()? {
                styles.push((path, props));
            }
            Ok(styles)
        }
    }

    deserializer.deserialize_map(StylesVisitor)
}

struct OrderedProps(Vec<(String, RawValue)>);

impl<'de> Deserialize<'de> for OrderedProps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropsVisitor;

        impl<'de> Visitor<'de> for PropsVisitor {
            type Value = OrderedProps;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of property names to value descriptions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut props = Vec::new();
                while let Some(entry) = map.next_entry::<String, RawValue>()? {
                    props.push(entry);
                }
                Ok(OrderedProps(props))
            }
        }

        deserializer.deserialize_map(PropsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_source_document_preserves_declaration_order() {
        let data: StyleSourceData = serde_yaml::from_str(
            r##"
id: baseTheme
parents: [core]
styles:
  "Button":
    color: "#ff0000"
    size: 10
  "Label.title":
    color: "#00ff00"
typeAliases:
  Fancy: Controls.FancyButton
"##,
        )
        .unwrap();

        assert_eq!(data.id, "baseTheme");
        assert_eq!(data.parents, vec!["core"]);
        assert_eq!(data.styles.len(), 2);
        assert_eq!(data.styles[0].0, "Button");
        assert_eq!(data.styles[0].1[0].0, "color");
        assert_eq!(data.styles[0].1[1].0, "size");
        assert_eq!(data.styles[1].0, "Label.title");
        assert_eq!(
            data.type_aliases.get("Fancy").map(String::as_str),
            Some("Controls.FancyButton")
        );
    }

    #[test]
    fn test_from_data_skips_malformed_property() {
        let values = MemoryValueStore::default();
        let data: StyleSourceData = serde_yaml::from_str(
            r##"
id: broken
styles:
  "Button":
    good: 4
    bad: "#notacolor"
"##,
        )
        .unwrap();

        let source = StyleSource::from_data(data, &values);
        assert_eq!(source.styles().len(), 1);
        assert_eq!(source.styles()[0].props.len(), 1);
        assert_eq!(source.styles()[0].props[0].0, "good");
    }

    #[test]
    fn test_memory_store_replacement_keeps_order() {
        let store = MemoryStyleStore::default();
        store.insert(StyleSource::builder("a").build());
        store.insert(StyleSource::builder("b").build());
        store.insert(StyleSource::builder("a").parent("b").build());

        let all = store.all();
        let ids: Vec<&str> = all.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.try_index("a").unwrap().parents(), ["b"]);
    }
}
