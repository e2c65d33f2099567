//! # restyle
//!
//! Hot-reloadable stylesheet resolution, merging, and caching for a tree of
//! UI controls.
//!
//! Style definitions ([`StyleSource`]) are named, inheritable bundles of
//! selector-path → property rules. The [`StyleManager`] resolves them over
//! their parent chain, merges them into existing rule sets at property
//! granularity, and hands out [`SheetRef`] handles whose contents are
//! republished in place when the underlying definitions are hot-reloaded —
//! attached observers and live controls pick up the change without
//! re-subscribing or re-fetching.
//!
//! ## Quick start
//!
//! ```
//! use std::rc::Rc;
//! use restyle::{
//!     MemoryStyleStore, MemoryTypeRegistry, MemoryValueStore, RuleSet, StyleManager,
//!     StyleSource,
//! };
//!
//! let styles = MemoryStyleStore::default();
//! styles.insert(
//!     StyleSource::builder("base")
//!         .prop("Button", "color", "#ff0000")
//!         .build(),
//! );
//! styles.insert(
//!     StyleSource::builder("dark")
//!         .parent("base")
//!         .prop("Button", "color", "#220000")
//!         .build(),
//! );
//!
//! let mut registry = MemoryTypeRegistry::default();
//! registry.register("Button");
//!
//! let mut manager = StyleManager::new(
//!     Rc::new(styles),
//!     Rc::new(MemoryValueStore::default()),
//!     Rc::new(registry),
//! );
//!
//! // Ancestor rules come first; merging collapses them per selector.
//! let rules = manager.rules("dark").unwrap();
//! assert_eq!(rules.len(), 2);
//!
//! let merged = manager.merge(&Rc::new(RuleSet::default()), "dark").unwrap();
//! assert_eq!(merged.get().len(), 1);
//! ```
//!
//! Collaborators — the style/value stores, the element type registry, and
//! the UI tree — are consumed through traits ([`StyleStore`], [`ValueStore`],
//! [`TypeRegistry`], [`UiRoot`]/[`Control`]) so hosts plug in their own
//! storage and widget machinery. The in-memory implementations cover tests
//! and simple embedders.

pub mod error;
pub mod manager;
pub mod reactive;
pub mod registry;
pub mod selector;
pub mod sheet;
pub mod source;
pub mod ui;
pub mod value;

pub use error::{Error, Result};
pub use manager::StyleManager;
pub use reactive::{SheetRef, Subscription};
pub use registry::{ControlType, MemoryTypeRegistry, TypeRegistry};
pub use selector::{ElementSelector, Selector};
pub use sheet::{Property, RuleSet, StyleRule};
pub use source::{
    MemoryStyleStore, MemoryValueStore, StyleSource, StyleSourceData, StyleStore, ValueSource,
    ValueSourceData, ValueStore,
};
pub use ui::{Control, UiRoot};
pub use value::{Color, DynamicValue, EnumValue, RawValue, Value, Vec2};
