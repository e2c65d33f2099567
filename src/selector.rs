//! Selector expressions and the path-string parser.
//!
//! A selector path is a compact pattern over the control tree:
//! spaces separate ancestor from descendant, `.` introduces class tags,
//! `:` introduces pseudo-state tags, and a leading `*` (or nothing) leaves
//! the element type unconstrained. `"Window Label.red:hover"` matches a
//! `Label` with class `red` in state `hover` somewhere under a `Window`.

use std::fmt;

use crate::error::{Error, Result};
use crate::registry::{ControlType, TypeRegistry};
use crate::source::StyleSource;

/// An immutable, composable pattern over the UI control tree.
///
/// Equality is structural; selectors are used as grouping keys when rule
/// sets are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A single element constraint.
    Element(ElementSelector),
    /// Ancestor/descendant combination.
    Child {
        parent: Box<Selector>,
        child: Box<Selector>,
    },
}

/// Type, class-tag, and pseudo-state constraints on one element.
///
/// Tag order is insertion order and participates in equality and printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ElementSelector {
    pub element_type: Option<ControlType>,
    pub classes: Vec<String>,
    pub pseudo: Vec<String>,
}

impl Selector {
    /// Parse a selector path. The owning style source, when given, supplies
    /// short type aliases; the registry resolves type names to descriptors.
    pub fn parse(
        path: &str,
        owner: Option<&StyleSource>,
        registry: &dyn TypeRegistry,
    ) -> Result<Selector> {
        let mut tokens = path.split(' ').filter(|t| !t.is_empty());
        let Some(first) = tokens.next() else {
            return Err(Error::Validation("empty selector path".to_string()));
        };

        let rest = tokens.collect::<Vec<_>>().join(" ");
        if rest.is_empty() {
            return parse_element(first, owner, registry);
        }

        // Descendant combinator: first token is the ancestor, the remainder
        // recurses into a right-leaning chain.
        Ok(Selector::Child {
            parent: Box::new(parse_element(first, owner, registry)?),
            child: Box::new(Selector::parse(&rest, owner, registry)?),
        })
    }
}

fn parse_element(
    token: &str,
    owner: Option<&StyleSource>,
    registry: &dyn TypeRegistry,
) -> Result<Selector> {
    let mut pseudo_parts = token.split(':');
    // split always yields at least one entry
    let base = pseudo_parts.next().unwrap_or_default();

    let mut class_parts = base.split('.');
    let type_name = class_parts.next().unwrap_or_default();

    let mut element = ElementSelector::default();

    if type_name != "*" && !type_name.is_empty() {
        let resolved = owner
            .and_then(|source| source.type_alias(type_name))
            .unwrap_or(type_name);
        element.element_type = Some(
            registry
                .resolve_type(resolved)
                .ok_or_else(|| Error::UnknownType(resolved.to_string()))?,
        );
    }

    element.classes.extend(class_parts.map(str::to_string));
    element.pseudo.extend(pseudo_parts.map(str::to_string));

    Ok(Selector::Element(element))
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Element(element) => {
                match &element.element_type {
                    Some(ty) => write!(f, "{}", ty.name())?,
                    None => write!(f, "*")?,
                }
                for class in &element.classes {
                    write!(f, ".{class}")?;
                }
                for pseudo in &element.pseudo {
                    write!(f, ":{pseudo}")?;
                }
                Ok(())
            }
            Selector::Child { parent, child } => write!(f, "{parent} {child}"),
        }
    }
}
