//! Element type registry collaborator.

use std::collections::HashSet;
use std::rc::Rc;

/// Descriptor for a concrete UI element type, as resolved by the host's
/// type registry. Cheap to clone; equality is by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlType {
    name: Rc<str>,
}

impl ControlType {
    pub fn new(name: impl AsRef<str>) -> Self {
        ControlType {
            name: Rc::from(name.as_ref()),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolves qualified element type names to descriptors. Implemented by the
/// host UI framework; selector building is the only consumer.
pub trait TypeRegistry {
    fn resolve_type(&self, qualified_name: &str) -> Option<ControlType>;
}

/// In-memory registry over a fixed set of known type names.
#[derive(Debug, Default)]
pub struct MemoryTypeRegistry {
    types: HashSet<String>,
}

impl MemoryTypeRegistry {
    pub fn register(&mut self, name: impl Into<String>) {
        self.types.insert(name.into());
    }
}

impl TypeRegistry for MemoryTypeRegistry {
    fn resolve_type(&self, qualified_name: &str) -> Option<ControlType> {
        self.types
            .contains(qualified_name)
            .then(|| ControlType::new(qualified_name))
    }
}
