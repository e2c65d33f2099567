//! Dynamic value model: raw tagged descriptions, the typed-value reader,
//! and lazily resolved runtime values.
//!
//! Style documents describe property values in a compact tagged form (see
//! [`RawValue`]). The reader classifies bare scalars and structured mappings
//! into a [`DynamicValue`], which is either an already-concrete [`Value`] or
//! a deferred computation resolved against a value store on first read.

mod raw;
mod reader;
mod types;

use once_cell::unsync::OnceCell;

use crate::error::Result;
use crate::source::ValueStore;

pub use raw::{ParentRef, RawMap, RawValue};
pub use reader::read;
pub use types::{Color, EnumValue, Value, Vec2};

/// A property value that may still require resolution against a value store.
///
/// Deferred values are evaluated at most once: a successful resolution is
/// memoized, a failed one is retried on the next read.
#[derive(Debug)]
pub struct DynamicValue {
    slot: Slot,
}

#[derive(Debug)]
enum Slot {
    Immediate(Value),
    Deferred {
        pending: reader::Pending,
        cell: OnceCell<Value>,
    },
}

impl DynamicValue {
    pub(crate) fn immediate(value: Value) -> Self {
        DynamicValue {
            slot: Slot::Immediate(value),
        }
    }

    pub(crate) fn deferred(pending: reader::Pending) -> Self {
        DynamicValue {
            slot: Slot::Deferred {
                pending,
                cell: OnceCell::new(),
            },
        }
    }

    /// Whether this value still awaits resolution against a value store.
    /// Once a deferred value resolves successfully this stays `true`; the
    /// distinction is about construction, not current state.
    pub fn is_deferred(&self) -> bool {
        matches!(self.slot, Slot::Deferred { .. })
    }

    /// Resolve to a concrete runtime value, evaluating and memoizing any
    /// deferred computation on first success.
    pub fn resolve(&self, values: &dyn ValueStore) -> Result<Value> {
        match &self.slot {
            Slot::Immediate(value) => Ok(value.clone()),
            Slot::Deferred { pending, cell } => cell
                .get_or_try_init(|| reader::evaluate(pending, values, 0))
                .cloned(),
        }
    }
}
