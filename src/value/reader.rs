//! The typed-value reader: raw descriptions to concrete runtime values.

use crate::error::{Error, Result};
use crate::source::ValueStore;

use super::raw::{ParentRef, RawMap, RawValue};
use super::types::{Color, EnumValue, Value, Vec2};
use super::DynamicValue;

/// Bound on reference/parent chains between value sources. Chains this deep
/// are configuration errors, not legitimate indirection.
const MAX_REFERENCE_DEPTH: usize = 32;

/// A deferred computation awaiting a value store.
#[derive(Debug, Clone)]
pub(crate) enum Pending {
    /// Bare scalar that matched no literal form: a named value source.
    Reference(String),
    /// Structured form flagged `isLazy`.
    Structured(RawMap),
}

/// Read a raw value description into a [`DynamicValue`].
///
/// Bare textual forms are tried in order: numeric literal, `#` color,
/// `enum.` reference, two-token vector, and finally a reference to a named
/// value source (always deferred). Structured mappings resolve their parent
/// overlay eagerly unless flagged `isLazy`.
pub fn read(raw: &RawValue, values: &dyn ValueStore) -> Result<DynamicValue> {
    match raw {
        RawValue::Number(n) => Ok(DynamicValue::immediate(Value::Number(*n))),
        RawValue::Text(text) => classify_scalar(text),
        RawValue::Map(map) => {
            if map.value_type.is_none() && map.parent.is_none() {
                return Err(Error::UnresolvedValueType(format!("{map:?}")));
            }
            if map.is_lazy {
                Ok(DynamicValue::deferred(Pending::Structured(map.clone())))
            } else {
                evaluate_map(map, values, 0).map(DynamicValue::immediate)
            }
        }
    }
}

/// Classify a bare textual form per the scalar parse policy.
fn classify_scalar(text: &str) -> Result<DynamicValue> {
    if let Ok(number) = text.parse::<f32>() {
        return Ok(DynamicValue::immediate(Value::Number(number)));
    }

    if text.starts_with('#') {
        return Color::from_hex(text).map(|c| DynamicValue::immediate(Value::Color(c)));
    }

    if let Some(path) = text.strip_prefix("enum.") {
        if path.is_empty() {
            return Err(Error::Validation(format!("empty enum reference '{text}'")));
        }
        return Ok(DynamicValue::immediate(Value::Enum(EnumValue::new(path))));
    }

    if let Some(vec) = Vec2::parse_args(text) {
        return Ok(DynamicValue::immediate(Value::Vector2(vec)));
    }

    // Anything else names another value source, resolved on first read.
    Ok(DynamicValue::deferred(Pending::Reference(text.to_string())))
}

/// Evaluate a deferred computation against the value store.
pub(crate) fn evaluate(pending: &Pending, values: &dyn ValueStore, depth: usize) -> Result<Value> {
    if depth > MAX_REFERENCE_DEPTH {
        return Err(Error::Validation(
            "value reference chain too deep (cycle?)".to_string(),
        ));
    }

    match pending {
        Pending::Reference(id) => {
            let source = values
                .try_index(id)
                .ok_or_else(|| Error::value_not_found(id))?;
            evaluate_raw(source.value(), values, depth + 1)
        }
        Pending::Structured(map) => evaluate_map(map, values, depth),
    }
}

/// Fully resolve a raw value, following references eagerly.
fn evaluate_raw(raw: &RawValue, values: &dyn ValueStore, depth: usize) -> Result<Value> {
    match read(raw, values)? {
        DynamicValue {
            slot: super::Slot::Immediate(value),
        } => Ok(value),
        DynamicValue {
            slot: super::Slot::Deferred { pending, .. },
        } => evaluate(&pending, values, depth),
    }
}

/// Evaluate a structured mapping: overlay the parent chain, then parse the
/// payload under the declared kind.
fn evaluate_map(map: &RawMap, values: &dyn ValueStore, depth: usize) -> Result<Value> {
    let flat = flatten(map, values, depth)?;

    let kind = flat
        .value_type
        .as_deref()
        .ok_or_else(|| Error::UnresolvedValueType(format!("{map:?}")))?;
    let payload = flat
        .value
        .as_deref()
        .ok_or_else(|| Error::Validation(format!("value description for '{kind}' has no value")))?;

    typed_read(kind, payload)
}

/// Collapse the parent chain of a structured mapping into one mapping,
/// own fields overriding inherited ones.
fn flatten(map: &RawMap, values: &dyn ValueStore, depth: usize) -> Result<RawMap> {
    if depth > MAX_REFERENCE_DEPTH {
        return Err(Error::Validation(
            "value parent chain too deep (cycle?)".to_string(),
        ));
    }

    let Some(parent) = &map.parent else {
        return Ok(map.clone());
    };

    let base = match parent {
        ParentRef::Inline(inline) => flatten(inline, values, depth + 1)?,
        ParentRef::Id(id) => {
            let source = values
                .try_index(id)
                .ok_or_else(|| Error::value_not_found(id))?;
            match source.value() {
                RawValue::Map(parent_map) => flatten(parent_map, values, depth + 1)?,
                other => {
                    return Err(Error::Validation(format!(
                        "parent '{id}' is not a structured value description: {other:?}"
                    )));
                }
            }
        }
    };

    let mut merged = base;
    if map.value_type.is_some() {
        merged.value_type = map.value_type.clone();
    }
    if map.value.is_some() {
        merged.value = map.value.clone();
    }
    merged.parent = None;
    merged.is_lazy = map.is_lazy;
    Ok(merged)
}

/// Parse a payload under an explicitly declared kind.
fn typed_read(kind: &str, payload: &RawValue) -> Result<Value> {
    match kind {
        "Number" => match payload {
            RawValue::Number(n) => Ok(Value::Number(*n)),
            RawValue::Text(text) => text
                .parse::<f32>()
                .map(Value::Number)
                .map_err(|_| Error::Validation(format!("unparseable number '{text}'"))),
            RawValue::Map(_) => Err(bad_payload(kind, payload)),
        },
        "Color" => match payload {
            RawValue::Text(text) => Color::from_hex(text).map(Value::Color),
            _ => Err(bad_payload(kind, payload)),
        },
        "Vector2" => match payload {
            RawValue::Text(text) => Vec2::parse_args(text)
                .map(Value::Vector2)
                .ok_or_else(|| Error::Validation(format!("unparseable vector '{text}'"))),
            _ => Err(bad_payload(kind, payload)),
        },
        "Enum" => match payload {
            RawValue::Text(text) => {
                let path = text.strip_prefix("enum.").unwrap_or(text);
                if path.is_empty() {
                    return Err(Error::Validation(format!("empty enum reference '{text}'")));
                }
                Ok(Value::Enum(EnumValue::new(path)))
            }
            _ => Err(bad_payload(kind, payload)),
        },
        other => Err(Error::UnresolvedValueType(other.to_string())),
    }
}

fn bad_payload(kind: &str, payload: &RawValue) -> Error {
    Error::Validation(format!("bad payload for '{kind}': {payload:?}"))
}
