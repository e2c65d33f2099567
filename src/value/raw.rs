//! Raw (unresolved) value descriptions as they appear in style documents.
//!
//! A raw value is either a bare scalar (classified later by the reader) or a
//! structured mapping carrying an explicit `valueType`, an optional `parent`
//! to overlay, and an `isLazy` flag deferring evaluation.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

/// A tagged, possibly-structured value description prior to typed reading.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Bare textual form, classified by the reader's parse policy.
    Text(String),
    /// Bare numeric form.
    Number(f32),
    /// Structured form with explicit type / parent / laziness.
    Map(RawMap),
}

/// The structured mapping form of a value description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawMap {
    /// Declared value kind (`Number`, `Color`, `Vector2`, `Enum`).
    pub value_type: Option<String>,
    /// The payload parsed under the declared kind.
    pub value: Option<Box<RawValue>>,
    /// Defer evaluation until first read.
    pub is_lazy: bool,
    /// Base description overlaid by this one's own fields.
    pub parent: Option<ParentRef>,
}

/// Parent of a structured value: a named value source or an inline mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ParentRef {
    Id(String),
    Inline(Box<RawMap>),
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Text(text.to_string())
    }
}

impl From<f32> for RawValue {
    fn from(number: f32) -> Self {
        RawValue::Number(number)
    }
}

impl From<f64> for RawValue {
    fn from(number: f64) -> Self {
        RawValue::Number(number as f32)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar value or a value description mapping")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::Text(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawValue, E> {
        Ok(RawValue::Number(v as f32))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::Number(v as f32))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
        Ok(RawValue::Number(v as f32))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<RawValue, A::Error> {
        read_raw_map(map).map(RawValue::Map)
    }
}

impl<'de> Deserialize<'de> for RawMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawMapVisitor;

        impl<'de> Visitor<'de> for RawMapVisitor {
            type Value = RawMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a value description mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<RawMap, A::Error> {
                read_raw_map(map)
            }
        }

        deserializer.deserialize_map(RawMapVisitor)
    }
}

fn read_raw_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<RawMap, A::Error> {
    let mut out = RawMap::default();
    while let Some(key) = map.next_key::<String>()? {
        match key.as_str() {
            "valueType" => out.value_type = Some(map.next_value()?),
            "value" => out.value = Some(Box::new(map.next_value()?)),
            "isLazy" => out.is_lazy = map.next_value()?,
            "parent" => out.parent = Some(map.next_value()?),
            _ => {
                map.next_value::<IgnoredAny>()?;
            }
        }
    }
    Ok(out)
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ParentVisitor;

        impl<'de> Visitor<'de> for ParentVisitor {
            type Value = ParentRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a value source id or an inline value description")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ParentRef, E> {
                Ok(ParentRef::Id(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ParentRef, E> {
                Ok(ParentRef::Id(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<ParentRef, A::Error> {
                read_raw_map(map).map(|m| ParentRef::Inline(Box::new(m)))
            }
        }

        deserializer.deserialize_any(ParentVisitor)
    }
}
