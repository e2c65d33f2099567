//! Runtime value types produced by the typed-value reader.

use std::fmt;

use crate::error::{Error, Result};

/// A fully resolved style property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unitless number
    Number(f32),
    /// RGBA color
    Color(Color),
    /// 2D vector (sizes, offsets)
    Vector2(Vec2),
    /// Symbolic enum reference (`enum.AlignMode.Center`)
    Enum(EnumValue),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Color(c) => write!(f, "{c}"),
            Value::Vector2(v) => write!(f, "{},{}", v.x, v.y),
            Value::Enum(e) => write!(f, "enum.{}", e.path()),
        }
    }
}

/// Color value, R/G/B/A in 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    /// Parse a `#RGB`, `#RRGGBB`, or `#RRGGBBAA` literal.
    pub fn from_hex(text: &str) -> Result<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        // Byte slicing below requires char boundaries everywhere.
        if !hex.is_ascii() {
            return Err(Error::Validation(format!(
                "unparseable color literal '{text}'"
            )));
        }
        let parsed = match hex.len() {
            3 => {
                // #RGB -> #RRGGBB
                let r = component(&hex[0..1])? * 17;
                let g = component(&hex[1..2])? * 17;
                let b = component(&hex[2..3])? * 17;
                Color::rgb(r, g, b)
            }
            6 => Color::rgb(
                component(&hex[0..2])?,
                component(&hex[2..4])?,
                component(&hex[4..6])?,
            ),
            8 => Color::rgba(
                component(&hex[0..2])?,
                component(&hex[2..4])?,
                component(&hex[4..6])?,
                component(&hex[6..8])?,
            ),
            _ => {
                return Err(Error::Validation(format!(
                    "unparseable color literal '{text}'"
                )));
            }
        };
        Ok(parsed)
    }
}

fn component(hex: &str) -> Result<u8> {
    u8::from_str_radix(hex, 16)
        .map_err(|_| Error::Validation(format!("bad hex digit '{hex}' in color literal")))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// 2D vector value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Parse two comma/space separated numeric tokens (`"4, 8"`, `"4 8"`).
    pub fn parse_args(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text.split([',', ' ']).filter(|s| !s.is_empty()).collect();
        if parts.len() != 2 {
            return None;
        }
        let x: f32 = parts[0].trim().parse().ok()?;
        let y: f32 = parts[1].trim().parse().ok()?;
        Some(Vec2::new(x, y))
    }
}

/// Symbolic reference into a host-defined enum, kept as the dotted path
/// after the `enum.` prefix. The host interprets the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    path: String,
}

impl EnumValue {
    pub fn new(path: impl Into<String>) -> Self {
        EnumValue { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
