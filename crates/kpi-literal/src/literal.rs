//! Literal value model
//!
//! [`Literal`] is the closed set of values a table cell may encode. Its
//! [`Display`](std::fmt::Display) implementation is the canonical compact
//! encoding written back to disk.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::{self, Display, Formatter, Write as _};

/// Ordered string-keyed mapping of literals
pub type LiteralMap = IndexMap<String, Literal>;

/// A decoded literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Absent value (`None`)
    None,
    /// Boolean (`True` / `False`)
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// Finite decimal number
    Decimal(f64),
    /// Text
    Str(String),
    /// Ordered sequence
    List(Vec<Literal>),
    /// Ordered mapping with string keys
    Map(LiteralMap),
}

impl Literal {
    /// Short name of the variant, used in error messages
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
        }
    }

    /// Canonical encoding of this value
    #[inline]
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Interpret the value as a record identifier
    ///
    /// Strings are taken verbatim and integers are rendered in decimal; any
    /// other kind has no identifier form.
    #[must_use]
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    /// Borrow the string payload
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of integer and decimal values
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether the value is [`Literal::None`]
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Canonical encoding of a mapping, as stored in value cells
#[must_use]
pub fn encode_map(map: &LiteralMap) -> String {
    MapText(map).to_string()
}

/// Canonical encoding of a list, as stored in allow-list cells
#[must_use]
pub fn encode_list(items: &[Literal]) -> String {
    ListText(items).to_string()
}

struct MapText<'a>(&'a LiteralMap);

impl Display for MapText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_map(f, self.0)
    }
}

struct ListText<'a>(&'a [Literal]);

impl Display for ListText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_list(f, self.0)
    }
}

fn write_list(f: &mut impl fmt::Write, items: &[Literal]) -> fmt::Result {
    f.write_char('[')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{item}")?;
    }
    f.write_char(']')
}

fn write_map(f: &mut impl fmt::Write, map: &LiteralMap) -> fmt::Result {
    f.write_char('{')?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write_quoted(f, key)?;
        write!(f, ":{value}")?;
    }
    f.write_char('}')
}

fn write_quoted(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 || c == '\u{7f}' => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps a '.' or exponent, so the text re-reads as a decimal
            Self::Decimal(d) => write!(f, "{d:?}"),
            Self::Str(s) => write_quoted(f, s),
            Self::List(items) => write_list(f, items),
            Self::Map(map) => write_map(f, map),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Decimal(d) => serializer.serialize_f64(*d),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<LiteralMap> for Literal {
    fn from(value: LiteralMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Literal>> for Literal {
    fn from(value: Vec<Literal>) -> Self {
        Self::List(value)
    }
}
