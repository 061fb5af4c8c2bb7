//! Value adapters for MaaS360's loosely typed JSON.
//!
//! The vendor is inconsistent about scalar encoding: the same field can
//! arrive as `123`, `"123"` or `""` depending on endpoint, platform and
//! whether the value is set at all. Lists with a single element are
//! sometimes sent as a bare object. The types here normalize those shapes
//! once, at the serde layer, so record structs can use them as plain fields.
//!
//! - [`FlexibleInt`]: integer that may be a number, a numeric string, or
//!   empty.
//! - [`FlexibleString`]: identifier that may be a string or a number.
//! - [`OneOrMany`]: list that may be an array, a single object, or absent.

use std::fmt;

use serde::de::{self, DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── FlexibleInt ────────────────────────────────────────────────────────

/// An integer the vendor may encode as a JSON number or a JSON string.
///
/// Decoding, in order:
/// 1. a JSON integer is `Present`;
/// 2. a string that parses as `i64` is `Present`;
/// 3. anything else (`""`, unparsable text, floats, bools, null, objects)
///    is `Absent`.
///
/// Encoding writes `Present` as a bare number and `Absent` as `""`, which
/// is the vendor's own spelling of "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlexibleInt {
    /// The field was missing, empty or not numeric.
    #[default]
    Absent,
    /// The field carried an integer.
    Present(i64),
}

impl FlexibleInt {
    /// The integer value, or `0` when absent.
    pub fn value(self) -> i64 {
        self.get().unwrap_or(0)
    }

    /// The integer value, if present.
    pub fn get(self) -> Option<i64> {
        match self {
            FlexibleInt::Present(v) => Some(v),
            FlexibleInt::Absent => None,
        }
    }

    /// Whether the vendor sent a usable integer.
    pub fn is_present(self) -> bool {
        matches!(self, FlexibleInt::Present(_))
    }
}

impl From<i64> for FlexibleInt {
    fn from(v: i64) -> Self {
        FlexibleInt::Present(v)
    }
}

impl From<Option<i64>> for FlexibleInt {
    fn from(v: Option<i64>) -> Self {
        v.map_or(FlexibleInt::Absent, FlexibleInt::Present)
    }
}

impl fmt::Display for FlexibleInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleInt::Present(v) => write!(f, "{v}"),
            FlexibleInt::Absent => Ok(()),
        }
    }
}

/// Raw shapes a flexible integer can take on the wire. Variant order is the
/// decoding order.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for FlexibleInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawInt::deserialize(deserializer)?;
        Ok(match raw {
            RawInt::Int(v) => FlexibleInt::Present(v),
            RawInt::Text(s) => s.parse().map_or(FlexibleInt::Absent, FlexibleInt::Present),
            RawInt::Other(_) => FlexibleInt::Absent,
        })
    }
}

impl Serialize for FlexibleInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlexibleInt::Present(v) => serializer.serialize_i64(*v),
            FlexibleInt::Absent => serializer.serialize_str(""),
        }
    }
}

// ── FlexibleString ─────────────────────────────────────────────────────

/// A string-like value (device ID, IMEI, phone number) that the vendor may
/// encode as a JSON string or a JSON number.
///
/// Numbers keep their decimal text form, so `12345` and `"12345"` decode to
/// the same value. Empty strings and non-scalar values are `Absent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FlexibleString {
    /// The field was missing or empty.
    #[default]
    Absent,
    /// The field carried a non-empty value.
    Present(String),
}

impl FlexibleString {
    /// Borrow the value, if present.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FlexibleString::Present(s) => Some(s),
            FlexibleString::Absent => None,
        }
    }

    /// The value, or `""` when absent.
    pub fn as_str(&self) -> &str {
        self.as_deref().unwrap_or("")
    }

    /// Whether the vendor sent a non-empty value.
    pub fn is_present(&self) -> bool {
        matches!(self, FlexibleString::Present(_))
    }
}

impl From<&str> for FlexibleString {
    fn from(s: &str) -> Self {
        FlexibleString::from(s.to_string())
    }
}

impl From<String> for FlexibleString {
    fn from(s: String) -> Self {
        if s.is_empty() {
            FlexibleString::Absent
        } else {
            FlexibleString::Present(s)
        }
    }
}

impl fmt::Display for FlexibleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawString {
    Text(String),
    Number(serde_json::Number),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for FlexibleString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawString::deserialize(deserializer)?;
        Ok(match raw {
            RawString::Text(s) => FlexibleString::from(s),
            RawString::Number(n) => FlexibleString::Present(n.to_string()),
            RawString::Other(_) => FlexibleString::Absent,
        })
    }
}

impl Serialize for FlexibleString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── OneOrMany ──────────────────────────────────────────────────────────

/// A list the vendor collapses to a bare object when it has one element.
///
/// Decodes from an array, a single object, or null (empty list). Always
/// encodes as an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOrMany<T>(pub Vec<T>);

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    /// Unwraps into the underlying list.
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

fn decode_element<T: DeserializeOwned, E: de::Error>(
    value: serde_json::Value,
    index: Option<usize>,
) -> Result<T, E> {
    serde_json::from_value(value).map_err(|e| match index {
        Some(i) => E::custom(format!("list element {i}: {e}")),
        None => E::custom(e),
    })
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Elements are decoded one at a time so a bad field keeps its own
        // error message.
        let items = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Vec::new(),
            serde_json::Value::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| decode_element(v, Some(i)))
                .collect::<Result<Vec<T>, D::Error>>()?,
            single => vec![decode_element(single, None)?],
        };
        Ok(OneOrMany(items))
    }
}

impl<T: Serialize> Serialize for OneOrMany<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// ── Nulls ──────────────────────────────────────────────────────────────

/// Field adapter that decodes an explicit `null` as `T::default()`.
///
/// `#[serde(default)]` only covers missing keys; the vendor also sends
/// `null` for unset strings and empty sections.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
