//! Record traits and the field mapping used by entity factories.
//!
//! A `Record` is one item of a `Collection`. It exposes its fields by name so the
//! filter engine can address them without knowing the concrete kind.

use crate::error::{Error, Result};
use crate::types::DataType;
use crate::value::Value;
use alloc::collections::btree_map::{self, BTreeMap};
use alloc::string::{String, ToString};

/// Identifier of a record within its collection.
pub type RecordId = u64;

/// Sentinel id meaning "not assigned yet". Collections replace it on append.
pub const UNASSIGNED_ID: RecordId = 0;

/// Highest id a record can carry. Ids are exposed to queries as `Value::Int`.
pub const MAX_RECORD_ID: RecordId = i64::MAX as RecordId;

/// Field name shared by every record kind.
pub const ID: &str = "id";

/// A record with a stable numeric identity and named fields.
pub trait Record: Clone {
    /// Kind name used in error messages, e.g. `"image"`.
    const KIND: &'static str;

    /// Names of every field `field` can resolve.
    const FIELDS: &'static [&'static str];

    /// Returns the record id.
    fn id(&self) -> RecordId;

    /// Sets the record id.
    fn set_id(&mut self, id: RecordId);

    /// Returns the value of a named field, or None if the kind has no such field.
    ///
    /// Optional fields that are unset resolve to `Value::Null`.
    fn field(&self, name: &str) -> Option<Value>;

    /// Returns true if `name` is one of the kind's fields.
    fn has_field(name: &str) -> bool {
        Self::FIELDS.contains(&name)
    }
}

/// Factory half of a record kind: conversion from and to a field mapping.
pub trait Entity: Record + Sized {
    /// Builds a validated record from a field mapping.
    fn from_fields(fields: &Fields) -> Result<Self>;

    /// Returns an equivalent field mapping.
    fn to_fields(&self) -> Fields;
}

/// Field-name-to-value mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    map: BTreeMap<String, Value>,
}

impl Fields {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.map.insert(name.into(), value.into());
        self
    }

    /// Inserts a field, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(name.into(), value.into())
    }

    /// Gets a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// Removes a field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.map.remove(name)
    }

    /// Returns true if the field is present, even when Null.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.map.iter()
    }

    /// Returns a present, non-null field or a `MissingField` error.
    pub fn require(&self, kind: &'static str, name: &str) -> Result<&Value> {
        match self.map.get(name) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(Error::missing_field(kind, name)),
        }
    }

    /// Returns a present, non-null field or None.
    pub fn optional(&self, name: &str) -> Option<&Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    pub fn require_int(&self, kind: &'static str, name: &str) -> Result<i64> {
        let value = self.require(kind, name)?;
        to_int(value).ok_or_else(|| malformed(kind, name, DataType::Int, value))
    }

    pub fn optional_int(&self, kind: &'static str, name: &str) -> Result<Option<i64>> {
        match self.optional(name) {
            Some(value) => to_int(value)
                .map(Some)
                .ok_or_else(|| malformed(kind, name, DataType::Int, value)),
            None => Ok(None),
        }
    }

    pub fn require_float(&self, kind: &'static str, name: &str) -> Result<f64> {
        let value = self.require(kind, name)?;
        to_float(value).ok_or_else(|| malformed(kind, name, DataType::Float, value))
    }

    pub fn optional_float(&self, kind: &'static str, name: &str) -> Result<Option<f64>> {
        match self.optional(name) {
            Some(value) => to_float(value)
                .map(Some)
                .ok_or_else(|| malformed(kind, name, DataType::Float, value)),
            None => Ok(None),
        }
    }

    pub fn require_string(&self, kind: &'static str, name: &str) -> Result<String> {
        let value = self.require(kind, name)?;
        to_string(value).ok_or_else(|| malformed(kind, name, DataType::String, value))
    }

    pub fn optional_string(&self, kind: &'static str, name: &str) -> Result<Option<String>> {
        match self.optional(name) {
            Some(value) => to_string(value)
                .map(Some)
                .ok_or_else(|| malformed(kind, name, DataType::String, value)),
            None => Ok(None),
        }
    }

    pub fn require_list(&self, kind: &'static str, name: &str) -> Result<&[Value]> {
        let value = self.require(kind, name)?;
        value
            .as_list()
            .ok_or_else(|| malformed(kind, name, DataType::List, value))
    }

    /// Reads the `id` field; absent or null means `UNASSIGNED_ID`.
    pub fn record_id(&self, kind: &'static str) -> Result<RecordId> {
        match self.optional_int(kind, ID)? {
            Some(id) if id < 0 => Err(Error::MalformedField {
                kind,
                field: ID.to_string(),
                expected: DataType::Int,
                got: Some(DataType::Int),
            }),
            Some(id) => Ok(id as RecordId),
            None => Ok(UNASSIGNED_ID),
        }
    }
}

fn malformed(kind: &'static str, name: &str, expected: DataType, got: &Value) -> Error {
    Error::MalformedField {
        kind,
        field: name.to_string(),
        expected,
        got: got.data_type(),
    }
}

/// Integer coercion: floats truncate, numeric strings parse.
fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() => Some(*f as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Scalars render to their text form; sequences and payloads are rejected.
fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<BTreeMap<String, Value>> for Fields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self { map }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_and_null() {
        let fields = Fields::new().with("name", Value::Null);
        assert!(matches!(
            fields.require("category", "name"),
            Err(Error::MissingField { field, .. }) if field == "name"
        ));
        assert!(matches!(
            fields.require("category", "other"),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn test_int_coercion() {
        let fields = Fields::new()
            .with("a", 3i64)
            .with("b", 3.9)
            .with("c", "12")
            .with("d", "twelve");
        assert_eq!(fields.require_int("k", "a").unwrap(), 3);
        assert_eq!(fields.require_int("k", "b").unwrap(), 3);
        assert_eq!(fields.require_int("k", "c").unwrap(), 12);
        assert!(matches!(
            fields.require_int("k", "d"),
            Err(Error::MalformedField { expected: DataType::Int, .. })
        ));
        assert_eq!(fields.optional_int("k", "missing").unwrap(), None);
    }

    #[test]
    fn test_string_coercion() {
        let fields = Fields::new().with("n", 5i64).with("l", [1i64, 2]);
        assert_eq!(fields.require_string("k", "n").unwrap(), "5");
        assert!(fields.require_string("k", "l").is_err());
    }

    #[test]
    fn test_record_id() {
        assert_eq!(Fields::new().record_id("k").unwrap(), UNASSIGNED_ID);
        assert_eq!(Fields::new().with(ID, 4i64).record_id("k").unwrap(), 4);
        assert!(Fields::new().with(ID, -1i64).record_id("k").is_err());
    }

    #[test]
    fn test_from_iter() {
        let fields: Fields = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("b"), Some(&Value::Int(2)));
    }
}
