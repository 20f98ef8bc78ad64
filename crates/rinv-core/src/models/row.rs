//! Raw host records and best-effort value coercion.
//!
//! The host owns the schema, so a [`RawRow`] is a permissive key-value map.
//! Every lookup is explicit: [`RawRow::has`] answers "is the key there at all",
//! while [`RawRow::field`] treats a `null` value the same as a missing key.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record as supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Parse a row from JSON text.
    pub fn from_json(text: &str) -> crate::Result<Option<Self>> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the key is present, whatever its value (including `null`).
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Non-null value stored under `key`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Nested mapping stored under `key`.
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    pub fn object_mut(&mut self, key: &str) -> Option<&mut Map<String, Value>> {
        self.0.get_mut(key).and_then(Value::as_object_mut)
    }

    /// Field rendered as text (numbers and booleans are stringified).
    pub fn text(&self, key: &str) -> Option<String> {
        self.field(key).and_then(value_text)
    }

    /// Field coerced to a number.
    pub fn amount(&self, key: &str) -> Option<Decimal> {
        self.field(key).and_then(value_amount)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Insert a value only when the key is missing. Returns whether it was inserted.
    pub fn insert_missing(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), value.into());
        true
    }

    /// Shallow-merge `other` over this row; its entries win.
    pub fn merge(&mut self, other: &Map<String, Value>) {
        for (key, value) in other {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<RawRow> for Value {
    fn from(row: RawRow) -> Self {
        Value::Object(row.0)
    }
}

/// Coerce a value to a number. Numeric strings are accepted; anything else is `None`.
pub fn value_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

/// Render a scalar value as text. Containers and `null` yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Host-style truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Encode a decimal as a JSON number, preferring integers when exact.
pub fn decimal_to_value(amount: Decimal) -> Value {
    if amount.fract().is_zero() {
        if let Some(int) = amount.to_i64() {
            return Value::from(int);
        }
    }
    amount.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
