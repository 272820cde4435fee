//! Value types for Scrive objects
//!
//! This module defines:
//! - Value: the dynamic value flowing through validators, descriptors and
//!   owned collections
//!
//! ## Type Rules
//!
//! - Different variants are NEVER equal: `Int(1) != Float(1.0)`
//! - Floats compare by bit pattern (after folding `-0.0` into `0.0`) so that
//!   `Value` can be `Eq + Hash` and live inside a [`ScriveSet`]
//! - Objects, sets and maps compare by identity, matching how a managed
//!   object graph is shared
//!
//! ## Text Representation
//!
//! `Display` renders the textual representation used by validator failure
//! messages: `91`, `"x"`, `null`, `[1, "x"]`, `<Document>`.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::lifecycle::Managed;
use crate::map::ScriveMap;
use crate::object::Object;
use crate::set::ScriveSet;
use crate::validator::Validator;
use crate::wire_enum::EnumValue;

/// Dynamic value of a managed attribute or collection member
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Member of a wire enum
    Enum(EnumValue),
    /// Unmanaged sequence (constructor input, pairs, wire arrays)
    List(Vec<Value>),
    /// Managed object
    Object(Object),
    /// Owned validated set
    Set(ScriveSet),
    /// Owned validated string-keyed mapping
    Map(ScriveMap),
}

fn float_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Set(a), Value::Set(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            // Different types are NEVER equal
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => float_bits(*f).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Enum(e) => e.hash(state),
            Value::List(items) => items.hash(state),
            Value::Object(o) => o.addr().hash(state),
            Value::Set(s) => s.addr().hash(state),
            Value::Map(m) => m.addr().hash(state),
        }
    }
}

impl Value {
    /// Short description of the runtime kind, as used in failure messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Enum(e) => e.spec().type_name,
            Value::List(_) => "list",
            Value::Object(o) => o.type_name(),
            Value::Set(_) => "set",
            Value::Map(_) => "mapping",
        }
    }

    /// Textual representation, identical to `Display`
    pub fn repr(&self) -> String {
        self.to_string()
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is a List value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the managed object, if any
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the owned set, if any
    pub fn as_set(&self) -> Option<&ScriveSet> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Get the owned map, if any
    pub fn as_map(&self) -> Option<&ScriveMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The lifecycle-carrying node behind this value, if any
    pub fn as_managed(&self) -> Option<&dyn Managed> {
        match self {
            Value::Object(o) => Some(o),
            Value::Set(s) => Some(s),
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Encode for the wire
    ///
    /// Enums become their wire string, objects their `to_wire` mapping,
    /// sets arrays and maps JSON objects. Fails if a nested managed value
    /// is invalid.
    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number((*i).into()),
            Value::Float(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => JsonValue::Number(n),
                None => {
                    return Err(Error::ValueRejected(format!(
                        "wire numbers must be finite, not: {}",
                        self
                    )))
                }
            },
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Enum(e) => JsonValue::String(e.wire().to_string()),
            Value::List(items) => JsonValue::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(o) => JsonValue::Object(o.to_wire()?),
            Value::Set(s) => JsonValue::Array(
                s.to_vec()?
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(m) => {
                let mut out = serde_json::Map::new();
                for (key, value) in m.items()? {
                    out.insert(key, value.to_json()?);
                }
                JsonValue::Object(out)
            }
        })
    }

    /// Shape-agnostic wire decoding
    ///
    /// Used where no validator dictates a shape. JSON objects become
    /// unvalidated [`ScriveMap`]s.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            JsonValue::String(s) => Value::Text(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(entries) => Value::Map(ScriveMap::from_entries_unchecked(
                Validator::any(),
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v))),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Enum(e) => write!(f, "{}", e),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
            Value::Set(s) => {
                f.write_str("{")?;
                for (i, item) in s.snapshot().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (key, value)) in m.snapshot().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<ScriveSet> for Value {
    fn from(s: ScriveSet) -> Self {
        Value::Set(s)
    }
}

impl From<ScriveMap> for Value {
    fn from(m: ScriveMap) -> Self {
        Value::Map(m)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Build a `Vec<Value>` from heterogeneous literals
///
/// ```
/// use scrive_core::{values, Value};
/// let items = values![1, "x", true];
/// assert_eq!(items[1], Value::from("x"));
/// ```
#[macro_export]
macro_rules! values {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::Value::from($item)),*]
    };
}

/// Build a `Value::List` of two-element lists from `(key, value)` pairs
///
/// ```
/// use scrive_core::{pairs, Value};
/// let p = pairs![("a", "b")];
/// assert_eq!(p.as_list().map(|l| l.len()), Some(1));
/// ```
#[macro_export]
macro_rules! pairs {
    ($(($key:expr, $value:expr)),* $(,)?) => {
        $crate::Value::List(vec![$($crate::Value::List(vec![
            $crate::Value::from($key),
            $crate::Value::from($value),
        ])),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_non_finite_float_has_no_wire_form() {
        assert_eq!(
            Value::Float(f64::NEG_INFINITY).to_json(),
            Err(Error::ValueRejected(
                "wire numbers must be finite, not: -inf".into()
            ))
        );
        assert_eq!(Value::Float(0.5).to_json(), Ok(json!(0.5)));
    }

    #[test]
    fn test_different_types_never_equal() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Text("1".into()), Value::Int(1));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_zero_floats_equal_and_hash_alike() {
        let pos = Value::Float(0.0);
        let neg = Value::Float(-0.0);
        assert_eq!(pos, neg);
        assert_eq!(hash_of(&pos), hash_of(&neg));
    }

    #[test]
    fn test_display_representations() {
        assert_eq!(Value::Int(91).to_string(), "91");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(values![1, "x"].len(), 2);
        assert_eq!(Value::List(values![1, "x"]).to_string(), "[1, \"x\"]");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Int(3).kind(), "int");
        assert_eq!(Value::from("a").kind(), "text");
        assert_eq!(Value::List(vec![]).kind(), "list");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn test_json_scalars_round_trip() {
        for json in [json!(null), json!(true), json!(7), json!(2.5), json!("t")] {
            assert_eq!(Value::from_json(&json).to_json().unwrap(), json);
        }
    }

    #[test]
    fn test_json_array_becomes_list() {
        let value = Value::from_json(&json!([1, "a"]));
        assert_eq!(value, Value::List(values![1, "a"]));
    }

    #[test]
    fn test_json_object_becomes_map() {
        let value = Value::from_json(&json!({"a": 1}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a").unwrap(), Some(Value::Int(1)));
        assert_eq!(value.to_json().unwrap(), json!({"a": 1}));
    }
}
