//! Type-value unification
//!
//! A [`Validator`] is a composable check-and-coerce unit. It accepts a raw
//! [`Value`], verifies its runtime kind, optionally coerces it (int to float,
//! enum variant name to enum member, pairs to a mapping) and optionally runs
//! a semantic check (range, non-emptiness).
//!
//! ## Failure Messages
//!
//! Callers match on exact message text, so every failure is produced by
//! [`Unifier`] in one of two shapes:
//!
//! | Failure | Shape |
//! |---------|-------|
//! | [`Error::TypeMismatch`] | `{subject} {must\|could} be {expected}, not {repr}` |
//! | [`Error::ValueRejected`] | `{subject} {must\|could} be {expectation}, not: {repr}` |
//!
//! `could` marks a soft expectation reported while a coercion fallback
//! failed. Nullable validators append ` or null` to the expected type.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::descriptor::Schema;
use crate::error::{Error, Result};
use crate::map::ScriveMap;
use crate::object::Object;
use crate::set::ScriveSet;
use crate::value::Value;
use crate::wire_enum::{EnumSpec, EnumValue};

/// Signature of a hand-written check used by [`Validator::custom`]
pub type CustomCheck = fn(&Unifier<'_>) -> Result<Value>;

/// Transient state of one check: the subject name and the value under test
pub struct Unifier<'a> {
    subject: &'a str,
    value: Value,
    nullable: bool,
}

impl<'a> Unifier<'a> {
    /// Start checking `value` on behalf of `subject`
    pub fn new(subject: &'a str, value: Value) -> Self {
        Unifier {
            subject,
            value,
            nullable: false,
        }
    }

    /// Name used in failure messages
    pub fn subject(&self) -> &str {
        self.subject
    }

    /// Value under test
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take ownership of the value under test
    pub fn into_value(self) -> Value {
        self.value
    }

    fn verb(soft: bool) -> &'static str {
        if soft {
            "could"
        } else {
            "must"
        }
    }

    /// Build a type failure for `expected`
    pub fn type_error(&self, expected: &str, soft: bool) -> Error {
        let or_null = if self.nullable { " or null" } else { "" };
        Error::TypeMismatch(format!(
            "{} {} be {}{}, not {}",
            self.subject,
            Self::verb(soft),
            expected,
            or_null,
            self.value
        ))
    }

    /// Build a value failure for `expectation`
    pub fn error(&self, expectation: &str, soft: bool) -> Error {
        Error::ValueRejected(format!(
            "{} {} be {}, not: {}",
            self.subject,
            Self::verb(soft),
            expectation,
            self.value
        ))
    }
}

#[derive(Clone)]
enum Kind {
    Any,
    Bool,
    Int,
    Float,
    Text,
    NonEmptyText,
    PositiveInt,
    BoundedInt { min: i64, max: i64 },
    BoundedFloat { min: f64, max: f64 },
    Nullable(Box<Validator>),
    Enum(&'static EnumSpec),
    TextMap,
    Object(&'static Schema),
    SetOf(Box<Validator>),
    MapOf(Box<Validator>),
    Custom {
        expected: &'static str,
        check: CustomCheck,
    },
}

/// A composable, named check-and-coerce unit
#[derive(Clone)]
pub struct Validator {
    kind: Kind,
}

impl Validator {
    fn of(kind: Kind) -> Self {
        Validator { kind }
    }

    /// Accepts every value unchanged
    pub fn any() -> Self {
        Self::of(Kind::Any)
    }

    /// Accepts booleans
    pub fn bool() -> Self {
        Self::of(Kind::Bool)
    }

    /// Accepts integers
    pub fn int() -> Self {
        Self::of(Kind::Int)
    }

    /// Accepts floats, coercing integers
    pub fn float() -> Self {
        Self::of(Kind::Float)
    }

    /// Accepts text
    pub fn text() -> Self {
        Self::of(Kind::Text)
    }

    /// Accepts text with at least one character
    pub fn non_empty_text() -> Self {
        Self::of(Kind::NonEmptyText)
    }

    /// Accepts integers >= 1
    pub fn positive_int() -> Self {
        Self::of(Kind::PositiveInt)
    }

    /// Accepts integers in `min..=max`
    pub fn bounded_int(min: i64, max: i64) -> Self {
        Self::of(Kind::BoundedInt { min, max })
    }

    /// Accepts numbers in `min..=max`, coercing integers to floats
    pub fn bounded_float(min: f64, max: f64) -> Self {
        Self::of(Kind::BoundedFloat { min, max })
    }

    /// Accepts null or whatever `inner` accepts
    pub fn nullable(inner: Validator) -> Self {
        Self::of(Kind::Nullable(Box::new(inner)))
    }

    /// Accepts members of the enum, or their declared names as text
    pub fn enumeration(spec: &'static EnumSpec) -> Self {
        Self::of(Kind::Enum(spec))
    }

    /// Accepts a mapping or a list of pairs, coerced to a text-to-text map
    pub fn text_map() -> Self {
        Self::of(Kind::TextMap)
    }

    /// Accepts managed objects built from `schema`
    pub fn object(schema: &'static Schema) -> Self {
        Self::of(Kind::Object(schema))
    }

    /// Accepts a set or list, producing a fresh [`ScriveSet`] of `element`
    pub fn set_of(element: Validator) -> Self {
        Self::of(Kind::SetOf(Box::new(element)))
    }

    /// Accepts a mapping or list of pairs, producing a fresh [`ScriveMap`]
    pub fn map_of(value: Validator) -> Self {
        Self::of(Kind::MapOf(Box::new(value)))
    }

    /// Hand-written check; `expected` describes accepted values
    pub fn custom(expected: &'static str, check: CustomCheck) -> Self {
        Self::of(Kind::Custom { expected, check })
    }

    /// Human readable description of accepted values
    pub fn expected(&self) -> String {
        match &self.kind {
            Kind::Any => "any value".to_string(),
            Kind::Bool => "bool".to_string(),
            Kind::Int | Kind::PositiveInt | Kind::BoundedInt { .. } => "int".to_string(),
            Kind::Float | Kind::BoundedFloat { .. } => "float or int".to_string(),
            Kind::Text | Kind::NonEmptyText => "text".to_string(),
            Kind::Nullable(inner) => format!("{} or null", inner.expected()),
            Kind::Enum(spec) => format!("{} or text", spec.type_name),
            Kind::TextMap | Kind::MapOf(_) => "mapping or list of pairs".to_string(),
            Kind::Object(schema) => schema.type_name().to_string(),
            Kind::SetOf(_) => "set or list".to_string(),
            Kind::Custom { expected, .. } => expected.to_string(),
        }
    }

    /// Check `raw` on behalf of `subject`, returning the accepted value
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if the kind is not accepted,
    /// [`Error::ValueRejected`] if the coerced value fails the semantic check.
    pub fn check_and_coerce(&self, subject: &str, raw: Value) -> Result<Value> {
        self.unify(Unifier::new(subject, raw))
    }

    fn unify(&self, u: Unifier<'_>) -> Result<Value> {
        match &self.kind {
            Kind::Any => Ok(u.into_value()),
            Kind::Bool => match u.value {
                Value::Bool(_) => Ok(u.into_value()),
                _ => Err(u.type_error("bool", false)),
            },
            Kind::Int => match u.value {
                Value::Int(_) => Ok(u.into_value()),
                _ => Err(u.type_error("int", false)),
            },
            Kind::Float => match u.value {
                Value::Float(f) if !f.is_finite() => Err(u.error("a finite number", false)),
                Value::Float(_) => Ok(u.into_value()),
                Value::Int(i) => Ok(Value::Float(i as f64)),
                _ => Err(u.type_error("float or int", false)),
            },
            Kind::Text => match u.value {
                Value::Text(_) => Ok(u.into_value()),
                _ => Err(u.type_error("text", false)),
            },
            Kind::NonEmptyText => match &u.value {
                Value::Text(s) if s.is_empty() => Err(u.error("non-empty text", false)),
                Value::Text(_) => Ok(u.into_value()),
                _ => Err(u.type_error("text", false)),
            },
            Kind::PositiveInt => match u.value {
                Value::Int(i) if i < 1 => Err(u.error("a positive integer", false)),
                Value::Int(_) => Ok(u.into_value()),
                _ => Err(u.type_error("int", false)),
            },
            Kind::BoundedInt { min, max } => match u.value {
                Value::Int(i) if i < *min || i > *max => Err(u.error(
                    &format!("an integer between {} and {} (inclusive)", min, max),
                    false,
                )),
                Value::Int(_) => Ok(u.into_value()),
                _ => Err(u.type_error("int", false)),
            },
            Kind::BoundedFloat { min, max } => {
                let f = match u.value {
                    Value::Float(f) => f,
                    Value::Int(i) => i as f64,
                    _ => return Err(u.type_error("float or int", false)),
                };
                if f < *min || f > *max || f.is_nan() {
                    return Err(u.error(
                        &format!("a number between {} and {} (inclusive)", min, max),
                        false,
                    ));
                }
                Ok(Value::Float(f))
            }
            Kind::Nullable(inner) => {
                if u.value.is_null() {
                    return Ok(Value::Null);
                }
                inner.unify(Unifier {
                    nullable: true,
                    ..u
                })
            }
            Kind::Enum(spec) => match &u.value {
                Value::Enum(e) if e.is_of(spec) => Ok(u.into_value()),
                Value::Text(name) => match spec.index_of_name(name) {
                    Some(index) => Ok(Value::Enum(EnumValue::from_index(*spec, index))),
                    None => Err(u.error(
                        &format!("{}'s variant name ({})", spec.type_name, spec.names()),
                        true,
                    )),
                },
                _ => Err(u.type_error(&format!("{} or text", spec.type_name), false)),
            },
            Kind::TextMap => {
                let entries = pair_entries(&u)?;
                let mut checked = Vec::with_capacity(entries.len());
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    let key = match key {
                        Value::Text(k) => k,
                        other => {
                            return Err(Unifier::new(&format!("element {}'s key", i), other)
                                .type_error("text", false))
                        }
                    };
                    if !matches!(value, Value::Text(_)) {
                        return Err(Unifier::new(&format!("element {}'s value", i), value)
                            .type_error("text", false));
                    }
                    checked.push((key, value));
                }
                Ok(Value::Map(ScriveMap::from_entries_unchecked(
                    Validator::text(),
                    checked,
                )))
            }
            Kind::Object(schema) => match &u.value {
                Value::Object(o) if o.is_instance_of(schema) => Ok(u.into_value()),
                _ => Err(u.type_error(schema.type_name(), false)),
            },
            Kind::SetOf(element) => {
                let items = match &u.value {
                    Value::Set(s) => s.to_vec()?,
                    Value::List(items) => items.clone(),
                    _ => return Err(u.type_error("set or list", false)),
                };
                ScriveSet::from_values((**element).clone(), items).map(Value::Set)
            }
            Kind::MapOf(value) => {
                let entries = pair_entries(&u)?;
                let mut keyed = Vec::with_capacity(entries.len());
                for (i, (key, v)) in entries.into_iter().enumerate() {
                    match key {
                        Value::Text(k) => keyed.push((k, v)),
                        other => {
                            return Err(Unifier::new(&format!("element {}'s key", i), other)
                                .type_error("text", false))
                        }
                    }
                }
                ScriveMap::from_entries((**value).clone(), keyed).map(Value::Map)
            }
            Kind::Custom { check, .. } => check(&u),
        }
    }

    /// Decode a wire value following this validator's shape, then check it
    ///
    /// Enum wire strings (and their legacy aliases) resolve to members,
    /// JSON objects under [`Validator::object`] become managed objects,
    /// arrays become sets and JSON objects become maps.
    pub fn decode(&self, subject: &str, json: &JsonValue) -> Result<Value> {
        match &self.kind {
            Kind::Nullable(inner) => {
                if json.is_null() {
                    Ok(Value::Null)
                } else {
                    inner.decode(subject, json)
                }
            }
            Kind::Enum(spec) => match json {
                JsonValue::String(wire) => match spec.index_of_wire(wire) {
                    Some(index) => Ok(Value::Enum(EnumValue::from_index(*spec, index))),
                    None => Err(Error::ValueRejected(format!(
                        "{} must be one of {}'s wire values, not: {}",
                        subject, spec.type_name, json
                    ))),
                },
                _ => Err(Error::TypeMismatch(format!(
                    "{} must be text, not {}",
                    subject, json
                ))),
            },
            Kind::Object(schema) => Object::from_wire(*schema, json).map(Value::Object),
            Kind::SetOf(element) => match json {
                JsonValue::Array(items) => {
                    let decoded = items
                        .iter()
                        .map(|item| element.decode(subject, item))
                        .collect::<Result<Vec<_>>>()?;
                    ScriveSet::from_values((**element).clone(), decoded).map(Value::Set)
                }
                _ => Err(Error::TypeMismatch(format!(
                    "{} must be list, not {}",
                    subject, json
                ))),
            },
            Kind::MapOf(value) => match json {
                JsonValue::Object(entries) => {
                    let decoded = entries
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), value.decode(subject, v)?)))
                        .collect::<Result<Vec<_>>>()?;
                    ScriveMap::from_entries((**value).clone(), decoded).map(Value::Map)
                }
                _ => Err(Error::TypeMismatch(format!(
                    "{} must be mapping, not {}",
                    subject, json
                ))),
            },
            _ => self.check_and_coerce(subject, Value::from_json(json)),
        }
    }
}

/// Entries of a mapping, or of a list of two-element lists
fn pair_entries(u: &Unifier<'_>) -> Result<Vec<(Value, Value)>> {
    match u.value() {
        Value::Map(map) => Ok(map
            .items()?
            .into_iter()
            .map(|(k, v)| (Value::Text(k), v))
            .collect()),
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item.as_list() {
                Some([key, value]) => Ok((key.clone(), value.clone())),
                _ => Err(Unifier::new(&format!("element {}", i), item.clone())
                    .type_error("a pair", false)),
            })
            .collect(),
        _ => Err(u.type_error("mapping or list of pairs", false)),
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.expected())
    }
}
