//! Managed objects
//!
//! An [`Object`] is a shared handle to one instance of a [`Schema`]: one
//! backing slot per descriptor plus the two lifecycle flags, an optional
//! API binding and an optional navigational parent.
//!
//! ## State Machine
//!
//! States are {valid, invalid} × {writable, read-only}. Objects start valid
//! and writable; [`Object::from_wire_read_only`] starts read-only. Once
//! entered, `invalid` blocks every get and set, `read_only` blocks every
//! set. Neither flag is ever cleared.
//!
//! ## Ownership
//!
//! An object owns every managed value stored in its slots; lifecycle
//! transitions cascade into them. The parent link is a weak back-reference
//! and never receives transitions.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;

use crate::descriptor::Schema;
use crate::error::{Error, Result};
use crate::lifecycle::{self, Lifecycle, Managed};
use crate::map::ScriveMap;
use crate::set::ScriveSet;
use crate::transport::Transport;
use crate::value::Value;

/// Keyword arguments for [`Object::construct`]
///
/// ```
/// use scrive_core::Kwargs;
/// let kwargs = Kwargs::new().with("title", "Contract").with("number_of_days_to_sign", 30);
/// assert!(kwargs.contains("title"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Kwargs(BTreeMap<String, Value>);

impl Kwargs {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace an argument
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Remove and return an argument
    pub fn pop(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Whether an argument is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remaining argument names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether no arguments remain
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Typed extraction of attribute values
pub trait FromValue: Sized {
    /// Description used when extraction fails
    const EXPECTED: &'static str;

    /// Extract `Self`, or `None` if the value has another kind
    fn try_from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";
    fn try_from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";
    fn try_from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";
    fn try_from_value(value: Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";
    fn try_from_value(value: Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";
    fn try_from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for Object {
    const EXPECTED: &'static str = "object";
    fn try_from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl FromValue for ScriveSet {
    const EXPECTED: &'static str = "set";
    fn try_from_value(value: Value) -> Option<Self> {
        match value {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for ScriveMap {
    const EXPECTED: &'static str = "mapping";
    fn try_from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;
    fn try_from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::try_from_value(other).map(Some),
        }
    }
}

struct ObjectInner {
    schema: &'static Schema,
    lifecycle: Lifecycle,
    slots: RefCell<Vec<Value>>,
    api: RefCell<Option<Rc<dyn Transport>>>,
    parent: RefCell<Weak<ObjectInner>>,
}

/// Shared handle to a managed object
///
/// Cloning the handle does not copy the object. Equality between handles is
/// identity.
#[derive(Clone)]
pub struct Object(Rc<ObjectInner>);

impl Object {
    fn allocate(schema: &'static Schema, slots: Vec<Value>) -> Self {
        Object(Rc::new(ObjectInner {
            schema,
            lifecycle: Lifecycle::new(),
            slots: RefCell::new(slots),
            api: RefCell::new(None),
            parent: RefCell::new(Weak::new()),
        }))
    }

    /// Build an object from validated constructor arguments
    ///
    /// Every descriptor consumes its argument in declaration order; any
    /// argument left over afterwards is rejected.
    pub fn construct(schema: &'static Schema, kwargs: Kwargs) -> Result<Self> {
        let mut kwargs = kwargs;
        let slots = schema
            .descriptors()
            .iter()
            .map(|d| d.initialize(schema.type_name(), &mut kwargs))
            .collect::<Result<Vec<_>>>()?;
        if let Some(name) = kwargs.names().next() {
            return Err(Error::UnexpectedArgument {
                type_name: schema.type_name().to_string(),
                name: name.to_string(),
            });
        }
        Ok(Self::allocate(schema, slots))
    }

    /// Build an object from a wire mapping, bypassing [`Object::construct`]
    ///
    /// # Errors
    ///
    /// [`Error::MalformedResponse`] from the first descriptor that fails.
    pub fn from_wire(schema: &'static Schema, json: &JsonValue) -> Result<Self> {
        let input = json.as_object().ok_or_else(|| Error::MalformedResponse {
            type_name: schema.type_name().to_string(),
            key: None,
            detail: format!("expected a JSON object, not {}", json),
        })?;
        let slots = schema
            .descriptors()
            .iter()
            .map(|d| d.deserialize(schema.type_name(), input))
            .collect::<Result<Vec<_>>>()?;
        debug!(target: "scrive::wire", type_name = schema.type_name(), "decoded object");
        Ok(Self::allocate(schema, slots))
    }

    /// Like [`Object::from_wire`], but the object and everything it owns start read-only
    pub fn from_wire_read_only(schema: &'static Schema, json: &JsonValue) -> Result<Self> {
        let object = Self::from_wire(schema, json)?;
        object.mark_read_only();
        Ok(object)
    }

    /// Encode every descriptor into a fresh wire mapping
    ///
    /// Never mutates the object.
    pub fn to_wire(&self) -> Result<JsonMap<String, JsonValue>> {
        self.check_get()?;
        let mut out = JsonMap::new();
        for descriptor in self.0.schema.descriptors() {
            descriptor.serialize(self, &mut out)?;
        }
        Ok(out)
    }

    /// The object's schema
    pub fn schema(&self) -> &'static Schema {
        self.0.schema
    }

    /// Name of the object's type
    pub fn type_name(&self) -> &'static str {
        self.0.schema.type_name()
    }

    /// Whether the object was built from `schema`
    pub fn is_instance_of(&self, schema: &Schema) -> bool {
        std::ptr::eq(self.0.schema, schema)
    }

    /// Read attribute `name`
    pub fn get(&self, name: &str) -> Result<Value> {
        self.0.schema.require(name)?.get(self)
    }

    /// Read attribute `name` as `T`
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        let repr = value.repr();
        T::try_from_value(value).ok_or_else(|| {
            Error::TypeMismatch(format!("{} must be {}, not {}", name, T::EXPECTED, repr))
        })
    }

    /// Validate and write attribute `name`
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.0.schema.require(name)?.set(self, value.into())
    }

    /// Whether every `(attribute, value)` criterion holds
    ///
    /// Undeclared attributes never match.
    pub fn matches(&self, criteria: &[(&str, Value)]) -> Result<bool> {
        self.check_get()?;
        for (name, expected) in criteria {
            let Some(descriptor) = self.0.schema.descriptor(name) else {
                return Ok(false);
            };
            if descriptor.get(self)? != *expected {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Guard for reads
    pub fn check_get(&self) -> Result<()> {
        self.0.lifecycle.check_get(self.type_name())
    }

    /// Guard for writes
    pub fn check_set(&self) -> Result<()> {
        self.0.lifecycle.check_set(self.type_name())
    }

    /// Whether the invalid flag is set
    pub fn is_invalid(&self) -> bool {
        self.0.lifecycle.is_invalid()
    }

    /// Whether the read-only flag is set
    pub fn is_read_only(&self) -> bool {
        self.0.lifecycle.is_read_only()
    }

    /// Invalidate this object and everything it owns
    pub fn mark_invalid(&self) {
        debug!(target: "scrive::lifecycle", type_name = self.type_name(), "invalidating");
        lifecycle::mark_invalid(self);
    }

    /// Make this object and everything it owns read-only
    pub fn mark_read_only(&self) {
        debug!(target: "scrive::lifecycle", type_name = self.type_name(), "marking read only");
        lifecycle::mark_read_only(self);
    }

    /// Attach the transport used by API-backed operations
    ///
    /// The binding follows ownership: every object reachable through this
    /// one's attributes, including collection members, is bound too.
    pub fn bind_api(&self, api: Rc<dyn Transport>) {
        for value in self.0.slots.borrow().iter() {
            bind_value(value, &api);
        }
        *self.0.api.borrow_mut() = Some(api);
    }

    /// The bound transport, if any
    pub fn api(&self) -> Option<Rc<dyn Transport>> {
        self.0.api.borrow().clone()
    }

    /// Record `parent` as this object's navigational back-reference
    pub fn set_parent(&self, parent: &Object) {
        *self.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
    }

    /// The navigational parent, if it is still alive
    pub fn parent(&self) -> Option<Object> {
        self.0.parent.borrow().upgrade().map(Object)
    }

    /// Whether both handles point at the same object
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn slot_value(&self, slot: usize) -> Value {
        self.0.slots.borrow()[slot].clone()
    }

    pub(crate) fn store_slot(&self, slot: usize, value: Value) {
        self.0.slots.borrow_mut()[slot] = value;
    }
}

fn bind_value(value: &Value, api: &Rc<dyn Transport>) {
    match value {
        Value::Object(o) => o.bind_api(api.clone()),
        Value::Set(s) => {
            for member in s.snapshot() {
                bind_value(&member, api);
            }
        }
        Value::Map(m) => {
            for (_, member) in m.snapshot() {
                bind_value(&member, api);
            }
        }
        _ => {}
    }
}

impl Managed for Object {
    fn owner_name(&self) -> &str {
        self.type_name()
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.0.lifecycle
    }

    fn for_each_owned_child(&self, visit: &mut dyn FnMut(&dyn Managed)) {
        let children: Vec<Value> = self.0.slots.borrow().clone();
        for child in &children {
            if let Some(managed) = child.as_managed() {
                visit(managed);
            }
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.type_name())
            .field("invalid", &self.is_invalid())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
