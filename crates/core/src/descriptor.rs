//! Attribute descriptors and per-type schema tables
//!
//! Every managed type declares its attributes once, as a [`Schema`] holding
//! one [`Descriptor`] per attribute. The schema is the single source of truth
//! for construction, get/set gating and wire (de)serialization; domain types
//! build it in a `once_cell::sync::Lazy` static and expose typed accessors
//! on top of it.
//!
//! ## Descriptor flavours
//!
//! | Constructor | Validator | Settable | On the wire |
//! |-------------|-----------|----------|-------------|
//! | [`Descriptor::new`] | yes | yes | always |
//! | [`Descriptor::new`] + [`read_only`](Descriptor::read_only) | yes | no | always |
//! | [`Descriptor::computed`] | no | no | always |
//! | [`Descriptor::remote`] | yes | no | omitted, unless [`preserve_id`](Descriptor::preserve_id) and non-null |

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::warn;

use crate::error::{Error, Result};
use crate::object::{Kwargs, Object};
use crate::validator::Validator;
use crate::value::Value;

/// Produces an attribute's default value
pub type DefaultFn = fn() -> Value;

/// Replaces a descriptor's wire decoding step
pub type Decoder = fn(&Descriptor, &JsonValue) -> Result<Value>;

/// Binding of a validator, default and wire key to one attribute
#[derive(Clone)]
pub struct Descriptor {
    name: &'static str,
    slot: usize,
    validator: Option<Validator>,
    default: Option<DefaultFn>,
    wire_key: Option<&'static str>,
    read_only: bool,
    remote: bool,
    preserve_id: bool,
    decoder: Option<Decoder>,
}

impl Descriptor {
    /// Writable attribute checked by `validator`; required unless a default is given
    pub fn new(name: &'static str, validator: Validator) -> Self {
        Descriptor {
            name,
            slot: 0,
            validator: Some(validator),
            default: None,
            wire_key: None,
            read_only: false,
            remote: false,
            preserve_id: false,
            decoder: None,
        }
    }

    /// Attribute without a validator: never settable, wire value taken as-is
    pub fn computed(name: &'static str) -> Self {
        Descriptor {
            validator: None,
            default: Some(|| Value::Null),
            ..Self::new(name, Validator::any())
        }
    }

    /// Server-owned attribute
    ///
    /// A constructor argument of the same name is consumed and ignored: the
    /// value always starts as the default. Never settable and omitted from
    /// `to_wire`. Falls back to its default when absent from a response.
    pub fn remote(name: &'static str, validator: Validator) -> Self {
        Descriptor {
            default: Some(|| Value::Null),
            read_only: true,
            remote: true,
            ..Self::new(name, validator)
        }
    }

    /// Default used when the constructor argument is absent
    pub fn default(mut self, default: DefaultFn) -> Self {
        self.default = Some(default);
        self
    }

    /// Wire key, when it differs from the attribute name
    pub fn wire(mut self, key: &'static str) -> Self {
        self.wire_key = Some(key);
        self
    }

    /// Reject every write regardless of lifecycle state
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Keep a non-null remote value in `to_wire` output (identifiers)
    pub fn preserve_id(mut self) -> Self {
        self.preserve_id = true;
        self
    }

    /// Override the wire decoding step
    pub fn decode_with(mut self, decoder: Decoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Resolve the backing slot and, if unset, the wire key
    ///
    /// Called once per schema; calling it again with the same slot is a no-op.
    pub(crate) fn bind(&mut self, slot: usize) {
        self.slot = slot;
        if self.wire_key.is_none() {
            self.wire_key = Some(self.name);
        }
    }

    /// Attribute name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Index of the backing slot in the owning object
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Key used in wire mappings
    pub fn wire_key(&self) -> &'static str {
        self.wire_key.unwrap_or(self.name)
    }

    /// Bound validator, if any
    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Whether writes are rejected regardless of lifecycle state
    pub fn is_immutable(&self) -> bool {
        self.read_only || self.validator.is_none()
    }

    /// Whether this is a server-owned attribute
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Whether the attribute must be supplied at construction
    pub fn is_required(&self) -> bool {
        !self.remote && self.default.is_none()
    }

    fn default_value(&self) -> Value {
        self.default.map(|f| f()).unwrap_or(Value::Null)
    }

    /// Construction-time value for this attribute, consuming its argument
    pub fn initialize(&self, type_name: &str, kwargs: &mut Kwargs) -> Result<Value> {
        let supplied = kwargs.pop(self.name);
        if self.remote {
            return Ok(self.default_value());
        }
        let raw = match supplied {
            Some(value) => value,
            None => match self.default {
                Some(default) => default(),
                None => {
                    return Err(Error::MissingArgument {
                        type_name: type_name.to_string(),
                        name: self.name.to_string(),
                    })
                }
            },
        };
        match &self.validator {
            Some(validator) => validator.check_and_coerce(self.name, raw),
            None => Ok(raw),
        }
    }

    /// Read the attribute from `owner`
    pub fn get(&self, owner: &Object) -> Result<Value> {
        owner.check_get()?;
        Ok(owner.slot_value(self.slot))
    }

    /// Validate and store `value` on `owner`
    pub fn set(&self, owner: &Object, value: Value) -> Result<()> {
        let validator = match &self.validator {
            Some(validator) if !self.read_only => validator,
            _ => {
                return Err(Error::AttributeImmutable {
                    type_name: owner.type_name().to_string(),
                    name: self.name.to_string(),
                })
            }
        };
        owner.check_set()?;
        let value = validator.check_and_coerce(self.name, value)?;
        owner.store_slot(self.slot, value);
        Ok(())
    }

    /// Write the attribute into a wire mapping
    pub fn serialize(&self, owner: &Object, out: &mut JsonMap<String, JsonValue>) -> Result<()> {
        let value = owner.slot_value(self.slot);
        if self.remote && !(self.preserve_id && !value.is_null()) {
            return Ok(());
        }
        out.insert(self.wire_key().to_string(), value.to_json()?);
        Ok(())
    }

    /// Read the attribute from a wire mapping
    ///
    /// # Errors
    ///
    /// [`Error::MalformedResponse`] naming `type_name` and the wire key when
    /// the key is missing or its value fails validation.
    pub fn deserialize(&self, type_name: &str, input: &JsonMap<String, JsonValue>) -> Result<Value> {
        let key = self.wire_key();
        let json = match input.get(key) {
            Some(json) => json,
            None if self.remote => return Ok(self.default_value()),
            None => {
                warn!(target: "scrive::wire", type_name, key, "response is missing a key");
                return Err(Error::missing_key(type_name, key));
            }
        };
        let decoded = match (self.decoder, &self.validator) {
            (Some(decoder), _) => decoder(self, json),
            (None, Some(validator)) => validator.decode(self.name, json),
            (None, None) => Ok(Value::from_json(json)),
        };
        decoded.map_err(|e| {
            warn!(target: "scrive::wire", type_name, key, error = %e, "response value rejected");
            Error::malformed(type_name, Some(key), &e)
        })
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("wire_key", &self.wire_key())
            .field("validator", &self.validator)
            .field("read_only", &self.read_only)
            .field("remote", &self.remote)
            .finish()
    }
}

/// Static descriptor table of one managed type
pub struct Schema {
    type_name: &'static str,
    descriptors: Vec<Descriptor>,
    by_name: FxHashMap<&'static str, usize>,
}

impl Schema {
    /// Bind `descriptors` in declaration order
    ///
    /// # Panics
    ///
    /// On duplicate attribute names. Schemas are static tables, so this is a
    /// programming error surfaced on first use.
    pub fn new(type_name: &'static str, descriptors: Vec<Descriptor>) -> Self {
        let mut descriptors = descriptors;
        let mut by_name = FxHashMap::default();
        for (slot, descriptor) in descriptors.iter_mut().enumerate() {
            descriptor.bind(slot);
            let previous = by_name.insert(descriptor.name, slot);
            assert!(
                previous.is_none(),
                "duplicate attribute '{}' on {}",
                descriptor.name,
                type_name
            );
        }
        Schema {
            type_name,
            descriptors,
            by_name,
        }
    }

    /// Name of the described type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Descriptor for `name`, if declared
    pub fn descriptor(&self, name: &str) -> Option<&Descriptor> {
        self.by_name.get(name).map(|&slot| &self.descriptors[slot])
    }

    /// Descriptor for `name`, or [`Error::NoSuchAttribute`]
    pub fn require(&self, name: &str) -> Result<&Descriptor> {
        self.descriptor(name).ok_or_else(|| Error::NoSuchAttribute {
            type_name: self.type_name.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("descriptors", &self.descriptors)
            .finish()
    }
}
