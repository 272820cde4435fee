//! Core object framework for the Scrive client
//!
//! This crate defines the building blocks every domain type is made of:
//! - Value: dynamic attribute value
//! - Validator: type-value unification with exact failure messages
//! - Descriptor / Schema: per-attribute binding of validator, default and wire key
//! - Object: managed object with cascading lifecycle flags
//! - ScriveSet / ScriveMap: owned validated collections with derived tracking
//! - wire_enum!: closed enums with declared wire strings and legacy aliases
//! - Transport: the opaque request seam used by API-backed operations
//! - Error: error type shared by all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod map;
pub mod object;
pub mod set;
pub mod transport;
pub mod validator;
pub mod value;
pub mod wire_enum;

pub use descriptor::{Decoder, DefaultFn, Descriptor, Schema};
pub use error::{Error, Result};
pub use lifecycle::{cascade, mark_invalid, mark_read_only, Lifecycle, Managed, Transition};
pub use map::ScriveMap;
pub use object::{FromValue, Kwargs, Object};
pub use set::{ScriveSet, SetOperand};
pub use transport::{Attachment, Payload, Transport};
pub use validator::{CustomCheck, Unifier, Validator};
pub use value::Value;
pub use wire_enum::{EnumMember, EnumSpec, EnumValue, WireEnum};
