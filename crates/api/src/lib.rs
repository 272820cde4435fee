//! Domain layer of the Scrive client
//!
//! This crate builds the document-signing entities on top of the object
//! framework in `scrive-core`:
//! - **Entities**: [`Document`], [`Signatory`], [`Field`], [`FieldPlacement`], [`File`]
//! - **Enums**: wire enums such as [`DocumentStatus`] and [`Language`]
//! - **Client**: [`Client`], the document operations over a [`Transport`]
//! - **Config**: [`ClientConfig`], loaded from `scrive.toml`
//!
//! ## Entities
//!
//! Every entity is a thin typed handle over a managed [`Object`]. The
//! attribute table lives in a static [`Schema`]; the handle adds typed
//! getters and setters on top of it. All state, including the lifecycle
//! flags, lives in the object, so cloning a handle shares it.
//!
//! ## Quick Start
//!
//! ```
//! use scrive_api::{Document, Kwargs};
//!
//! let doc = Document::new(Kwargs::new().with("title", "Lease")).unwrap();
//! assert_eq!(doc.number_of_days_to_sign().unwrap(), 14);
//! assert!(doc.set_number_of_days_to_sign(91).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Typed handle over a managed object of one schema
///
/// Generates the handle type, its constructors, the lifecycle passthroughs
/// and the conversions into and out of [`Value`](scrive_core::Value).
macro_rules! entity {
    ($(#[$meta:meta])* $name:ident, $schema:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(scrive_core::Object);

        impl $name {
            /// The attribute table of this type
            pub fn schema() -> &'static scrive_core::Schema {
                &$schema
            }

            /// Validate constructor arguments and build a new instance
            pub fn new(kwargs: scrive_core::Kwargs) -> scrive_core::Result<Self> {
                scrive_core::Object::construct(&$schema, kwargs).map($name)
            }

            /// Wrap `object` if it was built from this type's schema
            pub fn from_object(object: scrive_core::Object) -> Option<Self> {
                object.is_instance_of(&$schema).then(|| $name(object))
            }

            /// The underlying managed object
            pub fn as_object(&self) -> &scrive_core::Object {
                &self.0
            }

            /// Wire mapping of this instance
            pub fn to_wire(&self) -> scrive_core::Result<serde_json::Map<String, serde_json::Value>> {
                self.0.to_wire()
            }

            /// Whether the invalid flag is set
            pub fn is_invalid(&self) -> bool {
                self.0.is_invalid()
            }

            /// Whether the read-only flag is set
            pub fn is_read_only(&self) -> bool {
                self.0.is_read_only()
            }

            /// Invalidate this instance and everything it owns
            pub fn mark_invalid(&self) {
                self.0.mark_invalid()
            }

            /// Make this instance and everything it owns read-only
            pub fn mark_read_only(&self) {
                self.0.mark_read_only()
            }
        }

        impl From<$name> for scrive_core::Value {
            fn from(entity: $name) -> Self {
                scrive_core::Value::Object(entity.0)
            }
        }

        impl scrive_core::FromValue for $name {
            const EXPECTED: &'static str = stringify!($name);
            fn try_from_value(value: scrive_core::Value) -> Option<Self> {
                match value {
                    scrive_core::Value::Object(object) => $name::from_object(object),
                    _ => None,
                }
            }
        }
    };
}

/// Getter/setter pairs reading and writing one attribute each
macro_rules! attributes {
    ($( $(#[$meta:meta])* $name:ident / $setter:ident : $ty:ty ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> scrive_core::Result<$ty> {
                self.0.get_as(stringify!($name))
            }

            #[doc = concat!("Validate and write `", stringify!($name), "`")]
            pub fn $setter(&self, value: impl Into<scrive_core::Value>) -> scrive_core::Result<()> {
                self.0.set(stringify!($name), value)
            }
        )*
    };
}

/// Getters for attributes that are never written locally
macro_rules! getters {
    ($( $(#[$meta:meta])* $name:ident : $ty:ty ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> scrive_core::Result<$ty> {
                self.0.get_as(stringify!($name))
            }
        )*
    };
}

/// Typed members of an owned set attribute
fn members<T: scrive_core::FromValue>(set: &scrive_core::ScriveSet) -> scrive_core::Result<Vec<T>> {
    set.to_vec()?
        .into_iter()
        .map(|value| {
            let repr = value.repr();
            T::try_from_value(value).ok_or_else(|| {
                scrive_core::Error::TypeMismatch(format!(
                    "element must be {}, not {}",
                    T::EXPECTED,
                    repr
                ))
            })
        })
        .collect()
}

pub mod client;
pub mod config;
pub mod document;
pub mod enums;
pub mod field;
pub mod file;
pub mod placement;
pub mod signatory;

pub use client::Client;
pub use config::{ClientConfig, ConfigError, OAuthCredentials, CONFIG_FILE_NAME};
pub use document::Document;
pub use enums::{
    AuthenticationMethod, ConfirmationDeliveryMethod, DeliveryMethod, DocumentStatus, FieldType,
    Language, TipSide,
};
pub use field::Field;
pub use file::File;
pub use placement::FieldPlacement;
pub use signatory::Signatory;

pub use scrive_core::{
    Attachment, Error, Kwargs, Object, Payload, Result, Schema, ScriveMap, ScriveSet, Transport,
    Value, WireEnum,
};
