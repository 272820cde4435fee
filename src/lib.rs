//! Scrive - client library for the Scrive document-signing API
//!
//! Documents, signatories, fields and placements are mirrored from the
//! service's JSON wire format into managed objects that validate every
//! write and carry two lifecycle flags, *read-only* and *invalid*, through
//! the whole object graph.
//!
//! # Quick Start
//!
//! ```
//! use scrive::{Document, Kwargs, Signatory, Value};
//!
//! let signatory = Signatory::new(Kwargs::new().with("delivery", "Mobile")).unwrap();
//! let doc = Document::new(
//!     Kwargs::new()
//!         .with("title", "Lease")
//!         .with("signatories", Value::List(vec![signatory.clone().into()])),
//! )
//! .unwrap();
//!
//! doc.mark_read_only();
//! assert!(signatory.set_viewer(true).is_err());
//! ```
//!
//! # Architecture
//!
//! The object framework (validators, descriptors, managed objects, owned
//! collections) lives in `scrive-core`; the domain entities and the
//! [`Client`] live in `scrive-api`. Both are re-exported here.

pub use scrive_api::*;
pub use scrive_core::{
    cascade, mark_invalid, mark_read_only, pairs, values, wire_enum, CustomCheck, Decoder,
    DefaultFn, Descriptor, EnumMember, EnumSpec, EnumValue, FromValue, Lifecycle, Managed,
    SetOperand, Transition, Unifier, Validator,
};
