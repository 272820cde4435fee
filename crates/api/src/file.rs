//! Files attached to a document
//!
//! A [`File`] only identifies a stored PDF; its bytes are fetched by the
//! transport layer. It keeps a back-reference to the [`Document`] it belongs
//! to, which never takes part in lifecycle cascades.

use once_cell::sync::Lazy;
use scrive_core::{Descriptor, Result, Schema, Validator};

use crate::document::Document;

pub(crate) static FILE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "File",
        vec![
            Descriptor::remote("id", Validator::nullable(Validator::text())).preserve_id(),
            Descriptor::remote("name", Validator::nullable(Validator::text())),
        ],
    )
});

entity!(
    /// A stored PDF belonging to a document
    File,
    FILE
);

impl File {
    getters! {
        /// Server identifier
        id: Option<String>,
        /// File name
        name: Option<String>,
    }

    /// The owning document, while it is alive
    pub fn document(&self) -> Option<Document> {
        self.0.parent().and_then(Document::from_object)
    }

    /// Decode a wire file
    pub fn from_wire(json: &serde_json::Value) -> Result<Self> {
        scrive_core::Object::from_wire(&FILE, json).map(File)
    }
}
