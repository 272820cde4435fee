//! Document operations over a [`Transport`]
//!
//! | Operation | Endpoint | Local effect |
//! |-----------|----------|--------------|
//! | [`Client::get_document`] | `documents/{id}/get` | |
//! | [`Client::create_document_from_file`] | `documents/new` | |
//! | [`Client::create_document_from_template`] | `documents/newfromtemplate/{id}` | |
//! | [`Client::update_document`] | `documents/{id}/update` | old revision invalid |
//! | [`Client::ready`] | `documents/{id}/start` | old revision invalid |
//! | [`Client::cancel_document`] | `documents/{id}/cancel` | old revision invalid |
//! | [`Client::trash_document`] | `documents/{id}/trash` | old revision invalid |
//! | [`Client::delete_document`] | `documents/{id}/delete` | document invalid |
//! | [`Client::list_documents`] | `documents/list` | |
//!
//! Every returned document is bound to the client's transport.

use std::rc::Rc;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use scrive_core::{Attachment, Error, Payload, Result, Transport, Unifier, Value};

use crate::config::ClientConfig;
use crate::document::Document;

/// Entry point for the document operations
pub struct Client {
    config: ClientConfig,
    transport: Rc<dyn Transport>,
}

impl Client {
    /// Client sending through `transport`
    pub fn new(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(config, Rc::new(transport))
    }

    /// Client sending through an already shared transport
    pub fn with_shared_transport(config: ClientConfig, transport: Rc<dyn Transport>) -> Self {
        Client { config, transport }
    }

    /// The configuration endpoints are built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn send(&self, path: &str, payload: &Payload, attachments: &[Attachment]) -> Result<JsonValue> {
        let endpoint = self.config.endpoint(path);
        debug!(
            target: "scrive::client",
            endpoint = %endpoint,
            fields = payload.len(),
            files = attachments.len(),
            "request"
        );
        self.transport
            .send(&endpoint, payload, attachments)
            .map_err(|e| {
                warn!(target: "scrive::client", endpoint = %endpoint, error = %e, "request failed");
                e
            })
    }

    fn bind(&self, document: Document) -> Document {
        document.bind_api(self.transport.clone());
        document
    }

    fn fetch(&self, path: &str, payload: &Payload, attachments: &[Attachment]) -> Result<Document> {
        let response = self.send(path, payload, attachments)?;
        Document::from_wire(&response).map(|d| self.bind(d))
    }

    /// Run `action` on `current` and replace it with the returned revision
    fn revise(&self, current: &Document, action: &str, payload: &Payload) -> Result<Document> {
        let id = saved_id(current)?;
        let next = self.fetch(&format!("documents/{}/{}", id, action), payload, &[])?;
        current.mark_invalid();
        info!(target: "scrive::client", id = %id, action, "document revision superseded");
        Ok(next)
    }

    /// Fetch document `id`
    pub fn get_document(&self, id: &str) -> Result<Document> {
        self.fetch(&format!("documents/{}/get", id), &Payload::new(), &[])
    }

    /// Create a draft from a PDF
    pub fn create_document_from_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<Document> {
        let mut payload = Payload::new();
        payload.insert("saved".into(), JsonValue::String("true".into()));
        let attachment = Attachment::pdf("file", file_name, bytes);
        self.fetch("documents/new", &payload, std::slice::from_ref(&attachment))
    }

    /// Create a draft from template `id`
    pub fn create_document_from_template(&self, id: &str) -> Result<Document> {
        self.fetch(&format!("documents/newfromtemplate/{}", id), &Payload::new(), &[])
    }

    /// Save local changes; `document` is superseded by the returned revision
    pub fn update_document(&self, document: &Document) -> Result<Document> {
        let wire = JsonValue::Object(document.to_wire()?);
        let mut payload = Payload::new();
        payload.insert("document".into(), JsonValue::String(wire.to_string()));
        self.revise(document, "update", &payload)
    }

    /// Send the document out for signing
    pub fn ready(&self, document: &Document) -> Result<Document> {
        self.revise(document, "start", &Payload::new())
    }

    /// Withdraw a pending document
    pub fn cancel_document(&self, document: &Document) -> Result<Document> {
        self.revise(document, "cancel", &Payload::new())
    }

    /// Move the document to the trash
    pub fn trash_document(&self, document: &Document) -> Result<Document> {
        self.revise(document, "trash", &Payload::new())
    }

    /// Delete the document permanently; it is invalid afterwards
    pub fn delete_document(&self, document: &Document) -> Result<()> {
        let id = saved_id(document)?;
        self.send(&format!("documents/{}/delete", id), &Payload::new(), &[])?;
        document.mark_invalid();
        info!(target: "scrive::client", id = %id, "document deleted");
        Ok(())
    }

    /// Every document visible to the authenticated user
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let response = self.send("documents/list", &Payload::new(), &[])?;
        let entries = match response.get("list") {
            Some(JsonValue::Array(entries)) => entries,
            Some(other) => {
                return Err(Error::MalformedResponse {
                    type_name: "DocumentList".into(),
                    key: Some("list".into()),
                    detail: format!("'list' must be an array, not {}", other),
                })
            }
            None => return Err(Error::missing_key("DocumentList", "list")),
        };
        entries
            .iter()
            .map(|entry| Document::from_wire(entry).map(|d| self.bind(d)))
            .collect()
    }
}

fn saved_id(document: &Document) -> Result<String> {
    document
        .id()?
        .ok_or_else(|| Unifier::new("id", Value::Null).type_error("text", false))
}
