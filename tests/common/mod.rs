//! Shared test utilities for the integration suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scrive::{Attachment, Error, Payload, Result, Transport};
use serde_json::{json, Value as JsonValue};

// ============================================================================
// Recording transport
// ============================================================================

/// One request seen by [`RecordingTransport`]
#[derive(Debug, Clone)]
pub struct Request {
    pub endpoint: String,
    pub payload: Payload,
    pub attachments: Vec<Attachment>,
}

/// In-memory transport replaying queued responses and recording requests.
///
/// Cloning shares the queue and the log, so a test keeps one clone while
/// the client owns the other.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    responses: Rc<RefCell<VecDeque<Result<JsonValue>>>>,
    requests: Rc<RefCell<Vec<Request>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn respond(&self, response: JsonValue) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    /// Queue a transport failure
    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(Error::Transport(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.endpoint.clone())
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(
        &self,
        endpoint: &str,
        payload: &Payload,
        attachments: &[Attachment],
    ) -> Result<JsonValue> {
        self.requests.borrow_mut().push(Request {
            endpoint: endpoint.to_string(),
            payload: payload.clone(),
            attachments: attachments.to_vec(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no response queued".into())))
    }
}

// ============================================================================
// Wire fixtures
// ============================================================================

pub fn signatory_json(id: &str, delivery: &str) -> JsonValue {
    json!({
        "id": id,
        "signorder": 1,
        "viewer": false,
        "author": false,
        "fields": [{
            "type": "standard", "name": "email", "value": format!("{}@example.com", id),
            "obligatory": true, "shouldbefilledbysender": false,
            "placements": [{"xrel": 0.1, "yrel": 0.1, "wrel": 0.2, "hrel": 0.05,
                            "fsrel": 0.0168, "page": 1, "tip": "right"}]
        }],
        "delivery": delivery,
        "confirmationdelivery": "email",
        "authentication": "standard",
        "signdate": null,
        "seendate": null,
        "signsuccessredirect": null,
        "rejectredirect": null
    })
}

pub fn document_json(id: &str, status: &str) -> JsonValue {
    json!({
        "id": id,
        "title": "Lease agreement",
        "daystosign": 30,
        "daystoremind": 5,
        "status": status,
        "signatories": [signatory_json("s1", "email"), signatory_json("s2", "mobile")],
        "lang": "sv",
        "invitationmessage": "Please sign",
        "confirmationmessage": null,
        "apicallbackurl": null,
        "template": false,
        "file": {"id": "f1", "name": "lease.pdf"},
        "sealedfile": null,
        "tags": {"crm": "42"}
    })
}

/// Install a test subscriber once, so tracing output shows up in failures
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
