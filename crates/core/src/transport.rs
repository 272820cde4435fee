//! Transport seam
//!
//! The object framework never talks HTTP or OAuth. Whatever moves requests
//! to the service is consumed as an opaque
//! `send(endpoint, payload, attachments) -> response` function: any type
//! implementing [`Transport`], including plain closures.

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::Result;

/// Form fields of one request
pub type Payload = JsonMap<String, JsonValue>;

/// A file uploaded alongside a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Form field name
    pub name: String,
    /// File name reported to the service
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// PDF attachment under form field `name`
    pub fn pdf(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Attachment {
            name: name.into(),
            file_name: file_name.into(),
            content_type: "application/pdf".to_string(),
            bytes,
        }
    }
}

/// Delivers a request and returns the decoded JSON response
pub trait Transport {
    /// Send `payload` (and `attachments`) to `endpoint`
    ///
    /// # Errors
    ///
    /// [`Error::Transport`](crate::Error::Transport) when delivery fails.
    fn send(&self, endpoint: &str, payload: &Payload, attachments: &[Attachment])
        -> Result<JsonValue>;
}

impl<F> Transport for F
where
    F: Fn(&str, &Payload, &[Attachment]) -> Result<JsonValue>,
{
    fn send(
        &self,
        endpoint: &str,
        payload: &Payload,
        attachments: &[Attachment],
    ) -> Result<JsonValue> {
        self(endpoint, payload, attachments)
    }
}
