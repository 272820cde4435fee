//! Documents
//!
//! A [`Document`] owns its signatories (and through them their fields and
//! placements), its files and its tags. Marking a document read-only or
//! invalid reaches all of them.
//!
//! ## Wire decoding
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | `status` other than `preparation` | document starts read-only |
//! | `file` / `sealedfile` present | file's back-reference points at the document |
//! | `lang` is a legacy code (`gb`) or upper case | normalized to a [`Language`] |

use std::rc::Rc;

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use tracing::debug;

use scrive_core::{
    Descriptor, Object, Result, Schema, ScriveMap, ScriveSet, Transport, Validator, Value,
    WireEnum,
};

use crate::enums::{DocumentStatus, Language};
use crate::file::{File, FILE};
use crate::signatory::{Signatory, SIGNATORY};

/// Signing period used when none is given, in days
pub const DEFAULT_DAYS_TO_SIGN: i64 = 14;

/// Longest accepted signing period, in days
pub const MAX_DAYS_TO_SIGN: i64 = 90;

fn decode_language(descriptor: &Descriptor, json: &JsonValue) -> Result<Value> {
    let normalized = match json {
        JsonValue::String(code) => JsonValue::String(code.trim().to_ascii_lowercase()),
        other => other.clone(),
    };
    Validator::enumeration(Language::SPEC).decode(descriptor.name(), &normalized)
}

static DOCUMENT: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "Document",
        vec![
            Descriptor::remote("id", Validator::nullable(Validator::text())).preserve_id(),
            Descriptor::new("title", Validator::text()).default(|| Value::from("")),
            Descriptor::new(
                "number_of_days_to_sign",
                Validator::bounded_int(1, MAX_DAYS_TO_SIGN),
            )
            .wire("daystosign")
            .default(|| Value::Int(DEFAULT_DAYS_TO_SIGN)),
            Descriptor::new(
                "number_of_days_to_remind",
                Validator::nullable(Validator::positive_int()),
            )
            .wire("daystoremind")
            .default(|| Value::Null),
            Descriptor::remote(
                "status",
                Validator::nullable(Validator::enumeration(DocumentStatus::SPEC)),
            ),
            Descriptor::new("signatories", Validator::set_of(Validator::object(&SIGNATORY)))
                .default(|| Value::List(vec![])),
            Descriptor::new("language", Validator::enumeration(Language::SPEC))
                .wire("lang")
                .default(|| Value::from(Language::En))
                .decode_with(decode_language),
            Descriptor::new("invitation_message", Validator::nullable(Validator::text()))
                .wire("invitationmessage")
                .default(|| Value::Null),
            Descriptor::new("confirmation_message", Validator::nullable(Validator::text()))
                .wire("confirmationmessage")
                .default(|| Value::Null),
            Descriptor::new("api_callback_url", Validator::nullable(Validator::text()))
                .wire("apicallbackurl")
                .default(|| Value::Null),
            Descriptor::new("is_template", Validator::bool())
                .wire("template")
                .default(|| Value::Bool(false)),
            Descriptor::remote("original_file", Validator::nullable(Validator::object(&FILE)))
                .wire("file"),
            Descriptor::remote("sealed_file", Validator::nullable(Validator::object(&FILE)))
                .wire("sealedfile"),
            Descriptor::new("tags", Validator::text_map()).default(|| Value::List(vec![])),
        ],
    )
});

entity!(
    /// A document sent out for signing
    Document,
    DOCUMENT
);

impl Document {
    getters! {
        /// Server identifier, once saved
        id: Option<String>,
        /// Signing status reported by the service
        status: Option<DocumentStatus>,
        /// The uploaded PDF
        original_file: Option<File>,
        /// The signed and sealed PDF, once closed
        sealed_file: Option<File>,
    }

    attributes! {
        /// Title shown to signatories
        title / set_title: String,
        /// Days the signatories have to sign, `1..=90`
        number_of_days_to_sign / set_number_of_days_to_sign: i64,
        /// Days between automatic reminders
        number_of_days_to_remind / set_number_of_days_to_remind: Option<i64>,
        /// Language of the signing flow
        language / set_language: Language,
        /// Custom text of the invitation
        invitation_message / set_invitation_message: Option<String>,
        /// Custom text of the confirmation
        confirmation_message / set_confirmation_message: Option<String>,
        /// URL the service calls on status changes
        api_callback_url / set_api_callback_url: Option<String>,
        /// Whether this is a template for new documents
        is_template / set_is_template: bool,
    }

    /// Decode a wire document
    ///
    /// Documents past preparation come back read-only, and attached files
    /// point back at the document.
    pub fn from_wire(json: &JsonValue) -> Result<Self> {
        let document = Document(Object::from_wire(&DOCUMENT, json)?);
        for file in [document.original_file()?, document.sealed_file()?]
            .into_iter()
            .flatten()
        {
            file.as_object().set_parent(&document.0);
        }
        let status = document.status()?;
        if status.is_some_and(|s| s != DocumentStatus::Preparation) {
            debug!(target: "scrive::wire", ?status, "document past preparation, read only");
            document.mark_read_only();
        }
        Ok(document)
    }

    /// The owned set of signatories
    pub fn signatories(&self) -> Result<ScriveSet> {
        self.0.get_as("signatories")
    }

    /// Signatories as typed handles
    pub fn signatory_list(&self) -> Result<Vec<Signatory>> {
        crate::members(&self.signatories()?)
    }

    /// Replace every signatory
    pub fn set_signatories(&self, value: impl Into<Value>) -> Result<()> {
        self.0.set("signatories", value)
    }

    /// The signatory marked as author, if any
    pub fn author(&self) -> Result<Option<Signatory>> {
        Ok(self
            .signatories()?
            .find_by_attributes(&[("author", Value::Bool(true))])?
            .and_then(|value| value.as_object().cloned())
            .and_then(Signatory::from_object))
    }

    /// The owned tag mapping
    pub fn tags(&self) -> Result<ScriveMap> {
        self.0.get_as("tags")
    }

    /// Replace every tag
    pub fn set_tags(&self, value: impl Into<Value>) -> Result<()> {
        self.0.set("tags", value)
    }

    /// Value of tag `name`
    pub fn tag(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .tags()?
            .get(name)?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Add or replace tag `name`
    pub fn set_tag(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.0.check_set()?;
        self.tags()?.insert(name, value)
    }

    /// Attach the transport used by API-backed operations, down to every signatory
    pub fn bind_api(&self, api: Rc<dyn Transport>) {
        self.0.bind_api(api)
    }

    /// The bound transport, if any
    pub fn api(&self) -> Option<Rc<dyn Transport>> {
        self.0.api()
    }
}
