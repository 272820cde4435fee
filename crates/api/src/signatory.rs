//! Signatories: the parties a document is sent to

use once_cell::sync::Lazy;
use scrive_core::{Descriptor, Result, Schema, ScriveSet, Validator, Value, WireEnum};

use crate::enums::{AuthenticationMethod, ConfirmationDeliveryMethod, DeliveryMethod};
use crate::field::{Field, FIELD};

pub(crate) static SIGNATORY: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "Signatory",
        vec![
            Descriptor::remote("id", Validator::nullable(Validator::text())).preserve_id(),
            Descriptor::new("sign_order", Validator::positive_int())
                .wire("signorder")
                .default(|| Value::Int(1)),
            Descriptor::new("viewer", Validator::bool()).default(|| Value::Bool(false)),
            Descriptor::remote("author", Validator::nullable(Validator::bool())),
            Descriptor::new("fields", Validator::set_of(Validator::object(&FIELD)))
                .default(|| Value::List(vec![])),
            Descriptor::new("delivery", Validator::enumeration(DeliveryMethod::SPEC))
                .default(|| Value::from(DeliveryMethod::Email)),
            Descriptor::new(
                "confirmation_delivery",
                Validator::enumeration(ConfirmationDeliveryMethod::SPEC),
            )
            .wire("confirmationdelivery")
            .default(|| Value::from(ConfirmationDeliveryMethod::Email)),
            Descriptor::new(
                "authentication",
                Validator::enumeration(AuthenticationMethod::SPEC),
            )
            .default(|| Value::from(AuthenticationMethod::Standard)),
            Descriptor::remote("sign_time", Validator::nullable(Validator::text())).wire("signdate"),
            Descriptor::remote("seen_time", Validator::nullable(Validator::text())).wire("seendate"),
            Descriptor::new(
                "sign_success_redirect_url",
                Validator::nullable(Validator::non_empty_text()),
            )
            .wire("signsuccessredirect")
            .default(|| Value::Null),
            Descriptor::new(
                "rejection_redirect_url",
                Validator::nullable(Validator::non_empty_text()),
            )
            .wire("rejectredirect")
            .default(|| Value::Null),
        ],
    )
});

entity!(
    /// One party of a document: a signing party or a viewer
    Signatory,
    SIGNATORY
);

impl Signatory {
    getters! {
        /// Server identifier, once saved
        id: Option<String>,
        /// Whether this is the document's author
        author: Option<bool>,
        /// When the signatory signed
        sign_time: Option<String>,
        /// When the signatory first opened the document
        seen_time: Option<String>,
    }

    attributes! {
        /// Signing round, starting at 1
        sign_order / set_sign_order: i64,
        /// Whether the party only views the document
        viewer / set_viewer: bool,
        /// How the invitation is delivered
        delivery / set_delivery: DeliveryMethod,
        /// How the signed copy is delivered
        confirmation_delivery / set_confirmation_delivery: ConfirmationDeliveryMethod,
        /// How the party authenticates
        authentication / set_authentication: AuthenticationMethod,
        /// Where to send the party after signing
        sign_success_redirect_url / set_sign_success_redirect_url: Option<String>,
        /// Where to send the party after rejecting
        rejection_redirect_url / set_rejection_redirect_url: Option<String>,
    }

    /// The owned set of fields
    pub fn fields(&self) -> Result<ScriveSet> {
        self.0.get_as("fields")
    }

    /// Fields as typed handles
    pub fn field_list(&self) -> Result<Vec<Field>> {
        crate::members(&self.fields()?)
    }

    /// Replace every field
    pub fn set_fields(&self, value: impl Into<Value>) -> Result<()> {
        self.0.set("fields", value)
    }

    /// Whether the party has signed
    pub fn has_signed(&self) -> Result<bool> {
        Ok(self.sign_time()?.is_some())
    }

    /// First field whose attributes equal every criterion
    pub fn find_field(&self, criteria: &[(&str, Value)]) -> Result<Option<Field>> {
        Ok(self
            .fields()?
            .find_by_attributes(criteria)?
            .and_then(|value| value.as_object().cloned())
            .and_then(Field::from_object))
    }

    /// Decode a wire signatory
    pub fn from_wire(json: &serde_json::Value) -> Result<Self> {
        scrive_core::Object::from_wire(&SIGNATORY, json).map(Signatory)
    }
}
