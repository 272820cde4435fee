//! Signatory fields

use once_cell::sync::Lazy;
use scrive_core::{Descriptor, Result, Schema, ScriveSet, Validator, Value, WireEnum};

use crate::enums::FieldType;
use crate::placement::{FieldPlacement, PLACEMENT};

pub(crate) static FIELD: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "Field",
        vec![
            Descriptor::new("type", Validator::enumeration(FieldType::SPEC))
                .default(|| Value::from(FieldType::Custom)),
            Descriptor::new("name", Validator::non_empty_text()),
            Descriptor::new("value", Validator::text()).default(|| Value::from("")),
            Descriptor::new("obligatory", Validator::bool()).default(|| Value::Bool(true)),
            Descriptor::new("should_be_filled_by_sender", Validator::bool())
                .wire("shouldbefilledbysender")
                .default(|| Value::Bool(false)),
            Descriptor::new("placements", Validator::set_of(Validator::object(&PLACEMENT)))
                .default(|| Value::List(vec![])),
        ],
    )
});

entity!(
    /// A value a signatory provides or confirms, drawn at zero or more placements
    Field,
    FIELD
);

impl Field {
    attributes! {
        /// Label of the field
        name / set_name: String,
        /// Current content
        value / set_value: String,
        /// Whether the signatory must fill it in
        obligatory / set_obligatory: bool,
        /// Whether the author fills it in before sending
        should_be_filled_by_sender / set_should_be_filled_by_sender: bool,
    }

    /// Kind of field
    pub fn field_type(&self) -> Result<FieldType> {
        self.0.get_as("type")
    }

    /// Change the kind of field
    pub fn set_field_type(&self, value: impl Into<Value>) -> Result<()> {
        self.0.set("type", value)
    }

    /// The owned set of placements
    pub fn placements(&self) -> Result<ScriveSet> {
        self.0.get_as("placements")
    }

    /// Placements as typed handles
    pub fn placement_list(&self) -> Result<Vec<FieldPlacement>> {
        crate::members(&self.placements()?)
    }

    /// Replace every placement
    pub fn set_placements(&self, value: impl Into<Value>) -> Result<()> {
        self.0.set("placements", value)
    }

    /// Decode a wire field
    pub fn from_wire(json: &serde_json::Value) -> Result<Self> {
        scrive_core::Object::from_wire(&FIELD, json).map(Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrive_core::{Error, Kwargs};
    use serde_json::json;

    fn placement() -> FieldPlacement {
        FieldPlacement::new(
            Kwargs::new()
                .with("left", 0.1)
                .with("top", 0.1)
                .with("width", 0.2)
                .with("height", 0.05),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_and_type_name_coercion() {
        let f = Field::new(Kwargs::new().with("name", "ssn").with("type", "Standard")).unwrap();
        assert_eq!(f.field_type(), Ok(FieldType::Standard));
        assert_eq!(f.value(), Ok(String::new()));
        assert_eq!(f.obligatory(), Ok(true));
        assert_eq!(f.placements().unwrap().len(), Ok(0));
    }

    #[test]
    fn test_unknown_type_name_is_soft_failure() {
        let err = Field::new(Kwargs::new().with("name", "x").with("type", "Radio")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type could be FieldType's variant name (Standard, Custom, Signature, Checkbox), not: \"Radio\""
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Field::new(Kwargs::new().with("name", "")).unwrap_err();
        assert_eq!(
            err,
            Error::ValueRejected("name must be non-empty text, not: \"\"".into())
        );
    }

    #[test]
    fn test_placements_validated_and_listed() {
        let f = Field::new(
            Kwargs::new()
                .with("name", "sig")
                .with("placements", Value::List(vec![placement().into()])),
        )
        .unwrap();
        assert_eq!(f.placement_list().unwrap().len(), 1);
        assert!(matches!(
            f.set_placements(Value::List(vec![Value::from(3)])),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_wire_round_trip() {
        let wire = json!({
            "type": "signature",
            "name": "Signature 1",
            "value": "",
            "obligatory": true,
            "shouldbefilledbysender": false,
            "placements": [{"xrel": 0.1, "yrel": 0.2, "wrel": 0.3, "hrel": 0.1,
                            "fsrel": 0.0168, "page": 2, "tip": null}]
        });
        let f = Field::from_wire(&wire).unwrap();
        assert_eq!(f.field_type(), Ok(FieldType::Signature));
        assert_eq!(f.placement_list().unwrap()[0].page(), Ok(2));
        assert_eq!(serde_json::Value::Object(f.to_wire().unwrap()), wire);
    }

    #[test]
    fn test_read_only_field_cascades_to_placements() {
        let p = placement();
        let f = Field::new(
            Kwargs::new()
                .with("name", "sig")
                .with("placements", Value::List(vec![p.clone().into()])),
        )
        .unwrap();
        f.mark_read_only();
        assert!(p.is_read_only());
        assert_eq!(p.set_page(2), Err(Error::ObjectReadOnly("FieldPlacement".into())));
    }
}
