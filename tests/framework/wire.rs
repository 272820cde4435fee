//! Wire encoding and decoding of whole documents

use proptest::prelude::*;
use scrive::{Document, DocumentStatus, Error, Kwargs, Language, Signatory, Value};
use serde_json::{json, Value as JsonValue};

use crate::common::{document_json, init_tracing};

#[test]
fn decoded_document_exposes_typed_values() {
    let doc = Document::from_wire(&document_json("7", "preparation")).unwrap();
    assert_eq!(doc.id(), Ok(Some("7".into())));
    assert_eq!(doc.status(), Ok(Some(DocumentStatus::Preparation)));
    assert_eq!(doc.number_of_days_to_sign(), Ok(30));
    assert_eq!(doc.number_of_days_to_remind(), Ok(Some(5)));
    assert_eq!(doc.language(), Ok(Language::Sv));
    assert_eq!(doc.tag("crm"), Ok(Some("42".into())));
    assert_eq!(doc.sealed_file(), Ok(None));
    assert_eq!(doc.signatory_list().unwrap().len(), 2);
}

#[test]
fn encoding_omits_server_owned_keys() {
    let doc = Document::from_wire(&document_json("7", "preparation")).unwrap();
    let wire = doc.to_wire().unwrap();
    assert_eq!(wire["id"], json!("7"));
    for key in ["status", "file", "sealedfile"] {
        assert!(!wire.contains_key(key), "{key} should be omitted");
    }
    let signatory = &wire["signatories"][0];
    assert!(signatory.get("author").is_none());
    assert!(signatory.get("signdate").is_none());
    assert_eq!(signatory["fields"][0]["placements"][0]["tip"], json!("right"));
}

#[test]
fn default_days_round_trip() {
    let doc = Document::new(Kwargs::new().with("title", "Lease")).unwrap();
    let wire = JsonValue::Object(doc.to_wire().unwrap());
    assert_eq!(wire["daystosign"], json!(14));
    let back = Document::from_wire(&wire).unwrap();
    assert_eq!(back.number_of_days_to_sign(), Ok(14));
}

#[test]
fn missing_delivery_names_type_and_key() {
    init_tracing();
    let mut input = document_json("7", "preparation");
    input["signatories"][1]
        .as_object_mut()
        .unwrap()
        .remove("delivery");
    let err = Document::from_wire(&input).unwrap_err();
    assert_eq!(err, Error::missing_key("Signatory", "delivery"));
    let message = err.to_string();
    assert!(message.contains("Signatory"));
    assert!(message.contains("delivery"));
}

#[test]
fn wrong_shapes_are_malformed() {
    let mut input = document_json("7", "preparation");
    input["daystosign"] = json!("thirty");
    match Document::from_wire(&input).unwrap_err() {
        Error::MalformedResponse { type_name, key, detail } => {
            assert_eq!(type_name, "Document");
            assert_eq!(key.as_deref(), Some("daystosign"));
            assert!(detail.contains("number_of_days_to_sign must be int"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let mut input = document_json("7", "preparation");
    input["status"] = json!("shredded");
    assert!(matches!(
        Document::from_wire(&input),
        Err(Error::MalformedResponse { .. })
    ));

    assert!(matches!(
        Document::from_wire(&json!([1, 2])),
        Err(Error::MalformedResponse { key: None, .. })
    ));
}

#[test]
fn invalid_document_cannot_be_encoded() {
    let doc = Document::new(Kwargs::new()).unwrap();
    doc.mark_invalid();
    assert_eq!(doc.to_wire(), Err(Error::ObjectInvalid("Document".into())));
}

#[test]
fn to_wire_does_not_mutate() {
    let doc = Document::from_wire(&document_json("7", "preparation")).unwrap();
    let first = doc.to_wire().unwrap();
    let second = doc.to_wire().unwrap();
    assert_eq!(first, second);
    assert!(!doc.is_read_only());
}

proptest! {
    #[test]
    fn constructed_documents_round_trip(
        title in "[a-zA-Z ]{0,20}",
        days in 1i64..=90,
        remind in proptest::option::of(1i64..30),
        template in any::<bool>(),
        viewer in any::<bool>(),
    ) {
        let signatory = Signatory::new(Kwargs::new().with("viewer", viewer)).unwrap();
        let doc = Document::new(
            Kwargs::new()
                .with("title", title.as_str())
                .with("number_of_days_to_sign", days)
                .with("number_of_days_to_remind", remind)
                .with("is_template", template)
                .with("signatories", Value::List(vec![signatory.into()])),
        )
        .unwrap();

        let back = Document::from_wire(&JsonValue::Object(doc.to_wire().unwrap())).unwrap();
        prop_assert_eq!(back.title().unwrap(), title);
        prop_assert_eq!(back.number_of_days_to_sign().unwrap(), days);
        prop_assert_eq!(back.number_of_days_to_remind().unwrap(), remind);
        prop_assert_eq!(back.is_template().unwrap(), template);
        prop_assert_eq!(back.language().unwrap(), Language::En);
        let signatories = back.signatory_list().unwrap();
        prop_assert_eq!(signatories.len(), 1);
        prop_assert_eq!(signatories[0].viewer().unwrap(), viewer);
        prop_assert_eq!(back.to_wire().unwrap(), doc.to_wire().unwrap());
    }
}
