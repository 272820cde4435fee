//! Read-only and invalid cascades through a full document graph

use scrive::{Document, Error, Value};

use crate::common::document_json;

fn draft() -> Document {
    Document::from_wire(&document_json("1", "preparation")).unwrap()
}

#[test]
fn invalid_reaches_every_reachable_node() {
    let doc = draft();
    let signatories = doc.signatories().unwrap();
    let signatory = doc.signatory_list().unwrap().remove(0);
    let field = signatory.field_list().unwrap().remove(0);
    let placement = field.placement_list().unwrap().remove(0);
    let tags = doc.tags().unwrap();
    let file = doc.original_file().unwrap().unwrap();

    doc.mark_invalid();

    assert_eq!(doc.title(), Err(Error::ObjectInvalid("Document".into())));
    assert!(matches!(signatories.len(), Err(Error::ObjectInvalid(_))));
    assert_eq!(signatory.viewer(), Err(Error::ObjectInvalid("Signatory".into())));
    assert_eq!(field.set_value("x"), Err(Error::ObjectInvalid("Field".into())));
    assert_eq!(placement.page(), Err(Error::ObjectInvalid("FieldPlacement".into())));
    assert!(matches!(tags.get("crm"), Err(Error::ObjectInvalid(_))));
    assert_eq!(file.id(), Err(Error::ObjectInvalid("File".into())));
}

#[test]
fn read_only_blocks_sets_but_not_gets() {
    let doc = draft();
    let signatory = doc.signatory_list().unwrap().remove(0);
    let field = signatory.field_list().unwrap().remove(0);
    let placement = field.placement_list().unwrap().remove(0);

    doc.mark_read_only();

    assert_eq!(doc.title(), Ok("Lease agreement".into()));
    assert_eq!(doc.set_title("x"), Err(Error::ObjectReadOnly("Document".into())));
    assert_eq!(signatory.set_sign_order(2), Err(Error::ObjectReadOnly("Signatory".into())));
    assert!(field.value().unwrap().ends_with("@example.com"));
    assert_eq!(placement.set_page(3), Err(Error::ObjectReadOnly("FieldPlacement".into())));
    assert_eq!(
        doc.signatories().unwrap().add(Value::Null),
        Err(Error::ObjectReadOnly("ScriveSet".into()))
    );
    assert_eq!(
        doc.tags().unwrap().insert("k", "v"),
        Err(Error::ObjectReadOnly("ScriveMap".into()))
    );
}

#[test]
fn invalid_dominates_read_only() {
    let doc = draft();
    doc.mark_read_only();
    doc.mark_invalid();
    assert_eq!(doc.set_title("x"), Err(Error::ObjectInvalid("Document".into())));
}

#[test]
fn immutable_attributes_fail_regardless_of_state() {
    let doc = draft();
    let expected = Err(Error::AttributeImmutable {
        type_name: "Document".into(),
        name: "id".into(),
    });
    assert_eq!(doc.as_object().set("id", "2"), expected);
    doc.mark_invalid();
    assert_eq!(doc.as_object().set("id", "2"), expected);
}

#[test]
fn closed_documents_arrive_read_only() {
    let doc = Document::from_wire(&document_json("1", "closed")).unwrap();
    assert!(doc.is_read_only());
    let signatory = doc.signatory_list().unwrap().remove(0);
    assert!(signatory.is_read_only());
    assert!(signatory.set_viewer(true).is_err());
}

#[test]
fn file_back_reference_is_not_cascaded() {
    let doc = draft();
    let file = doc.original_file().unwrap().unwrap();
    assert_eq!(file.document(), Some(doc.clone()));

    file.mark_invalid();
    assert!(!doc.is_invalid());
    assert_eq!(doc.title(), Ok("Lease agreement".into()));
}

#[test]
fn detached_objects_are_unaffected() {
    let doc = draft();
    let other = draft();
    doc.mark_invalid();
    assert!(!other.is_invalid());
    assert!(other.signatory_list().is_ok());
}
