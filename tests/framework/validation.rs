//! Validator message contracts as seen through the domain entities

use proptest::prelude::*;
use scrive::{pairs, Document, Error, Field, FieldPlacement, Kwargs, Signatory, Value};

#[test]
fn days_to_sign_out_of_range() {
    let err = Document::new(Kwargs::new().with("number_of_days_to_sign", 91)).unwrap_err();
    assert_eq!(
        err,
        Error::ValueRejected(
            "number_of_days_to_sign must be an integer between 1 and 90 (inclusive), not: 91"
                .into()
        )
    );
}

#[test]
fn wrong_type_names_subject_and_value() {
    let err = Document::new(Kwargs::new().with("title", 3)).unwrap_err();
    assert_eq!(err, Error::TypeMismatch("title must be text, not 3".into()));

    let err = Document::new(Kwargs::new().with("number_of_days_to_remind", "x")).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch("number_of_days_to_remind must be int or null, not \"x\"".into())
    );
}

#[test]
fn enum_name_coercion_is_soft() {
    let err = Signatory::new(Kwargs::new().with("delivery", "pigeon")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "delivery could be DeliveryMethod's variant name (Email, Mobile, EmailAndMobile, Pad, Api), not: \"pigeon\""
    );
}

#[test]
fn text_map_positional_detail() {
    let doc = Document::new(Kwargs::new()).unwrap();
    assert_eq!(
        doc.set_tags(pairs![("a", "1"), ("b", "2"), ("c", 3)])
            .unwrap_err()
            .to_string(),
        "element 2's value must be text, not 3"
    );
    assert_eq!(
        doc.set_tags(pairs![(1, "a")]).unwrap_err().to_string(),
        "element 0's key must be text, not 1"
    );
    assert_eq!(
        doc.set_tags(Value::List(vec![Value::Int(1)]))
            .unwrap_err()
            .to_string(),
        "element 0 must be a pair, not 1"
    );
}

#[test]
fn constructor_keyword_contract() {
    assert_eq!(
        Field::new(Kwargs::new()).unwrap_err(),
        Error::MissingArgument {
            type_name: "Field".into(),
            name: "name".into()
        }
    );
    assert_eq!(
        Document::new(Kwargs::new().with("colour", "red")).unwrap_err(),
        Error::UnexpectedArgument {
            type_name: "Document".into(),
            name: "colour".into()
        }
    );
    let doc = Document::new(Kwargs::new().with("id", "1")).unwrap();
    assert_eq!(doc.id(), Ok(None));
}

#[test]
fn failed_set_leaves_value_unchanged() {
    let doc = Document::new(Kwargs::new().with("number_of_days_to_sign", 30)).unwrap();
    assert!(doc.set_number_of_days_to_sign(0).is_err());
    assert_eq!(doc.number_of_days_to_sign(), Ok(30));
}

#[test]
fn unknown_attribute() {
    let doc = Document::new(Kwargs::new()).unwrap();
    assert_eq!(
        doc.as_object().get("colour"),
        Err(Error::NoSuchAttribute {
            type_name: "Document".into(),
            name: "colour".into()
        })
    );
}

proptest! {
    #[test]
    fn days_to_sign_accepts_exactly_one_to_ninety(days in -200i64..200) {
        let result = Document::new(Kwargs::new().with("number_of_days_to_sign", days));
        prop_assert_eq!(result.is_ok(), (1..=90).contains(&days));
    }

    #[test]
    fn placement_fractions_accept_unit_interval(x in -1.0f64..2.0) {
        let result = FieldPlacement::new(
            Kwargs::new()
                .with("left", x)
                .with("top", 0.5)
                .with("width", 0.1)
                .with("height", 0.1),
        );
        prop_assert_eq!(result.is_ok(), (0.0..=1.0).contains(&x));
    }
}
