//! Owned validated collections: batches, derived collections, equality

use scrive::{
    values, Document, Error, Kwargs, ScriveMap, ScriveSet, SetOperand, Signatory, Validator,
    Value,
};

fn int_set(items: &[i64]) -> ScriveSet {
    ScriveSet::from_values(Validator::int(), items.iter().map(|&i| Value::Int(i))).unwrap()
}

fn sorted(set: &ScriveSet) -> Vec<i64> {
    let mut out: Vec<i64> = set
        .to_vec()
        .unwrap()
        .iter()
        .filter_map(Value::as_int)
        .collect();
    out.sort_unstable();
    out
}

#[test]
fn batch_update_is_atomic() {
    let s = int_set(&[]);
    s.update([vec![1, 2], vec![3]]).unwrap();
    assert_eq!(sorted(&s), vec![1, 2, 3]);

    let err = s
        .update([SetOperand::from(vec![1, 2]), SetOperand::from(values![3, "x"])])
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(sorted(&s), vec![1, 2, 3]);
}

#[test]
fn copy_follows_source_transitions() {
    let a = int_set(&[1, 2]);
    let b = a.copy().unwrap();
    b.add(3).unwrap();
    assert_eq!(sorted(&a), vec![1, 2]);

    a.mark_read_only();
    assert!(b.is_read_only());
    assert_eq!(b.add(4), Err(Error::ObjectReadOnly("ScriveSet".into())));
}

#[test]
fn every_constructive_operation_is_derived() {
    let a = int_set(&[1, 2, 3]);
    let other = int_set(&[3, 4]);
    let derived = vec![
        a.copy().unwrap(),
        a.union([&other]).unwrap(),
        a.intersection([&other]).unwrap(),
        a.difference([&other]).unwrap(),
        a.symmetric_difference(&other).unwrap(),
        a.rdifference(vec![9]).unwrap(),
    ];
    a.mark_invalid();
    for set in &derived {
        assert!(set.is_invalid());
    }
    assert!(!other.is_invalid());
}

#[test]
fn derivation_chains_propagate() {
    let a = int_set(&[1]);
    let b = a.copy().unwrap();
    let c = b.union([vec![2]]).unwrap();
    a.mark_read_only();
    assert!(c.is_read_only());
}

#[test]
fn equality_observes_read_only_flag() {
    let a = int_set(&[1, 2]);
    let b = int_set(&[1, 2]);
    a.mark_read_only();
    assert_eq!(a.try_eq(&b), Ok(false));
    b.mark_read_only();
    assert_eq!(a.try_eq(&b), Ok(true));
}

#[test]
fn document_signatory_set_copy_is_derived() {
    let s = Signatory::new(Kwargs::new()).unwrap();
    let doc = Document::new(Kwargs::new().with("signatories", Value::List(vec![s.clone().into()])))
        .unwrap();
    let snapshot = doc.signatories().unwrap().copy().unwrap();

    doc.mark_read_only();
    assert!(snapshot.is_read_only());
    assert_eq!(
        snapshot.add(Signatory::new(Kwargs::new()).unwrap()),
        Err(Error::ObjectReadOnly("ScriveSet".into()))
    );
}

#[test]
fn signatory_set_rejects_other_entities() {
    let doc = Document::new(Kwargs::new()).unwrap();
    let err = doc
        .signatories()
        .unwrap()
        .add(Document::new(Kwargs::new()).unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch("element must be Signatory, not <Document>".into())
    );
}

#[test]
fn find_by_attributes_in_sets() {
    let a = Signatory::new(Kwargs::new().with("sign_order", 1)).unwrap();
    let b = Signatory::new(Kwargs::new().with("sign_order", 2)).unwrap();
    let doc = Document::new(
        Kwargs::new().with("signatories", Value::List(vec![a.into(), b.clone().into()])),
    )
    .unwrap();
    let found = doc
        .signatories()
        .unwrap()
        .find_by_attributes(&[("sign_order", Value::Int(2))])
        .unwrap();
    assert_eq!(found, Some(b.into()));
}

#[test]
fn mapping_batch_and_copy() {
    let m = ScriveMap::new(Validator::text());
    m.update(vec![("a", "1"), ("b", "2")]).unwrap();
    assert!(m.update(vec![("c", Value::from("3")), ("d", Value::Int(4))]).is_err());
    assert_eq!(m.keys(), Ok(vec!["a".to_string(), "b".to_string()]));

    let copy = m.copy().unwrap();
    m.mark_invalid();
    assert_eq!(copy.get("a"), Err(Error::ObjectInvalid("ScriveMap".into())));
}

#[test]
fn mapping_cascades_to_managed_values() {
    let s = Signatory::new(Kwargs::new()).unwrap();
    let m = ScriveMap::new(Validator::any());
    m.insert("first", s.clone()).unwrap();
    m.mark_read_only();
    assert!(s.is_read_only());
    assert_eq!(m.popitem(), Err(Error::ObjectReadOnly("ScriveMap".into())));
}
