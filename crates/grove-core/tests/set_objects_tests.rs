#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{feature, geo_group, group, setup_nested, setup_two_groups, RecordingObserver};
use grove_core::errors::GroveError;
use grove_core::group::TypeFilterPolicy;
use grove_core::ops::group_ops;
use grove_core::rules::validation;
use grove_core::Document;

#[test]
fn test_set_objects_replaces_list() {
    // GIVEN G1 = [x, y] and a free object z
    let (mut doc, g1, _g2, x, y) = setup_two_groups();
    let z = feature(&mut doc, "z");

    // WHEN the list is written as [z, x]
    group_ops::set_objects(&mut doc, &g1, &[z.clone(), x.clone()]).unwrap();

    // THEN y is dropped and ownership follows the new list
    assert_eq!(group_ops::get_objects(&doc, &g1).unwrap(), vec![z.clone(), x]);
    assert_eq!(group_ops::get_group_of_object(&doc, &y), None);
    assert_eq!(group_ops::get_group_of_object(&doc, &z), Some(g1));
    assert!(validation::validate_document(&doc).is_ok());
}

#[test]
fn test_set_objects_collapses_duplicates() {
    // GIVEN an empty group
    let mut doc = Document::new();
    let g = group(&mut doc, "G");
    let a = feature(&mut doc, "a");
    let b = feature(&mut doc, "b");

    // WHEN written with repeats
    group_ops::set_objects(&mut doc, &g, &[a.clone(), b.clone(), a.clone()]).unwrap();

    // THEN first occurrences win
    assert_eq!(group_ops::get_objects(&doc, &g).unwrap(), vec![a, b]);
}

#[test]
fn test_set_objects_strips_member_of_other_group() {
    // GIVEN x in G1 and an empty G2
    let (mut doc, g1, g2, x, _y) = setup_two_groups();
    let z = feature(&mut doc, "z");

    // WHEN G2's list is written as [x, z]
    let result = group_ops::set_objects(&mut doc, &g2, &[x.clone(), z.clone()]);

    // THEN the call fails naming x, but z was still stored
    match result {
        Err(GroveError::MultipleGroups {
            object_id,
            owner_id,
            group_id,
        }) => {
            assert_eq!(object_id, x);
            assert_eq!(owner_id, g1);
            assert_eq!(group_id, g2);
        }
        other => panic!("expected MultipleGroups, got {:?}", other),
    }
    assert_eq!(group_ops::get_objects(&doc, &g2).unwrap(), vec![z]);
    assert!(group_ops::has_object(&doc, &g1, &x, false).unwrap());
    assert!(validation::validate_document(&doc).is_ok());
}

#[test]
fn test_set_objects_strips_member_of_specialized_group() {
    // GIVEN x inside a geo-feature group
    let mut doc = Document::new();
    let geo = geo_group(&mut doc, "Body");
    let g = group(&mut doc, "G");
    let x = feature(&mut doc, "x");
    group_ops::add_object(&mut doc, &geo, &x).unwrap();

    // THEN writing it into a base group fails the same way
    assert!(matches!(
        group_ops::set_objects(&mut doc, &g, &[x.clone()]),
        Err(GroveError::MultipleGroups { .. })
    ));
    assert!(group_ops::get_objects(&doc, &g).unwrap().is_empty());
}

#[test]
fn test_set_objects_strips_cycle() {
    // GIVEN Outer -> Inner -> leaf
    let (mut doc, outer, inner, leaf) = setup_nested();

    // WHEN Inner's list is written as [leaf, Outer]
    let result = group_ops::set_objects(&mut doc, &inner, &[leaf.clone(), outer.clone()]);

    // THEN Outer is refused and leaf kept
    assert!(matches!(result, Err(GroveError::CycleDetected { .. })));
    assert_eq!(group_ops::get_objects(&doc, &inner).unwrap(), vec![leaf]);
    assert!(validation::validate_document(&doc).is_ok());
}

#[test]
fn test_set_objects_strips_unknown_ids() {
    let mut doc = Document::new();
    let g = group(&mut doc, "G");
    let a = feature(&mut doc, "a");

    let result = group_ops::set_objects(&mut doc, &g, &["ghost".to_string(), a.clone()]);

    assert!(matches!(result, Err(GroveError::ObjectNotFound { object_id }) if object_id == "ghost"));
    assert_eq!(group_ops::get_objects(&doc, &g).unwrap(), vec![a]);
}

#[test]
fn test_set_objects_bypasses_policy() {
    // GIVEN a group that denies features
    let mut doc = Document::new();
    let g = group(&mut doc, "G");
    let a = feature(&mut doc, "a");
    doc.set_builtin_policy(&g, Arc::new(TypeFilterPolicy::deny(["Core::Feature"])))
        .unwrap();

    // WHEN its list is written directly
    group_ops::set_objects(&mut doc, &g, &[a.clone()]).unwrap();

    // THEN the raw write still stores the feature
    assert_eq!(group_ops::get_objects(&doc, &g).unwrap(), vec![a]);
}

#[test]
fn test_set_objects_same_list_does_not_notify() {
    // GIVEN G1 = [x, y], observed
    let (mut doc, g1, _g2, x, y) = setup_two_groups();
    let observer = RecordingObserver::new();
    doc.subscribe(observer.clone());

    // WHEN the same list is written back
    group_ops::set_objects(&mut doc, &g1, &[x, y]).unwrap();

    // THEN nothing is announced
    assert!(observer.notifications().is_empty());
}
