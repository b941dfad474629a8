#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::error::Error;

use grove_core::errors::{ExError, ExErrorKind, GroveError};
use grove_core_types::RequestId;

#[test]
fn test_grove_error_maps_to_kind_and_context() {
    // GIVEN a membership conflict
    let err = GroveError::MultipleGroups {
        object_id: "x".to_string(),
        owner_id: "g1".to_string(),
        group_id: "g2".to_string(),
    };

    // WHEN converted to the structured form
    let ex: ExError = err.clone().into();

    // THEN kind, ids and message survive
    assert_eq!(ex.kind(), ExErrorKind::MultipleGroups);
    assert_eq!(ex.code(), "ERR_MULTIPLE_GROUPS");
    assert_eq!(ex.entity_id(), Some("x"));
    assert_eq!(ex.group_id(), Some("g2"));
    assert_eq!(ex.message(), err.to_string());
}

#[test]
fn test_invariant_variants_share_a_kind() {
    let errors = [
        GroveError::DuplicateMember {
            group_id: "g".to_string(),
            object_id: "x".to_string(),
        },
        GroveError::DanglingMember {
            group_id: "g".to_string(),
            object_id: "x".to_string(),
        },
        GroveError::MultipleOwners {
            object_id: "x".to_string(),
            owner_ids: vec!["a".to_string(), "b".to_string()],
        },
        GroveError::OwnerIndexDrift {
            object_id: "x".to_string(),
            indexed: Some("a".to_string()),
            actual: None,
        },
    ];

    for err in errors {
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::InvariantViolation);
        assert_eq!(ex.entity_id(), Some("x"));
    }
}

#[test]
fn test_duplicate_name_is_already_exists() {
    let ex: ExError = GroveError::DuplicateName {
        name: "Box".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::AlreadyExists);
    assert!(ex.message().contains("Box"));
}

#[test]
fn test_display_includes_code_op_and_request() {
    // GIVEN an error tagged with operation and request
    let request_id = RequestId::from_string("req-42".to_string());
    let ex = ExError::from(GroveError::NotAGroup {
        object_id: "x".to_string(),
    })
    .with_op("add_object")
    .with_request_id(request_id);

    // WHEN rendered
    let rendered = ex.to_string();

    // THEN
    assert!(rendered.starts_with("[ERR_NOT_A_GROUP]"));
    assert!(rendered.contains("add_object"));
    assert!(rendered.contains("req-42"));
}

#[test]
fn test_source_chain() {
    // GIVEN a wrapping error with a cause
    let cause = ExError::from(GroveError::ObjectNotFound {
        object_id: "x".to_string(),
    });
    let ex = ExError::new(ExErrorKind::CycleDetected)
        .with_message("refused")
        .with_source(cause);

    // THEN the cause is reachable both ways
    assert_eq!(ex.source_error().map(|s| s.kind()), Some(ExErrorKind::NotFound));
    assert!(ex.source().is_some());
}
