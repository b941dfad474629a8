//! Acceptance decisions for a group
//!
//! Each question goes to the group's attached handler first (see
//! `group::dispatch`) and only reaches the built-in policy when the
//! handler is absent or defers.

use super::document::Document;
use crate::errors::Result;
use crate::group::{dispatch_can_accept, dispatch_can_create};

/// May `object_id` become a member of `group_id`?
///
/// Says nothing about ownership conflicts or cycles; the membership
/// operations check those separately.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` for bad ids.
pub fn can_accept(doc: &Document, group_id: &str, object_id: &str) -> Result<bool> {
    let ext = doc.group(group_id)?;
    let group = doc.get_object(group_id)?;
    let object = doc.get_object(object_id)?;

    let verdict = dispatch_can_accept(ext.handler.as_deref(), group, object);
    Ok(verdict.or_builtin(|| ext.builtin.can_accept(group, object)))
}

/// May a new object of `type_name` be created inside `group_id`?
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` for a bad group id.
pub fn can_create(
    doc: &Document,
    group_id: &str,
    type_name: &str,
    subtype_hint: Option<&str>,
) -> Result<bool> {
    let ext = doc.group(group_id)?;
    let group = doc.get_object(group_id)?;
    let hint = subtype_hint.unwrap_or_default();

    let verdict = dispatch_can_create(ext.handler.as_deref(), group, type_name, hint);
    Ok(verdict.or_builtin(|| ext.builtin.can_create(group, type_name, hint)))
}

/// # Errors
///
/// Same as [`can_accept`].
#[deprecated(note = "use can_accept")]
pub fn allow_object(doc: &Document, group_id: &str, object_id: &str) -> Result<bool> {
    can_accept(doc, group_id, object_id)
}

/// # Errors
///
/// Same as [`can_create`].
#[deprecated(note = "use can_create")]
pub fn allow_object_type(
    doc: &Document,
    group_id: &str,
    type_name: &str,
    subtype_hint: Option<&str>,
) -> Result<bool> {
    can_create(doc, group_id, type_name, subtype_hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GroveError;
    use crate::group::{Form, PolicyOp, ScriptedHandler, TypeFilterPolicy};
    use crate::model::object::GROUP_TYPE;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn setup() -> (Document, String, String) {
        let mut doc = Document::new();
        let g = doc.create_object(GROUP_TYPE, "Group").unwrap();
        let x = doc.create_object("Core::Feature", "X").unwrap();
        (doc, g, x)
    }

    #[test]
    fn test_defaults_accept() {
        let (doc, g, x) = setup();
        assert!(can_accept(&doc, &g, &x).unwrap());
        assert!(can_create(&doc, &g, "Anything", None).unwrap());
    }

    #[test]
    fn test_handler_defer_falls_back_to_builtin() {
        let (mut doc, g, x) = setup();
        doc.set_builtin_policy(&g, Arc::new(TypeFilterPolicy::deny(["Core::Feature"])))
            .unwrap();
        doc.attach_handler(
            &g,
            Arc::new(ScriptedHandler::new().define(PolicyOp::CanAccept, Form::Single, |_| Value::Null)),
        )
        .unwrap();

        assert!(!can_accept(&doc, &g, &x).unwrap());
    }

    #[test]
    fn test_handler_overrides_builtin() {
        let (mut doc, g, x) = setup();
        doc.set_builtin_policy(&g, Arc::new(TypeFilterPolicy::deny(["Core::Feature"])))
            .unwrap();
        doc.attach_handler(
            &g,
            Arc::new(ScriptedHandler::new().define(PolicyOp::CanAccept, Form::Single, |_| json!(true))),
        )
        .unwrap();

        assert!(can_accept(&doc, &g, &x).unwrap());
    }

    #[test]
    #[allow(deprecated)]
    fn test_aliases_forward() {
        let (mut doc, g, x) = setup();
        doc.set_builtin_policy(&g, Arc::new(TypeFilterPolicy::deny(["Core::Feature"])))
            .unwrap();

        assert_eq!(
            allow_object(&doc, &g, &x).unwrap(),
            can_accept(&doc, &g, &x).unwrap()
        );
        assert_eq!(
            allow_object_type(&doc, &g, "Core::Feature", Some("hint")).unwrap(),
            can_create(&doc, &g, "Core::Feature", Some("hint")).unwrap()
        );
    }

    #[test]
    fn test_non_group_target_is_an_error() {
        let (doc, _g, x) = setup();
        assert!(matches!(
            can_accept(&doc, &x, &x),
            Err(GroveError::NotAGroup { .. })
        ));
    }
}
