//! Per-group override handlers and their resolution
//!
//! A group may carry one `GroupHandler`. Before the built-in policy is
//! asked, the handler gets a chance to decide:
//!
//! 1. No handler, or the handler does not define the operation: `Defer`.
//! 2. If the single-argument form is defined, its verdict is final.
//! 3. Otherwise the full form (group plus every argument) is tried.
//! 4. `Defer` from whatever ran falls through to the built-in policy.
//!
//! Handlers receive shared references only, so a decision cannot mutate
//! membership.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::model::DocumentObject;

/// Three-valued decision returned by a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    /// No decision; use the built-in policy
    Defer,
}

impl Verdict {
    /// Interpret a dynamically typed handler result
    ///
    /// `null` defers, booleans are taken as-is, and anything else is a
    /// malformed answer that degrades to `Reject`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Verdict::Defer,
            Value::Bool(true) => Verdict::Accept,
            Value::Bool(false) => Verdict::Reject,
            _ => Verdict::Reject,
        }
    }

    /// Collapse to a final decision, consulting `builtin` only on `Defer`
    pub fn or_builtin(self, builtin: impl FnOnce() -> bool) -> bool {
        match self {
            Verdict::Accept => true,
            Verdict::Reject => false,
            Verdict::Defer => builtin(),
        }
    }
}

/// Optional per-group override of the acceptance policy
///
/// Every method returns `None` when the handler does not define that form.
/// Implement the single-argument form, the full form, or neither; when
/// both are implemented the single-argument form wins.
pub trait GroupHandler: Send + Sync {
    fn can_accept(&self, object: &DocumentObject) -> Option<Verdict> {
        let _ = object;
        None
    }

    fn can_accept_in(&self, group: &DocumentObject, object: &DocumentObject) -> Option<Verdict> {
        let _ = (group, object);
        None
    }

    fn can_create(&self, type_name: &str) -> Option<Verdict> {
        let _ = type_name;
        None
    }

    fn can_create_in(
        &self,
        group: &DocumentObject,
        type_name: &str,
        subtype_hint: &str,
    ) -> Option<Verdict> {
        let _ = (group, type_name, subtype_hint);
        None
    }
}

/// Resolve a `can_accept` question against an optional handler
pub fn dispatch_can_accept(
    handler: Option<&dyn GroupHandler>,
    group: &DocumentObject,
    object: &DocumentObject,
) -> Verdict {
    let Some(handler) = handler else {
        return Verdict::Defer;
    };

    if let Some(verdict) = handler.can_accept(object) {
        tracing::debug!(
            op = "can_accept",
            form = "single",
            group_id = %group.id,
            object_id = %object.id,
            verdict = ?verdict,
        );
        return verdict;
    }

    if let Some(verdict) = handler.can_accept_in(group, object) {
        tracing::debug!(
            op = "can_accept",
            form = "full",
            group_id = %group.id,
            object_id = %object.id,
            verdict = ?verdict,
        );
        return verdict;
    }

    Verdict::Defer
}

/// Resolve a `can_create` question against an optional handler
pub fn dispatch_can_create(
    handler: Option<&dyn GroupHandler>,
    group: &DocumentObject,
    type_name: &str,
    subtype_hint: &str,
) -> Verdict {
    let Some(handler) = handler else {
        return Verdict::Defer;
    };

    if let Some(verdict) = handler.can_create(type_name) {
        tracing::debug!(
            op = "can_create",
            form = "single",
            group_id = %group.id,
            type_name = type_name,
            verdict = ?verdict,
        );
        return verdict;
    }

    if let Some(verdict) = handler.can_create_in(group, type_name, subtype_hint) {
        tracing::debug!(
            op = "can_create",
            form = "full",
            group_id = %group.id,
            type_name = type_name,
            verdict = ?verdict,
        );
        return verdict;
    }

    Verdict::Defer
}

/// Which argument shape a scripted operation takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    /// Candidate only (the object, or the type name)
    Single,
    /// Group first, then every argument
    Full,
}

/// Name of a policy operation a script can define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyOp {
    CanAccept,
    CanCreate,
}

type ScriptFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Handler backed by dynamically typed callables
///
/// This is the adapter for an embedded scripting runtime: arguments are
/// converted to JSON values, results come back as JSON values and are
/// interpreted by [`Verdict::from_value`], so a script returning a number
/// or a string rejects instead of failing.
///
/// # Example
/// ```
/// use grove_core::group::{Form, PolicyOp, ScriptedHandler, GroupHandler, Verdict};
/// use serde_json::{json, Value};
///
/// let handler = ScriptedHandler::new().define(PolicyOp::CanCreate, Form::Single, |args| {
///     json!(args[0] != Value::from("Forbidden::Type"))
/// });
/// assert_eq!(handler.can_create("Forbidden::Type"), Some(Verdict::Reject));
/// assert_eq!(handler.can_create("Core::Feature"), Some(Verdict::Accept));
/// ```
#[derive(Clone, Default)]
pub struct ScriptedHandler {
    ops: HashMap<(PolicyOp, Form), ScriptFn>,
}

impl ScriptedHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) one operation form
    pub fn define<F>(mut self, op: PolicyOp, form: Form, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.ops.insert((op, form), Arc::new(f));
        self
    }

    pub fn defines(&self, op: PolicyOp, form: Form) -> bool {
        self.ops.contains_key(&(op, form))
    }

    fn call(&self, op: PolicyOp, form: Form, args: &[Value]) -> Option<Verdict> {
        let f = self.ops.get(&(op, form))?;
        Some(Verdict::from_value(&f(args)))
    }
}

impl std::fmt::Debug for ScriptedHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut defined: Vec<_> = self.ops.keys().collect();
        defined.sort_by_key(|(op, form)| (*op as u8, *form as u8));
        f.debug_struct("ScriptedHandler")
            .field("defined", &defined)
            .finish()
    }
}

fn to_value(object: &DocumentObject) -> Value {
    serde_json::to_value(object).unwrap_or(Value::Null)
}

impl GroupHandler for ScriptedHandler {
    fn can_accept(&self, object: &DocumentObject) -> Option<Verdict> {
        self.call(PolicyOp::CanAccept, Form::Single, &[to_value(object)])
    }

    fn can_accept_in(&self, group: &DocumentObject, object: &DocumentObject) -> Option<Verdict> {
        self.call(
            PolicyOp::CanAccept,
            Form::Full,
            &[to_value(group), to_value(object)],
        )
    }

    fn can_create(&self, type_name: &str) -> Option<Verdict> {
        self.call(PolicyOp::CanCreate, Form::Single, &[Value::from(type_name)])
    }

    fn can_create_in(
        &self,
        group: &DocumentObject,
        type_name: &str,
        subtype_hint: &str,
    ) -> Option<Verdict> {
        self.call(
            PolicyOp::CanCreate,
            Form::Full,
            &[
                to_value(group),
                Value::from(type_name),
                Value::from(subtype_hint),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(id: &str, type_name: &str) -> DocumentObject {
        DocumentObject::new(id.to_string(), id.to_uppercase(), type_name.to_string())
    }

    struct FullFormOnly;

    impl GroupHandler for FullFormOnly {
        fn can_accept_in(&self, group: &DocumentObject, object: &DocumentObject) -> Option<Verdict> {
            // Only accept objects whose name starts with the group's name
            Some(if object.name.starts_with(&group.name) {
                Verdict::Accept
            } else {
                Verdict::Reject
            })
        }
    }

    #[test]
    fn test_verdict_from_value() {
        assert_eq!(Verdict::from_value(&Value::Null), Verdict::Defer);
        assert_eq!(Verdict::from_value(&json!(true)), Verdict::Accept);
        assert_eq!(Verdict::from_value(&json!(false)), Verdict::Reject);
        assert_eq!(Verdict::from_value(&json!(1)), Verdict::Reject);
        assert_eq!(Verdict::from_value(&json!("yes")), Verdict::Reject);
        assert_eq!(Verdict::from_value(&json!({"accept": true})), Verdict::Reject);
    }

    #[test]
    fn test_or_builtin_only_runs_on_defer() {
        assert!(Verdict::Accept.or_builtin(|| panic!("builtin consulted")));
        assert!(!Verdict::Reject.or_builtin(|| panic!("builtin consulted")));
        assert!(!Verdict::Defer.or_builtin(|| false));
    }

    #[test]
    fn test_no_handler_defers() {
        let group = object("g", "Core::Group");
        let x = object("x", "Core::Feature");
        assert_eq!(dispatch_can_accept(None, &group, &x), Verdict::Defer);
        assert_eq!(
            dispatch_can_create(None, &group, "Core::Feature", ""),
            Verdict::Defer
        );
    }

    #[test]
    fn test_undefined_operation_defers() {
        let handler = ScriptedHandler::new()
            .define(PolicyOp::CanAccept, Form::Single, |_| json!(false));
        let group = object("g", "Core::Group");

        assert_eq!(
            dispatch_can_create(Some(&handler), &group, "Core::Feature", ""),
            Verdict::Defer
        );
    }

    #[test]
    fn test_single_form_wins_over_full_form() {
        let handler = ScriptedHandler::new()
            .define(PolicyOp::CanAccept, Form::Single, |_| json!(true))
            .define(PolicyOp::CanAccept, Form::Full, |_| json!(false));
        let group = object("g", "Core::Group");
        let x = object("x", "Core::Feature");

        assert_eq!(dispatch_can_accept(Some(&handler), &group, &x), Verdict::Accept);
    }

    #[test]
    fn test_single_form_defer_does_not_try_full_form() {
        let handler = ScriptedHandler::new()
            .define(PolicyOp::CanAccept, Form::Single, |_| Value::Null)
            .define(PolicyOp::CanAccept, Form::Full, |_| json!(false));
        let group = object("g", "Core::Group");
        let x = object("x", "Core::Feature");

        assert_eq!(dispatch_can_accept(Some(&handler), &group, &x), Verdict::Defer);
    }

    #[test]
    fn test_full_form_receives_group_and_arguments() {
        let handler = ScriptedHandler::new().define(PolicyOp::CanCreate, Form::Full, |args| {
            json!(args.len() == 3 && args[0]["id"] == "g" && args[2] == "hint")
        });
        let group = object("g", "Core::Group");

        assert_eq!(
            dispatch_can_create(Some(&handler), &group, "Core::Feature", "hint"),
            Verdict::Accept
        );
        assert_eq!(
            dispatch_can_create(Some(&handler), &group, "Core::Feature", ""),
            Verdict::Reject
        );
    }

    #[test]
    fn test_typed_full_form_handler() {
        let group = object("g", "Core::Group");
        assert_eq!(
            dispatch_can_accept(Some(&FullFormOnly), &group, &object("gx", "Core::Feature")),
            Verdict::Accept
        );
        assert_eq!(
            dispatch_can_accept(Some(&FullFormOnly), &group, &object("x", "Core::Feature")),
            Verdict::Reject
        );
    }

    #[test]
    fn test_malformed_script_result_rejects() {
        let handler =
            ScriptedHandler::new().define(PolicyOp::CanAccept, Form::Single, |_| json!(42));
        let group = object("g", "Core::Group");
        let x = object("x", "Core::Feature");

        assert_eq!(dispatch_can_accept(Some(&handler), &group, &x), Verdict::Reject);
    }
}
