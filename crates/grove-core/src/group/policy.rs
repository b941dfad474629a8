//! Built-in acceptance policies
//!
//! A `GroupPolicy` is the decision a group makes on its own, before any
//! attached handler is consulted. Every group starts with
//! `AcceptAllPolicy`; group flavours with a narrower schema swap in a
//! different policy through `Document::set_builtin_policy`.

use std::collections::HashSet;

use crate::model::DocumentObject;

/// Built-in acceptance decision for one group
///
/// Both methods default to `true`. Implementations must be pure: they see
/// the group and the candidate but cannot touch the document.
pub trait GroupPolicy: Send + Sync {
    /// May `object` become a member of `group`?
    fn can_accept(&self, group: &DocumentObject, object: &DocumentObject) -> bool {
        let _ = (group, object);
        true
    }

    /// May a new object of `type_name` be created inside `group`?
    ///
    /// `subtype_hint` is a free-form secondary classification, empty when
    /// the caller has none.
    fn can_create(&self, group: &DocumentObject, type_name: &str, subtype_hint: &str) -> bool {
        let _ = (group, type_name, subtype_hint);
        true
    }
}

/// Accepts every object and every type
///
/// # Example
/// ```
/// use grove_core::group::{AcceptAllPolicy, GroupPolicy};
/// use grove_core::model::DocumentObject;
///
/// let group = DocumentObject::new("g".into(), "G".into(), "Core::Group".into());
/// let feature = DocumentObject::new("f".into(), "F".into(), "Core::Feature".into());
/// assert!(AcceptAllPolicy.can_accept(&group, &feature));
/// assert!(AcceptAllPolicy.can_create(&group, "Anything::AtAll", ""));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPolicy;

impl GroupPolicy for AcceptAllPolicy {}

/// Filters by structural type name
///
/// A type on the deny list is always refused. When an allow list is set,
/// only the types on it pass. The same rule governs both existing objects
/// (`can_accept`, by their `type_name`) and new ones (`can_create`).
///
/// # Example
/// ```
/// use grove_core::group::{GroupPolicy, TypeFilterPolicy};
/// use grove_core::model::DocumentObject;
///
/// let policy = TypeFilterPolicy::deny(["Forbidden::Type"]);
/// let group = DocumentObject::new("g".into(), "G".into(), "Core::Group".into());
/// assert!(!policy.can_create(&group, "Forbidden::Type", ""));
/// assert!(policy.can_create(&group, "Core::Feature", ""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeFilterPolicy {
    denied: HashSet<String>,
    allowed: Option<HashSet<String>>,
}

impl TypeFilterPolicy {
    /// Refuse the listed types, accept everything else
    pub fn deny<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denied: types.into_iter().map(Into::into).collect(),
            allowed: None,
        }
    }

    /// Accept only the listed types
    pub fn allow_only<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denied: HashSet::new(),
            allowed: Some(types.into_iter().map(Into::into).collect()),
        }
    }

    fn permits(&self, type_name: &str) -> bool {
        if self.denied.contains(type_name) {
            return false;
        }
        self.allowed
            .as_ref()
            .map_or(true, |allowed| allowed.contains(type_name))
    }
}

impl GroupPolicy for TypeFilterPolicy {
    fn can_accept(&self, _group: &DocumentObject, object: &DocumentObject) -> bool {
        self.permits(&object.type_name)
    }

    fn can_create(&self, _group: &DocumentObject, type_name: &str, _subtype_hint: &str) -> bool {
        self.permits(type_name)
    }
}
