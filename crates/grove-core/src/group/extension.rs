use std::collections::HashSet;
use std::sync::Arc;

use super::dispatch::GroupHandler;
use super::members::Members;
use super::policy::{AcceptAllPolicy, GroupPolicy};
use crate::model::GroupKind;

/// State a group object carries on top of being a document object
///
/// The built-in policy and the handler are behavior hooks, not data: they
/// are shared (`Arc`) when a document is cloned and never persisted.
#[derive(Clone)]
pub struct GroupExtension {
    pub(crate) kind: GroupKind,
    pub(crate) members: Members,
    pub(crate) static_members: HashSet<String>,
    pub(crate) builtin: Arc<dyn GroupPolicy>,
    pub(crate) handler: Option<Arc<dyn GroupHandler>>,
}

impl GroupExtension {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            members: Members::new(),
            static_members: HashSet::new(),
            builtin: Arc::new(AcceptAllPolicy),
            handler: None,
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn is_static_member(&self, id: &str) -> bool {
        self.static_members.contains(id)
    }

    /// Members fixed by the group's structural template, in list order
    pub fn static_objects(&self) -> Vec<String> {
        self.members
            .get()
            .iter()
            .filter(|id| self.static_members.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// User-managed members, in list order
    pub fn dynamic_objects(&self) -> Vec<String> {
        self.members
            .get()
            .iter()
            .filter(|id| !self.static_members.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for GroupExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupExtension")
            .field("kind", &self.kind)
            .field("members", &self.members.get())
            .field("static_members", &self.static_members)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_extension_is_empty() {
        let ext = GroupExtension::new(GroupKind::Plain);
        assert!(ext.members().is_empty());
        assert!(!ext.has_handler());
        assert!(ext.static_objects().is_empty());
    }

    #[test]
    fn test_static_and_dynamic_split_keeps_order() {
        let mut ext = GroupExtension::new(GroupKind::Origin);
        for id in ["axis", "a", "plane", "b"] {
            ext.members.insert_unique(id);
        }
        ext.static_members.insert("axis".to_string());
        ext.static_members.insert("plane".to_string());

        assert_eq!(ext.static_objects(), vec!["axis", "plane"]);
        assert_eq!(ext.dynamic_objects(), vec!["a", "b"]);
    }
}
