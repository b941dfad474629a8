use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::{GroveError, Result};
use crate::group::{GroupExtension, GroupHandler, GroupPolicy, Members};
use crate::model::DocumentObject;

/// Receiver of membership change notifications
///
/// Called synchronously after every member-list mutation that changed
/// something, with the group's full new list. The return value of the
/// document operation does not depend on what an observer does.
pub trait MembershipObserver: Send + Sync {
    fn membership_changed(&self, group_id: &str, members: &[String]);
}

/// In-memory document holding every object and every group's member list
///
/// Alongside the member lists the document keeps the graph-wide owner
/// index (`member id -> id of the group that lists it`), updated by the
/// same hook that notifies observers, so owner lookups never scan groups.
///
/// Not thread-safe; one operation runs to completion before the next.
#[derive(Clone, Default)]
pub struct Document {
    pub(crate) objects: HashMap<String, DocumentObject>,
    /// Object ids in creation order
    pub(crate) order: Vec<String>,
    pub(crate) names: HashMap<String, String>,
    pub(crate) groups: HashMap<String, GroupExtension>,
    pub(crate) owners: HashMap<String, String>,
    observers: Vec<Arc<dyn MembershipObserver>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object of `type_name` named `name`
    ///
    /// Group type names (see `model::object`) produce a group with an
    /// empty member list. The new object belongs to no group.
    ///
    /// # Errors
    ///
    /// `InvalidName` / `InvalidTypeName` for blank input, `DuplicateName`
    /// if another object already uses `name`.
    pub fn create_object(&mut self, type_name: &str, name: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(GroveError::InvalidName {
                reason: "Name cannot be empty or whitespace-only".to_string(),
            });
        }
        if type_name.trim().is_empty() {
            return Err(GroveError::InvalidTypeName {
                reason: "Type name cannot be empty or whitespace-only".to_string(),
            });
        }
        if self.names.contains_key(name) {
            return Err(GroveError::DuplicateName {
                name: name.to_string(),
            });
        }

        let id = Uuid::now_v7().to_string();
        let object = DocumentObject::new(id.clone(), name.to_string(), type_name.to_string());
        if let Some(kind) = object.group_kind() {
            self.groups.insert(id.clone(), GroupExtension::new(kind));
        }

        tracing::debug!(object_id = %id, type_name = type_name, name = name, "object created");
        self.names.insert(name.to_string(), id.clone());
        self.order.push(id.clone());
        self.objects.insert(id.clone(), object);
        Ok(id)
    }

    /// Remove an object from the document entirely
    ///
    /// The object is first unlinked from the group that lists it (that
    /// group is notified). If the object is itself a group, its member
    /// list is dropped and those members become ownerless; nothing else
    /// changes for them.
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` if no object has this id.
    pub fn discard_object(&mut self, id: &str) -> Result<()> {
        self.get_object(id)?;

        if let Some(owner) = self.owners.get(id).cloned() {
            self.mutate_members(&owner, |members| members.remove_if_present(id))?;
        }

        if let Some(ext) = self.groups.remove(id) {
            for member in ext.members.get() {
                if self.owners.get(member).map(String::as_str) == Some(id) {
                    self.owners.remove(member);
                }
            }
        }

        if let Some(object) = self.objects.remove(id) {
            self.names.remove(&object.name);
        }
        self.order.retain(|o| o != id);
        tracing::debug!(object_id = %id, "object discarded");
        Ok(())
    }

    /// # Errors
    ///
    /// `ObjectNotFound` if no object has this id.
    pub fn get_object(&self, id: &str) -> Result<&DocumentObject> {
        self.objects
            .get(id)
            .ok_or_else(|| GroveError::ObjectNotFound {
                object_id: id.to_string(),
            })
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<&DocumentObject> {
        self.names.get(name).and_then(|id| self.objects.get(id))
    }

    pub fn contains_object(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// All objects in creation order
    pub fn list_objects(&self) -> Vec<&DocumentObject> {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(id))
            .collect()
    }

    /// Group ids in creation order
    pub fn list_groups(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.groups.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// # Errors
    ///
    /// `ObjectNotFound` for an unknown id, `NotAGroup` if the object is
    /// not a group.
    pub fn group(&self, id: &str) -> Result<&GroupExtension> {
        self.get_object(id)?;
        self.groups.get(id).ok_or_else(|| GroveError::NotAGroup {
            object_id: id.to_string(),
        })
    }

    pub(crate) fn group_mut(&mut self, id: &str) -> Result<&mut GroupExtension> {
        self.get_object(id)?;
        self.groups.get_mut(id).ok_or_else(|| GroveError::NotAGroup {
            object_id: id.to_string(),
        })
    }

    /// Direct owner of `id`, whatever kind of group it is
    pub fn direct_owner(&self, id: &str) -> Option<&str> {
        self.owners.get(id).map(String::as_str)
    }

    /// Attach an override handler to a group, replacing any previous one
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` / `NotAGroup` for a bad group id.
    pub fn attach_handler(&mut self, group_id: &str, handler: Arc<dyn GroupHandler>) -> Result<()> {
        self.group_mut(group_id)?.handler = Some(handler);
        Ok(())
    }

    /// Detach and return the group's handler, if any
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` / `NotAGroup` for a bad group id.
    pub fn detach_handler(&mut self, group_id: &str) -> Result<Option<Arc<dyn GroupHandler>>> {
        Ok(self.group_mut(group_id)?.handler.take())
    }

    /// Replace the group's built-in policy
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` / `NotAGroup` for a bad group id.
    pub fn set_builtin_policy(&mut self, group_id: &str, policy: Arc<dyn GroupPolicy>) -> Result<()> {
        self.group_mut(group_id)?.builtin = policy;
        Ok(())
    }

    /// Mark a current member as part of the group's structural template
    ///
    /// Returns `false` (and pins nothing) if `object_id` is not a direct
    /// member. A pinned member loses its pin when it leaves the group.
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` / `NotAGroup` for a bad group id.
    pub fn pin_static_member(&mut self, group_id: &str, object_id: &str) -> Result<bool> {
        let ext = self.group_mut(group_id)?;
        if !ext.members.contains(object_id) {
            return Ok(false);
        }
        ext.static_members.insert(object_id.to_string());
        Ok(true)
    }

    pub fn subscribe(&mut self, observer: Arc<dyn MembershipObserver>) {
        self.observers.push(observer);
    }

    /// Load a group's member list verbatim, without any checks
    ///
    /// For rebuilding a document from persisted data. Duplicates, unknown
    /// ids and conflicting owners are kept as-is; run
    /// `rules::validation::validate_document` afterwards. The owner index
    /// is rebuilt from scratch and no observer is notified.
    ///
    /// # Errors
    ///
    /// `ObjectNotFound` / `NotAGroup` for a bad group id.
    pub fn restore_members(&mut self, group_id: &str, ids: Vec<String>) -> Result<()> {
        self.group_mut(group_id)?.members = Members::from_raw(ids);
        self.rebuild_owner_index();
        Ok(())
    }

    fn rebuild_owner_index(&mut self) {
        let mut owners = HashMap::new();
        for group_id in &self.order {
            if let Some(ext) = self.groups.get(group_id) {
                for member in ext.members.get() {
                    owners.insert(member.clone(), group_id.clone());
                }
            }
        }
        self.owners = owners;
    }

    /// Apply `f` to a group's member list; if it reports a change, update
    /// the owner index, drop stale static pins and notify observers
    ///
    /// Returns whatever `f` returned.
    pub(crate) fn mutate_members<F>(&mut self, group_id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Members) -> bool,
    {
        let ext = self.group_mut(group_id)?;
        let before = ext.members.get().to_vec();
        if !f(&mut ext.members) {
            return Ok(false);
        }
        let members = &ext.members;
        ext.static_members.retain(|id| members.contains(id.as_str()));
        let after = members.get().to_vec();
        let removed: Vec<String> = before
            .into_iter()
            .filter(|id| !members.contains(id.as_str()))
            .collect();

        for id in &removed {
            if self.owners.get(id).map(String::as_str) == Some(group_id) {
                self.owners.remove(id);
            }
        }
        for added in &after {
            self.owners.insert(added.clone(), group_id.to_string());
        }

        tracing::debug!(
            group_id = group_id,
            member_count = after.len(),
            "membership changed"
        );
        for observer in &self.observers {
            observer.membership_changed(group_id, &after);
        }
        Ok(true)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("objects", &self.order.len())
            .field("groups", &self.groups.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
