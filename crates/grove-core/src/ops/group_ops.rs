//! Membership operations on a single group
//!
//! Every function takes the document and the id of the group acting as
//! "this". Policy rejections, cycle refusals, adoption conflicts and no-op
//! adds/removes are reported through the return value, never as errors;
//! errors mean an id did not resolve or did not name a group.
//!
//! Mutating operations are bracketed by `log_op_start!` / `log_op_end!`.
//! Batch forms call the unlogged `*_impl` helpers so one call produces one
//! start/end pair.

use std::collections::HashSet;
use std::time::Instant;

use super::document::Document;
use super::{ownership, policy_gate};
use crate::errors::{GroveError, Result};
use crate::model::DocumentObject;
use crate::{log_op_end, log_op_error, log_op_start};

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Add `object_id` to the group, taking it away from its current owner
///
/// Returns the ids actually inserted: `[object_id]` on success, empty when
/// the object already is a member, the policy gate refuses it, or adding
/// it would make the group its own ancestor. A refused add changes
/// nothing, not even the old owner.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` for bad ids.
pub fn add_object(doc: &mut Document, group_id: &str, object_id: &str) -> Result<Vec<String>> {
    log_op_start!("add_object", group_id = group_id, object_id = object_id);
    let start = Instant::now();

    let added = add_object_impl(doc, group_id, object_id).map_err(|e| {
        log_op_error!("add_object", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "add_object",
        duration_ms = elapsed_ms(start),
        affected_count = added.len()
    );
    Ok(added)
}

fn add_object_impl(doc: &mut Document, group_id: &str, object_id: &str) -> Result<Vec<String>> {
    if doc.group(group_id)?.members.contains(object_id) {
        return Ok(Vec::new());
    }

    if !policy_gate::can_accept(doc, group_id, object_id)? {
        tracing::debug!(group_id, object_id, "rejected by policy");
        return Ok(Vec::new());
    }

    if ownership::would_create_cycle(doc, group_id, object_id) {
        tracing::debug!(group_id, object_id, "rejected: would create a cycle");
        return Ok(Vec::new());
    }

    if let Some(owner) = ownership::direct_owner_of(doc, object_id).map(str::to_string) {
        doc.mutate_members(&owner, |members| members.remove_if_present(object_id))?;
    }
    doc.mutate_members(group_id, |members| members.insert_unique(object_id))?;

    Ok(vec![object_id.to_string()])
}

/// Add several objects, in input order, skipping any that fail
///
/// Best effort: rejected objects and ids that do not resolve are skipped
/// and the rest still go in. Returns the ids actually inserted.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn add_objects(doc: &mut Document, group_id: &str, object_ids: &[String]) -> Result<Vec<String>> {
    log_op_start!("add_objects", group_id = group_id, requested = object_ids.len());
    let start = Instant::now();

    if let Err(e) = doc.group(group_id) {
        log_op_error!("add_objects", e.clone(), duration_ms = elapsed_ms(start));
        return Err(e);
    }

    let mut added = Vec::new();
    for object_id in object_ids {
        match add_object_impl(doc, group_id, object_id) {
            Ok(ids) => added.extend(ids),
            Err(e) => tracing::warn!(group_id, object_id = %object_id, error = %e, "skipped"),
        }
    }

    log_op_end!(
        "add_objects",
        duration_ms = elapsed_ms(start),
        affected_count = added.len()
    );
    Ok(added)
}

/// Add `object_id` only if nothing owns it yet
///
/// Returns `true` if the object is (now or already) a direct member,
/// `false` if another group owns it or the add was refused. Never
/// reparents.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` for bad ids.
pub fn adopt_object(doc: &mut Document, group_id: &str, object_id: &str) -> Result<bool> {
    log_op_start!("adopt_object", group_id = group_id, object_id = object_id);
    let start = Instant::now();

    let adopted = adopt_object_impl(doc, group_id, object_id).map_err(|e| {
        log_op_error!("adopt_object", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "adopt_object",
        duration_ms = elapsed_ms(start),
        adopted = adopted
    );
    Ok(adopted)
}

fn adopt_object_impl(doc: &mut Document, group_id: &str, object_id: &str) -> Result<bool> {
    if doc.group(group_id)?.members.contains(object_id) {
        return Ok(true);
    }
    doc.get_object(object_id)?;

    if let Some(owner) = ownership::direct_owner_of(doc, object_id) {
        tracing::debug!(group_id, object_id, owner, "not adopted: already owned");
        return Ok(false);
    }

    Ok(!add_object_impl(doc, group_id, object_id)?.is_empty())
}

/// Remove `object_id` from the group
///
/// Returns `[object_id]` if it was a direct member, empty otherwise. The
/// object stays in the document.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn remove_object(doc: &mut Document, group_id: &str, object_id: &str) -> Result<Vec<String>> {
    log_op_start!("remove_object", group_id = group_id, object_id = object_id);
    let start = Instant::now();

    let removed = remove_object_impl(doc, group_id, object_id).map_err(|e| {
        log_op_error!("remove_object", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "remove_object",
        duration_ms = elapsed_ms(start),
        affected_count = removed.len()
    );
    Ok(removed)
}

fn remove_object_impl(doc: &mut Document, group_id: &str, object_id: &str) -> Result<Vec<String>> {
    if doc.mutate_members(group_id, |members| members.remove_if_present(object_id))? {
        Ok(vec![object_id.to_string()])
    } else {
        Ok(Vec::new())
    }
}

/// Remove several objects; ids that are not members are ignored
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn remove_objects(
    doc: &mut Document,
    group_id: &str,
    object_ids: &[String],
) -> Result<Vec<String>> {
    log_op_start!("remove_objects", group_id = group_id, requested = object_ids.len());
    let start = Instant::now();

    if let Err(e) = doc.group(group_id) {
        log_op_error!("remove_objects", e.clone(), duration_ms = elapsed_ms(start));
        return Err(e);
    }

    let mut removed = Vec::new();
    for object_id in object_ids {
        removed.extend(remove_object_impl(doc, group_id, object_id)?);
    }

    log_op_end!(
        "remove_objects",
        duration_ms = elapsed_ms(start),
        affected_count = removed.len()
    );
    Ok(removed)
}

/// Discard every member from the document, depth first
///
/// Members that are groups are emptied the same way before being
/// discarded themselves. Returns the discarded ids in discard order; the
/// group ends up with an empty member list.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn remove_objects_from_document(doc: &mut Document, group_id: &str) -> Result<Vec<String>> {
    log_op_start!("remove_objects_from_document", group_id = group_id);
    let start = Instant::now();

    let mut discarded = Vec::new();
    let mut visiting = HashSet::new();
    if let Err(e) = cascade_discard(doc, group_id, &mut visiting, &mut discarded) {
        log_op_error!(
            "remove_objects_from_document",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        return Err(e);
    }

    log_op_end!(
        "remove_objects_from_document",
        duration_ms = elapsed_ms(start),
        affected_count = discarded.len()
    );
    Ok(discarded)
}

// Recursion depth is bounded by nesting depth because groups are acyclic.
// `visiting` only matters for restored documents that were never
// validated: a group already on the cascade path is neither re-entered
// nor discarded.
fn cascade_discard(
    doc: &mut Document,
    group_id: &str,
    visiting: &mut HashSet<String>,
    discarded: &mut Vec<String>,
) -> Result<()> {
    if !visiting.insert(group_id.to_string()) {
        return Ok(());
    }

    let members = doc.group(group_id)?.members.get().to_vec();
    for member in members {
        if visiting.contains(&member) {
            continue;
        }
        let Ok(object) = doc.get_object(&member) else {
            continue;
        };
        if object.is_group() {
            cascade_discard(doc, &member, visiting, discarded)?;
        }
        doc.discard_object(&member)?;
        discarded.push(member);
    }

    Ok(())
}

/// Create an object of `type_name` and put it in the group
///
/// The group's `can_create` gate is asked first; a refusal creates
/// nothing. If creation fails upstream, nothing is inserted. If the new
/// object is then refused by `can_accept`, it is discarded again so no
/// orphan is left behind. Returns the new id, or `None` if no object
/// resulted.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn new_object(
    doc: &mut Document,
    group_id: &str,
    type_name: &str,
    name: &str,
) -> Result<Option<String>> {
    log_op_start!("new_object", group_id = group_id, type_name = type_name);
    let start = Instant::now();

    let created = new_object_impl(doc, group_id, type_name, name).map_err(|e| {
        log_op_error!("new_object", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "new_object",
        duration_ms = elapsed_ms(start),
        affected_count = usize::from(created.is_some())
    );
    Ok(created)
}

fn new_object_impl(
    doc: &mut Document,
    group_id: &str,
    type_name: &str,
    name: &str,
) -> Result<Option<String>> {
    if !policy_gate::can_create(doc, group_id, type_name, None)? {
        tracing::debug!(group_id, type_name, "creation refused by policy");
        return Ok(None);
    }

    let object_id = match doc.create_object(type_name, name) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(group_id, type_name, name, error = %e, "object creation failed");
            return Ok(None);
        }
    };

    if add_object_impl(doc, group_id, &object_id)?.is_empty() {
        tracing::debug!(group_id, object_id = %object_id, "insertion refused, discarding new object");
        doc.discard_object(&object_id)?;
        return Ok(None);
    }

    Ok(Some(object_id))
}

/// Replace the group's member list wholesale
///
/// Repeated ids collapse to their first occurrence. Ids that do not
/// resolve, would close a cycle, or are already owned by another group
/// are left out; the corrected list is still stored, and then the first
/// problem is reported.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` for a bad group id; `ObjectNotFound`,
/// `CycleDetected` or `MultipleGroups` for the first stripped entry.
pub fn set_objects(doc: &mut Document, group_id: &str, object_ids: &[String]) -> Result<()> {
    log_op_start!("set_objects", group_id = group_id, requested = object_ids.len());
    let start = Instant::now();

    let outcome = set_objects_impl(doc, group_id, object_ids);
    if let Err(e) = &outcome {
        log_op_error!("set_objects", e.clone(), duration_ms = elapsed_ms(start));
    } else {
        log_op_end!("set_objects", duration_ms = elapsed_ms(start));
    }
    outcome
}

fn set_objects_impl(doc: &mut Document, group_id: &str, object_ids: &[String]) -> Result<()> {
    doc.group(group_id)?;

    let mut corrected = Vec::with_capacity(object_ids.len());
    let mut first_error = None;
    for object_id in object_ids {
        let problem = if !doc.contains_object(object_id) {
            Some(GroveError::ObjectNotFound {
                object_id: object_id.clone(),
            })
        } else if ownership::would_create_cycle(doc, group_id, object_id) {
            Some(GroveError::CycleDetected {
                group_id: group_id.to_string(),
                object_id: object_id.clone(),
            })
        } else {
            match ownership::direct_owner_of(doc, object_id) {
                Some(owner) if owner != group_id => Some(GroveError::MultipleGroups {
                    object_id: object_id.clone(),
                    owner_id: owner.to_string(),
                    group_id: group_id.to_string(),
                }),
                _ => None,
            }
        };

        match problem {
            Some(e) => {
                first_error.get_or_insert(e);
            }
            None => corrected.push(object_id.clone()),
        }
    }

    doc.mutate_members(group_id, |members| members.set(corrected))?;

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Direct member named `name`, if any
///
/// Objects with that name elsewhere in the document are not found.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn get_object<'a>(
    doc: &'a Document,
    group_id: &str,
    name: &str,
) -> Result<Option<&'a DocumentObject>> {
    let ext = doc.group(group_id)?;
    Ok(doc
        .get_object_by_name(name)
        .filter(|o| ext.members.contains(&o.id)))
}

/// Is `object_id` a member of the group?
///
/// With `recursive`, members of nested groups count too.
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn has_object(doc: &Document, group_id: &str, object_id: &str, recursive: bool) -> Result<bool> {
    let ext = doc.group(group_id)?;
    if ext.members.contains(object_id) {
        return Ok(true);
    }
    if !recursive {
        return Ok(false);
    }

    let mut visited = HashSet::from([group_id.to_string()]);
    let mut stack: Vec<&str> = ext.members.get().iter().map(String::as_str).collect();
    while let Some(id) = stack.pop() {
        let Some(nested) = doc.groups.get(id) else {
            continue;
        };
        if !visited.insert(id.to_string()) {
            continue;
        }
        if nested.members.contains(object_id) {
            return Ok(true);
        }
        stack.extend(nested.members.get().iter().map(String::as_str));
    }

    Ok(false)
}

/// Is the group nested, directly or transitively, inside `other_id`?
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if either id is bad.
pub fn is_child_of(doc: &Document, group_id: &str, other_id: &str) -> Result<bool> {
    doc.group(group_id)?;
    doc.group(other_id)?;
    Ok(ownership::is_descendant_of(doc, group_id, other_id))
}

/// Every direct member, in list order
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn get_objects(doc: &Document, group_id: &str) -> Result<Vec<String>> {
    Ok(doc.group(group_id)?.members.get().to_vec())
}

/// Members fixed by the group's structural template
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn get_static_objects(doc: &Document, group_id: &str) -> Result<Vec<String>> {
    Ok(doc.group(group_id)?.static_objects())
}

/// User-managed members (all members unless some are pinned static)
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn get_dynamic_objects(doc: &Document, group_id: &str) -> Result<Vec<String>> {
    Ok(doc.group(group_id)?.dynamic_objects())
}

/// Direct members matching `predicate`, in list order
///
/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn get_objects_of_type<F>(doc: &Document, group_id: &str, predicate: F) -> Result<Vec<String>>
where
    F: Fn(&DocumentObject) -> bool,
{
    let ext = doc.group(group_id)?;
    Ok(ext
        .members
        .get()
        .iter()
        .filter(|id| doc.get_object(id).map(&predicate).unwrap_or(false))
        .cloned()
        .collect())
}

/// # Errors
///
/// `ObjectNotFound` / `NotAGroup` if `group_id` is bad.
pub fn count_objects_of_type<F>(doc: &Document, group_id: &str, predicate: F) -> Result<usize>
where
    F: Fn(&DocumentObject) -> bool,
{
    Ok(get_objects_of_type(doc, group_id, predicate)?.len())
}

/// Base group that owns `object_id`, if any
///
/// Specialized group kinds are not reported; see `ownership::owner_of`.
pub fn get_group_of_object(doc: &Document, object_id: &str) -> Option<String> {
    ownership::owner_of(doc, object_id).map(str::to_string)
}
