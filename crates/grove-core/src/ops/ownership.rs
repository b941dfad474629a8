//! Ownership lookups over the document's owner index
//!
//! All queries here are index lookups or upward walks, so their cost is
//! bounded by nesting depth, never by document size.

use std::collections::HashSet;

use super::document::Document;

/// Base group that lists `object_id` as a direct member
///
/// Returns `None` when the object is ownerless or when its owner is one of
/// the specialized group kinds, which have their own resolvers.
pub fn owner_of<'a>(doc: &'a Document, object_id: &str) -> Option<&'a str> {
    let owner = doc.direct_owner(object_id)?;
    doc.get_object(owner)
        .ok()
        .filter(|o| o.is_plain_group())
        .map(|o| o.id.as_str())
}

/// Group of any kind that lists `object_id` as a direct member
pub fn direct_owner_of<'a>(doc: &'a Document, object_id: &str) -> Option<&'a str> {
    doc.direct_owner(object_id)
}

/// True if `a` is nested inside `b`, directly or transitively
///
/// Walks upward from `a` through direct owners. An object is not its own
/// descendant. The walk stops on a repeated node, so a corrupted
/// (cyclic) graph cannot loop it forever.
pub fn is_descendant_of(doc: &Document, a: &str, b: &str) -> bool {
    let mut visited = HashSet::new();
    let mut current = doc.direct_owner(a);

    while let Some(id) = current {
        if id == b {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = doc.direct_owner(id);
    }

    false
}

/// Would listing `candidate_id` inside `group_id` close a cycle?
///
/// True when the candidate is the group itself or one of its ancestors.
pub fn would_create_cycle(doc: &Document, group_id: &str, candidate_id: &str) -> bool {
    group_id == candidate_id || is_descendant_of(doc, group_id, candidate_id)
}

/// Chain of direct owners from `object_id` up to its root, nearest first
pub fn ancestors(doc: &Document, object_id: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    let mut current = doc.direct_owner(object_id);

    while let Some(id) = current {
        if chain.iter().any(|c| c == id) {
            break;
        }
        chain.push(id.to_string());
        current = doc.direct_owner(id);
    }

    chain
}
