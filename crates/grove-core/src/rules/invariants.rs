//! Structural invariant checks over a whole document
//!
//! Normal membership operations cannot break these; they matter for
//! documents rebuilt with `Document::restore_members` and as a
//! cross-check of the incrementally maintained owner index.

use std::collections::{HashMap, HashSet};

use crate::ops::Document;

/// Owners of every listed object, recomputed from the member lists
///
/// Groups are visited in creation order, so each owner list is too.
fn listed_owners(doc: &Document) -> HashMap<&str, Vec<&str>> {
    let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
    for group_id in doc.list_groups() {
        if let Some(ext) = doc.groups.get(group_id) {
            for member in ext.members.get() {
                let entry = owners.entry(member.as_str()).or_default();
                if !entry.contains(&group_id) {
                    entry.push(group_id);
                }
            }
        }
    }
    owners
}

/// Objects listed by more than one group
///
/// Returns (object_id, owner_ids) tuples, ordered by object id.
pub fn find_multiple_owners(doc: &Document) -> Vec<(String, Vec<String>)> {
    let mut found: Vec<(String, Vec<String>)> = listed_owners(doc)
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(id, owners)| {
            (
                id.to_string(),
                owners.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();
    found.sort();
    found
}

/// Groups listing the same object more than once
///
/// Returns (group_id, object_id) tuples.
pub fn find_duplicate_members(doc: &Document) -> Vec<(String, String)> {
    let mut duplicates = Vec::new();
    for group_id in doc.list_groups() {
        let Some(ext) = doc.groups.get(group_id) else {
            continue;
        };
        let mut seen = HashSet::new();
        for member in ext.members.get() {
            if !seen.insert(member.as_str()) {
                duplicates.push((group_id.to_string(), member.clone()));
            }
        }
    }
    duplicates
}

/// Member ids that no longer resolve to an object
///
/// Returns (group_id, object_id) tuples.
pub fn find_dangling_members(doc: &Document) -> Vec<(String, String)> {
    let mut dangling = Vec::new();
    for group_id in doc.list_groups() {
        let Some(ext) = doc.groups.get(group_id) else {
            continue;
        };
        for member in ext.members.get() {
            if !doc.contains_object(member) {
                dangling.push((group_id.to_string(), member.clone()));
            }
        }
    }
    dangling
}

/// Is `group_id` its own ancestor?
///
/// Follows the member lists themselves rather than the owner index, so it
/// also sees cycles the index cannot represent.
pub fn has_cycle(doc: &Document, group_id: &str) -> bool {
    let owners = listed_owners(doc);
    let mut stack: Vec<&str> = owners.get(group_id).cloned().unwrap_or_default();
    let mut visited = HashSet::new();

    while let Some(id) = stack.pop() {
        if id == group_id {
            return true;
        }
        if visited.insert(id) {
            if let Some(parents) = owners.get(id) {
                stack.extend(parents.iter().copied());
            }
        }
    }

    false
}

/// Objects whose indexed owner disagrees with the member lists
///
/// Objects listed by several groups are skipped; `find_multiple_owners`
/// reports those. Returns (object_id, indexed_owner, listed_owner) tuples.
pub fn find_index_drift(doc: &Document) -> Vec<(String, Option<String>, Option<String>)> {
    let owners = listed_owners(doc);
    let mut ids: HashSet<&str> = owners.keys().copied().collect();
    ids.extend(doc.owners.keys().map(String::as_str));

    let mut drift: Vec<(String, Option<String>, Option<String>)> = ids
        .into_iter()
        .filter_map(|id| {
            let listed = match owners.get(id).map(Vec::as_slice) {
                Some([only]) => Some(*only),
                Some([]) | None => None,
                Some(_) => return None,
            };
            let indexed = doc.direct_owner(id);
            (indexed != listed).then(|| {
                (
                    id.to_string(),
                    indexed.map(str::to_string),
                    listed.map(str::to_string),
                )
            })
        })
        .collect();
    drift.sort();
    drift
}
