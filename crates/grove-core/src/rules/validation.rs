use crate::errors::{GroveError, Result};
use crate::ops::Document;

use super::invariants;

/// Validate every membership invariant of a document
///
/// 1. Every listed member resolves to an object
/// 2. No group lists an object twice
/// 3. No object is a direct member of more than one group
/// 4. No group is its own ancestor
/// 5. The owner index agrees with the member lists
///
/// # Errors
///
/// Returns the first violation found, in the order above. Call the
/// functions in `rules::invariants` directly for an exhaustive report.
pub fn validate_document(doc: &Document) -> Result<()> {
    if let Some((group_id, object_id)) = invariants::find_dangling_members(doc).into_iter().next() {
        return Err(GroveError::DanglingMember {
            group_id,
            object_id,
        });
    }

    if let Some((group_id, object_id)) = invariants::find_duplicate_members(doc).into_iter().next() {
        return Err(GroveError::DuplicateMember {
            group_id,
            object_id,
        });
    }

    if let Some((object_id, owner_ids)) = invariants::find_multiple_owners(doc).into_iter().next() {
        return Err(GroveError::MultipleOwners {
            object_id,
            owner_ids,
        });
    }

    for group_id in doc.list_groups() {
        if invariants::has_cycle(doc, group_id) {
            return Err(GroveError::CycleDetected {
                group_id: group_id.to_string(),
                object_id: group_id.to_string(),
            });
        }
    }

    if let Some((object_id, indexed, actual)) = invariants::find_index_drift(doc).into_iter().next() {
        return Err(GroveError::OwnerIndexDrift {
            object_id,
            indexed,
            actual,
        });
    }

    Ok(())
}
