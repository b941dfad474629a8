use std::collections::HashSet;

/// Ordered, duplicate-free list of a group's direct members
///
/// Order is insertion order; removals never reorder what remains. A side
/// index keeps `contains` O(1). Every mutator reports whether anything
/// changed so the owning document can skip notifications for no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list verbatim, duplicates included
    ///
    /// Only used when restoring a persisted graph that still has to be
    /// validated; normal mutation goes through `set`/`insert_unique`.
    pub(crate) fn from_raw(ids: Vec<String>) -> Self {
        let index = ids.iter().cloned().collect();
        Self { ids, index }
    }

    pub fn get(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.ids.iter().position(|m| m == id)
    }

    /// Replace the whole list, keeping the first occurrence of any repeated id
    pub fn set(&mut self, ids: Vec<String>) -> bool {
        let mut index = HashSet::with_capacity(ids.len());
        let deduped: Vec<String> = ids
            .into_iter()
            .filter(|id| index.insert(id.clone()))
            .collect();

        if deduped == self.ids {
            return false;
        }
        self.ids = deduped;
        self.index = index;
        true
    }

    /// Append `id` unless already present
    pub fn insert_unique(&mut self, id: &str) -> bool {
        if !self.index.insert(id.to_string()) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove_if_present(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.ids.retain(|m| m != id);
        true
    }
}
