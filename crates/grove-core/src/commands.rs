//! Command inventory for the `apply()` boundary
//!
//! One variant per mutating document operation. Commands are plain data
//! so a higher layer can queue, log or serialize them before applying.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Create a free-standing object
    CreateObject { type_name: String, name: String },

    /// Remove an object from the document, unlinking it from its owner
    DiscardObject { object_id: String },

    /// Create an object and insert it into a group (policy-gated)
    NewObject {
        group_id: String,
        type_name: String,
        name: String,
    },

    /// Insert an object into a group, reparenting it if needed
    AddObject { group_id: String, object_id: String },

    /// Best-effort batch insert
    AddObjects {
        group_id: String,
        object_ids: Vec<String>,
    },

    /// Insert an object only if nothing owns it yet
    AdoptObject { group_id: String, object_id: String },

    RemoveObject { group_id: String, object_id: String },

    RemoveObjects {
        group_id: String,
        object_ids: Vec<String>,
    },

    /// Discard every member of a group, depth first
    RemoveObjectsFromDocument { group_id: String },

    /// Replace a group's member list wholesale
    SetObjects {
        group_id: String,
        object_ids: Vec<String>,
    },
}

impl Command {
    /// Operation name used in log events and errors
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CreateObject { .. } => "create_object",
            Command::DiscardObject { .. } => "discard_object",
            Command::NewObject { .. } => "new_object",
            Command::AddObject { .. } => "add_object",
            Command::AddObjects { .. } => "add_objects",
            Command::AdoptObject { .. } => "adopt_object",
            Command::RemoveObject { .. } => "remove_object",
            Command::RemoveObjects { .. } => "remove_objects",
            Command::RemoveObjectsFromDocument { .. } => "remove_objects_from_document",
            Command::SetObjects { .. } => "set_objects",
        }
    }

    /// Group the command acts on, if it targets one
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Command::CreateObject { .. } | Command::DiscardObject { .. } => None,
            Command::NewObject { group_id, .. }
            | Command::AddObject { group_id, .. }
            | Command::AddObjects { group_id, .. }
            | Command::AdoptObject { group_id, .. }
            | Command::RemoveObject { group_id, .. }
            | Command::RemoveObjects { group_id, .. }
            | Command::RemoveObjectsFromDocument { group_id }
            | Command::SetObjects { group_id, .. } => Some(group_id),
        }
    }
}
