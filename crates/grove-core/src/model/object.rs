use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type name of the base group kind
pub const GROUP_TYPE: &str = "Core::Group";
/// Type name of groups that carry a shared placement for their members
pub const GEO_FEATURE_GROUP_TYPE: &str = "Core::GeoFeatureGroup";
/// Type name of groups that own an origin (reference axes and planes)
pub const ORIGIN_GROUP_TYPE: &str = "Core::OriginGroup";

/// Flavour of container an object is
///
/// Only `Plain` groups take part in graph-wide owner lookup
/// (`ops::ownership::owner_of`); the specialized kinds are resolved by
/// their own machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Plain,
    GeoFeature,
    Origin,
}

impl GroupKind {
    pub fn is_plain(&self) -> bool {
        matches!(self, GroupKind::Plain)
    }
}

/// Whether an object is a leaf or a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Leaf,
    Group(GroupKind),
}

impl ObjectKind {
    /// Derive the kind from a structural type name
    pub fn for_type_name(type_name: &str) -> Self {
        match type_name {
            GROUP_TYPE => ObjectKind::Group(GroupKind::Plain),
            GEO_FEATURE_GROUP_TYPE => ObjectKind::Group(GroupKind::GeoFeature),
            ORIGIN_GROUP_TYPE => ObjectKind::Group(GroupKind::Origin),
            _ => ObjectKind::Leaf,
        }
    }

    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            ObjectKind::Group(kind) => Some(*kind),
            ObjectKind::Leaf => None,
        }
    }
}

/// An entity in a document
///
/// Membership lives on the containing group's extension, never on the
/// member itself; ask `ops::ownership` who owns an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentObject {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Document-unique, human-facing name
    pub name: String,

    /// Structural type name, e.g. "Core::Feature"
    pub type_name: String,

    pub kind: ObjectKind,

    pub created_at: DateTime<Utc>,
}

impl DocumentObject {
    pub fn new(id: String, name: String, type_name: String) -> Self {
        let kind = ObjectKind::for_type_name(&type_name);
        Self {
            id,
            name,
            type_name,
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group(_))
    }

    /// True for base groups only, not the specialized kinds
    pub fn is_plain_group(&self) -> bool {
        self.kind == ObjectKind::Group(GroupKind::Plain)
    }

    pub fn group_kind(&self) -> Option<GroupKind> {
        self.kind.group_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type_name() {
        assert_eq!(
            ObjectKind::for_type_name(GROUP_TYPE),
            ObjectKind::Group(GroupKind::Plain)
        );
        assert_eq!(
            ObjectKind::for_type_name(ORIGIN_GROUP_TYPE),
            ObjectKind::Group(GroupKind::Origin)
        );
        assert_eq!(ObjectKind::for_type_name("Core::Feature"), ObjectKind::Leaf);
    }

    #[test]
    fn test_plain_group_excludes_specialized_kinds() {
        let plain = DocumentObject::new("a".into(), "A".into(), GROUP_TYPE.into());
        let geo = DocumentObject::new("b".into(), "B".into(), GEO_FEATURE_GROUP_TYPE.into());
        let leaf = DocumentObject::new("c".into(), "C".into(), "Core::Feature".into());

        assert!(plain.is_plain_group());
        assert!(geo.is_group());
        assert!(!geo.is_plain_group());
        assert!(!leaf.is_group());
        assert_eq!(leaf.group_kind(), None);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ObjectKind::Group(GroupKind::GeoFeature)).unwrap();
        assert_eq!(json, r#"{"group":"geo_feature"}"#);
    }
}
