//! Grove Core - hierarchical containment for document objects
//!
//! This crate keeps track of which group owns which object in a document,
//! including:
//! - Ordered, duplicate-free member lists per group
//! - A graph-wide owner index with ancestor/descendant queries
//! - Per-group acceptance policy with an optional override handler
//! - Membership operations (add, adopt, remove, cascade) that keep every
//!   object in at most one group and never let a group contain itself
//! - Structural validation and a command/apply boundary
//!
//! ```
//! use grove_core::ops::group_ops;
//! use grove_core::Document;
//!
//! let mut doc = Document::new();
//! let g1 = doc.create_object("Core::Group", "G1").unwrap();
//! let g2 = doc.create_object("Core::Group", "G2").unwrap();
//! let y = doc.create_object("Core::Feature", "Y").unwrap();
//!
//! group_ops::add_object(&mut doc, &g1, &y).unwrap();
//! group_ops::add_object(&mut doc, &g2, &y).unwrap();
//!
//! assert!(group_ops::get_objects(&doc, &g1).unwrap().is_empty());
//! assert_eq!(group_ops::get_group_of_object(&doc, &y), Some(g2));
//! ```

pub mod apply;
pub mod commands;
pub mod errors;
pub mod group;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

pub use apply::{apply, apply_in_context};
pub use commands::Command;
pub use errors::{ExError, ExErrorKind, GroveError, Result};
pub use group::{GroupHandler, GroupPolicy, Verdict};
pub use model::{DocumentObject, GroupKind, ObjectKind};
pub use ops::{Document, MembershipObserver};
