pub mod object;

pub use object::{DocumentObject, GroupKind, ObjectKind};
