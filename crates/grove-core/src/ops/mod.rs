pub mod document;
pub mod group_ops;
pub mod ownership;
pub mod policy_gate;

pub use document::{Document, MembershipObserver};
