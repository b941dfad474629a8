//! Group building blocks: the member list, built-in policies, override
//! handlers and the per-group extension state that ties them together

pub mod dispatch;
pub mod extension;
pub mod members;
pub mod policy;

pub use dispatch::{
    dispatch_can_accept, dispatch_can_create, Form, GroupHandler, PolicyOp, ScriptedHandler,
    Verdict,
};
pub use extension::GroupExtension;
pub use members::Members;
pub use policy::{AcceptAllPolicy, GroupPolicy, TypeFilterPolicy};
