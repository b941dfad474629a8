//! Functional-boundary apply function
//!
//! `apply()` takes ownership of a document, runs one command against it
//! and validates the result. On error the document that went in is
//! dropped; callers that need to keep the old state clone it first.
//!
//! ```
//! use grove_core::{apply::apply, Command, Document};
//!
//! let (doc, affected) = apply(
//!     Document::new(),
//!     Command::CreateObject {
//!         type_name: "Core::Group".to_string(),
//!         name: "Group".to_string(),
//!     },
//! )
//! .unwrap();
//! assert_eq!(doc.list_groups(), vec![affected[0].as_str()]);
//! ```

use grove_core_types::RequestContext;

use crate::commands::Command;
use crate::errors::{ExError, Result};
use crate::ops::{group_ops, Document};
use crate::rules::validation;

/// Apply a command, returning the new document and the affected ids
///
/// What counts as affected depends on the command: the created or
/// discarded object, the ids actually inserted or removed, the objects
/// discarded by a cascade, or the stored member list after `SetObjects`.
///
/// # Errors
///
/// Whatever the underlying operation returns, or the first invariant
/// violation found by `rules::validation::validate_document` afterwards.
pub fn apply(mut doc: Document, cmd: Command) -> Result<(Document, Vec<String>)> {
    let affected = match cmd {
        Command::CreateObject { type_name, name } => {
            vec![doc.create_object(&type_name, &name)?]
        }

        Command::DiscardObject { object_id } => {
            doc.discard_object(&object_id)?;
            vec![object_id]
        }

        Command::NewObject {
            group_id,
            type_name,
            name,
        } => group_ops::new_object(&mut doc, &group_id, &type_name, &name)?
            .into_iter()
            .collect(),

        Command::AddObject {
            group_id,
            object_id,
        } => group_ops::add_object(&mut doc, &group_id, &object_id)?,

        Command::AddObjects {
            group_id,
            object_ids,
        } => group_ops::add_objects(&mut doc, &group_id, &object_ids)?,

        Command::AdoptObject {
            group_id,
            object_id,
        } => {
            if group_ops::adopt_object(&mut doc, &group_id, &object_id)? {
                vec![object_id]
            } else {
                Vec::new()
            }
        }

        Command::RemoveObject {
            group_id,
            object_id,
        } => group_ops::remove_object(&mut doc, &group_id, &object_id)?,

        Command::RemoveObjects {
            group_id,
            object_ids,
        } => group_ops::remove_objects(&mut doc, &group_id, &object_ids)?,

        Command::RemoveObjectsFromDocument { group_id } => {
            group_ops::remove_objects_from_document(&mut doc, &group_id)?
        }

        Command::SetObjects {
            group_id,
            object_ids,
        } => {
            group_ops::set_objects(&mut doc, &group_id, &object_ids)?;
            group_ops::get_objects(&doc, &group_id)?
        }
    };

    validation::validate_document(&doc)?;
    Ok((doc, affected))
}

/// [`apply`] with request correlation attached to any error
///
/// # Errors
///
/// The same failures as [`apply`], converted to `ExError` and tagged with
/// the operation name, the target group and the context's ids.
pub fn apply_in_context(
    doc: Document,
    cmd: Command,
    ctx: &RequestContext,
) -> std::result::Result<(Document, Vec<String>), ExError> {
    let op = cmd.op_name();
    let group_id = cmd.group_id().map(str::to_string);

    let span = tracing::info_span!(
        "apply",
        op = op,
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id.as_ref().map(|t| t.as_str()),
    );
    let _guard = span.enter();

    apply(doc, cmd).map_err(|err| {
        let mut ex = ExError::from(err)
            .with_op(op)
            .with_request_id(ctx.request_id.clone());
        if let Some(trace_id) = &ctx.trace_id {
            ex = ex.with_trace_id(trace_id.clone());
        }
        if ex.group_id().is_none() {
            if let Some(group_id) = group_id {
                ex = ex.with_group_id(group_id);
            }
        }
        ex
    })
}
