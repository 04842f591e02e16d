//! Context entry mutators.
//!
//! A context is an ordered list of named entries closed by one result entry
//! (the entry without a variable). Entry indices in this module count named
//! entries only; the result entry keeps its position and identity through
//! every edit here.

use crate::dmn_model::{BoxedExpression, ContextEntry, ContextExpression, InformationItem};
use crate::utils::ids::generate_uuid;
use crate::utils::naming::next_available_prefixed_name;
use crate::variables::VariablesRepository;

use super::errors::MutationError;
use super::refresh_expression_ids;

/// Insert a named entry at `at` (counted over named entries), register its
/// variable under `scope`, and return the new variable's id.
///
/// The entry starts with a fresh `ContextEntry-N` name and an undefined
/// expression, so nothing beyond the variable itself needs registering.
pub fn add_context_entry(
    context: &mut ContextExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    let positions = named_positions(context);
    if at > positions.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "context entry",
            index: at,
            len: positions.len(),
        });
    }
    let absolute = match positions.get(at) {
        Some(position) => *position,
        None => positions.last().map(|p| p + 1).unwrap_or(0),
    };

    let taken: Vec<String> = context
        .named_entries()
        .filter_map(|entry| entry.variable.as_ref())
        .map(|item| item.name.clone())
        .collect();
    let name = next_available_prefixed_name(&taken, "ContextEntry");
    let variable_id = generate_uuid();

    repository.add_variable_to_context(&variable_id, &name, scope, Some(&variable_id))?;
    context.entries.insert(
        absolute,
        ContextEntry {
            id: generate_uuid(),
            variable: Some(InformationItem {
                id: variable_id.clone(),
                name,
                type_ref: None,
            }),
            expression: BoxedExpression::Undefined,
        },
    );
    Ok(variable_id)
}

/// Remove the named entry at `at`, its variable, and everything declared in
/// the entry's nested scope. A context keeps at least one named entry; at the
/// floor this logs and leaves the structure untouched.
pub fn remove_context_entry(
    context: &mut ContextExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let positions = named_positions(context);
    if positions.len() <= 1 {
        log::warn!("context {} keeps its last entry", context.id);
        return Ok(());
    }
    let Some(&absolute) = positions.get(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "context entry",
            index: at,
            len: positions.len(),
        });
    };
    if let Some(item) = &context.entries[absolute].variable {
        repository.remove_variable(&item.id, true)?;
    }
    context.entries.remove(absolute);
    Ok(())
}

/// Duplicate the named entry at `at` directly below itself. The copy gets a
/// fresh `ContextEntry-N` name, fresh ids throughout its subtree, and its
/// content is registered under the new variable's scope before splicing.
pub fn duplicate_context_entry(
    context: &mut ContextExpression,
    scope: &str,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<String, MutationError> {
    let positions = named_positions(context);
    let Some(&absolute) = positions.get(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "context entry",
            index: at,
            len: positions.len(),
        });
    };

    let mut copy = context.entries[absolute].clone();
    copy.id = generate_uuid();
    refresh_expression_ids(&mut copy.expression);
    let taken: Vec<String> = context
        .named_entries()
        .filter_map(|entry| entry.variable.as_ref())
        .map(|item| item.name.clone())
        .collect();
    let name = next_available_prefixed_name(&taken, "ContextEntry");
    let variable_id = generate_uuid();
    if let Some(item) = &mut copy.variable {
        item.id = variable_id.clone();
        item.name = name.clone();
    }

    repository.add_variable_to_context(&variable_id, &name, scope, Some(&variable_id))?;
    repository.register_expression(&copy.expression, &variable_id)?;
    context.entries.insert(absolute + 1, copy);
    Ok(variable_id)
}

/// Replace the result entry's expression, preserving the entry's identity.
///
/// Document-level only: the replaced subtree's registrations are reconciled by
/// the next repository rebuild, the same as any other shape change.
pub fn set_result_expression(
    context: &mut ContextExpression,
    expression: BoxedExpression,
) -> Result<(), MutationError> {
    let Some(entry) = context.result_entry_mut() else {
        return Err(MutationError::MissingResultEntry {
            id: context.id.clone(),
        });
    };
    entry.expression = expression;
    Ok(())
}

/// Absolute positions of the named entries, in order.
fn named_positions(context: &ContextExpression) -> Vec<usize> {
    context
        .entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.variable.is_some())
        .map(|(position, _)| position)
        .collect()
}
