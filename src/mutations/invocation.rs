//! Invocation binding mutators.
//!
//! Binding parameters name the invoked function's formal parameters, so they
//! are never registered as variables in the invoking scope; only each
//! binding's bound expression participates in tracking.

use crate::dmn_model::{Binding, BoxedExpression, InvocationExpression};
use crate::utils::ids::generate_uuid;
use crate::utils::naming::next_available_prefixed_name;
use crate::variables::VariablesRepository;

use super::collect_variable_ids;
use super::errors::MutationError;

/// Insert a binding at `at` with a fresh `p-N` parameter and an undefined
/// bound expression. Returns the parameter's id.
pub fn add_binding(
    invocation: &mut InvocationExpression,
    at: usize,
) -> Result<String, MutationError> {
    if at > invocation.bindings.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "binding",
            index: at,
            len: invocation.bindings.len(),
        });
    }
    let taken: Vec<String> = invocation
        .bindings
        .iter()
        .map(|binding| binding.parameter.name.clone())
        .collect();
    let parameter_id = generate_uuid();
    invocation.bindings.insert(
        at,
        Binding {
            parameter: crate::dmn_model::InformationItem {
                id: parameter_id.clone(),
                name: next_available_prefixed_name(&taken, "p"),
                type_ref: None,
            },
            expression: BoxedExpression::Undefined,
        },
    );
    Ok(parameter_id)
}

/// Remove the binding at `at` along with the variables its bound expression
/// registered in the invoking scope. The last binding stays; at the floor
/// this logs and leaves the invocation untouched.
pub fn remove_binding(
    invocation: &mut InvocationExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    if invocation.bindings.len() <= 1 {
        log::warn!("invocation {} keeps its last binding", invocation.id);
        return Ok(());
    }
    if at >= invocation.bindings.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "binding",
            index: at,
            len: invocation.bindings.len(),
        });
    }
    for id in collect_variable_ids(&invocation.bindings[at].expression) {
        repository.remove_variable(&id, true)?;
    }
    invocation.bindings.remove(at);
    Ok(())
}

/// Rename the binding parameter at `at`. Parameters belong to the callee, so
/// this touches only the document; surrounding whitespace is trimmed off.
pub fn update_binding_parameter(
    invocation: &mut InvocationExpression,
    at: usize,
    name: &str,
) -> Result<(), MutationError> {
    let len = invocation.bindings.len();
    let Some(binding) = invocation.bindings.get_mut(at) else {
        return Err(MutationError::IndexOutOfBounds {
            what: "binding",
            index: at,
            len,
        });
    };
    binding.parameter.name = name.trim().to_string();
    Ok(())
}

/// Point the invocation at another function. The reference names a BKM, not a
/// variable in the invoking scope, so its text stays untracked.
pub fn set_invoked_function(invocation: &mut InvocationExpression, text: &str) {
    invocation.invoked_function.text = text.trim().to_string();
}
