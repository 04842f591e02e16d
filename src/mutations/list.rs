//! List item mutators.
//!
//! List items register their content flat in the containing scope, so item
//! removal walks the item for same-scope registrations instead of cascading
//! through a nested scope.

use crate::dmn_model::{BoxedExpression, ListExpression};
use crate::variables::VariablesRepository;

use super::collect_variable_ids;
use super::errors::MutationError;

/// Insert an undefined item at `at`.
pub fn add_list_item(list: &mut ListExpression, at: usize) -> Result<(), MutationError> {
    if at > list.items.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "list item",
            index: at,
            len: list.items.len(),
        });
    }
    list.items.insert(at, BoxedExpression::Undefined);
    Ok(())
}

/// Remove the item at `at` along with the variables it registered. The last
/// item stays; at the floor this logs and leaves the list untouched.
pub fn remove_list_item(
    list: &mut ListExpression,
    at: usize,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    if list.items.len() <= 1 {
        log::warn!("list {} keeps its last item", list.id);
        return Ok(());
    }
    if at >= list.items.len() {
        return Err(MutationError::IndexOutOfBounds {
            what: "list item",
            index: at,
            len: list.items.len(),
        });
    }
    for id in collect_variable_ids(&list.items[at]) {
        repository.remove_variable(&id, true)?;
    }
    list.items.remove(at);
    Ok(())
}
