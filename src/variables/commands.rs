//! Batched document edits.
//!
//! Each user action becomes a list of commands applied in order against the
//! repository and the document records, followed by exactly one flush that
//! writes rewritten texts back into the document. Readers of the document
//! never observe a half-applied rename.

use crate::dmn_model::DmnDefinitions;

use super::errors::VariablesError;
use super::FeelVariables;

/// One repository-and-document edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    /// Rename a DRG element and its variable, rewriting every tracked text
    /// that references it. Surrounding whitespace is dropped; an all-space
    /// name is refused with a warning instead of producing an unmatchable
    /// variable.
    RenameDrgElement {
        element_id: String,
        new_name: String,
    },
    /// Change a DRG element variable's type.
    UpdateVariableType {
        element_id: String,
        type_ref: Option<String>,
    },
    /// Re-alias an import. Existing texts keep their old qualifier until
    /// they are edited; only future resolutions use the new alias.
    RenameImport {
        old_alias: String,
        new_alias: String,
    },
    /// Register a variable the document gained through a structural edit.
    AddVariable {
        uuid: String,
        name: String,
        parent_scope: String,
        child_scope: Option<String>,
    },
    /// Drop a variable the document lost through a structural edit.
    RemoveVariable { uuid: String, remove_children: bool },
}

/// Apply `commands` in order, then flush rewritten texts into `definitions`.
///
/// The first failing command stops the batch. Edits already applied stay
/// applied and are still flushed, so the repository and the document agree
/// even on the error path.
pub fn apply_batch(
    variables: &mut FeelVariables,
    definitions: &mut DmnDefinitions,
    commands: Vec<DocumentCommand>,
) -> Result<(), VariablesError> {
    let mut outcome = Ok(());
    for command in commands {
        outcome = apply_command(variables, definitions, command);
        if outcome.is_err() {
            break;
        }
    }
    variables.apply_changes_to_definition(definitions);
    outcome
}

fn apply_command(
    variables: &mut FeelVariables,
    definitions: &mut DmnDefinitions,
    command: DocumentCommand,
) -> Result<(), VariablesError> {
    match command {
        DocumentCommand::RenameDrgElement {
            element_id,
            new_name,
        } => {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                log::warn!("refusing to rename element '{}' to an empty name", element_id);
                return Ok(());
            }
            variables.rename_variable(&element_id, new_name)?;
            if let Some(element) = definitions.find_drg_element_mut(&element_id) {
                element.set_name(new_name);
            }
            Ok(())
        }
        DocumentCommand::UpdateVariableType {
            element_id,
            type_ref,
        } => {
            variables.update_variable_type(&element_id, type_ref.clone())?;
            if let Some(variable) = definitions
                .find_drg_element_mut(&element_id)
                .and_then(|element| element.variable_mut())
            {
                variable.type_ref = type_ref;
            }
            Ok(())
        }
        DocumentCommand::RenameImport {
            old_alias,
            new_alias,
        } => {
            let new_alias = new_alias.trim();
            if new_alias.is_empty() {
                log::warn!("refusing to rename import '{}' to an empty alias", old_alias);
                return Ok(());
            }
            variables.rename_import(&old_alias, new_alias)?;
            if let Some(import) = definitions
                .imports
                .iter_mut()
                .find(|import| import.name == old_alias)
            {
                import.name = new_alias.to_string();
            }
            Ok(())
        }
        DocumentCommand::AddVariable {
            uuid,
            name,
            parent_scope,
            child_scope,
        } => variables.add_variable_to_context(&uuid, &name, &parent_scope, child_scope.as_deref()),
        DocumentCommand::RemoveVariable {
            uuid,
            remove_children,
        } => variables.remove_variable(&uuid, remove_children),
    }
}
