//! Error types for the scope repository and façade.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariablesError {
    /// A scope id that is not in the scope tree. Either the document was
    /// malformed during build, or a caller addressed a scope that was removed.
    #[error("Unknown scope: '{scope_id}'")]
    UnknownScope { scope_id: String },

    /// A variable uuid with no record. Rename/remove/type-change callers are
    /// expected to hold ids taken from the repository itself.
    #[error("Unknown variable: '{uuid}'")]
    UnknownVariable { uuid: String },

    /// The uuid is already registered. Overwriting would silently reassign
    /// scope identity, so this is surfaced instead.
    #[error("Variable '{uuid}' is already registered")]
    DuplicateVariable { uuid: String },

    /// Two document elements share an id. Name resolution would be ambiguous.
    #[error("Duplicate element id in model: '{id}'")]
    DuplicateElementId { id: String },

    /// A write aimed at a variable owned by an imported model. Imported
    /// variables change in their own model; this document only reads them.
    #[error("Variable '{key}' belongs to an imported model")]
    ImportedVariable { key: String },

    /// An import alias that is not declared by the model.
    #[error("Unknown import alias: '{alias}'")]
    UnknownImport { alias: String },

    /// Renaming an import onto an alias another import already uses.
    #[error("Import alias '{alias}' is already in use")]
    DuplicateImport { alias: String },

    /// A requirement href pointing at a missing element. Resolving names
    /// against a wrong scope is worse than failing the build.
    #[error("Requirement points at a missing element: '{href}'")]
    DanglingHref { href: String },
}
