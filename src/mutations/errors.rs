//! Error type for structural edits.

use thiserror::Error;

use crate::variables::VariablesError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    /// A mutator was handed a node of the wrong shape, e.g. a row insert on a
    /// literal. Callers dispatch on the variant before editing.
    #[error("Expected a {expected} expression, got {actual}")]
    WrongShape {
        expected: &'static str,
        actual: &'static str,
    },

    /// An index past the end of the structure being edited.
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A context carrying no result entry. Well-formed contexts always have
    /// exactly one.
    #[error("Context {id} has no result entry")]
    MissingResultEntry { id: String },

    /// A repository sync failure while registering or removing variables.
    #[error(transparent)]
    Variables(#[from] VariablesError),
}
