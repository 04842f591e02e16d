//! Integration tests - whole-document flows through the facade
//!
//! These tests build real documents, run rename batches and structural edits
//! against them, and verify that the document tree and the scope repository
//! stay in agreement.

mod import_resolution_tests;
mod rename_flow_tests;
mod structure_edit_tests;
