//! Feelscope - FEEL variable tracking for DMN documents
//!
//! This crate keeps the variables of a DMN model and the FEEL texts that
//! reference them in step while the model is edited:
//! - A typed document tree with the boxed-expression variants
//! - A scope-tree repository resolving names the way FEEL nesting does
//! - A best-effort scanner locating variable references in FEEL text
//! - Offset-based rename rewriting across every tracked expression
//! - Structural mutators that keep document and repository consistent

pub mod utils;

pub mod config;
pub mod dmn_model;
pub mod feel_parser;
pub mod mutations;
pub mod variables;

pub use variables::FeelVariables;
