//! Variable tracking and scope resolution for DMN boxed expressions.
//!
//! One [`FeelVariables`] instance owns the scope graph and the tracked
//! expression cache for one document. Building it scans every tracked FEEL
//! text once; after that, edits go through the targeted operations here (or
//! through a [`DocumentCommand`] batch) and the rewritten texts are written
//! back with [`FeelVariables::apply_changes_to_definition`].

pub mod commands;
pub mod errors;
pub mod expression;
pub mod repository;
pub mod variable;

pub use commands::{apply_batch, DocumentCommand};
pub use errors::VariablesError;
pub use expression::Expression;
pub use repository::VariablesRepository;
pub use variable::Variable;

use std::collections::BTreeMap;

use crate::dmn_model::{walk, DmnDefinitions};

/// Variable intelligence for one DMN document.
///
/// # Examples
///
/// ```
/// use feelscope::dmn_model::DmnDefinitions;
/// use feelscope::variables::FeelVariables;
///
/// let mut definitions: DmnDefinitions = serde_json::from_value(serde_json::json!({
///     "id": "_DEFS",
///     "name": "loan",
///     "namespace": "https://example.com/loan",
///     "drgElement": [
///         { "element": "inputData", "id": "_AGE", "name": "Age",
///           "variable": { "id": "_AGE-vi", "name": "Age", "typeRef": "number" } },
///         { "element": "decision", "id": "_D1", "name": "Can Drive",
///           "variable": { "id": "_D1-vi", "name": "Can Drive" },
///           "expression": { "element": "literalExpression", "id": "_T1",
///                           "text": "Age >= 18" } }
///     ]
/// })).unwrap();
///
/// let mut variables = FeelVariables::new(&definitions, &[]).unwrap();
/// variables.rename_variable("_AGE", "Years").unwrap();
/// variables.apply_changes_to_definition(&mut definitions);
///
/// let rendered = serde_json::to_string(&definitions).unwrap();
/// assert!(rendered.contains("Years >= 18"));
/// ```
pub struct FeelVariables {
    repository: VariablesRepository,
}

impl FeelVariables {
    /// Build the scope tree from `definitions` and scan every tracked text,
    /// so the rename engine starts from a complete occurrence index.
    /// `external` holds imported models, keyed by their own namespace fields.
    pub fn new(
        definitions: &DmnDefinitions,
        external: &[DmnDefinitions],
    ) -> Result<Self, VariablesError> {
        let mut repository = VariablesRepository::build(definitions, external)?;
        walk::visit_document_tracked_texts(definitions, &mut |uuid, text| {
            repository.parse(uuid, text);
        });
        log::debug!(
            "variable index ready: {} tracked texts",
            repository.expressions().len()
        );
        Ok(FeelVariables { repository })
    }

    /// Scan a text. `id` is a tracked text element id (cached, scanned in its
    /// own scope) or a bare scope id for ad-hoc scans.
    pub fn parse(&mut self, id: &str, text: &str) -> Expression {
        self.repository.parse(id, text)
    }

    /// Rename a variable everywhere: its record and every cached text that
    /// references it. The document sees the change on the next flush.
    pub fn rename_variable(&mut self, uuid: &str, new_name: &str) -> Result<(), VariablesError> {
        self.repository.rename_variable(uuid, new_name)
    }

    pub fn update_variable_type(
        &mut self,
        uuid: &str,
        type_ref: Option<String>,
    ) -> Result<(), VariablesError> {
        self.repository.update_variable_type(uuid, type_ref)
    }

    pub fn add_variable_to_context(
        &mut self,
        uuid: &str,
        name: &str,
        parent_scope_id: &str,
        child_scope_id: Option<&str>,
    ) -> Result<(), VariablesError> {
        self.repository
            .add_variable_to_context(uuid, name, parent_scope_id, child_scope_id)
    }

    pub fn remove_variable(
        &mut self,
        uuid: &str,
        remove_children: bool,
    ) -> Result<(), VariablesError> {
        self.repository.remove_variable(uuid, remove_children)
    }

    pub fn rename_import(
        &mut self,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<(), VariablesError> {
        self.repository.rename_import(old_alias, new_alias)
    }

    /// The tracked expression cache, keyed by text element uuid.
    pub fn expressions(&self) -> &BTreeMap<String, Expression> {
        self.repository.expressions()
    }

    /// Names visible from a scope, nearest first, for completion surfaces.
    pub fn available_variables(&self, scope_id: &str) -> Vec<&Variable> {
        self.repository.visible_variables(scope_id)
    }

    pub fn repository(&self) -> &VariablesRepository {
        &self.repository
    }

    /// Mutable repository access for the structural edits in
    /// [`crate::mutations`], which keep the document and the scope tree in
    /// step as one operation.
    pub fn repository_mut(&mut self) -> &mut VariablesRepository {
        &mut self.repository
    }

    /// Write every cached text back into the document. Texts the cache does
    /// not know (never scanned, or belonging to removed elements) are left
    /// alone.
    pub fn apply_changes_to_definition(&self, definitions: &mut DmnDefinitions) {
        walk::visit_document_texts_mut(definitions, &mut |uuid, text| {
            if let Some(expression) = self.repository.expression(uuid) {
                if text.as_str() != expression.full_expression() {
                    *text = expression.full_expression().to_string();
                }
            }
        });
    }
}
