//! Boxed-expression tree.
//!
//! The expression under a decision (or a BKM's encapsulated logic) is one of a
//! closed set of shapes, mutually recursive through entries, rows, bindings,
//! and items. Keeping the set closed means every walk over the tree is an
//! exhaustive match; adding a shape breaks compilation at every dispatch site
//! instead of silently skipping the new case.

use serde::{Deserialize, Serialize};

use super::document::InformationItem;

/// One boxed expression node. The `element` tag selects the shape; changing a
/// node's shape replaces the whole node, it is never mutated across variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "element")]
pub enum BoxedExpression {
    #[serde(rename = "literalExpression")]
    Literal(LiteralExpression),
    #[serde(rename = "context")]
    Context(ContextExpression),
    #[serde(rename = "relation")]
    Relation(RelationExpression),
    #[serde(rename = "decisionTable")]
    DecisionTable(DecisionTableExpression),
    #[serde(rename = "invocation")]
    Invocation(InvocationExpression),
    #[serde(rename = "list")]
    List(ListExpression),
    #[serde(rename = "functionDefinition")]
    Function(FunctionExpression),
    /// No logic type chosen yet. A fresh context entry or list item starts
    /// here until the editor picks a shape for it.
    #[serde(rename = "undefined")]
    #[default]
    Undefined,
}

impl BoxedExpression {
    /// The node's element id, absent only for `Undefined`.
    pub fn id(&self) -> Option<&str> {
        match self {
            BoxedExpression::Literal(e) => Some(&e.id),
            BoxedExpression::Context(e) => Some(&e.id),
            BoxedExpression::Relation(e) => Some(&e.id),
            BoxedExpression::DecisionTable(e) => Some(&e.id),
            BoxedExpression::Invocation(e) => Some(&e.id),
            BoxedExpression::List(e) => Some(&e.id),
            BoxedExpression::Function(e) => Some(&e.id),
            BoxedExpression::Undefined => None,
        }
    }

    /// Human-readable shape name, used in logs and wrong-variant errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            BoxedExpression::Literal(_) => "literal",
            BoxedExpression::Context(_) => "context",
            BoxedExpression::Relation(_) => "relation",
            BoxedExpression::DecisionTable(_) => "decision table",
            BoxedExpression::Invocation(_) => "invocation",
            BoxedExpression::List(_) => "list",
            BoxedExpression::Function(_) => "function",
            BoxedExpression::Undefined => "undefined",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, BoxedExpression::Undefined)
    }
}

/// A FEEL text holder. Also used standalone for relation cells, decision-table
/// output entries, and invocation function references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralExpression {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ContextEntry>,
}

impl ContextExpression {
    /// The result entry is the one entry without a variable.
    pub fn result_entry(&self) -> Option<&ContextEntry> {
        self.entries.iter().find(|entry| entry.variable.is_none())
    }

    pub fn result_entry_mut(&mut self) -> Option<&mut ContextEntry> {
        self.entries.iter_mut().find(|entry| entry.variable.is_none())
    }

    /// Named entries in order, skipping the result entry.
    pub fn named_entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter().filter(|entry| entry.variable.is_some())
    }
}

/// One context row. The result entry has no `variable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<InformationItem>,
    #[serde(default)]
    pub expression: BoxedExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<InformationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RelationRow>,
}

/// One relation row; `cells.len()` equals the relation's column count at all
/// times. Cells are owned, never shared between rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<LiteralExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTableExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default = "default_hit_policy")]
    pub hit_policy: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<InputClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<OutputClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<DecisionRule>,
}

fn default_hit_policy() -> String {
    "UNIQUE".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputClause {
    pub id: String,
    pub input_expression: LiteralExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputClause {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
}

/// One decision-table rule; entry counts track the clause counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_entries: Vec<UnaryTests>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_entries: Vec<LiteralExpression>,
}

/// A unary-tests cell ("-", "< 18", "[18..65)").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnaryTests {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    /// Names the invoked function, usually a single BKM reference.
    pub invoked_function: LiteralExpression,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
}

/// One invocation argument: the invoked function's parameter plus the
/// expression bound to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub parameter: InformationItem,
    #[serde(default)]
    pub expression: BoxedExpression,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<BoxedExpression>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExpression {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default)]
    pub kind: FunctionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<InformationItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Box<BoxedExpression>>,
}

/// Function implementation kind. FEEL bodies are boxed expressions in their
/// own nested scope; Java and PMML bodies are fixed-shape contexts opaque to
/// FEEL reference tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionKind {
    #[serde(rename = "FEEL")]
    #[default]
    Feel,
    #[serde(rename = "Java")]
    Java,
    #[serde(rename = "PMML")]
    Pmml,
}
