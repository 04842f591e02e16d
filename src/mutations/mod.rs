//! Structural edits on boxed-expression trees.
//!
//! These functions are the only sanctioned edit paths into an expression tree.
//! Each edits the document structure and, where the edit adds or removes a
//! named variable or a text-bearing cell, keeps a [`VariablesRepository`] in
//! step through its public add/remove surface, so FEEL tracking stays accurate
//! without a full rebuild.
//!
//! Shape changes are the exception: [`set_logic_type`] replaces a node
//! wholesale and deliberately does not touch the repository. Registrations of
//! the replaced subtree (tracked texts included) go stale, and the caller is
//! expected to rebuild `FeelVariables` from the document afterwards, the same
//! contract the editor applies on every render.

pub mod context;
pub mod decision_table;
pub mod errors;
pub mod function;
pub mod invocation;
pub mod list;
pub mod relation;
pub mod widths;

pub use errors::MutationError;
pub use widths::{DEFAULT_COLUMN_WIDTH, ROW_INDEX_COLUMN_WIDTH};

use crate::dmn_model::{
    Binding, BoxedExpression, ContextEntry, ContextExpression, DecisionRule,
    DecisionTableExpression, FunctionExpression, FunctionKind, InformationItem, InputClause,
    InvocationExpression, ListExpression, LiteralExpression, OutputClause, RelationExpression,
    RelationRow, UnaryTests,
};
use crate::utils::ids::generate_uuid;
use crate::variables::VariablesRepository;

/// The closed set of shapes a boxed-expression node can take. Selecting a kind
/// replaces the node with that kind's default scaffold; there is no other
/// variant transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicKind {
    Undefined,
    Literal,
    Context,
    Relation,
    DecisionTable,
    Invocation,
    List,
    Function,
}

/// Replace `node` with the default scaffold for `kind`, carrying the
/// containing element's type onto the new root.
///
/// Document-level only: every id in the scaffold is fresh, and registrations
/// of the replaced subtree are not unwound here. Rebuild the variables
/// repository from the document after a shape change.
pub fn set_logic_type(node: &mut BoxedExpression, kind: LogicKind, type_ref: Option<&str>) {
    *node = default_expression(kind, type_ref);
}

/// Default scaffold for a logic kind, with fresh ids throughout.
pub fn default_expression(kind: LogicKind, type_ref: Option<&str>) -> BoxedExpression {
    let type_ref = type_ref.map(str::to_string);
    match kind {
        LogicKind::Undefined => BoxedExpression::Undefined,
        LogicKind::Literal => BoxedExpression::Literal(LiteralExpression {
            id: generate_uuid(),
            text: String::new(),
            type_ref,
        }),
        LogicKind::Context => BoxedExpression::Context(ContextExpression {
            id: generate_uuid(),
            type_ref,
            entries: vec![
                ContextEntry {
                    id: generate_uuid(),
                    variable: Some(InformationItem {
                        id: generate_uuid(),
                        name: "ContextEntry-1".to_string(),
                        type_ref: None,
                    }),
                    expression: BoxedExpression::Undefined,
                },
                // Result row.
                ContextEntry {
                    id: generate_uuid(),
                    variable: None,
                    expression: BoxedExpression::Undefined,
                },
            ],
        }),
        LogicKind::Relation => BoxedExpression::Relation(RelationExpression {
            id: generate_uuid(),
            type_ref,
            columns: vec![InformationItem {
                id: generate_uuid(),
                name: "column-1".to_string(),
                type_ref: None,
            }],
            rows: vec![RelationRow {
                id: generate_uuid(),
                cells: vec![LiteralExpression {
                    id: generate_uuid(),
                    text: String::new(),
                    type_ref: None,
                }],
            }],
        }),
        LogicKind::DecisionTable => BoxedExpression::DecisionTable(DecisionTableExpression {
            id: generate_uuid(),
            type_ref,
            hit_policy: "UNIQUE".to_string(),
            input: vec![InputClause {
                id: generate_uuid(),
                input_expression: LiteralExpression {
                    id: generate_uuid(),
                    text: String::new(),
                    type_ref: None,
                },
            }],
            output: vec![OutputClause {
                id: generate_uuid(),
                name: None,
                type_ref: None,
            }],
            rules: vec![DecisionRule {
                id: generate_uuid(),
                input_entries: vec![UnaryTests {
                    id: generate_uuid(),
                    text: "-".to_string(),
                }],
                output_entries: vec![LiteralExpression {
                    id: generate_uuid(),
                    text: String::new(),
                    type_ref: None,
                }],
            }],
        }),
        LogicKind::Invocation => BoxedExpression::Invocation(InvocationExpression {
            id: generate_uuid(),
            type_ref,
            invoked_function: LiteralExpression {
                id: generate_uuid(),
                text: String::new(),
                type_ref: None,
            },
            bindings: vec![Binding {
                parameter: InformationItem {
                    id: generate_uuid(),
                    name: "p-1".to_string(),
                    type_ref: None,
                },
                expression: BoxedExpression::Undefined,
            }],
        }),
        LogicKind::List => BoxedExpression::List(ListExpression {
            id: generate_uuid(),
            type_ref,
            items: vec![BoxedExpression::Undefined],
        }),
        LogicKind::Function => BoxedExpression::Function(FunctionExpression {
            id: generate_uuid(),
            type_ref,
            kind: FunctionKind::Feel,
            parameters: Vec::new(),
            body: Some(Box::new(BoxedExpression::Literal(LiteralExpression {
                id: generate_uuid(),
                text: String::new(),
                type_ref: None,
            }))),
        }),
    }
}

/// Set a literal node's FEEL text and re-scan it so the repository's cached
/// occurrence table follows the new content.
pub fn set_literal_text(
    node: &mut BoxedExpression,
    text: &str,
    repository: &mut VariablesRepository,
) -> Result<(), MutationError> {
    let BoxedExpression::Literal(literal) = node else {
        return Err(MutationError::WrongShape {
            expected: "literal",
            actual: node.shape_name(),
        });
    };
    literal.text = text.to_string();
    repository.parse(&literal.id, text);
    Ok(())
}

/// Ids of the variables a subtree registers directly in its containing scope.
///
/// Mutators removing a whole sub-expression feed these to
/// [`VariablesRepository::remove_variable`] with `remove_children` set, so
/// anything nested below each variable's own scope cascades. Collection stops
/// at context entries for the same reason: a named entry's content lives under
/// the entry's scope, and a result entry's under its own anonymous scope,
/// neither of which is the containing scope.
pub fn collect_variable_ids(expression: &BoxedExpression) -> Vec<String> {
    let mut ids = Vec::new();
    collect_into(expression, &mut ids);
    ids
}

fn collect_into(expression: &BoxedExpression, ids: &mut Vec<String>) {
    match expression {
        BoxedExpression::Undefined | BoxedExpression::Literal(_) => {}
        BoxedExpression::Context(context) => {
            for entry in &context.entries {
                if let Some(item) = &entry.variable {
                    ids.push(item.id.clone());
                }
            }
        }
        BoxedExpression::Relation(relation) => {
            for column in &relation.columns {
                ids.push(column.id.clone());
            }
            for row in &relation.rows {
                for cell in &row.cells {
                    ids.push(cell.id.clone());
                }
            }
        }
        BoxedExpression::DecisionTable(table) => {
            for clause in &table.input {
                ids.push(clause.input_expression.id.clone());
            }
            for rule in &table.rules {
                for entry in &rule.input_entries {
                    ids.push(entry.id.clone());
                }
                for entry in &rule.output_entries {
                    ids.push(entry.id.clone());
                }
            }
        }
        BoxedExpression::Invocation(invocation) => {
            for binding in &invocation.bindings {
                collect_into(&binding.expression, ids);
            }
        }
        BoxedExpression::List(list) => {
            for item in &list.items {
                collect_into(item, ids);
            }
        }
        BoxedExpression::Function(function) => {
            if function.kind == FunctionKind::Feel {
                for parameter in &function.parameters {
                    ids.push(parameter.id.clone());
                }
                if let Some(body) = &function.body {
                    collect_into(body, ids);
                }
            }
        }
    }
}

/// Regenerate every element id in a subtree, leaving names, types, and texts
/// in place. Duplication runs this over the copy before splicing it in, so
/// the copy can register without colliding with the source.
pub(crate) fn refresh_expression_ids(expression: &mut BoxedExpression) {
    match expression {
        BoxedExpression::Undefined => {}
        BoxedExpression::Literal(literal) => literal.id = generate_uuid(),
        BoxedExpression::Context(context) => {
            context.id = generate_uuid();
            for entry in &mut context.entries {
                entry.id = generate_uuid();
                if let Some(item) = &mut entry.variable {
                    item.id = generate_uuid();
                }
                refresh_expression_ids(&mut entry.expression);
            }
        }
        BoxedExpression::Relation(relation) => {
            relation.id = generate_uuid();
            for column in &mut relation.columns {
                column.id = generate_uuid();
            }
            for row in &mut relation.rows {
                row.id = generate_uuid();
                for cell in &mut row.cells {
                    cell.id = generate_uuid();
                }
            }
        }
        BoxedExpression::DecisionTable(table) => {
            table.id = generate_uuid();
            for clause in &mut table.input {
                clause.id = generate_uuid();
                clause.input_expression.id = generate_uuid();
            }
            for clause in &mut table.output {
                clause.id = generate_uuid();
            }
            for rule in &mut table.rules {
                rule.id = generate_uuid();
                for entry in &mut rule.input_entries {
                    entry.id = generate_uuid();
                }
                for entry in &mut rule.output_entries {
                    entry.id = generate_uuid();
                }
            }
        }
        BoxedExpression::Invocation(invocation) => {
            invocation.id = generate_uuid();
            invocation.invoked_function.id = generate_uuid();
            for binding in &mut invocation.bindings {
                binding.parameter.id = generate_uuid();
                refresh_expression_ids(&mut binding.expression);
            }
        }
        BoxedExpression::List(list) => {
            list.id = generate_uuid();
            for item in &mut list.items {
                refresh_expression_ids(item);
            }
        }
        BoxedExpression::Function(function) => {
            function.id = generate_uuid();
            for parameter in &mut function.parameters {
                parameter.id = generate_uuid();
            }
            if let Some(body) = &mut function.body {
                refresh_expression_ids(body);
            }
        }
    }
}

/// Which generic table operations the current structure permits. Computed from
/// the same floors the mutators enforce, so the UI can grey out entries
/// instead of issuing calls that will no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowedOperations {
    pub insert_row: bool,
    pub delete_row: bool,
    pub duplicate_row: bool,
    pub insert_column: bool,
    pub delete_column: bool,
}

/// Report the operations allowed on `expression`. For decision tables,
/// `column` selects the clause section the column flags describe: data
/// columns count left to right across inputs then outputs. Other shapes
/// ignore it.
pub fn allowed_operations(expression: &BoxedExpression, column: Option<usize>) -> AllowedOperations {
    match expression {
        BoxedExpression::Relation(relation) => AllowedOperations {
            insert_row: true,
            delete_row: relation.rows.len() > 1,
            duplicate_row: true,
            insert_column: true,
            delete_column: relation.columns.len() > 1,
        },
        BoxedExpression::Context(context) => AllowedOperations {
            insert_row: true,
            delete_row: context.named_entries().count() > 1,
            duplicate_row: true,
            ..Default::default()
        },
        BoxedExpression::DecisionTable(table) => {
            let in_input = column.map(|c| c < table.input.len()).unwrap_or(true);
            AllowedOperations {
                insert_row: true,
                delete_row: table.rules.len() > 1,
                duplicate_row: true,
                insert_column: true,
                delete_column: if in_input {
                    table.input.len() > 1
                } else {
                    table.output.len() > 1
                },
            }
        }
        BoxedExpression::Invocation(invocation) => AllowedOperations {
            insert_row: true,
            delete_row: invocation.bindings.len() > 1,
            ..Default::default()
        },
        BoxedExpression::List(list) => AllowedOperations {
            insert_row: true,
            delete_row: list.items.len() > 1,
            ..Default::default()
        },
        BoxedExpression::Literal(_)
        | BoxedExpression::Function(_)
        | BoxedExpression::Undefined => AllowedOperations::default(),
    }
}
